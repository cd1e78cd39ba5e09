// Domain layer: core models and ports (interfaces). No external service
// dependencies beyond std/serde.

pub mod model;
pub mod ports;
