// Adapters layer: concrete clients for the external translation and scoring
// services, wired with caching and resilience.

pub mod scoring;
pub mod translation;

pub use scoring::ScoringClient;
pub use translation::TranslationClient;
