pub mod aggregate;
pub mod dictionary;
pub mod engine;
pub mod normalizer;
pub mod pipeline;

pub use crate::domain::model::{InputRecord, PipelineReport, UserSummary};
pub use crate::domain::ports::{Scorer, Translator};
pub use crate::utils::error::Result;
