pub mod adapters;
pub mod cache;
pub mod config;
pub mod core;
pub mod domain;
pub mod resilience;
pub mod utils;
pub mod web;

pub use adapters::{ScoringClient, TranslationClient};
pub use config::{Cli, Settings};
pub use core::engine::PipelineEngine;
pub use core::pipeline::ModerationPipeline;
pub use utils::error::{ModerationError, Result};
