pub mod settings;

pub use settings::Settings;

use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "moderation-pipeline")]
#[command(about = "Content moderation pipeline: translate, score and aggregate user messages")]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Input CSV path. When set, runs the pipeline once and exits instead
    /// of serving HTTP.
    #[arg(long, requires = "output")]
    pub input: Option<String>,

    /// Output CSV path for one-shot mode.
    #[arg(long, requires = "input")]
    pub output: Option<String>,

    /// Override the HTTP bind address from the configuration.
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

impl Cli {
    /// Settings from the config file (or defaults), with CLI overrides
    /// applied.
    pub fn load_settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(bind) = &self.bind {
            settings.server.bind = bind.clone();
        }
        Ok(settings)
    }
}
