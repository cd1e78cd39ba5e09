use crate::cache::CacheConfig;
use crate::resilience::{CircuitBreakerConfig, RetryPolicy};
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub clients: ClientsConfig,
    pub circuit_breaker: CircuitBreakerConfig,
    pub cache: CacheConfig,
    pub processing: ProcessingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientsConfig {
    pub translation_url: String,
    pub scoring_url: String,
    #[serde(flatten)]
    pub retry: RetryPolicy,
}

impl Default for ClientsConfig {
    fn default() -> Self {
        // The built-in dev stubs make the service self-contained by default.
        Self {
            translation_url: "http://127.0.0.1:8080/dev".to_string(),
            scoring_url: "http://127.0.0.1:8080/dev".to_string(),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub concurrency: usize,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self { concurrency: 32 }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let substituted = substitute_env_vars(content);
        let settings: Settings = toml::from_str(&substituted)?;
        Ok(settings)
    }
}

/// Replace `${VAR}` placeholders with environment values; unknown variables
/// are left as-is.
fn substitute_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();
    re.replace_all(content, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
    })
    .into_owned()
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_url("clients.translation_url", &self.clients.translation_url)?;
        validate_url("clients.scoring_url", &self.clients.scoring_url)?;
        validate_range("processing.concurrency", self.processing.concurrency, 1, 256)?;
        validate_range("clients.timeout_ms", self.clients.retry.timeout_ms, 1, 60_000)?;
        validate_range("clients.max_retries", self.clients.retry.max_retries, 0, 10)?;
        validate_range("cache.max_size", self.cache.max_size, 1, usize::MAX)?;
        validate_range(
            "circuit_breaker.failure_ratio",
            self.circuit_breaker.failure_ratio,
            f64::EPSILON,
            1.0,
        )?;
        validate_range(
            "circuit_breaker.request_volume_threshold",
            self.circuit_breaker.request_volume_threshold,
            1,
            10_000,
        )?;
        Ok(())
    }
}
