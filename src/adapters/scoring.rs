use crate::cache::{CacheConfig, TtlCache};
use crate::core::normalizer;
use crate::domain::ports::Scorer;
use crate::resilience::{retry, CircuitBreaker, CircuitBreakerConfig, RetryPolicy};
use crate::utils::error::{ModerationError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// REST client for the external scoring service
/// (`GET {base_url}/score?q=...`, plain-text float response).
pub struct ScoringClient {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
    breaker: CircuitBreaker,
    cache: TtlCache<f64>,
}

impl ScoringClient {
    pub fn new(
        base_url: impl Into<String>,
        policy: RetryPolicy,
        breaker_config: CircuitBreakerConfig,
        cache_config: &CacheConfig,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            policy,
            breaker: CircuitBreaker::new("scoring", breaker_config),
            cache: TtlCache::new("scoring", cache_config),
        }
    }

    async fn fetch(&self, text: &str) -> Result<f64> {
        let response = self
            .client
            .get(format!("{}/score", self.base_url))
            .query(&[("q", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModerationError::UpstreamStatusError {
                service: "scoring".to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let score = body
            .trim()
            .parse::<f64>()
            .map_err(|_| ModerationError::InvalidScoreError { raw: body.clone() })?;
        tracing::debug!("🎯 Scoring API response: '{}' -> {:.6}", text, score);
        Ok(score)
    }
}

#[async_trait]
impl Scorer for ScoringClient {
    async fn score(&self, text: &str) -> Result<f64> {
        let norm = normalizer::normalize(text);
        let key = normalizer::cache_key("s|", &norm);

        self.cache
            .get_or_load(&key, || async {
                retry::execute("scoring", &self.policy, &self.breaker, || self.fetch(&norm))
                    .await
            })
            .await
    }
}
