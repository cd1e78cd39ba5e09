use crate::cache::{CacheConfig, TtlCache};
use crate::core::normalizer;
use crate::domain::ports::Translator;
use crate::resilience::{retry, CircuitBreaker, CircuitBreakerConfig, RetryPolicy};
use crate::utils::error::{ModerationError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// REST client for the external translation service
/// (`GET {base_url}/translate?q=...`, plain-text response).
pub struct TranslationClient {
    client: Client,
    base_url: String,
    policy: RetryPolicy,
    breaker: CircuitBreaker,
    cache: TtlCache<String>,
}

impl TranslationClient {
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
            breaker: CircuitBreaker::new("translation", breaker_config),
            cache: TtlCache::new("translation", cache_config),
        }
    }

    async fn fetch(&self, text: &str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/translate", self.base_url))
            .query(&[("q", text)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ModerationError::UpstreamStatusError {
                service: "translation".to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        tracing::debug!("🌍 Translation API response: '{}' -> '{}'", text, body);
        Ok(body)
    }
}

#[async_trait]
impl Translator for TranslationClient {
    async fn to_english(&self, text: &str) -> Result<String> {
        let norm = normalizer::normalize(text);
        let key = normalizer::cache_key("t|", &norm);

        self.cache
            .get_or_load(&key, || async {
                retry::execute("translation", &self.policy, &self.breaker, || {
                    self.fetch(&norm)
                })
                .await
            })
            .await
    }
}
