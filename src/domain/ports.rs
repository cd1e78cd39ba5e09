use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Translation seam. The production implementation calls the external
/// translation service; tests substitute in-process fakes.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn to_english(&self, text: &str) -> Result<String>;
}

/// Scoring seam for translated messages, expected in `[0, 1]`.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<f64>;
}

#[async_trait]
impl<T: Translator + ?Sized> Translator for Arc<T> {
    async fn to_english(&self, text: &str) -> Result<String> {
        (**self).to_english(text).await
    }
}

#[async_trait]
impl<S: Scorer + ?Sized> Scorer for Arc<S> {
    async fn score(&self, text: &str) -> Result<f64> {
        (**self).score(text).await
    }
}
