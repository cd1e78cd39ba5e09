//! Dev stub endpoints standing in for the external translation and scoring
//! services. Pointing the client URLs at this server makes the whole
//! pipeline runnable self-contained.

use crate::core::dictionary;
use axum::extract::Query;
use rand::Rng;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct DevQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn translate(Query(query): Query<DevQuery>) -> String {
    simulate_latency().await;
    dictionary::translate(&query.q)
}

/// Deterministic pseudo-score in `[0, 1)` derived from the input text.
pub async fn score(Query(query): Query<DevQuery>) -> String {
    simulate_latency().await;
    let digest = Sha256::digest(query.q.as_bytes());
    let word = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    let value = (word % 1000) as f64 / 1000.0;
    format!("{}", value)
}

async fn simulate_latency() {
    let delay_ms = rand::thread_rng().gen_range(50..=200);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}
