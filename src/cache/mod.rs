//! Keyed TTL cache with request coalescing.
//!
//! Concurrent lookups for the same key share a single upstream call: the
//! first caller runs the loader, later callers await the same cell. Errors
//! are never cached; the entry is dropped so the next caller retries.

use crate::utils::error::Result;
use dashmap::DashMap;
use metrics::{counter, gauge};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_size: usize,
    pub expire_after_write_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size: 100_000,
            expire_after_write_secs: 300,
        }
    }
}

struct Entry<V> {
    inserted_at: Instant,
    cell: Arc<OnceCell<V>>,
}

pub struct TtlCache<V: Clone + Send + Sync + 'static> {
    name: &'static str,
    entries: DashMap<String, Entry<V>>,
    max_size: usize,
    ttl: Duration,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    pub fn new(name: &'static str, config: &CacheConfig) -> Self {
        Self {
            name,
            entries: DashMap::new(),
            max_size: config.max_size.max(1),
            ttl: Duration::from_secs(config.expire_after_write_secs),
        }
    }

    /// Fetch the cached value for `key`, or run `loader` to produce it.
    pub async fn get_or_load<F, Fut>(&self, key: &str, loader: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        let cell = self.cell_for(key);

        let hit = cell.initialized();
        counter!(
            "cache_requests_total",
            "cache" => self.name,
            "result" => if hit { "hit" } else { "miss" }
        )
        .increment(1);
        if hit {
            tracing::debug!(cache = self.name, key, "💾 Cache HIT");
        } else {
            tracing::debug!(cache = self.name, key, "🌐 Cache MISS, loading from upstream");
        }

        let result = cell.get_or_try_init(loader).await.cloned();

        if result.is_err() {
            // Drop the entry so a later call retries, unless another task
            // initialized it successfully in the meantime.
            self.entries
                .remove_if(key, |_, entry| entry.cell.get().is_none());
        }

        gauge!("cache_size", "cache" => self.name).set(self.entries.len() as f64);
        result
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn cell_for(&self, key: &str) -> Arc<OnceCell<V>> {
        // Expired entries are replaced in place.
        if let Some(entry) = self.entries.get(key) {
            if entry.inserted_at.elapsed() < self.ttl {
                return entry.cell.clone();
            }
        }
        self.entries.remove_if(key, |_, e| e.inserted_at.elapsed() >= self.ttl);

        if self.entries.len() >= self.max_size {
            self.evict();
        }

        self.entries
            .entry(key.to_string())
            .or_insert_with(|| Entry {
                inserted_at: Instant::now(),
                cell: Arc::new(OnceCell::new()),
            })
            .cell
            .clone()
    }

    /// Drop expired entries, then the oldest one if still at capacity.
    fn evict(&self) {
        self.entries.retain(|_, e| e.inserted_at.elapsed() < self.ttl);

        if self.entries.len() >= self.max_size {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|e| e.value().inserted_at)
                .map(|e| e.key().clone());
            if let Some(key) = oldest {
                self.entries.remove(&key);
            }
        }
    }
}
