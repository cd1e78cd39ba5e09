use crate::domain::model::UserSummary;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, Copy)]
struct Accumulator {
    count: u64,
    sum: f64,
}

/// Per-user running totals for the pipeline run.
#[derive(Debug, Default)]
pub struct Aggregator {
    users: HashMap<String, Accumulator>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, user_id: &str, score: f64) {
        let acc = self.users.entry(user_id.to_string()).or_default();
        acc.count += 1;
        acc.sum += score;
        tracing::debug!(
            "📈 Updated stats for user {}: {} messages, avg score: {:.6}",
            user_id,
            acc.count,
            acc.sum / acc.count as f64
        );
    }

    /// Rows sorted by user id so output is deterministic.
    pub fn snapshot(&self) -> Vec<UserSummary> {
        let mut rows: Vec<UserSummary> = self
            .users
            .iter()
            .map(|(user_id, acc)| UserSummary {
                user_id: user_id.clone(),
                total_messages: acc.count,
                avg_score: acc.sum / acc.count as f64,
            })
            .collect();
        rows.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        rows
    }

    pub fn unique_users(&self) -> usize {
        self.users.len()
    }
}
