use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One row of the input CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRecord {
    pub user_id: String,
    pub message: String,
}

/// One row of the result CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub user_id: String,
    pub total_messages: u64,
    pub avg_score: f64,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub total_messages: usize,
    pub processed: usize,
    pub failed: usize,
    pub unique_users: usize,
    pub duration: Duration,
}

impl PipelineReport {
    pub fn messages_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.total_messages as f64 / secs
        } else {
            self.total_messages as f64
        }
    }
}
