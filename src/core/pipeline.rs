use crate::core::aggregate::Aggregator;
use crate::domain::model::{InputRecord, PipelineReport};
use crate::domain::ports::{Scorer, Translator};
use crate::utils::error::{ModerationError, Result};
use metrics::counter;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// The content moderation pipeline: parse CSV, translate and score each
/// message concurrently, aggregate per user.
pub struct ModerationPipeline<T, S> {
    translator: Arc<T>,
    scorer: Arc<S>,
    concurrency: usize,
}

impl<T, S> ModerationPipeline<T, S>
where
    T: Translator + 'static,
    S: Scorer + 'static,
{
    pub fn new(translator: T, scorer: S, concurrency: usize) -> Self {
        Self {
            translator: Arc::new(translator),
            scorer: Arc::new(scorer),
            concurrency: concurrency.max(1),
        }
    }

    /// Process raw CSV text and return the result CSV plus a run report.
    pub async fn process(&self, csv_input: &str) -> Result<(String, PipelineReport)> {
        let start = Instant::now();

        tracing::info!("📊 Parsing CSV input...");
        let records = parse_records(csv_input)?;
        let total = records.len();
        tracing::info!("✅ Parsed {} messages to process", total);
        if records.is_empty() {
            tracing::warn!("⚠️ No messages found in input!");
        }

        let permits = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks: JoinSet<(String, Result<f64>)> = JoinSet::new();

        for record in records {
            let translator = self.translator.clone();
            let scorer = self.scorer.clone();
            let permits = permits.clone();
            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .expect("semaphore closed unexpectedly");
                let outcome = async {
                    let translated = translator.to_english(&record.message).await?;
                    scorer.score(&translated).await
                }
                .await;
                (record.user_id, outcome)
            });
        }

        let mut agg = Aggregator::new();
        let mut processed = 0usize;
        let mut failed = 0usize;

        while let Some(joined) = tasks.join_next().await {
            let (user_id, outcome) = joined.map_err(|e| ModerationError::ProcessingError {
                message: format!("Worker task failed: {}", e),
            })?;

            match outcome {
                Ok(score) => {
                    agg.add(&user_id, score);
                    processed += 1;
                    counter!("pipeline_messages_processed").increment(1);
                    if processed % 10 == 0 || processed == total {
                        tracing::info!(
                            "📈 Progress: {}/{} messages processed ({:.1}%)",
                            processed,
                            total,
                            (processed as f64 * 100.0) / total as f64
                        );
                    }
                }
                Err(e) => {
                    failed += 1;
                    counter!("pipeline_messages_failed").increment(1);
                    tracing::error!(
                        "❌ Processing failed for user {} (failure #{}): {}",
                        user_id,
                        failed,
                        e
                    );
                }
            }
        }

        let output = render_output(&agg);
        let report = PipelineReport {
            total_messages: total,
            processed,
            failed,
            unique_users: agg.unique_users(),
            duration: start.elapsed(),
        };

        tracing::info!(
            "📈 Summary: {} messages processed, {} unique users, {} failures",
            report.processed,
            report.unique_users,
            report.failed
        );
        tracing::info!(
            "⚡ Average processing speed: {:.2} messages/second",
            report.messages_per_second()
        );

        Ok((output, report))
    }
}

/// Parse `user_id,message` rows. Header required, values trimmed, rows
/// without a user id skipped.
fn parse_records(csv_input: &str) -> Result<Vec<InputRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(csv_input.as_bytes());

    let headers = reader.headers()?.clone();
    let user_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("user_id"))
        .ok_or_else(|| ModerationError::ProcessingError {
            message: "Input CSV is missing the 'user_id' column".to_string(),
        })?;
    let message_idx = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case("message"))
        .ok_or_else(|| ModerationError::ProcessingError {
            message: "Input CSV is missing the 'message' column".to_string(),
        })?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let user_id = row.get(user_idx).unwrap_or("").to_string();
        if user_id.is_empty() {
            continue;
        }
        let message = row.get(message_idx).unwrap_or("").to_string();
        records.push(InputRecord { user_id, message });
    }
    Ok(records)
}

fn render_output(agg: &Aggregator) -> String {
    let mut lines = vec!["user_id,total_messages,avg_score".to_string()];
    for row in agg.snapshot() {
        lines.push(format!(
            "{},{},{:.6}",
            row.user_id, row.total_messages, row.avg_score
        ));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
