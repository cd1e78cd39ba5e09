use crate::core::pipeline::ModerationPipeline;
use crate::domain::model::PipelineReport;
use crate::domain::ports::{Scorer, Translator};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// File-to-file orchestration of the moderation pipeline, used by the CLI
/// one-shot mode.
pub struct PipelineEngine<T, S> {
    pipeline: ModerationPipeline<T, S>,
    monitor: SystemMonitor,
}

impl<T, S> PipelineEngine<T, S>
where
    T: Translator + 'static,
    S: Scorer + 'static,
{
    pub fn new(pipeline: ModerationPipeline<T, S>) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: ModerationPipeline<T, S>, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self, input_path: &str, output_path: &str) -> Result<PipelineReport> {
        tracing::info!("🚀 Starting content moderation pipeline...");
        tracing::info!("📂 Input file: {}", input_path);
        tracing::info!("📝 Output file: {}", output_path);
        self.monitor.log_stats("Startup");

        let csv_input = tokio::fs::read_to_string(input_path).await?;

        let (output, report) = self.pipeline.process(&csv_input).await?;
        self.monitor.log_stats("Processing");

        tracing::info!(
            "📄 Writing results for {} unique users to output file...",
            report.unique_users
        );
        tokio::fs::write(output_path, output).await?;

        tracing::info!("🎉 Content moderation pipeline completed successfully!");
        tracing::info!("⏱️ Total execution time: {} ms", report.duration.as_millis());
        tracing::info!("📁 Results saved to: {}", output_path);
        self.monitor.log_final_stats();

        Ok(report)
    }
}
