use metrics::{counter, describe_counter, describe_gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the process-global Prometheus recorder. Safe to call more than
/// once; later calls return the existing handle.
pub fn install() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus metrics recorder");

            describe_counter!(
                "pipeline_messages_processed",
                "Messages processed successfully by the moderation pipeline"
            );
            describe_counter!(
                "pipeline_messages_failed",
                "Messages that failed translation or scoring"
            );
            describe_counter!("cache_requests_total", "Cache lookups by cache and result");
            describe_gauge!("cache_size", "Current entries per cache");

            // Register the pipeline counters up front so scrapes before the
            // first run still see them.
            counter!("pipeline_messages_processed").absolute(0);
            counter!("pipeline_messages_failed").absolute(0);

            handle
        })
        .clone()
}
