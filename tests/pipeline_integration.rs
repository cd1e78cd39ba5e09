use httpmock::prelude::*;
use moderation_pipeline::cache::CacheConfig;
use moderation_pipeline::resilience::{CircuitBreakerConfig, RetryPolicy};
use moderation_pipeline::{ModerationPipeline, PipelineEngine, ScoringClient, TranslationClient};
use tempfile::TempDir;

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        timeout_ms: 2000,
        max_retries: 2,
        retry_base_delay_ms: 1,
        retry_max_delay_ms: 10,
    }
}

fn pipeline_against(server: &MockServer, concurrency: usize) -> ModerationPipeline<TranslationClient, ScoringClient> {
    let translator = TranslationClient::new(
        server.base_url(),
        fast_retry(),
        CircuitBreakerConfig::default(),
        &CacheConfig::default(),
    );
    let scorer = ScoringClient::new(
        server.base_url(),
        fast_retry(),
        CircuitBreakerConfig::default(),
        &CacheConfig::default(),
    );
    ModerationPipeline::new(translator, scorer, concurrency)
}

#[tokio::test]
async fn end_to_end_pipeline_against_mock_services() {
    let server = MockServer::start();
    let translate_mock = server.mock(|when, then| {
        when.method(GET).path("/translate");
        then.status(200)
            .header("Content-Type", "text/plain")
            .body("translated");
    });
    let score_mock = server.mock(|when, then| {
        when.method(GET).path("/score");
        then.status(200)
            .header("Content-Type", "text/plain")
            .body("0.9");
    });

    let pipeline = pipeline_against(&server, 8);
    let input = "user_id,message\nu1,hello\nu1,world\nu2,hola\n";
    let (output, report) = pipeline.process(input).await.unwrap();

    assert!(output.starts_with("user_id,total_messages,avg_score"));
    assert!(output.contains("u1,2,0.900000"));
    assert!(output.contains("u2,1,0.900000"));
    assert_eq!(report.total_messages, 3);
    assert_eq!(report.processed, 3);
    assert_eq!(report.failed, 0);

    assert!(translate_mock.hits() >= 1);
    assert!(score_mock.hits() >= 1);
}

#[tokio::test]
async fn duplicate_messages_hit_the_cache() {
    let server = MockServer::start();
    let translate_mock = server.mock(|when, then| {
        when.method(GET).path("/translate");
        then.status(200)
            .header("Content-Type", "text/plain")
            .delay(std::time::Duration::from_millis(120))
            .body("translated");
    });
    let score_mock = server.mock(|when, then| {
        when.method(GET).path("/score");
        then.status(200)
            .header("Content-Type", "text/plain")
            .delay(std::time::Duration::from_millis(180))
            .body("0.90");
    });

    let pipeline = pipeline_against(&server, 8);
    // The two u1 messages normalize identically, so at most two distinct
    // translation inputs exist.
    let input = "user_id,message\nu1,Hola!!!\nu1,\"  hóla   !!! \"\nu2,hello\n";
    let (output, report) = pipeline.process(input).await.unwrap();

    assert!(output.contains("user_id,total_messages,avg_score"));
    assert!(output.contains("u1,2,"));
    assert_eq!(report.processed, 3);

    assert!(translate_mock.hits() <= 2, "expected cache to dedupe translations");
    // Every translation comes back identical, so one scoring call suffices.
    assert_eq!(score_mock.hits(), 1);
}

#[tokio::test]
async fn scoring_failures_are_retried_then_skipped() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/translate");
        then.status(200)
            .header("Content-Type", "text/plain")
            .body("translated");
    });
    let score_mock = server.mock(|when, then| {
        when.method(GET).path("/score");
        then.status(500);
    });

    let pipeline = pipeline_against(&server, 4);
    let input = "user_id,message\nu1,hello\n";
    let (output, report) = pipeline.process(input).await.unwrap();

    // The run survives; the failing row is dropped from the aggregates.
    assert_eq!(output, "user_id,total_messages,avg_score\n");
    assert_eq!(report.processed, 0);
    assert_eq!(report.failed, 1);

    // One attempt plus two retries.
    assert_eq!(score_mock.hits(), 3);
}

#[tokio::test]
async fn translation_failures_do_not_reach_the_scorer() {
    let server = MockServer::start();
    let translate_mock = server.mock(|when, then| {
        when.method(GET).path("/translate");
        then.status(503);
    });
    let score_mock = server.mock(|when, then| {
        when.method(GET).path("/score");
        then.status(200).body("0.5");
    });

    let pipeline = pipeline_against(&server, 4);
    let (_, report) = pipeline
        .process("user_id,message\nu1,hola\n")
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(translate_mock.hits(), 3);
    assert_eq!(score_mock.hits(), 0);
}

#[tokio::test]
async fn invalid_score_body_fails_the_row_without_retry() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/translate");
        then.status(200).body("translated");
    });
    let score_mock = server.mock(|when, then| {
        when.method(GET).path("/score");
        then.status(200).body("not-a-number");
    });

    let pipeline = pipeline_against(&server, 4);
    let (_, report) = pipeline
        .process("user_id,message\nu1,hola\n")
        .await
        .unwrap();

    assert_eq!(report.failed, 1);
    // Malformed bodies are not retryable.
    assert_eq!(score_mock.hits(), 1);
}

#[tokio::test]
async fn engine_runs_file_to_file() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/translate");
        then.status(200).body("translated");
    });
    server.mock(|when, then| {
        when.method(GET).path("/score");
        then.status(200).body("0.5");
    });

    let temp_dir = TempDir::new().unwrap();
    let input_path = temp_dir.path().join("input.csv");
    let output_path = temp_dir.path().join("output.csv");
    std::fs::write(&input_path, "user_id,message\nu1,hello\nu2,hola\n").unwrap();

    let engine = PipelineEngine::new_with_monitoring(pipeline_against(&server, 4), false);
    let report = engine
        .run(
            input_path.to_str().unwrap(),
            output_path.to_str().unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.unique_users, 2);

    let content = std::fs::read_to_string(&output_path).unwrap();
    assert!(content.starts_with("user_id,total_messages,avg_score"));
    assert!(content.contains("u1,1,0.500000"));
    assert!(content.contains("u2,1,0.500000"));
}

#[tokio::test]
async fn engine_reports_missing_input_file() {
    let server = MockServer::start();
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.csv");

    let engine = PipelineEngine::new(pipeline_against(&server, 4));
    let result = engine
        .run("/definitely/missing/input.csv", output_path.to_str().unwrap())
        .await;

    assert!(matches!(
        result,
        Err(moderation_pipeline::ModerationError::IoError(_))
    ));
}
