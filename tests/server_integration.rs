use moderation_pipeline::web::{self, AppState};
use moderation_pipeline::Settings;
use tokio::net::TcpListener;

/// Boot the API on an ephemeral port with the client URLs pointed at the
/// server's own dev stubs.
async fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let mut settings = Settings::default();
    settings.clients.translation_url = format!("http://{}/dev", addr);
    settings.clients.scoring_url = format!("http://{}/dev", addr);
    // Dev stubs sleep up to 200ms; leave headroom for retries.
    settings.clients.retry.timeout_ms = 2000;

    let state = AppState::from_settings(&settings, true);
    tokio::spawn(async move {
        web::serve(listener, state).await.unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn status_endpoint_reports_up() {
    let base = spawn_app().await;
    let body: serde_json::Value = reqwest::get(format!("{}/status", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "UP");
    assert_eq!(body["application"], "moderation-pipeline");
}

#[tokio::test]
async fn health_endpoint_reports_up() {
    let base = spawn_app().await;
    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "UP");
}

#[tokio::test]
async fn index_links_to_endpoints() {
    let base = spawn_app().await;
    let body = reqwest::get(format!("{}/", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(body.contains("/health"));
    assert!(body.contains("/q/metrics"));
}

#[tokio::test]
async fn dev_translate_applies_dictionary() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    for (input, expected) in [
        ("hola", "hello"),
        ("Hola", "Hello"),
        ("HOLA", "HELLO"),
        ("hola mundo", "hello world"),
        ("buenos días", "good morning"),
        ("me gusta el gato", "I like the cat"),
        ("palabra desconocida", "palabra desconocida"),
    ] {
        let body = client
            .get(format!("{}/dev/translate", base))
            .query(&[("q", input)])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, expected, "translation of '{}'", input);
    }
}

#[tokio::test]
async fn dev_score_is_deterministic() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let mut values = Vec::new();
    for _ in 0..2 {
        let body = client
            .get(format!("{}/dev/score", base))
            .query(&[("q", "test")])
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        let v: f64 = body.parse().unwrap();
        assert!((0.0..1.0).contains(&v));
        values.push(body);
    }
    assert_eq!(values[0], values[1]);
}

#[tokio::test]
async fn sample_csv_is_downloadable() {
    let base = spawn_app().await;
    let response = reqwest::get(format!("{}/api/csv/sample", base)).await.unwrap();

    assert_eq!(response.status(), 200);
    assert!(response
        .headers()
        .get("content-disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("sample-input.csv"));

    let body = response.text().await.unwrap();
    assert!(body.starts_with("user_id,message"));
}

#[tokio::test]
async fn process_endpoint_round_trips_through_dev_stubs() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let csv = "user_id,message\nu1,hola\nu1,hola\nu2,hello\n";
    let response = client
        .post(format!("{}/api/csv/process", base))
        .header("Content-Type", "text/plain")
        .body(csv)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.headers().contains_key("x-processing-time-ms"));
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("text/csv"));

    let body = response.text().await.unwrap();
    assert!(body.starts_with("user_id,total_messages,avg_score"));
    assert!(body.contains("u1,2,"));
    assert!(body.contains("u2,1,"));
}

#[tokio::test]
async fn process_endpoint_rejects_malformed_csv() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/csv/process", base))
        .body("id,text\n1,x\n")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body = response.text().await.unwrap();
    assert!(body.contains("user_id"));
}

#[tokio::test]
async fn prometheus_metrics_are_exposed() {
    let base = spawn_app().await;
    let client = reqwest::Client::new();

    // Generate some pipeline traffic first.
    client
        .post(format!("{}/api/csv/process", base))
        .body("user_id,message\nmetrics-user,hola\n")
        .send()
        .await
        .unwrap();

    let response = reqwest::get(format!("{}/q/metrics", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("text/plain"));

    let body = response.text().await.unwrap();
    assert!(body.contains("# TYPE"));
    assert!(body.contains("pipeline_messages_processed"));
    assert!(body.contains("pipeline_messages_failed"));
}

#[tokio::test]
async fn simple_metrics_report_system_stats() {
    let base = spawn_app().await;
    let body: serde_json::Value = reqwest::get(format!("{}/api/metrics/simple", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["application"]["status"], "UP");
    assert_eq!(body["application"]["name"], "moderation-pipeline");
    assert!(body["system"]["available_processors"].as_u64().unwrap() >= 1);
}
