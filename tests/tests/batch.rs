mod utils;
#[allow(unused)]
use utils::*;

use std::time::{Duration, Instant};
use volley::prelude::*;

fn config(url: &str, total: usize, max_concurrent: usize, rps: f64) -> RunConfig {
    RunConfig::new(total, max_concurrent, rps, url, r#"{"user": "volley", "n": 1}"#).unwrap()
}

async fn run(config: &RunConfig) -> Summary {
    let client = ReqwestClient::new(config).unwrap();
    run_batch(config, client).await.unwrap()
}

#[tokio::test]
async fn error_statuses_are_completed_exchanges() {
    let mock = init().await;

    let summary = run(&config(&mock.url("/status/503"), 6, 3, 200.)).await;

    assert_eq!(summary.total, 6);
    assert_eq!(summary.success_count, 6);
    assert_eq!(summary.failure_count, 0);
    assert_eq!(summary.status_counts.get(&503), Some(&6));
    assert_eq!(mock.state.hits(), 6);
}

#[tokio::test]
async fn sends_body_and_client_headers() {
    let mock = init().await;
    let config = config(&mock.url("/echo"), 1, 1, 10.)
        .with_header("X-Client-Id", "client-7")
        .with_header("X-Client-Secret", "s3cret");

    let client = ReqwestClient::new(&config).unwrap();
    let response = client.send(&config.request).await.unwrap();
    assert_eq!(response.status, 200);

    let echoed: serde_json::Value = serde_json::from_str(&response.body).unwrap();
    assert_eq!(echoed["headers"]["x-client-id"], "client-7");
    assert_eq!(echoed["headers"]["x-client-secret"], "s3cret");
    assert_eq!(echoed["headers"]["content-type"], "application/json");
    assert_eq!(echoed["body"], serde_json::json!({ "user": "volley", "n": 1 }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrency_ceiling_bounds_elapsed_time() {
    let mock = init().await;

    // Ten 50ms requests, two at a time: at least five sequential waves.
    let start = Instant::now();
    let summary = run(&config(&mock.url("/delay/ms/50"), 10, 2, 1_000.)).await;

    assert!(start.elapsed() >= Duration::from_millis(250));
    assert_eq!(summary.success_count, 10);
    assert!(summary.average_duration_ms >= 50.);
    assert!(summary.latency_p50.unwrap() >= Duration::from_millis(50));
    assert_eq!(mock.state.hits(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn rate_limit_applies_with_free_slots() {
    let mock = init().await;

    // rps = 5 gives 200ms spacing, so the 4th request starts at least 600ms in.
    let start = Instant::now();
    let summary = run(&config(&mock.url("/delay/ms/0"), 4, 10, 5.)).await;

    assert!(start.elapsed() >= Duration::from_millis(600));
    assert!(summary.elapsed >= Duration::from_millis(600));
    assert_eq!(summary.success_count, 4);
}

#[tokio::test]
async fn timeouts_are_failures() {
    let mock = init().await;
    let config = config(&mock.url("/delay/ms/5000"), 3, 3, 100.)
        .with_timeout(Duration::from_millis(100))
        .unwrap();

    let start = Instant::now();
    let summary = run(&config).await;

    assert!(start.elapsed() < Duration::from_secs(4));
    assert_eq!(summary.total, 3);
    assert_eq!(summary.success_count, 0);
    assert_eq!(summary.failure_count, 3);
    assert_eq!(summary.throughput, 0.);
    assert!(summary.average_duration_ms >= 100.);
}

#[tokio::test]
async fn unreachable_target_yields_summary() {
    let _mock = init().await;

    // Nothing listens on this port once the listener used for discovery is gone.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let summary = run(&config(&format!("http://127.0.0.1:{port}/"), 5, 5, 500.)).await;
    assert_eq!(summary.success_count, 0);
    assert_eq!(summary.failure_count, 5);
    assert!(summary.status_counts.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn staying_under_a_server_limit() {
    let mock = init().await;

    let summary = run(&config(&mock.url("/limited/20/server/slow"), 10, 4, 10.)).await;
    assert_eq!(summary.status_counts.get(&200), Some(&10));

    // Far above the limit: the server sheds load with 429s, which are still completed exchanges.
    let summary = run(&config(&mock.url("/limited/5/server/fast"), 60, 10, 2_000.)).await;
    assert_eq!(summary.success_count, 60);
    assert!(summary.status_counts.get(&429).copied().unwrap_or(0) > 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn jittered_latencies_are_all_recorded() {
    let mock = init().await;

    let summary = run(&config(&mock.url("/jitter/ms/20/5"), 40, 8, 500.)).await;

    assert_eq!(summary.total, 40);
    assert_eq!(summary.success_count, 40);
    assert!(summary.latency_p50.unwrap() <= summary.latency_p99.unwrap());
    assert_eq!(mock.state.hits(), 40);
}
