//! Serving boundary and file-writing client, end to end.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use quote_relay::config::ClientConfig;
use quote_relay::lifecycle::build_client_pipeline;
use quote_relay::pipeline::FailureKind;
use quote_relay::publish::ArtifactPublisher;

mod common;

#[tokio::test]
async fn test_successful_quote_is_served_and_logged() {
    let dir = tempfile::tempdir().unwrap();
    let upstream = common::start_mock_backend(common::upstream_body("5.43")).await;
    let relay = common::start_relay(&common::relay_config(upstream, dir.path())).await;

    let res = common::http_client().get(relay.url()).send().await.expect("Relay unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!({ "bid": 5.43 }));
    assert_eq!(relay.rows().await, 1);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let dir = tempfile::tempdir().unwrap();
    let upstream = common::start_mock_backend(common::upstream_body("5.43")).await;
    let relay = common::start_relay(&common::relay_config(upstream, dir.path())).await;

    let res = common::http_client()
        .get(relay.url())
        .header("x-request-id", "test-req-1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "test-req-1");
}

#[tokio::test]
async fn test_non_numeric_bid_is_client_error_without_row() {
    let dir = tempfile::tempdir().unwrap();
    let upstream = common::start_mock_backend(common::upstream_body("abc")).await;
    let relay = common::start_relay(&common::relay_config(upstream, dir.path())).await;

    let res = common::http_client().get(relay.url()).send().await.unwrap();

    assert!(res.status().is_client_error(), "got {}", res.status());
    let text = res.text().await.unwrap();
    assert!(text.contains("malformed payload"), "got {text}");
    assert_eq!(relay.rows().await, 0);
}

#[tokio::test]
async fn test_slow_upstream_is_server_error_without_row() {
    let dir = tempfile::tempdir().unwrap();
    let upstream = common::start_slow_backend(Duration::from_secs(2)).await;
    let mut config = common::relay_config(upstream, dir.path());
    config.budget.fetch_ceiling_ms = 200;
    config.budget.store_ceiling_ms = 10;
    let relay = common::start_relay(&config).await;

    let res = common::http_client().get(relay.url()).send().await.unwrap();

    assert!(res.status().is_server_error());
    assert_eq!(res.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(relay.rows().await, 0);
}

#[tokio::test]
async fn test_concurrent_requests_append_distinct_rows() {
    let dir = tempfile::tempdir().unwrap();
    let counter = Arc::new(AtomicU32::new(0));
    let c = counter.clone();
    let upstream = common::start_programmable_backend(move || {
        let c = c.clone();
        async move {
            let n = c.fetch_add(1, Ordering::SeqCst);
            (200, common::upstream_body(&format!("5.{:02}", n)))
        }
    })
    .await;
    let relay = common::start_relay(&common::relay_config(upstream, dir.path())).await;

    let client = common::http_client();
    let mut handles = Vec::new();
    for _ in 0..10 {
        let client = client.clone();
        let url = relay.url();
        handles.push(tokio::spawn(async move {
            let res = client.get(url).send().await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            res.json::<serde_json::Value>().await.unwrap()["bid"].as_f64().unwrap()
        }));
    }

    let mut bids = HashSet::new();
    for handle in handles {
        bids.insert(handle.await.unwrap().to_bits());
    }

    assert_eq!(bids.len(), 10, "each invocation must see its own payload");
    assert_eq!(relay.rows().await, 10);
}

#[tokio::test]
async fn test_client_writes_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let upstream = common::start_mock_backend(common::upstream_body("5.4321")).await;
    let relay = common::start_relay(&common::relay_config(upstream, dir.path())).await;

    let mut config = ClientConfig::default();
    config.server_url = relay.url();
    config.budget.overall_ms = 3_000;
    config.budget.fetch_ceiling_ms = 3_000;
    let pipeline = build_client_pipeline(&config).unwrap();
    let publisher = ArtifactPublisher::new(dir.path().join("cotacao.txt"));

    let delivery = pipeline.execute(pipeline.request(), &publisher).await;

    let path = delivery.output.expect("artifact written");
    assert_eq!(std::fs::read_to_string(path).unwrap(), "Dólar: 5.43");
}

#[tokio::test]
async fn test_client_writes_nothing_on_relay_failure() {
    let dir = tempfile::tempdir().unwrap();
    let upstream = common::start_mock_backend(common::upstream_body("abc")).await;
    let relay = common::start_relay(&common::relay_config(upstream, dir.path())).await;

    let mut config = ClientConfig::default();
    config.server_url = relay.url();
    config.budget.overall_ms = 3_000;
    config.budget.fetch_ceiling_ms = 3_000;
    let pipeline = build_client_pipeline(&config).unwrap();
    let publisher = ArtifactPublisher::new(dir.path().join("cotacao.txt"));

    let delivery = pipeline.execute(pipeline.request(), &publisher).await;

    assert!(delivery.output.is_none());
    assert_eq!(delivery.outcome.failure_kind(), Some(FailureKind::DecodeMalformed));
    assert!(!publisher.path().exists());
}

#[tokio::test]
async fn test_client_times_out_on_slow_relay() {
    let dir = tempfile::tempdir().unwrap();
    let upstream = common::start_slow_backend(Duration::from_secs(2)).await;
    let relay = common::start_relay(&common::relay_config(upstream, dir.path())).await;

    let mut config = ClientConfig::default();
    config.server_url = relay.url();
    let pipeline = build_client_pipeline(&config).unwrap();
    let publisher = ArtifactPublisher::new(dir.path().join("cotacao.txt"));

    let delivery = pipeline.execute(pipeline.request(), &publisher).await;

    assert_eq!(delivery.outcome.failure_kind(), Some(FailureKind::FetchTimeout));
    assert!(!publisher.path().exists());
}
