//! HTTP ingestion + scrape endpoints, driven through the router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use metrix_core::Registry;
use metrix_gateway::{app_state::AppState, config::MetrixConfig, router};

/// `self_metrics` toggles request, `up` and process metrics together.
fn app(self_metrics: bool) -> (Router, Arc<Registry>) {
    let mut cfg = MetrixConfig::default();
    cfg.gateway.http_metrics = self_metrics;
    cfg.gateway.process_metrics = self_metrics;
    let registry = Arc::new(Registry::new());
    let state = AppState::with_registry(cfg, Arc::clone(&registry));
    (router::build_router(state), registry)
}

async fn post(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::post(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, path: &str) -> (StatusCode, Option<String>, String) {
    let resp = app
        .clone()
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let ct = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, ct, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn counter_increment() {
    let (app, registry) = app(false);
    let (status, body) = post(
        &app,
        "/api/metrics/counter",
        json!({ "name": "test_counter", "help": "A test counter", "value": 2, "labels": { "code": "200" } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let text = registry.encode().unwrap();
    assert!(text.contains("# HELP test_counter A test counter"));
    assert!(text.contains("# TYPE test_counter counter"));
    assert!(text.contains("test_counter{code=\"200\"} 2"));
}

#[tokio::test]
async fn counter_defaults_to_one_and_stringifies_numeric_labels() {
    let (app, registry) = app(false);
    for _ in 0..3 {
        let (status, _) = post(
            &app,
            "/api/metrics/counter",
            json!({ "name": "requests_total", "help": "count", "labels": { "code": 404 } }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    assert!(registry.encode().unwrap().contains("requests_total{code=\"404\"} 3\n"));
}

#[tokio::test]
async fn counter_requires_name_and_help() {
    let (app, registry) = app(false);
    let (status, body) = post(&app, "/api/metrics/counter", json!({ "help": "Incomplete payload" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(body["error"].as_str().unwrap().contains("name and help are required"));

    let (status, _) = post(&app, "/api/metrics/counter", json!({ "name": "", "help": "empty name" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn negative_counter_delta_is_rejected() {
    let (app, _) = app(false);
    let (status, body) = post(
        &app,
        "/api/metrics/counter",
        json!({ "name": "c_total", "help": "c", "value": -1 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("invalid value"));
}

#[tokio::test]
async fn gauge_set() {
    let (app, registry) = app(false);
    let (status, body) = post(
        &app,
        "/api/metrics/gauge",
        json!({ "name": "test_gauge", "help": "A test gauge", "value": 123.45 }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let text = registry.encode().unwrap();
    assert!(text.contains("# HELP test_gauge A test gauge"));
    assert!(text.contains("# TYPE test_gauge gauge"));
    assert!(text.contains("test_gauge 123.45"));
}

#[tokio::test]
async fn gauge_requires_value() {
    let (app, _) = app(false);
    let (status, body) = post(
        &app,
        "/api/metrics/gauge",
        json!({ "name": "test_gauge", "help": "Incomplete payload" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("name, help and value are required"));
}

#[tokio::test]
async fn histogram_observe() {
    let (app, registry) = app(false);
    let (status, _) = post(
        &app,
        "/api/metrics/histogram",
        json!({ "name": "test_histogram", "help": "A test histogram", "value": 0.8, "labels": { "route": "/users" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let text = registry.encode().unwrap();
    assert!(text.contains("# HELP test_histogram A test histogram"));
    assert!(text.contains("# TYPE test_histogram histogram"));
    assert!(text.contains("test_histogram_sum{route=\"/users\"} 0.8"));
    assert!(text.contains("test_histogram_count{route=\"/users\"} 1"));
}

#[tokio::test]
async fn histogram_custom_buckets_and_conflict() {
    let (app, registry) = app(false);
    let (status, _) = post(
        &app,
        "/api/metrics/histogram",
        json!({ "name": "latency", "help": "l", "value": 0.8, "buckets": [0.1, 0.5, 1] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // No buckets on a later call: existing bounds are kept.
    let (status, _) = post(
        &app,
        "/api/metrics/histogram",
        json!({ "name": "latency", "help": "l", "value": 0.05 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(
        &app,
        "/api/metrics/histogram",
        json!({ "name": "latency", "help": "l", "value": 1, "buckets": [1, 2] }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    let text = registry.encode().unwrap();
    assert!(text.contains("latency_bucket{le=\"0.1\"} 1\n"));
    assert!(text.contains("latency_bucket{le=\"1\"} 2\n"));
    assert!(text.contains("latency_count 2\n"));
}

#[tokio::test]
async fn type_and_label_conflicts_are_409() {
    let (app, _) = app(false);
    post(&app, "/api/metrics/gauge", json!({ "name": "x", "help": "x", "value": 1 })).await;

    let (status, _) = post(&app, "/api/metrics/counter", json!({ "name": "x", "help": "x" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = post(
        &app,
        "/api/metrics/gauge",
        json!({ "name": "x", "help": "x", "value": 1, "labels": { "a": "b" } }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_names_are_rejected() {
    let (app, _) = app(false);
    let (status, _) = post(&app, "/api/metrics/counter", json!({ "name": "1bad", "help": "h" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/api/metrics/counter",
        json!({ "name": "ok_total", "help": "h", "labels": { "__reserved": "x" } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post(
        &app,
        "/api/metrics/counter",
        json!({ "name": "ok_total", "help": "h", "labels": { "nested": { "a": 1 } } }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (app, _) = app(false);
    let req = Request::post("/api/metrics/counter")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn scrape_endpoints_return_plain_text() {
    let (app, _) = app(false);
    post(&app, "/api/metrics/counter", json!({ "name": "sample_metric", "help": "sample" })).await;

    for path in ["/metrics", "/api/metrics"] {
        let (status, ct, text) = get(&app, path).await;
        assert_eq!(status, StatusCode::OK);
        assert!(ct.unwrap().contains("text/plain"));
        assert!(text.contains("sample_metric 1\n"));
    }
}

#[tokio::test]
async fn health_and_index() {
    let (app, _) = app(false);
    let (status, _, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "UP");

    let (status, _, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["endpoints"]["metrics"], "/metrics");
}

#[tokio::test]
async fn http_requests_are_measured_by_route() {
    let (app, registry) = app(true);
    get(&app, "/health").await;
    get(&app, "/health").await;
    get(&app, "/nope").await;

    let text = registry.encode().unwrap();
    assert!(text.contains(
        "http_requests_total{method=\"GET\",path=\"/health\",status_code=\"200\",project_name=\"metrics-service\"} 2\n"
    ));
    assert!(text.contains(
        "http_requests_total{method=\"GET\",path=\"unmatched\",status_code=\"404\",project_name=\"metrics-service\"} 1\n"
    ));
    assert!(text.contains(
        "http_request_duration_seconds_count{method=\"GET\",path=\"/health\",status_code=\"200\",project_name=\"metrics-service\"} 2\n"
    ));
}

#[tokio::test]
async fn gateway_metric_names_are_reserved() {
    let (app, registry) = app(true);
    let reserved = [
        "http_requests_total",
        "http_request_duration_seconds",
        "http_request_duration_seconds_count",
        "up",
        "process_cpu_seconds_total",
        "process_resident_memory_bytes",
    ];
    for name in reserved {
        let (status, body) = post(
            &app,
            "/api/metrics/gauge",
            json!({ "name": name, "help": "x", "value": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{name}");
        assert!(body["error"].as_str().unwrap().contains("reserved"), "{name}");
    }

    for _ in 0..3 {
        get(&app, "/health").await;
    }
    let text = registry.encode().unwrap();
    assert!(text.contains("# TYPE http_requests_total counter\n"));
    assert!(text.contains(
        "http_requests_total{method=\"GET\",path=\"/health\",status_code=\"200\",project_name=\"metrics-service\"} 3\n"
    ));
}

#[tokio::test]
async fn scrape_reports_up_and_process_metrics() {
    let (app, _) = app(true);
    let (status, _, text) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);

    assert!(text.contains("# TYPE up gauge\n"));
    assert!(text.contains("up{project_name=\"metrics-service\"} 1\n"));
    assert!(text.contains("# TYPE process_cpu_seconds_total counter\n"));
    assert!(text.contains("# TYPE process_resident_memory_bytes gauge\n"));

    let rss = text
        .lines()
        .find_map(|l| l.strip_prefix("process_resident_memory_bytes "))
        .unwrap();
    assert!(rss.parse::<f64>().unwrap() > 0.0);

    // A second scrape keeps one family per name.
    let (_, _, text) = get(&app, "/metrics").await;
    assert_eq!(text.matches("# TYPE process_cpu_seconds_total").count(), 1);
}

#[tokio::test]
async fn self_metrics_can_be_switched_off() {
    let (app, _) = app(false);
    let (_, _, text) = get(&app, "/metrics").await;
    assert!(!text.contains("process_"));
    assert!(!text.contains("up{"));
    assert!(!text.contains("http_requests_total"));
}

#[tokio::test]
async fn changing_label_keys_is_a_conflict() {
    let (app, _) = app(false);
    let (status, _) = post(
        &app,
        "/api/metrics/counter",
        json!({ "name": "orders_total", "help": "o", "labels": { "shop": "a", "region": "eu" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(
        &app,
        "/api/metrics/counter",
        json!({ "name": "orders_total", "help": "o", "labels": { "shop": "b" } }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}
