//! HTTP request metrics, recorded into the gateway's own registry.
//!
//! Labels are `method`, `path` (matched route template, never the raw URI, so
//! cardinality stays bounded), `status_code` and the configured
//! `project_name`.

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use metrix_core::error::Result;
use metrix_core::Registry;

use crate::app_state::AppState;

pub const REQUESTS_TOTAL: &str = "http_requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const UP: &str = "up";

const LABELS: [&str; 4] = ["method", "path", "status_code", "project_name"];

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

pub async fn track_http(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| UNMATCHED_PATH.to_owned());

    let resp = next.run(req).await;

    let status = resp.status().as_u16().to_string();
    let labels = [
        ("method", method.as_str()),
        ("path", path.as_str()),
        ("status_code", status.as_str()),
        ("project_name", state.cfg().gateway.project_name.as_str()),
    ];
    if let Err(e) = record(state.registry(), &labels, start.elapsed().as_secs_f64()) {
        tracing::warn!(error = %e, %path, "http request metrics not recorded");
    }
    resp
}

/// Handles are looked up per request so the metrics survive a registry clear.
fn record(registry: &Registry, labels: &[(&str, &str)], seconds: f64) -> Result<()> {
    registry
        .get_or_create_counter(REQUESTS_TOTAL, "Total HTTP requests handled.", &LABELS)?
        .inc(labels)?;
    registry
        .get_or_create_histogram(
            REQUEST_DURATION_SECONDS,
            "HTTP request duration in seconds.",
            &LABELS,
            None,
        )?
        .observe(labels, seconds)
}

/// `up{project_name}` = 1 while the gateway is serving.
pub fn record_up(registry: &Registry, project_name: &str) -> Result<()> {
    registry
        .get_or_create_gauge(UP, "1 = up, 0 = not up", &["project_name"])?
        .set(&[("project_name", project_name)], 1.0)
}
