//! Gateway self-observability.
//!
//! The gateway reports its own HTTP traffic, liveness and process figures
//! through the same registry it serves, so `/metrics` shows ingestion load next
//! to the ingested metrics. The names it writes are reserved: the ingestion API
//! refuses them.

pub mod metrics;
pub mod process;

pub use metrics::track_http;
pub use process::ProcessCollector;

use crate::app_state::AppState;

const RESERVED: [&str; 7] = [
    metrics::REQUESTS_TOTAL,
    metrics::REQUEST_DURATION_SECONDS,
    metrics::UP,
    process::CPU_SECONDS_TOTAL,
    process::RESIDENT_MEMORY_BYTES,
    process::VIRTUAL_MEMORY_BYTES,
    process::START_TIME_SECONDS,
];

/// True for names the gateway writes itself, including the sample names of
/// its request-duration histogram.
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
        || ["_bucket", "_sum", "_count"]
            .iter()
            .any(|suffix| name.strip_suffix(suffix) == Some(metrics::REQUEST_DURATION_SECONDS))
}

/// Scrape-time refresh of `up` and the process metrics. Failures are logged
/// and the scrape goes on with whatever is already registered.
pub fn refresh(state: &AppState) {
    let gateway = &state.cfg().gateway;
    if gateway.http_metrics {
        if let Err(e) = metrics::record_up(state.registry(), &gateway.project_name) {
            tracing::warn!(error = %e, "up metric not recorded");
        }
    }
    if let Some(collector) = state.process() {
        if let Err(e) = collector.collect(state.registry()) {
            tracing::warn!(error = %e, "process metrics not collected");
        }
    }
}
