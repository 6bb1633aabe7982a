//! Operational HTTP endpoints.
//!
//! - `/`        : service index
//! - `/health`  : liveness
//! - `/metrics` : text exposition format (also `GET /api/metrics`)

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::api::ApiError;
use crate::app_state::AppState;
use crate::obs;

pub const SERVICE_NAME: &str = "metrics-service";

pub async fn index() -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "status": "running",
        "endpoints": {
            "metrics": "/metrics",
            "health": "/health",
            "api": "/api/metrics",
        },
    }))
}

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "UP", "service": SERVICE_NAME }))
}

pub async fn metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    obs::refresh(&state);
    let body = state.registry().encode()?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, metrix_core::CONTENT_TYPE)],
        body,
    )
        .into_response())
}
