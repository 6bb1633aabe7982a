//! Metric ingestion API (`/api/metrics/*`).
//!
//! Thin glue: validate the JSON body, get-or-create the metric, apply the
//! update. Registry errors map to HTTP status through `ClientCode`.
//!
//! A metric's label names are declared from the keys of the first accepted
//! `labels` object. A later request whose keys differ (missing, extra or
//! renamed) asks for a different declaration, so it fails with 409
//! `CONFLICT`, not 400. Only the label values may vary between requests.

pub mod handlers;
pub mod payload;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use metrix_core::error::{ClientCode, MetrixError};

pub use handlers::{increment_counter, observe_histogram, set_gauge};

/// Handler error: a `MetrixError` rendered as `{"error", "code"}` JSON.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub MetrixError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::BadRequest => StatusCode::BAD_REQUEST,
            ClientCode::Conflict => StatusCode::CONFLICT,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rej: JsonRejection) -> Self {
        ApiError(MetrixError::BadRequest(format!(
            "invalid json body: {}",
            rej.body_text()
        )))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::warn!(error = %self.0, "request rejected");
        }

        let body = ErrorBody {
            error: self.0.to_string(),
            code: self.0.client_code().as_str(),
        };
        (status, Json(body)).into_response()
    }
}

/// Success body for update endpoints.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub success: bool,
    pub message: String,
}

impl Ack {
    pub fn new(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
