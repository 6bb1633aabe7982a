use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::app_state::AppState;

use super::payload::{HistogramPayload, UpdatePayload};
use super::{Ack, ApiError};

/// `POST /api/metrics/counter`; `value` defaults to 1.
pub async fn increment_counter(
    State(state): State<AppState>,
    body: Result<Json<UpdatePayload>, JsonRejection>,
) -> Result<Json<Ack>, ApiError> {
    let Json(payload) = body?;
    let update = payload.validate(Some(1.0))?;

    let counter =
        state
            .registry()
            .get_or_create_counter(&update.name, &update.help, &update.label_names())?;
    counter.inc_by(&update.label_pairs(), update.value)?;

    tracing::debug!(metric = %update.name, labels = ?update.labels, value = update.value, "counter incremented");
    Ok(Json(Ack::new(format!("counter {} incremented", update.name))))
}

/// `POST /api/metrics/gauge`
pub async fn set_gauge(
    State(state): State<AppState>,
    body: Result<Json<UpdatePayload>, JsonRejection>,
) -> Result<Json<Ack>, ApiError> {
    let Json(payload) = body?;
    let update = payload.validate(None)?;

    let gauge =
        state
            .registry()
            .get_or_create_gauge(&update.name, &update.help, &update.label_names())?;
    gauge.set(&update.label_pairs(), update.value)?;

    tracing::debug!(metric = %update.name, labels = ?update.labels, value = update.value, "gauge set");
    Ok(Json(Ack::new(format!(
        "gauge {} set to {}",
        update.name, update.value
    ))))
}

/// `POST /api/metrics/histogram`. `buckets` only matter on first creation;
/// sending different ones later is a conflict.
pub async fn observe_histogram(
    State(state): State<AppState>,
    body: Result<Json<HistogramPayload>, JsonRejection>,
) -> Result<Json<Ack>, ApiError> {
    let Json(HistogramPayload { update, buckets }) = body?;
    let update = update.validate(None)?;

    let histogram = state.registry().get_or_create_histogram(
        &update.name,
        &update.help,
        &update.label_names(),
        buckets.as_deref(),
    )?;
    histogram.observe(&update.label_pairs(), update.value)?;

    tracing::debug!(metric = %update.name, labels = ?update.labels, value = update.value, "histogram observed");
    Ok(Json(Ack::new(format!(
        "histogram {} observed value {}",
        update.name, update.value
    ))))
}
