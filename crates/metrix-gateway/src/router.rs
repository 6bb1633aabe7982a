//! Axum router wiring.
//!
//! `/api/metrics/*` ingestion, `/metrics` scrape, `/health`, `/`.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{api, app_state::AppState, obs, ops};

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(ops::metrics))
        .route("/counter", post(api::increment_counter))
        .route("/gauge", post(api::set_gauge))
        .route("/histogram", post(api::observe_histogram));

    let mut router = Router::new()
        .route("/", get(ops::index))
        .route("/health", get(ops::health))
        .route("/metrics", get(ops::metrics))
        .nest("/api/metrics", api);

    if state.cfg().gateway.http_metrics {
        router = router.layer(middleware::from_fn_with_state(state.clone(), obs::track_http));
    }

    router.with_state(state)
}
