//! HTTP routes for divination endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_divination_status, quick_divination, start_divination, submit_step, DivinationHandlers,
};

/// Creates the divination router, to be nested under `/api/v1/divination`.
pub fn divination_routes(handlers: DivinationHandlers) -> Router {
    Router::new()
        .route("/start", post(start_divination))
        .route("/step", post(submit_step))
        .route("/quick", post(quick_divination))
        .route("/:session_id/status", get(get_divination_status))
        .with_state(handlers)
}
