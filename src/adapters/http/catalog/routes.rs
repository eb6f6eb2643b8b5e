//! HTTP routes for reference data.

use axum::{routing::get, Router};

use super::handlers::{get_card, list_spreads, list_topics, CatalogHandlers};

/// Creates the catalog router, to be nested under `/api/v1`.
pub fn catalog_routes(handlers: CatalogHandlers) -> Router {
    Router::new()
        .route("/topics", get(list_topics))
        .route("/spreads", get(list_spreads))
        .route("/cards/:card_id", get(get_card))
        .with_state(handlers)
}
