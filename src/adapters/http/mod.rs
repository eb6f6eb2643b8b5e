//! HTTP adapters - REST API implementations.
//!
//! Each area has its own adapter; [`app_router`] assembles them under
//! `/api/v1` with tracing, CORS and a request timeout. The request timeout
//! is a backstop; narration has its own shorter ceiling so a slow provider
//! yields fallback text rather than a 408.

pub mod catalog;
pub mod divination;

pub use catalog::{catalog_routes, CatalogHandlers};
pub use divination::{divination_routes, DivinationHandlers, ErrorResponse};

use axum::{routing::get, Router};
use http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

/// Everything the HTTP layer needs to serve requests.
#[derive(Clone)]
pub struct AppState {
    pub divination: DivinationHandlers,
    pub catalog: CatalogHandlers,
}

/// Builds the complete router with middleware.
pub fn app_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(catalog::root))
        .nest("/api/v1/divination", divination_routes(state.divination))
        .nest("/api/v1", catalog_routes(state.catalog))
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer(&server.cors_origins_list()))
}

/// Restricts cross-origin access to the configured front-end origins.
fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}
