//! HTTP handlers for reference data.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::divination::ErrorResponse;
use crate::domain::foundation::ErrorCode;
use crate::ports::CardCatalog;

use super::dto::{CardInfo, GreetingResponse, SpreadsResponse, TopicsResponse};

#[derive(Clone)]
pub struct CatalogHandlers {
    catalog: Arc<dyn CardCatalog>,
}

impl CatalogHandlers {
    pub fn new(catalog: Arc<dyn CardCatalog>) -> Self {
        Self { catalog }
    }
}

/// GET / - Greeting
pub async fn root() -> Json<GreetingResponse> {
    Json(GreetingResponse {
        message: "Welcome to the Tarot Guide API ✨🔮".to_string(),
    })
}

/// GET /api/v1/topics
pub async fn list_topics(State(handlers): State<CatalogHandlers>) -> Response {
    Json(TopicsResponse::new(handlers.catalog.topics())).into_response()
}

/// GET /api/v1/spreads
pub async fn list_spreads(State(handlers): State<CatalogHandlers>) -> Response {
    Json(SpreadsResponse::new(handlers.catalog.spreads())).into_response()
}

/// GET /api/v1/cards/:card_id
pub async fn get_card(
    State(handlers): State<CatalogHandlers>,
    Path(card_id): Path<String>,
) -> Response {
    match handlers.catalog.card(&card_id) {
        Some(card) => (StatusCode::OK, Json(CardInfo::from(card))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(ErrorCode::CardNotFound, "Card", &card_id)),
        )
            .into_response(),
    }
}
