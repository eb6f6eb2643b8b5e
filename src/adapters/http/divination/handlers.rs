//! HTTP handlers for divination endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::divination::{
    GetDivinationStatusHandler, GetDivinationStatusQuery, QuickDivinationHandler,
    StartDivinationCommand, StartDivinationHandler, SubmitStepCommand, SubmitStepHandler,
};
use crate::domain::foundation::{ErrorCode, SessionId, UserId};
use crate::domain::session::SessionError;
use crate::ports::CardCatalog;

use super::dto::{
    DivinationResponse, DivinationStatusResponse, DivinationStepRequest, ErrorResponse,
    QuickDivinationResponse, StartDivinationRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct DivinationHandlers {
    start_handler: Arc<StartDivinationHandler>,
    submit_handler: Arc<SubmitStepHandler>,
    status_handler: Arc<GetDivinationStatusHandler>,
    quick_handler: Arc<QuickDivinationHandler>,
    catalog: Arc<dyn CardCatalog>,
}

impl DivinationHandlers {
    pub fn new(
        start_handler: Arc<StartDivinationHandler>,
        submit_handler: Arc<SubmitStepHandler>,
        status_handler: Arc<GetDivinationStatusHandler>,
        quick_handler: Arc<QuickDivinationHandler>,
        catalog: Arc<dyn CardCatalog>,
    ) -> Self {
        Self {
            start_handler,
            submit_handler,
            status_handler,
            quick_handler,
            catalog,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/divination/start - Start a reading
///
/// The body may be omitted entirely; a body that is sent must parse.
pub async fn start_divination(
    State(handlers): State<DivinationHandlers>,
    body: Result<Json<StartDivinationRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(JsonRejection::MissingJsonContentType(_)) => StartDivinationRequest::default(),
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::invalid_format(rejection.body_text())),
            )
                .into_response()
        }
    };

    let user_id = match req.user_id.filter(|id| !id.trim().is_empty()) {
        Some(raw) => match UserId::new(raw) {
            Ok(id) => Some(id),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::bad_request(e.to_string())),
                )
                    .into_response()
            }
        },
        None => None,
    };

    match handlers
        .start_handler
        .handle(StartDivinationCommand { user_id })
        .await
    {
        Ok(result) => {
            let response = DivinationResponse::started(result, handlers.catalog.topic_keys());
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/v1/divination/step - Run a named step
pub async fn submit_step(
    State(handlers): State<DivinationHandlers>,
    Json(req): Json<DivinationStepRequest>,
) -> Response {
    let session_id = match req.session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::invalid_format("Invalid session ID")),
            )
                .into_response()
        }
    };

    let cmd = SubmitStepCommand {
        session_id,
        step: req.step,
        topic: req.data.topic,
        spread: req.data.spread,
    };

    match handlers.submit_handler.handle(cmd).await {
        Ok(result) => {
            let response = DivinationResponse::for_step(result, handlers.catalog.spread_keys());
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

/// GET /api/v1/divination/:session_id/status - Progress and history
pub async fn get_divination_status(
    State(handlers): State<DivinationHandlers>,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::invalid_format("Invalid session ID")),
            )
                .into_response()
        }
    };

    match handlers
        .status_handler
        .handle(GetDivinationStatusQuery { session_id })
        .await
    {
        Ok(view) => {
            let response: DivinationStatusResponse = view.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

/// POST /api/v1/divination/quick - One-card general reading
pub async fn quick_divination(State(handlers): State<DivinationHandlers>) -> Response {
    match handlers.quick_handler.handle().await {
        Ok(result) => {
            let response: QuickDivinationResponse = result.into();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => handle_session_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_session_error(error: SessionError) -> Response {
    let code = error.code().to_string();
    match error {
        SessionError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found(
                ErrorCode::SessionNotFound,
                "Session",
                &id.to_string(),
            )),
        )
            .into_response(),
        SessionError::UnknownStep(_) | SessionError::MissingSelection { .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(code, error.message())),
        )
            .into_response(),
        SessionError::StepOutOfOrder {
            current,
            ref requested,
        } => {
            let details = serde_json::json!({
                "current_step": current.as_str(),
                "requested_step": requested,
            });
            (
                StatusCode::CONFLICT,
                Json(ErrorResponse::new(code, error.message()).with_details(details)),
            )
                .into_response()
        }
        SessionError::AlreadyCompleted(_) | SessionError::InvalidState(_) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(code, error.message())),
        )
            .into_response(),
        SessionError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "Divination request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Internal server error")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::SessionStep;

    #[test]
    fn session_error_not_found_maps_to_404() {
        let response = handle_session_error(SessionError::NotFound(SessionId::new()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn unknown_step_maps_to_400() {
        let response = handle_session_error(SessionError::unknown_step("dance"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_selection_maps_to_400() {
        let response = handle_session_error(SessionError::missing_selection("topic"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn caller_ordering_errors_map_to_409() {
        let out_of_order = SessionError::out_of_order(SessionStep::TopicSelection, "get_advice");
        assert_eq!(handle_session_error(out_of_order).status(), StatusCode::CONFLICT);

        let completed = SessionError::already_completed(SessionId::new());
        assert_eq!(handle_session_error(completed).status(), StatusCode::CONFLICT);
    }

    #[test]
    fn infrastructure_maps_to_500() {
        let response = handle_session_error(SessionError::infrastructure("disk on fire"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
