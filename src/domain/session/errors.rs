//! Session-specific error types.

use crate::domain::foundation::{ErrorCode, SessionId, ValidationError};
use crate::ports::SessionStoreError;

use super::SessionStep;

/// Session-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Session was not found.
    NotFound(SessionId),
    /// Step name is not one the session understands.
    UnknownStep(String),
    /// Request is missing the selection a step needs.
    MissingSelection { field: String },
    /// Requested step cannot run from the current state.
    StepOutOfOrder {
        current: SessionStep,
        requested: String,
    },
    /// Session already finished its reading.
    AlreadyCompleted(SessionId),
    /// Invalid state for operation.
    InvalidState(String),
    /// Infrastructure error.
    Infrastructure(String),
}

impl SessionError {
    pub fn not_found(id: SessionId) -> Self {
        SessionError::NotFound(id)
    }
    pub fn unknown_step(step: impl Into<String>) -> Self {
        SessionError::UnknownStep(step.into())
    }
    pub fn missing_selection(field: impl Into<String>) -> Self {
        SessionError::MissingSelection {
            field: field.into(),
        }
    }
    pub fn out_of_order(current: SessionStep, requested: impl Into<String>) -> Self {
        SessionError::StepOutOfOrder {
            current,
            requested: requested.into(),
        }
    }
    pub fn already_completed(id: SessionId) -> Self {
        SessionError::AlreadyCompleted(id)
    }
    pub fn invalid_state(message: impl Into<String>) -> Self {
        SessionError::InvalidState(message.into())
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        SessionError::Infrastructure(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotFound(_) => ErrorCode::SessionNotFound,
            SessionError::UnknownStep(_) => ErrorCode::UnknownStep,
            SessionError::MissingSelection { .. } => ErrorCode::EmptyField,
            SessionError::StepOutOfOrder { .. } => ErrorCode::StepOutOfOrder,
            SessionError::AlreadyCompleted(_) => ErrorCode::SessionCompleted,
            SessionError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            SessionError::Infrastructure(_) => ErrorCode::StorageError,
        }
    }
    pub fn message(&self) -> String {
        match self {
            SessionError::NotFound(id) => format!("Session not found: {}", id),
            SessionError::UnknownStep(step) => format!("Unknown step: {}", step),
            SessionError::MissingSelection { field } => {
                format!("Missing required field '{}'", field)
            }
            SessionError::StepOutOfOrder { current, requested } => format!(
                "Step '{}' cannot run while the session is at '{}'",
                requested, current
            ),
            SessionError::AlreadyCompleted(id) => {
                format!("Session {} has already completed its reading", id)
            }
            SessionError::InvalidState(msg) => format!("Invalid state: {}", msg),
            SessionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

impl From<ValidationError> for SessionError {
    fn from(err: ValidationError) -> Self {
        SessionError::InvalidState(err.to_string())
    }
}

impl From<SessionStoreError> for SessionError {
    fn from(err: SessionStoreError) -> Self {
        match err {
            SessionStoreError::NotFound(id) => SessionError::NotFound(id),
            SessionStoreError::Backend(msg) => SessionError::Infrastructure(msg),
        }
    }
}
