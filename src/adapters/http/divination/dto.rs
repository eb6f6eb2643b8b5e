//! Data Transfer Objects for divination endpoints.
//!
//! These types define the JSON request/response format for the reading API.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::application::handlers::divination::{
    DivinationStatusView, QuickDivinationResult, StartDivinationResult, StepName,
    SubmitStepResult,
};
use crate::domain::draw::DrawnCard;
use crate::domain::foundation::ErrorCode;
use crate::domain::session::HistoryEntry;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to start a reading
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartDivinationRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Request to run a step
#[derive(Debug, Clone, Deserialize)]
pub struct DivinationStepRequest {
    pub session_id: String,
    pub step: String,
    #[serde(default)]
    pub data: StepData,
}

/// Selection carried by `select_topic` / `select_spread`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepData {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub spread: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response for start and step calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivinationResponse {
    pub session_id: String,
    pub status: String,
    pub message: String,
    pub next_step: Option<String>,
    pub data: Map<String, Value>,
}

impl DivinationResponse {
    pub fn started(result: StartDivinationResult, available_topics: Vec<String>) -> Self {
        let mut data = Map::new();
        data.insert("available_topics".to_string(), json!(available_topics));

        Self {
            session_id: result.session.id().to_string(),
            status: "started".to_string(),
            message: result.greeting.message,
            next_step: Some(result.session.current_step().to_string()),
            data,
        }
    }

    pub fn for_step(result: SubmitStepResult, available_spreads: Vec<String>) -> Self {
        let divination = result.session.divination();
        let mut data = Map::new();

        let status = match result.step {
            StepName::SelectTopic | StepName::SelectSpread => "processing",
            StepName::DrawCards => "cards_drawn",
            StepName::GetInterpretation => "interpreted",
            StepName::GetAdvice => "completed",
        };

        match result.step {
            StepName::SelectTopic if divination.topic.is_some() => {
                data.insert("available_spreads".to_string(), json!(available_spreads));
            }
            StepName::DrawCards => {
                data.insert("drawn_cards".to_string(), json!(divination.drawn_cards));
            }
            StepName::GetInterpretation => {
                data.insert("interpretation".to_string(), json!(divination.interpretation));
            }
            StepName::GetAdvice => {
                data.insert("advice".to_string(), json!(divination.advice));
            }
            _ => {}
        }

        let guide_messages = result.guide_messages();
        if !guide_messages.is_empty() {
            data.insert("guide_messages".to_string(), json!(guide_messages));
        }

        Self {
            session_id: result.session.id().to_string(),
            status: status.to_string(),
            message: result.message().to_string(),
            next_step: Some(result.next_step().to_string()),
            data,
        }
    }
}

/// Response for the status query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivinationStatusResponse {
    pub session_id: String,
    pub current_step: String,
    pub progress: u8,
    pub completed: bool,
    pub history: Vec<HistoryEntry>,
}

impl From<DivinationStatusView> for DivinationStatusResponse {
    fn from(view: DivinationStatusView) -> Self {
        Self {
            session_id: view.session_id.to_string(),
            current_step: view.current_step.to_string(),
            progress: view.progress,
            completed: view.completed,
            history: view.history,
        }
    }
}

/// Response for the one-shot reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickDivinationResponse {
    pub status: String,
    pub drawn_cards: Vec<DrawnCard>,
    pub interpretation: Option<String>,
    pub advice: Option<String>,
}

impl From<QuickDivinationResult> for QuickDivinationResponse {
    fn from(result: QuickDivinationResult) -> Self {
        let divination = result.session.divination().clone();
        Self {
            status: "completed".to_string(),
            drawn_cards: divination.drawn_cards,
            interpretation: divination.interpretation,
            advice: divination.advice,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed.to_string(), message)
    }

    /// Body or path value that could not be parsed.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat.to_string(), message)
    }

    pub fn not_found(code: ErrorCode, resource_type: &str, id: &str) -> Self {
        Self::new(code.to_string(), format!("{} not found: {}", resource_type, id))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError.to_string(), message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
