//! QuickDivinationHandler - One-shot general reading with a single card.
//!
//! Runs the reduced draw, interpret, advise flow on a pre-populated
//! session. The session is never stored.

use std::sync::Arc;

use crate::domain::flow::FlowEngine;
use crate::domain::session::{Session, SessionError};

use super::step_failure;

pub const QUICK_TOPIC: &str = "general";
pub const QUICK_SPREAD: &str = "single";

#[derive(Debug, Clone)]
pub struct QuickDivinationResult {
    pub session: Session,
}

pub struct QuickDivinationHandler {
    engine: Arc<FlowEngine>,
}

impl QuickDivinationHandler {
    /// `engine` must be built with `FlowEngine::quick`.
    pub fn new(engine: Arc<FlowEngine>) -> Self {
        Self { engine }
    }

    pub async fn handle(&self) -> Result<QuickDivinationResult, SessionError> {
        let mut session = Session::for_quick_reading(QUICK_TOPIC, QUICK_SPREAD);

        self.engine
            .run_to_completion(&mut session)
            .await
            .map_err(|e| step_failure(e, "quick"))?;
        if !session.is_completed() {
            return Err(SessionError::invalid_state(format!(
                "quick reading stopped at '{}'",
                session.current_step()
            )));
        }

        tracing::info!(session_id = %session.id(), "Quick divination completed");
        Ok(QuickDivinationResult { session })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::application::handlers::divination::testing::context;

    #[tokio::test]
    async fn quick_reading_draws_one_card_and_completes() {
        let engine = Arc::new(FlowEngine::quick(context(MockAIProvider::failing())).unwrap());
        let handler = QuickDivinationHandler::new(engine);

        let result = handler.handle().await.unwrap();

        let divination = result.session.divination();
        assert_eq!(divination.topic.as_deref(), Some(QUICK_TOPIC));
        assert_eq!(divination.drawn_cards.len(), 1);
        assert!(divination.interpretation.is_some());
        assert!(divination.advice.is_some());
        assert_eq!(result.session.history().len(), 3);
    }
}
