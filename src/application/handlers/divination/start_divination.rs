//! StartDivinationHandler - Create a session and run the greeting.

use std::sync::Arc;

use crate::domain::flow::{FlowEngine, StepReport};
use crate::domain::foundation::UserId;
use crate::domain::session::{Session, SessionError};
use crate::ports::SessionStore;

use super::step_failure;

/// Command to start a reading.
#[derive(Debug, Clone, Default)]
pub struct StartDivinationCommand {
    /// Present for returning visitors.
    pub user_id: Option<UserId>,
}

/// Result of starting a reading.
#[derive(Debug, Clone)]
pub struct StartDivinationResult {
    pub session: Session,
    pub greeting: StepReport,
}

/// Handler for starting readings.
pub struct StartDivinationHandler {
    store: Arc<dyn SessionStore>,
    engine: Arc<FlowEngine>,
}

impl StartDivinationHandler {
    pub fn new(store: Arc<dyn SessionStore>, engine: Arc<FlowEngine>) -> Self {
        Self { store, engine }
    }

    pub async fn handle(
        &self,
        cmd: StartDivinationCommand,
    ) -> Result<StartDivinationResult, SessionError> {
        // 1. Create session at the greeting
        let mut session = Session::create(cmd.user_id);

        // 2. Greet
        let greeting = self
            .engine
            .step(&mut session)
            .await
            .map_err(|e| step_failure(e, "start"))?
            .ok_or_else(|| SessionError::invalid_state("new session has no greeting step"))?;

        // 3. Persist
        self.store.put(&session).await?;

        tracing::info!(
            session_id = %session.id(),
            returning = session.is_returning_visitor(),
            "Divination started"
        );

        Ok(StartDivinationResult { session, greeting })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::application::handlers::divination::testing::{interactive, store};
    use crate::domain::flow::StepKind;
    use crate::domain::session::SessionStep;

    #[tokio::test]
    async fn start_greets_and_stores_session() {
        let store = store();
        let handler = StartDivinationHandler::new(
            store.clone(),
            interactive(MockAIProvider::new().with_response("Welcome!")),
        );

        let result = handler.handle(StartDivinationCommand::default()).await.unwrap();

        assert_eq!(result.greeting.step, StepKind::Welcome);
        assert_eq!(result.greeting.message, "Welcome!");
        assert_eq!(result.session.current_step(), SessionStep::TopicSelection);
        assert_eq!(result.session.progress_percent(), 10);
        assert_eq!(store.get(*result.session.id()).await.unwrap(), result.session);
    }

    #[tokio::test]
    async fn start_with_user_id_marks_returning_visitor() {
        let handler = StartDivinationHandler::new(store(), interactive(MockAIProvider::failing()));

        let result = handler
            .handle(StartDivinationCommand {
                user_id: Some(UserId::new("visitor-1").unwrap()),
            })
            .await
            .unwrap();

        assert!(result.session.is_returning_visitor());
        assert!(result.greeting.message.contains("Welcome back"));
    }
}
