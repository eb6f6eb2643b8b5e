//! GetDivinationStatusHandler - Query handler for a session's progress.

use std::sync::Arc;

use crate::domain::foundation::SessionId;
use crate::domain::session::{HistoryEntry, SessionError, SessionStep};
use crate::ports::SessionStore;

/// Query for a session's status.
#[derive(Debug, Clone)]
pub struct GetDivinationStatusQuery {
    pub session_id: SessionId,
}

/// Read-only view of where a reading stands.
#[derive(Debug, Clone, PartialEq)]
pub struct DivinationStatusView {
    pub session_id: SessionId,
    pub current_step: SessionStep,
    pub progress: u8,
    pub completed: bool,
    pub history: Vec<HistoryEntry>,
}

pub struct GetDivinationStatusHandler {
    store: Arc<dyn SessionStore>,
}

impl GetDivinationStatusHandler {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: GetDivinationStatusQuery,
    ) -> Result<DivinationStatusView, SessionError> {
        let session = self.store.get(query.session_id).await?;

        Ok(DivinationStatusView {
            session_id: *session.id(),
            current_step: session.current_step(),
            progress: session.progress_percent(),
            completed: session.is_completed(),
            history: session.history().to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::application::handlers::divination::testing::{interactive, store};
    use crate::application::handlers::divination::{
        StartDivinationCommand, StartDivinationHandler,
    };

    #[tokio::test]
    async fn status_after_start_is_ten_percent() {
        let store = store();
        let start = StartDivinationHandler::new(store.clone(), interactive(MockAIProvider::new()));
        let started = start.handle(StartDivinationCommand::default()).await.unwrap();
        let handler = GetDivinationStatusHandler::new(store);

        let view = handler
            .handle(GetDivinationStatusQuery {
                session_id: *started.session.id(),
            })
            .await
            .unwrap();

        assert_eq!(view.current_step, SessionStep::TopicSelection);
        assert_eq!(view.progress, 10);
        assert!(!view.completed);
        assert_eq!(view.history.len(), 1);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let handler = GetDivinationStatusHandler::new(store());
        let id = SessionId::new();

        let err = handler
            .handle(GetDivinationStatusQuery { session_id: id })
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::not_found(id));
    }
}
