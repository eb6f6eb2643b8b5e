//! Divination command and query handlers.
//!
//! ## Commands
//! - `StartDivination` - Create a session and greet the visitor
//! - `SubmitStep` - Run a named step for an existing session
//! - `QuickDivination` - One-shot reading that is never stored
//!
//! ## Queries
//! - `GetDivinationStatus` - Current step, progress and history

mod get_divination_status;
mod quick_divination;
mod session_locks;
mod start_divination;
mod step_name;
mod submit_step;

pub use get_divination_status::{
    DivinationStatusView, GetDivinationStatusHandler, GetDivinationStatusQuery,
};
pub use quick_divination::{QuickDivinationHandler, QuickDivinationResult};
pub use session_locks::SessionLocks;
pub use start_divination::{StartDivinationCommand, StartDivinationHandler, StartDivinationResult};
pub use step_name::StepName;
pub use submit_step::{SubmitStepCommand, SubmitStepHandler, SubmitStepResult};

use crate::domain::flow::StepError;
use crate::domain::session::SessionError;

/// Maps an engine failure to the caller-facing session error.
fn step_failure(err: StepError, requested: &str) -> SessionError {
    match err {
        StepError::Session(e) => e,
        StepError::Unreachable { current, .. } => SessionError::out_of_order(current, requested),
        StepError::Draw(e) => SessionError::infrastructure(e.to_string()),
        other => SessionError::invalid_state(other.to_string()),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::catalog::StaticCardCatalog;
    use crate::adapters::storage::InMemorySessionStore;
    use crate::domain::flow::{FlowEngine, Narrator, StepContext};

    pub fn context(provider: MockAIProvider) -> StepContext {
        StepContext::new(
            Arc::new(StaticCardCatalog::standard().unwrap()),
            Narrator::new(Arc::new(provider), "Luna"),
        )
        .with_draw_seed(Some(7))
    }

    pub fn interactive(provider: MockAIProvider) -> Arc<FlowEngine> {
        Arc::new(FlowEngine::interactive(context(provider)).unwrap())
    }

    pub fn store() -> Arc<InMemorySessionStore> {
        Arc::new(InMemorySessionStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::flow::StepKind;
    use crate::domain::session::SessionStep;

    #[test]
    fn unreachable_becomes_out_of_order_with_requested_name() {
        let err = step_failure(
            StepError::Unreachable {
                current: SessionStep::WaitingTopic,
                target: StepKind::Advice,
            },
            "get_advice",
        );

        assert_eq!(
            err,
            SessionError::out_of_order(SessionStep::WaitingTopic, "get_advice")
        );
    }

    #[test]
    fn session_errors_pass_through() {
        let inner = SessionError::invalid_state("cards have already been drawn");
        assert_eq!(step_failure(StepError::Session(inner.clone()), "draw_cards"), inner);
    }
}
