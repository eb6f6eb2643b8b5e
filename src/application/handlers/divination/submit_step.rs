//! SubmitStepHandler - Run a named step for an existing session.
//!
//! Prompt-only steps that are still pending (the topic or spread guide)
//! run first on the caller's behalf. The session is saved only after the
//! whole run succeeded.

use std::sync::Arc;

use crate::domain::flow::{FlowEngine, StepReport};
use crate::domain::foundation::SessionId;
use crate::domain::session::{PendingInput, Session, SessionError, SessionStep};
use crate::ports::SessionStore;

use super::{step_failure, SessionLocks, StepName};

/// Command to run a step.
#[derive(Debug, Clone)]
pub struct SubmitStepCommand {
    pub session_id: SessionId,
    /// Raw step name as submitted.
    pub step: String,
    pub topic: Option<String>,
    pub spread: Option<String>,
}

/// Result of running a step.
#[derive(Debug, Clone)]
pub struct SubmitStepResult {
    pub step: StepName,
    pub session: Session,
    /// Every step that ran, in order; the requested step is last.
    pub reports: Vec<StepReport>,
}

impl SubmitStepResult {
    /// Message of the requested step.
    pub fn message(&self) -> &str {
        self.reports
            .last()
            .map(|r| r.message.as_str())
            .unwrap_or_default()
    }

    /// Messages of guide steps that ran before the requested step.
    pub fn guide_messages(&self) -> Vec<&str> {
        let run = self.reports.len().saturating_sub(1);
        self.reports[..run].iter().map(|r| r.message.as_str()).collect()
    }

    pub fn next_step(&self) -> SessionStep {
        self.session.current_step()
    }
}

/// Handler for running steps.
pub struct SubmitStepHandler {
    store: Arc<dyn SessionStore>,
    engine: Arc<FlowEngine>,
    locks: SessionLocks,
}

impl SubmitStepHandler {
    pub fn new(store: Arc<dyn SessionStore>, engine: Arc<FlowEngine>, locks: SessionLocks) -> Self {
        Self {
            store,
            engine,
            locks,
        }
    }

    pub async fn handle(&self, cmd: SubmitStepCommand) -> Result<SubmitStepResult, SessionError> {
        // 1. Validate the request before touching the session
        let step: StepName = cmd.step.parse()?;
        let input = match step {
            StepName::SelectTopic => Some(PendingInput::Topic(required(cmd.topic, "topic")?)),
            StepName::SelectSpread => Some(PendingInput::Spread(required(cmd.spread, "spread")?)),
            _ => None,
        };

        // 2. Serialize with other calls for this session
        let _guard = self.locks.acquire(cmd.session_id).await;

        // 3. Load
        let mut session = self.store.get(cmd.session_id).await?;
        if session.is_completed() {
            return Err(SessionError::already_completed(cmd.session_id));
        }

        // 4. Run
        if let Some(input) = input {
            session.set_pending_input(input);
        }
        let reports = self
            .engine
            .run_through(&mut session, step.target())
            .await
            .map_err(|e| step_failure(e, step.as_str()))?;
        if reports.is_empty() {
            return Err(SessionError::already_completed(cmd.session_id));
        }

        // 5. Persist
        self.store.put(&session).await?;

        tracing::info!(
            session_id = %cmd.session_id,
            step = %step,
            next_step = %session.current_step(),
            steps_run = reports.len(),
            "Divination step processed"
        );

        Ok(SubmitStepResult {
            step,
            session,
            reports,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, SessionError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| SessionError::missing_selection(field))
}
