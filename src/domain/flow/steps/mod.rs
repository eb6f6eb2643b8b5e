//! Step units.
//!
//! Each step runs in three phases. `prepare` takes a read-only snapshot of
//! the session, `act` does the work (prose, draws) without touching the
//! session, and `commit` writes the result back, appends exactly one
//! history entry, moves `current_step` and returns the action label.

mod guidance;
mod reading;
mod selection;
mod welcome;

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::session::{HistoryEntry, HistoryRecord, Session};
use crate::ports::CardCatalog;

use super::{Action, Narration, Narrator, StepError, StepKind};

pub use guidance::{SpreadSelectionStep, TopicSelectionStep};
pub use reading::{AdviceStep, CardDrawingStep, InterpretationStep};
pub use selection::{ProcessSpreadStep, ProcessTopicStep};
pub use welcome::WelcomeStep;

/// Shared collaborators handed to every step.
#[derive(Clone)]
pub struct StepContext {
    pub catalog: Arc<dyn CardCatalog>,
    pub narrator: Narrator,
    /// Fixed seed for reproducible draws; `None` draws from OS entropy.
    pub draw_seed: Option<u64>,
}

impl StepContext {
    pub fn new(catalog: Arc<dyn CardCatalog>, narrator: Narrator) -> Self {
        Self {
            catalog,
            narrator,
            draw_seed: None,
        }
    }

    pub fn with_draw_seed(mut self, seed: Option<u64>) -> Self {
        self.draw_seed = seed;
        self
    }
}

/// One unit of the reading.
#[async_trait]
pub trait StepUnit: Send + Sync {
    /// Snapshot read from the session.
    type Prepared: Send + Sync;
    /// Result of the work done in `act`.
    type Outcome: Send;

    fn kind(&self) -> StepKind;

    fn prepare(&self, session: &Session, ctx: &StepContext) -> Result<Self::Prepared, StepError>;

    async fn act(
        &self,
        prepared: &Self::Prepared,
        ctx: &StepContext,
    ) -> Result<Self::Outcome, StepError>;

    fn commit(
        &self,
        session: &mut Session,
        prepared: Self::Prepared,
        outcome: Self::Outcome,
    ) -> Result<Action, StepError>;
}

/// Appends the step's history entry and moves the session along `action`.
fn record(
    session: &mut Session,
    record: HistoryRecord,
    narration: Narration,
    action: Action,
) -> Result<Action, StepError> {
    session.append_history(HistoryEntry::new(record, narration.text, narration.source));
    session.advance_to(action.target_state())?;
    Ok(action)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::catalog::StaticCardCatalog;

    pub fn context(provider: MockAIProvider) -> StepContext {
        StepContext::new(
            Arc::new(StaticCardCatalog::standard().unwrap()),
            Narrator::new(Arc::new(provider), "Luna"),
        )
        .with_draw_seed(Some(42))
    }

    /// Runs all three phases of `step` against `session`.
    pub async fn run<S: StepUnit>(
        step: &S,
        session: &mut Session,
        ctx: &StepContext,
    ) -> Result<Action, StepError> {
        let prepared = step.prepare(session, ctx)?;
        let outcome = step.act(&prepared, ctx).await?;
        step.commit(session, prepared, outcome)
    }
}
