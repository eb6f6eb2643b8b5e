//! Flow engine - chains step units along labelled edges.
//!
//! The edge table is built and validated once. A step's commit returns an
//! action label; the engine looks up `(step, action)` to find the next step
//! and stops when no edge exists.

use std::collections::{BTreeSet, HashMap};

use crate::domain::session::{NarrationSource, Session};

use super::steps::{
    AdviceStep, CardDrawingStep, InterpretationStep, ProcessSpreadStep, ProcessTopicStep,
    SpreadSelectionStep, StepContext, StepUnit, TopicSelectionStep, WelcomeStep,
};
use super::{Action, FlowError, StepError, StepKind};

/// What one executed step produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    pub step: StepKind,
    pub action: Action,
    pub message: String,
    pub narration: NarrationSource,
}

/// Edges of the full interactive reading, retries included.
const INTERACTIVE_EDGES: &[(StepKind, Action, StepKind)] = &[
    (StepKind::Welcome, Action::TopicSelection, StepKind::TopicSelection),
    (StepKind::TopicSelection, Action::WaitingTopic, StepKind::ProcessTopic),
    (StepKind::ProcessTopic, Action::SpreadSelection, StepKind::SpreadSelection),
    (StepKind::ProcessTopic, Action::TopicSelection, StepKind::TopicSelection),
    (StepKind::SpreadSelection, Action::WaitingSpread, StepKind::ProcessSpread),
    (StepKind::ProcessSpread, Action::DrawingCards, StepKind::CardDrawing),
    (StepKind::ProcessSpread, Action::SpreadSelection, StepKind::SpreadSelection),
    (StepKind::CardDrawing, Action::Interpretation, StepKind::Interpretation),
    (StepKind::Interpretation, Action::Advice, StepKind::Advice),
];

/// Edges of the reduced draw, interpret, advise reading.
const QUICK_EDGES: &[(StepKind, Action, StepKind)] = &[
    (StepKind::CardDrawing, Action::Interpretation, StepKind::Interpretation),
    (StepKind::Interpretation, Action::Advice, StepKind::Advice),
];

#[derive(Clone)]
pub struct FlowEngine {
    ctx: StepContext,
    start: StepKind,
    steps: BTreeSet<StepKind>,
    edges: HashMap<(StepKind, Action), StepKind>,
}

impl std::fmt::Debug for FlowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowEngine")
            .field("start", &self.start)
            .field("steps", &self.steps)
            .field("edges", &self.edges.len())
            .finish()
    }
}

impl FlowEngine {
    /// Builds an engine over `steps`, wired by `edges`.
    ///
    /// Fails if an edge starts from a step that cannot emit its label, if a
    /// `(step, action)` pair is wired twice, if an edge does not lead to the
    /// step that runs in the label's state, or if a registered step can emit
    /// a non-terminal label with no edge.
    pub fn new(
        ctx: StepContext,
        start: StepKind,
        steps: &[StepKind],
        edges: &[(StepKind, Action, StepKind)],
    ) -> Result<Self, FlowError> {
        let steps: BTreeSet<StepKind> = steps.iter().copied().collect();
        if !steps.contains(&start) {
            return Err(FlowError::Unregistered(start));
        }

        let mut table = HashMap::with_capacity(edges.len());
        for &(from, action, to) in edges {
            if !steps.contains(&from) {
                return Err(FlowError::Unregistered(from));
            }
            if !steps.contains(&to) {
                return Err(FlowError::Unregistered(to));
            }
            if !from.emitted_actions().contains(&action) {
                return Err(FlowError::ForeignAction { from, action });
            }
            if StepKind::for_state(action.target_state()) != Some(to) {
                return Err(FlowError::TargetMismatch { from, action, to });
            }
            if table.insert((from, action), to).is_some() {
                return Err(FlowError::DuplicateEdge { from, action });
            }
        }

        for &from in &steps {
            for &action in from.emitted_actions() {
                if !action.is_terminal() && !table.contains_key(&(from, action)) {
                    return Err(FlowError::MissingEdge { from, action });
                }
            }
        }

        Ok(Self {
            ctx,
            start,
            steps,
            edges: table,
        })
    }

    /// The full reading, from greeting to advice.
    pub fn interactive(ctx: StepContext) -> Result<Self, FlowError> {
        Self::new(ctx, StepKind::Welcome, &StepKind::ALL, INTERACTIVE_EDGES)
    }

    /// Draw, interpret and advise on a pre-populated session.
    pub fn quick(ctx: StepContext) -> Result<Self, FlowError> {
        Self::new(
            ctx,
            StepKind::CardDrawing,
            &[StepKind::CardDrawing, StepKind::Interpretation, StepKind::Advice],
            QUICK_EDGES,
        )
    }

    pub fn start(&self) -> StepKind {
        self.start
    }

    pub fn next(&self, from: StepKind, action: Action) -> Option<StepKind> {
        self.edges.get(&(from, action)).copied()
    }

    /// Runs the step for the session's current state.
    ///
    /// Returns `None` without running anything when the session is complete.
    pub async fn step(&self, session: &mut Session) -> Result<Option<StepReport>, StepError> {
        let Some(kind) = StepKind::for_state(session.current_step()) else {
            return Ok(None);
        };
        if !self.steps.contains(&kind) {
            return Err(StepError::NotInFlow(kind));
        }

        let report = match kind {
            StepKind::Welcome => self.execute(&WelcomeStep, session).await?,
            StepKind::TopicSelection => self.execute(&TopicSelectionStep, session).await?,
            StepKind::ProcessTopic => self.execute(&ProcessTopicStep, session).await?,
            StepKind::SpreadSelection => self.execute(&SpreadSelectionStep, session).await?,
            StepKind::ProcessSpread => self.execute(&ProcessSpreadStep, session).await?,
            StepKind::CardDrawing => self.execute(&CardDrawingStep, session).await?,
            StepKind::Interpretation => self.execute(&InterpretationStep, session).await?,
            StepKind::Advice => self.execute(&AdviceStep, session).await?,
        };
        Ok(Some(report))
    }

    /// Runs pending prompt-only steps until `target` is current, then runs
    /// `target`.
    ///
    /// The walk is planned before anything runs, so an unreachable target
    /// leaves the session untouched. A completed session yields no reports.
    pub async fn run_through(
        &self,
        session: &mut Session,
        target: StepKind,
    ) -> Result<Vec<StepReport>, StepError> {
        if !self.steps.contains(&target) {
            return Err(StepError::NotInFlow(target));
        }
        let Some(current) = StepKind::for_state(session.current_step()) else {
            return Ok(Vec::new());
        };

        let unreachable = StepError::Unreachable {
            current: session.current_step(),
            target,
        };
        let mut walk = current;
        let mut prompts = 0;
        while walk != target {
            if !walk.is_prompt() || prompts >= self.steps.len() {
                return Err(unreachable);
            }
            let action = walk.emitted_actions()[0];
            walk = self.next(walk, action).ok_or_else(|| unreachable.clone())?;
            prompts += 1;
        }

        let mut reports = Vec::with_capacity(prompts + 1);
        for _ in 0..=prompts {
            match self.step(session).await? {
                Some(report) => reports.push(report),
                None => break,
            }
        }
        Ok(reports)
    }

    /// Follows edges from the current step until a label has no edge, or
    /// until a step needs visitor input that has not been given.
    pub async fn run_to_completion(
        &self,
        session: &mut Session,
    ) -> Result<Vec<StepReport>, StepError> {
        let mut reports = Vec::new();
        while let Some(kind) = StepKind::for_state(session.current_step()) {
            if kind.awaits_input() && session.pending_input().is_none() {
                break;
            }
            let Some(report) = self.step(session).await? else {
                break;
            };
            let proceed = self.next(report.step, report.action).is_some();
            reports.push(report);
            if !proceed {
                break;
            }
        }
        Ok(reports)
    }

    async fn execute<S: StepUnit>(
        &self,
        step: &S,
        session: &mut Session,
    ) -> Result<StepReport, StepError> {
        let kind = step.kind();
        let prepared = step.prepare(session, &self.ctx)?;
        let outcome = step.act(&prepared, &self.ctx).await?;
        let action = step.commit(session, prepared, outcome)?;

        let (message, narration) = session
            .history()
            .last()
            .map(|entry| (entry.message.clone(), entry.narration))
            .unwrap_or((String::new(), NarrationSource::Fallback));

        tracing::info!(
            session_id = %session.id(),
            step = %kind,
            action = %action,
            narration = ?narration,
            "Step completed"
        );

        Ok(StepReport {
            step: kind,
            action,
            message,
            narration,
        })
    }
}
