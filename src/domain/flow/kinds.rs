//! Step kinds and the action labels they emit.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::session::SessionStep;

/// The closed set of step units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Welcome,
    TopicSelection,
    ProcessTopic,
    SpreadSelection,
    ProcessSpread,
    CardDrawing,
    Interpretation,
    Advice,
}

impl StepKind {
    pub const ALL: [StepKind; 8] = [
        StepKind::Welcome,
        StepKind::TopicSelection,
        StepKind::ProcessTopic,
        StepKind::SpreadSelection,
        StepKind::ProcessSpread,
        StepKind::CardDrawing,
        StepKind::Interpretation,
        StepKind::Advice,
    ];

    /// The step unit that runs when a session is at `state`.
    pub fn for_state(state: SessionStep) -> Option<StepKind> {
        match state {
            SessionStep::Welcome => Some(StepKind::Welcome),
            SessionStep::TopicSelection => Some(StepKind::TopicSelection),
            SessionStep::WaitingTopic => Some(StepKind::ProcessTopic),
            SessionStep::SpreadSelection => Some(StepKind::SpreadSelection),
            SessionStep::WaitingSpread => Some(StepKind::ProcessSpread),
            SessionStep::DrawingCards => Some(StepKind::CardDrawing),
            SessionStep::Interpretation => Some(StepKind::Interpretation),
            SessionStep::Advice => Some(StepKind::Advice),
            SessionStep::Completed => None,
        }
    }

    /// Prompt-only steps need no visitor input and may be run on the
    /// visitor's behalf.
    pub fn is_prompt(&self) -> bool {
        matches!(
            self,
            StepKind::Welcome | StepKind::TopicSelection | StepKind::SpreadSelection
        )
    }

    /// Steps that read the pending visitor choice.
    pub fn awaits_input(&self) -> bool {
        matches!(self, StepKind::ProcessTopic | StepKind::ProcessSpread)
    }

    /// Every action label this step can return from commit.
    pub fn emitted_actions(&self) -> &'static [Action] {
        match self {
            StepKind::Welcome => &[Action::TopicSelection],
            StepKind::TopicSelection => &[Action::WaitingTopic],
            StepKind::ProcessTopic => &[Action::SpreadSelection, Action::TopicSelection],
            StepKind::SpreadSelection => &[Action::WaitingSpread],
            StepKind::ProcessSpread => &[Action::DrawingCards, Action::SpreadSelection],
            StepKind::CardDrawing => &[Action::Interpretation],
            StepKind::Interpretation => &[Action::Advice],
            StepKind::Advice => &[Action::Completed],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Welcome => "welcome",
            StepKind::TopicSelection => "topic_selection",
            StepKind::ProcessTopic => "process_topic",
            StepKind::SpreadSelection => "spread_selection",
            StepKind::ProcessSpread => "process_spread",
            StepKind::CardDrawing => "card_drawing",
            StepKind::Interpretation => "interpretation",
            StepKind::Advice => "advice",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label returned by a step's commit; the engine follows the edge it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    TopicSelection,
    WaitingTopic,
    SpreadSelection,
    WaitingSpread,
    DrawingCards,
    Interpretation,
    Advice,
    Completed,
}

impl Action {
    /// The session state a step moves to when it returns this action.
    pub fn target_state(&self) -> SessionStep {
        match self {
            Action::TopicSelection => SessionStep::TopicSelection,
            Action::WaitingTopic => SessionStep::WaitingTopic,
            Action::SpreadSelection => SessionStep::SpreadSelection,
            Action::WaitingSpread => SessionStep::WaitingSpread,
            Action::DrawingCards => SessionStep::DrawingCards,
            Action::Interpretation => SessionStep::Interpretation,
            Action::Advice => SessionStep::Advice,
            Action::Completed => SessionStep::Completed,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Action::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        self.target_state().as_str()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::StateMachine;

    #[test]
    fn every_non_terminal_state_has_a_step() {
        for state in SessionStep::ALL {
            assert_eq!(
                StepKind::for_state(state).is_none(),
                state == SessionStep::Completed,
                "{state}"
            );
        }
    }

    #[test]
    fn emitted_actions_are_legal_transitions_from_the_step_state() {
        for state in SessionStep::ALL {
            if let Some(kind) = StepKind::for_state(state) {
                for action in kind.emitted_actions() {
                    assert!(
                        state.can_transition_to(&action.target_state()),
                        "{kind} emits {action} from {state}"
                    );
                }
            }
        }
    }

    #[test]
    fn prompt_steps_emit_a_single_action() {
        for kind in StepKind::ALL.iter().filter(|k| k.is_prompt()) {
            assert_eq!(kind.emitted_actions().len(), 1, "{kind}");
        }
    }

    #[test]
    fn only_completed_is_terminal() {
        assert!(Action::Completed.is_terminal());
        assert!(!Action::Advice.is_terminal());
        assert_eq!(Action::WaitingSpread.as_str(), "waiting_spread");
    }
}
