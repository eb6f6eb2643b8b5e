//! Session step enum and its transition graph.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError};

/// Where a session stands in the reading.
///
/// Each state names the step unit that runs next; `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStep {
    Welcome,
    TopicSelection,
    WaitingTopic,
    SpreadSelection,
    WaitingSpread,
    DrawingCards,
    Interpretation,
    Advice,
    Completed,
}

impl SessionStep {
    /// All states in reading order.
    pub const ALL: [SessionStep; 9] = [
        SessionStep::Welcome,
        SessionStep::TopicSelection,
        SessionStep::WaitingTopic,
        SessionStep::SpreadSelection,
        SessionStep::WaitingSpread,
        SessionStep::DrawingCards,
        SessionStep::Interpretation,
        SessionStep::Advice,
        SessionStep::Completed,
    ];

    /// Returns the wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStep::Welcome => "welcome",
            SessionStep::TopicSelection => "topic_selection",
            SessionStep::WaitingTopic => "waiting_topic",
            SessionStep::SpreadSelection => "spread_selection",
            SessionStep::WaitingSpread => "waiting_spread",
            SessionStep::DrawingCards => "drawing_cards",
            SessionStep::Interpretation => "interpretation",
            SessionStep::Advice => "advice",
            SessionStep::Completed => "completed",
        }
    }

    /// Fixed progress figure shown to the visitor.
    ///
    /// The greeting immediately hands over to topic selection, so both
    /// report the opening figure.
    pub fn progress_percent(&self) -> u8 {
        match self {
            SessionStep::Welcome => 10,
            SessionStep::TopicSelection => 10,
            SessionStep::WaitingTopic => 30,
            SessionStep::SpreadSelection => 40,
            SessionStep::WaitingSpread => 50,
            SessionStep::DrawingCards => 60,
            SessionStep::Interpretation => 80,
            SessionStep::Advice => 90,
            SessionStep::Completed => 100,
        }
    }
}

impl fmt::Display for SessionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStep {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SessionStep::ALL
            .iter()
            .copied()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("session_step", s))
    }
}

impl StateMachine for SessionStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStep::*;
        matches!(
            (self, target),
            (Welcome, TopicSelection)
                | (TopicSelection, WaitingTopic)
                | (WaitingTopic, SpreadSelection)
                | (WaitingTopic, TopicSelection)
                | (SpreadSelection, WaitingSpread)
                | (WaitingSpread, DrawingCards)
                | (WaitingSpread, SpreadSelection)
                | (DrawingCards, Interpretation)
                | (Interpretation, Advice)
                | (Advice, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStep::*;
        match self {
            Welcome => vec![TopicSelection],
            TopicSelection => vec![WaitingTopic],
            WaitingTopic => vec![SpreadSelection, TopicSelection],
            SpreadSelection => vec![WaitingSpread],
            WaitingSpread => vec![DrawingCards, SpreadSelection],
            DrawingCards => vec![Interpretation],
            Interpretation => vec![Advice],
            Advice => vec![Completed],
            Completed => vec![],
        }
    }
}
