//! Conversation history entries.

use serde::{Deserialize, Serialize};

use crate::domain::draw::DrawnCard;
use crate::domain::foundation::Timestamp;

/// Whether a message came from the text generator or a fixed fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrationSource {
    Generated,
    Fallback,
}

/// Step-specific part of a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum HistoryRecord {
    Welcome,
    TopicSelectionGuide {
        available_topics: Vec<String>,
    },
    TopicConfirmed {
        selected_topic: Option<String>,
        accepted: bool,
    },
    SpreadSelectionGuide {
        available_spreads: Vec<String>,
    },
    SpreadConfirmed {
        selected_spread: Option<String>,
        accepted: bool,
    },
    CardsDrawn {
        drawn_cards: Vec<DrawnCard>,
    },
    Interpretation,
    Advice,
}

impl HistoryRecord {
    /// Name recorded in the `step` field.
    pub fn step_name(&self) -> &'static str {
        match self {
            HistoryRecord::Welcome => "welcome",
            HistoryRecord::TopicSelectionGuide { .. } => "topic_selection_guide",
            HistoryRecord::TopicConfirmed { .. } => "topic_confirmed",
            HistoryRecord::SpreadSelectionGuide { .. } => "spread_selection_guide",
            HistoryRecord::SpreadConfirmed { .. } => "spread_confirmed",
            HistoryRecord::CardsDrawn { .. } => "cards_drawn",
            HistoryRecord::Interpretation => "interpretation",
            HistoryRecord::Advice => "advice",
        }
    }
}

/// One completed step in a session's conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: HistoryRecord,
    pub message: String,
    pub narration: NarrationSource,
    pub timestamp: Timestamp,
}

impl HistoryEntry {
    pub fn new(record: HistoryRecord, message: impl Into<String>, narration: NarrationSource) -> Self {
        Self {
            record,
            message: message.into(),
            narration,
            timestamp: Timestamp::now(),
        }
    }

    pub fn step_name(&self) -> &'static str {
        self.record.step_name()
    }
}
