//! Session aggregate entity.
//!
//! A session is one visitor's walk through a reading: greeting, topic,
//! spread, draw, interpretation and advice. Step units read it during
//! prepare and mutate it only during commit.

use serde::{Deserialize, Serialize};

use crate::domain::draw::DrawnCard;
use crate::domain::foundation::{SessionId, StateMachine, Timestamp, UserId};

use super::{HistoryEntry, SessionError, SessionStep};

/// Overall status of the reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DivinationStatus {
    Started,
    Completed,
}

/// What the reading has established so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivinationState {
    pub topic: Option<String>,
    pub spread_type: Option<String>,
    pub drawn_cards: Vec<DrawnCard>,
    pub interpretation: Option<String>,
    pub advice: Option<String>,
    pub status: DivinationStatus,
}

impl DivinationState {
    fn fresh() -> Self {
        Self {
            topic: None,
            spread_type: None,
            drawn_cards: Vec::new(),
            interpretation: None,
            advice: None,
            status: DivinationStatus::Started,
        }
    }
}

/// The most recent choice a visitor submitted, read once by the step
/// that processes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PendingInput {
    Topic(String),
    Spread(String),
}

/// Session aggregate.
///
/// # Invariants
///
/// - `history` only grows; entries are never removed or reordered
/// - `topic` / `spread_type` are set only by a confirmed selection
/// - `drawn_cards` is written once
/// - `current_step` only moves along `SessionStep` transitions
/// - a completed reading has both an interpretation and advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    user_id: Option<UserId>,
    current_step: SessionStep,
    history: Vec<HistoryEntry>,
    divination: DivinationState,
    pending_input: Option<PendingInput>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Create a new session at the greeting.
    pub fn create(user_id: Option<UserId>) -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            user_id,
            current_step: SessionStep::Welcome,
            history: Vec::new(),
            divination: DivinationState::fresh(),
            pending_input: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a session with topic and spread already confirmed, ready to
    /// draw. Used by the quick reading, which never stores it.
    pub fn for_quick_reading(topic: impl Into<String>, spread_type: impl Into<String>) -> Self {
        let mut session = Self::create(None);
        session.divination.topic = Some(topic.into());
        session.divination.spread_type = Some(spread_type.into());
        session.current_step = SessionStep::DrawingCards;
        session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// A caller-supplied user id marks a returning visitor.
    pub fn is_returning_visitor(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn current_step(&self) -> SessionStep {
        self.current_step
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn divination(&self) -> &DivinationState {
        &self.divination
    }

    pub fn pending_input(&self) -> Option<&PendingInput> {
        self.pending_input.as_ref()
    }

    pub fn is_completed(&self) -> bool {
        self.divination.status == DivinationStatus::Completed
    }

    pub fn progress_percent(&self) -> u8 {
        self.current_step.progress_percent()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn append_history(&mut self, entry: HistoryEntry) {
        self.history.push(entry);
        self.touch();
    }

    /// Replaces any earlier unread choice.
    pub fn set_pending_input(&mut self, input: PendingInput) {
        self.pending_input = Some(input);
        self.touch();
    }

    /// Takes the pending choice, leaving none behind.
    pub fn consume_pending_input(&mut self) -> Option<PendingInput> {
        let input = self.pending_input.take();
        self.touch();
        input
    }

    /// Moves to the next state.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if the transition is not an edge of the step graph
    pub fn advance_to(&mut self, next: SessionStep) -> Result<(), SessionError> {
        self.current_step = self.current_step.transition_to(next)?;
        self.touch();
        Ok(())
    }

    pub fn confirm_topic(&mut self, topic: impl Into<String>) {
        self.divination.topic = Some(topic.into());
        self.touch();
    }

    pub fn confirm_spread(&mut self, spread_type: impl Into<String>) {
        self.divination.spread_type = Some(spread_type.into());
        self.touch();
    }

    /// Stores the drawn cards.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if cards were already drawn
    pub fn record_draw(&mut self, cards: Vec<DrawnCard>) -> Result<(), SessionError> {
        if !self.divination.drawn_cards.is_empty() {
            return Err(SessionError::invalid_state("cards have already been drawn"));
        }
        self.divination.drawn_cards = cards;
        self.touch();
        Ok(())
    }

    pub fn record_interpretation(&mut self, interpretation: impl Into<String>) {
        self.divination.interpretation = Some(interpretation.into());
        self.touch();
    }

    /// Stores the advice and marks the reading completed.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if there is no interpretation yet
    pub fn complete_with_advice(&mut self, advice: impl Into<String>) -> Result<(), SessionError> {
        if self.divination.interpretation.is_none() {
            return Err(SessionError::invalid_state(
                "advice requires an interpretation",
            ));
        }
        self.divination.advice = Some(advice.into());
        self.divination.status = DivinationStatus::Completed;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::Card;
    use crate::domain::draw::Orientation;
    use crate::domain::session::{HistoryRecord, NarrationSource};

    fn drawn() -> DrawnCard {
        let card = Card {
            id: "the_sun".to_string(),
            name: "The Sun".to_string(),
            number: 19,
            keywords: vec!["joy".to_string()],
            upright_meaning: "Success is near.".to_string(),
            reversed_meaning: "A brief dip.".to_string(),
            glyph: "☀️".to_string(),
        };
        DrawnCard::new(card, "Current situation", 0, Orientation::Upright)
    }

    #[test]
    fn create_starts_at_welcome_with_fresh_state() {
        let session = Session::create(None);

        assert_eq!(session.current_step(), SessionStep::Welcome);
        assert!(session.history().is_empty());
        assert!(session.divination().topic.is_none());
        assert!(session.divination().drawn_cards.is_empty());
        assert_eq!(session.divination().status, DivinationStatus::Started);
        assert!(!session.is_returning_visitor());
        assert!(!session.is_completed());
    }

    #[test]
    fn user_id_marks_returning_visitor() {
        let session = Session::create(Some(UserId::new("visitor-1").unwrap()));
        assert!(session.is_returning_visitor());
        assert_eq!(session.user_id().unwrap().as_str(), "visitor-1");
    }

    #[test]
    fn pending_input_is_single_use() {
        let mut session = Session::create(None);
        session.set_pending_input(PendingInput::Topic("love".to_string()));

        assert_eq!(
            session.pending_input(),
            Some(&PendingInput::Topic("love".to_string()))
        );
        assert_eq!(
            session.consume_pending_input(),
            Some(PendingInput::Topic("love".to_string()))
        );
        assert_eq!(session.consume_pending_input(), None);
    }

    #[test]
    fn advance_follows_graph_only() {
        let mut session = Session::create(None);
        session.advance_to(SessionStep::TopicSelection).unwrap();
        assert_eq!(session.current_step(), SessionStep::TopicSelection);

        let err = session.advance_to(SessionStep::Advice).unwrap_err();
        assert!(matches!(err, SessionError::InvalidState(_)));
        assert_eq!(session.current_step(), SessionStep::TopicSelection);
    }

    #[test]
    fn draw_is_recorded_once() {
        let mut session = Session::for_quick_reading("general", "single");
        session.record_draw(vec![drawn()]).unwrap();
        assert!(session.record_draw(vec![drawn()]).is_err());
        assert_eq!(session.divination().drawn_cards.len(), 1);
    }

    #[test]
    fn completion_requires_interpretation() {
        let mut session = Session::for_quick_reading("general", "single");
        assert!(session.complete_with_advice("Keep going").is_err());
        assert!(!session.is_completed());

        session.record_interpretation("Bright times");
        session.complete_with_advice("Keep going").unwrap();
        assert!(session.is_completed());
        assert_eq!(session.divination().advice.as_deref(), Some("Keep going"));
    }

    #[test]
    fn quick_reading_session_is_ready_to_draw() {
        let session = Session::for_quick_reading("general", "single");
        assert_eq!(session.current_step(), SessionStep::DrawingCards);
        assert_eq!(session.divination().topic.as_deref(), Some("general"));
        assert_eq!(session.divination().spread_type.as_deref(), Some("single"));
    }

    #[test]
    fn history_only_grows() {
        let mut session = Session::create(None);
        session.append_history(HistoryEntry::new(
            HistoryRecord::Welcome,
            "Hello",
            NarrationSource::Fallback,
        ));
        session.append_history(HistoryEntry::new(
            HistoryRecord::TopicSelectionGuide {
                available_topics: vec!["love".to_string()],
            },
            "Pick one",
            NarrationSource::Fallback,
        ));
        let steps: Vec<&str> = session.history().iter().map(|e| e.step_name()).collect();
        assert_eq!(steps, vec!["welcome", "topic_selection_guide"]);
    }
}
