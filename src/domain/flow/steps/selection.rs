//! Steps that validate the visitor's topic and spread choices.
//!
//! An unknown or missing choice leaves the reading untouched, records the
//! raw input and routes back to the matching guide step.

use async_trait::async_trait;

use crate::domain::catalog::{SpreadDefinition, Topic};
use crate::domain::foundation::SessionId;
use crate::domain::session::{HistoryRecord, PendingInput, Session};

use super::{record, Action, Narration, StepContext, StepError, StepKind, StepUnit};

fn options(keys: &[String]) -> String {
    keys.join(", ")
}

/// Confirms the chosen topic or asks again.
pub struct ProcessTopicStep;

pub struct TopicChoice {
    session_id: SessionId,
    selected: Option<String>,
    matched: Option<Topic>,
    valid_keys: Vec<String>,
}

#[async_trait]
impl StepUnit for ProcessTopicStep {
    type Prepared = TopicChoice;
    type Outcome = Narration;

    fn kind(&self) -> StepKind {
        StepKind::ProcessTopic
    }

    fn prepare(&self, session: &Session, ctx: &StepContext) -> Result<TopicChoice, StepError> {
        let selected = match session.pending_input() {
            Some(PendingInput::Topic(key)) => Some(key.clone()),
            _ => None,
        };
        let matched = selected
            .as_deref()
            .and_then(|key| ctx.catalog.topic(key))
            .cloned();
        Ok(TopicChoice {
            session_id: *session.id(),
            selected,
            matched,
            valid_keys: ctx.catalog.topic_keys(),
        })
    }

    async fn act(&self, prepared: &TopicChoice, ctx: &StepContext) -> Result<Narration, StepError> {
        let (prompt, fallback) = match &prepared.matched {
            Some(topic) => (
                format!(
                    "The visitor chose the {} {} topic. Please:\n\
                     1. Confirm their choice\n\
                     2. Briefly say what a {} reading will touch on\n\
                     3. Express encouragement\n\
                     4. Lead them on to choosing a spread",
                    topic.glyph, topic.name, topic.name
                ),
                format!(
                    "{} {} it is! Next, let's choose a spread for your reading.",
                    topic.glyph, topic.name
                ),
            ),
            None => (
                format!(
                    "Apologise that you did not understand the topic the visitor chose, \
                     and ask them to choose one of: {}",
                    options(&prepared.valid_keys)
                ),
                format!(
                    "Sorry, I didn't catch that topic. Please choose one of: {}",
                    options(&prepared.valid_keys)
                ),
            ),
        };
        Ok(ctx
            .narrator
            .narrate(prepared.session_id, self.kind(), &prompt, &fallback)
            .await)
    }

    fn commit(
        &self,
        session: &mut Session,
        prepared: TopicChoice,
        outcome: Narration,
    ) -> Result<Action, StepError> {
        session.consume_pending_input();
        let accepted = prepared.matched.is_some();
        let action = match prepared.matched {
            Some(topic) => {
                session.confirm_topic(topic.key);
                Action::SpreadSelection
            }
            None => Action::TopicSelection,
        };
        record(
            session,
            HistoryRecord::TopicConfirmed {
                selected_topic: prepared.selected,
                accepted,
            },
            outcome,
            action,
        )
    }
}

/// Confirms the chosen spread or asks again.
pub struct ProcessSpreadStep;

pub struct SpreadChoice {
    session_id: SessionId,
    selected: Option<String>,
    matched: Option<SpreadDefinition>,
    valid_keys: Vec<String>,
}

#[async_trait]
impl StepUnit for ProcessSpreadStep {
    type Prepared = SpreadChoice;
    type Outcome = Narration;

    fn kind(&self) -> StepKind {
        StepKind::ProcessSpread
    }

    fn prepare(&self, session: &Session, ctx: &StepContext) -> Result<SpreadChoice, StepError> {
        let selected = match session.pending_input() {
            Some(PendingInput::Spread(key)) => Some(key.clone()),
            _ => None,
        };
        let matched = selected
            .as_deref()
            .and_then(|key| ctx.catalog.spread(key))
            .cloned();
        Ok(SpreadChoice {
            session_id: *session.id(),
            selected,
            matched,
            valid_keys: ctx.catalog.spread_keys(),
        })
    }

    async fn act(&self, prepared: &SpreadChoice, ctx: &StepContext) -> Result<Narration, StepError> {
        let (prompt, fallback) = match &prepared.matched {
            Some(spread) => (
                format!(
                    "The visitor chose the {} spread. Please:\n\
                     1. Confirm their choice\n\
                     2. Describe what this spread shows\n\
                     3. Help them get ready to draw (a deep breath, a moment of focus)\n\
                     4. Create a mysterious but relaxed atmosphere",
                    spread.name
                ),
                format!(
                    "{} it is. Take a deep breath and focus on your question, \
                     then draw when you're ready.",
                    spread.name
                ),
            ),
            None => (
                format!(
                    "Ask the visitor to choose one of these spreads: {}",
                    options(&prepared.valid_keys)
                ),
                format!(
                    "Please choose one of these spreads: {}",
                    options(&prepared.valid_keys)
                ),
            ),
        };
        Ok(ctx
            .narrator
            .narrate(prepared.session_id, self.kind(), &prompt, &fallback)
            .await)
    }

    fn commit(
        &self,
        session: &mut Session,
        prepared: SpreadChoice,
        outcome: Narration,
    ) -> Result<Action, StepError> {
        session.consume_pending_input();
        let accepted = prepared.matched.is_some();
        let action = match prepared.matched {
            Some(spread) => {
                session.confirm_spread(spread.key);
                Action::DrawingCards
            }
            None => Action::SpreadSelection,
        };
        record(
            session,
            HistoryRecord::SpreadConfirmed {
                selected_spread: prepared.selected,
                accepted,
            },
            outcome,
            action,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::flow::steps::testing::{context, run};
    use crate::domain::flow::steps::{SpreadSelectionStep, TopicSelectionStep, WelcomeStep};
    use crate::domain::session::SessionStep;

    async fn session_waiting_for_topic(ctx: &StepContext) -> Session {
        let mut session = Session::create(None);
        run(&WelcomeStep, &mut session, ctx).await.unwrap();
        run(&TopicSelectionStep, &mut session, ctx).await.unwrap();
        session
    }

    #[tokio::test]
    async fn valid_topic_is_confirmed() {
        let ctx = context(MockAIProvider::new());
        let mut session = session_waiting_for_topic(&ctx).await;
        session.set_pending_input(PendingInput::Topic("love".to_string()));

        let action = run(&ProcessTopicStep, &mut session, &ctx).await.unwrap();

        assert_eq!(action, Action::SpreadSelection);
        assert_eq!(session.divination().topic.as_deref(), Some("love"));
        assert_eq!(session.current_step(), SessionStep::SpreadSelection);
        assert!(session.pending_input().is_none());
    }

    #[tokio::test]
    async fn unknown_topic_routes_back_and_records_raw_input() {
        let ctx = context(MockAIProvider::failing());
        let mut session = session_waiting_for_topic(&ctx).await;
        session.set_pending_input(PendingInput::Topic("not_a_real_topic".to_string()));

        let action = run(&ProcessTopicStep, &mut session, &ctx).await.unwrap();

        assert_eq!(action, Action::TopicSelection);
        assert!(session.divination().topic.is_none());
        assert_eq!(session.current_step(), SessionStep::TopicSelection);
        let entry = session.history().last().unwrap();
        assert_eq!(
            entry.record,
            HistoryRecord::TopicConfirmed {
                selected_topic: Some("not_a_real_topic".to_string()),
                accepted: false,
            }
        );
        assert!(entry.message.contains("love, career, wealth, health, general"));
    }

    #[tokio::test]
    async fn missing_topic_is_treated_as_invalid() {
        let ctx = context(MockAIProvider::new());
        let mut session = session_waiting_for_topic(&ctx).await;

        let action = run(&ProcessTopicStep, &mut session, &ctx).await.unwrap();

        assert_eq!(action, Action::TopicSelection);
        assert!(session.divination().topic.is_none());
    }

    #[tokio::test]
    async fn valid_spread_is_confirmed() {
        let ctx = context(MockAIProvider::new());
        let mut session = session_waiting_for_topic(&ctx).await;
        session.set_pending_input(PendingInput::Topic("career".to_string()));
        run(&ProcessTopicStep, &mut session, &ctx).await.unwrap();
        run(&SpreadSelectionStep, &mut session, &ctx).await.unwrap();
        session.set_pending_input(PendingInput::Spread("past_present_future".to_string()));

        let action = run(&ProcessSpreadStep, &mut session, &ctx).await.unwrap();

        assert_eq!(action, Action::DrawingCards);
        assert_eq!(
            session.divination().spread_type.as_deref(),
            Some("past_present_future")
        );
        assert_eq!(session.current_step(), SessionStep::DrawingCards);
    }

    #[tokio::test]
    async fn unknown_spread_routes_back() {
        let ctx = context(MockAIProvider::failing());
        let mut session = session_waiting_for_topic(&ctx).await;
        session.set_pending_input(PendingInput::Topic("career".to_string()));
        run(&ProcessTopicStep, &mut session, &ctx).await.unwrap();
        run(&SpreadSelectionStep, &mut session, &ctx).await.unwrap();
        session.set_pending_input(PendingInput::Spread("celtic_cross".to_string()));

        let action = run(&ProcessSpreadStep, &mut session, &ctx).await.unwrap();

        assert_eq!(action, Action::SpreadSelection);
        assert!(session.divination().spread_type.is_none());
        assert_eq!(session.current_step(), SessionStep::SpreadSelection);
        assert_eq!(
            session.history().last().unwrap().message,
            "Please choose one of these spreads: single, past_present_future"
        );
    }
}
