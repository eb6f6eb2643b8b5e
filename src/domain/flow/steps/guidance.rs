//! Prompt-only steps inviting the visitor to choose.

use async_trait::async_trait;

use crate::domain::catalog::{SpreadDefinition, Topic};
use crate::domain::foundation::SessionId;
use crate::domain::session::{HistoryRecord, Session};

use super::{record, Action, Narration, StepContext, StepError, StepKind, StepUnit};

/// Presents the topics and asks the visitor to pick one.
pub struct TopicSelectionStep;

pub struct TopicGuidePrepared {
    session_id: SessionId,
    topics: Vec<Topic>,
}

#[async_trait]
impl StepUnit for TopicSelectionStep {
    type Prepared = TopicGuidePrepared;
    type Outcome = Narration;

    fn kind(&self) -> StepKind {
        StepKind::TopicSelection
    }

    fn prepare(&self, session: &Session, ctx: &StepContext) -> Result<TopicGuidePrepared, StepError> {
        Ok(TopicGuidePrepared {
            session_id: *session.id(),
            topics: ctx.catalog.topics().to_vec(),
        })
    }

    async fn act(
        &self,
        prepared: &TopicGuidePrepared,
        ctx: &StepContext,
    ) -> Result<Narration, StepError> {
        let listing = prepared
            .topics
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{}. {} {} - {}", i + 1, t.glyph, t.name, t.description))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Guide the visitor to choose a topic for their reading. The topics are:\n\n\
             {listing}\n\n\
             Write a short message that:\n\
             1. Explains that they should pick a topic\n\
             2. Briefly introduces the topics\n\
             3. Invites them to choose the one that interests them\n\
             4. Keeps a light and cheerful tone"
        );
        let fallback = format!(
            "What would you like the cards to speak to? Choose a topic:\n{listing}"
        );

        Ok(ctx
            .narrator
            .narrate(prepared.session_id, self.kind(), &prompt, &fallback)
            .await)
    }

    fn commit(
        &self,
        session: &mut Session,
        prepared: TopicGuidePrepared,
        outcome: Narration,
    ) -> Result<Action, StepError> {
        let available_topics = prepared.topics.into_iter().map(|t| t.key).collect();
        record(
            session,
            HistoryRecord::TopicSelectionGuide { available_topics },
            outcome,
            Action::WaitingTopic,
        )
    }
}

/// Presents the spreads, recommending one for the chosen topic.
pub struct SpreadSelectionStep;

pub struct SpreadGuidePrepared {
    session_id: SessionId,
    spreads: Vec<SpreadDefinition>,
    topic: Option<Topic>,
}

#[async_trait]
impl StepUnit for SpreadSelectionStep {
    type Prepared = SpreadGuidePrepared;
    type Outcome = Narration;

    fn kind(&self) -> StepKind {
        StepKind::SpreadSelection
    }

    fn prepare(
        &self,
        session: &Session,
        ctx: &StepContext,
    ) -> Result<SpreadGuidePrepared, StepError> {
        let topic = session
            .divination()
            .topic
            .as_deref()
            .and_then(|key| ctx.catalog.topic(key))
            .cloned();
        Ok(SpreadGuidePrepared {
            session_id: *session.id(),
            spreads: ctx.catalog.spreads().to_vec(),
            topic,
        })
    }

    async fn act(
        &self,
        prepared: &SpreadGuidePrepared,
        ctx: &StepContext,
    ) -> Result<Narration, StepError> {
        let topic_name = prepared
            .topic
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or("an unknown");
        let listing = prepared
            .spreads
            .iter()
            .enumerate()
            .map(|(i, s)| format!("{}. {} - {}", i + 1, s.name, s.description))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "The visitor chose the {topic_name} topic. Now they choose a spread:\n\n\
             {listing}\n\n\
             Write a short message that:\n\
             1. Recommends a spread that suits their topic\n\
             2. Explains how the spreads differ\n\
             3. Invites them to pick the one they like\n\
             4. Stays encouraging and full of anticipation"
        );
        let fallback = format!("Now pick a spread for your reading:\n{listing}");

        Ok(ctx
            .narrator
            .narrate(prepared.session_id, self.kind(), &prompt, &fallback)
            .await)
    }

    fn commit(
        &self,
        session: &mut Session,
        prepared: SpreadGuidePrepared,
        outcome: Narration,
    ) -> Result<Action, StepError> {
        let available_spreads = prepared.spreads.into_iter().map(|s| s.key).collect();
        record(
            session,
            HistoryRecord::SpreadSelectionGuide { available_spreads },
            outcome,
            Action::WaitingSpread,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::flow::steps::testing::{context, run};
    use crate::domain::flow::steps::WelcomeStep;
    use crate::domain::session::SessionStep;

    #[tokio::test]
    async fn topic_guide_lists_topics_and_waits() {
        let provider = MockAIProvider::failing();
        let ctx = context(provider.clone());
        let mut session = Session::create(None);
        run(&WelcomeStep, &mut session, &ctx).await.unwrap();

        let action = run(&TopicSelectionStep, &mut session, &ctx).await.unwrap();

        assert_eq!(action, Action::WaitingTopic);
        assert_eq!(session.current_step(), SessionStep::WaitingTopic);
        let entry = session.history().last().unwrap();
        match &entry.record {
            HistoryRecord::TopicSelectionGuide { available_topics } => {
                assert_eq!(
                    available_topics,
                    &vec!["love", "career", "wealth", "health", "general"]
                );
            }
            other => panic!("unexpected record {other:?}"),
        }
        assert!(entry.message.contains("Love"));
        assert!(provider.get_calls()[1].messages[0].content.contains("Career"));
    }

    #[tokio::test]
    async fn spread_guide_mentions_topic_and_waits() {
        let provider = MockAIProvider::new();
        let ctx = context(provider.clone());
        let mut session = Session::create(None);
        run(&WelcomeStep, &mut session, &ctx).await.unwrap();
        run(&TopicSelectionStep, &mut session, &ctx).await.unwrap();
        session.confirm_topic("career");
        session.advance_to(SessionStep::SpreadSelection).unwrap();

        let action = run(&SpreadSelectionStep, &mut session, &ctx).await.unwrap();

        assert_eq!(action, Action::WaitingSpread);
        assert_eq!(session.current_step(), SessionStep::WaitingSpread);
        let prompt = &provider.get_calls()[2].messages[0].content;
        assert!(prompt.contains("Career"));
        assert!(prompt.contains("Past, Present, Future"));
    }
}
