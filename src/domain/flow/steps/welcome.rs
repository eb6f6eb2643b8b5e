//! Greeting step.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::session::{HistoryRecord, Session};

use super::{record, Action, Narration, StepContext, StepError, StepKind, StepUnit};

/// Greets the visitor, differently for returning visitors.
pub struct WelcomeStep;

pub struct WelcomePrepared {
    session_id: SessionId,
    returning: bool,
}

fn new_visitor_prompt(persona: &str) -> String {
    format!(
        "As the tarot reader {persona}, greet a visitor who is new here. Include:\n\
         1. A friendly hello\n\
         2. A short introduction of your name and what you do\n\
         3. What the reading ahead will look like\n\
         4. Something that helps them relax and look forward to it"
    )
}

const RETURNING_VISITOR_PROMPT: &str =
    "Welcome the visitor back and ask whether they are ready for a new tarot reading.";

fn new_visitor_fallback(persona: &str) -> String {
    format!(
        "🔮✨ Hello! I'm {persona}, your tarot reader. Welcome to the world of tarot! \
         Ready to begin your reading?"
    )
}

const RETURNING_VISITOR_FALLBACK: &str = "🔮 Welcome back! Ready for a new tarot reading?";

#[async_trait]
impl StepUnit for WelcomeStep {
    type Prepared = WelcomePrepared;
    type Outcome = Narration;

    fn kind(&self) -> StepKind {
        StepKind::Welcome
    }

    fn prepare(&self, session: &Session, _ctx: &StepContext) -> Result<WelcomePrepared, StepError> {
        Ok(WelcomePrepared {
            session_id: *session.id(),
            returning: session.is_returning_visitor(),
        })
    }

    async fn act(
        &self,
        prepared: &WelcomePrepared,
        ctx: &StepContext,
    ) -> Result<Narration, StepError> {
        let persona = ctx.narrator.persona_name();
        let (prompt, fallback) = if prepared.returning {
            (
                RETURNING_VISITOR_PROMPT.to_string(),
                RETURNING_VISITOR_FALLBACK.to_string(),
            )
        } else {
            (new_visitor_prompt(persona), new_visitor_fallback(persona))
        };
        Ok(ctx
            .narrator
            .narrate(prepared.session_id, self.kind(), &prompt, &fallback)
            .await)
    }

    fn commit(
        &self,
        session: &mut Session,
        _prepared: WelcomePrepared,
        outcome: Narration,
    ) -> Result<Action, StepError> {
        record(session, HistoryRecord::Welcome, outcome, Action::TopicSelection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::domain::flow::steps::testing::{context, run};
    use crate::domain::foundation::UserId;
    use crate::domain::session::{NarrationSource, SessionStep};

    #[tokio::test]
    async fn greets_and_moves_to_topic_selection() {
        let ctx = context(MockAIProvider::new().with_response("Hi there!"));
        let mut session = Session::create(None);

        let action = run(&WelcomeStep, &mut session, &ctx).await.unwrap();

        assert_eq!(action, Action::TopicSelection);
        assert_eq!(session.current_step(), SessionStep::TopicSelection);
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].step_name(), "welcome");
        assert_eq!(session.history()[0].message, "Hi there!");
    }

    #[tokio::test]
    async fn new_visitor_fallback_introduces_persona() {
        let ctx = context(MockAIProvider::failing());
        let mut session = Session::create(None);

        run(&WelcomeStep, &mut session, &ctx).await.unwrap();

        let entry = &session.history()[0];
        assert_eq!(entry.narration, NarrationSource::Fallback);
        assert!(entry.message.contains("I'm Luna"));
    }

    #[tokio::test]
    async fn returning_visitor_gets_welcome_back() {
        let provider = MockAIProvider::failing();
        let ctx = context(provider.clone());
        let mut session = Session::create(Some(UserId::new("visitor-7").unwrap()));

        run(&WelcomeStep, &mut session, &ctx).await.unwrap();

        assert_eq!(session.history()[0].message, RETURNING_VISITOR_FALLBACK);
        assert_eq!(
            provider.get_calls()[0].messages[0].content,
            RETURNING_VISITOR_PROMPT
        );
    }

    #[tokio::test]
    async fn prepare_does_not_mutate_session() {
        let ctx = context(MockAIProvider::new());
        let session = Session::create(None);
        let before = session.clone();

        let prepared = WelcomeStep.prepare(&session, &ctx).unwrap();
        WelcomeStep.act(&prepared, &ctx).await.unwrap();

        assert_eq!(session, before);
    }
}
