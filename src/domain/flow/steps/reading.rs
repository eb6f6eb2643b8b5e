//! Draw, interpretation and advice.

use async_trait::async_trait;

use crate::domain::catalog::SpreadDefinition;
use crate::domain::draw::{draw, draw_summary, DrawnCard};
use crate::domain::foundation::SessionId;
use crate::domain::session::{HistoryRecord, Session};

use super::{record, Action, Narration, StepContext, StepError, StepKind, StepUnit};

/// Display name for a topic key, falling back to the key itself.
fn topic_name(ctx: &StepContext, key: &str) -> String {
    ctx.catalog
        .topic(key)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| key.to_string())
}

/// Draws the confirmed spread and reveals the cards.
pub struct CardDrawingStep;

pub struct DrawPrepared {
    session_id: SessionId,
    spread: SpreadDefinition,
}

pub struct DrawOutcome {
    cards: Vec<DrawnCard>,
    narration: Narration,
}

#[async_trait]
impl StepUnit for CardDrawingStep {
    type Prepared = DrawPrepared;
    type Outcome = DrawOutcome;

    fn kind(&self) -> StepKind {
        StepKind::CardDrawing
    }

    fn prepare(&self, session: &Session, ctx: &StepContext) -> Result<DrawPrepared, StepError> {
        let key = session
            .divination()
            .spread_type
            .as_deref()
            .ok_or_else(|| StepError::missing(self.kind(), "spread_type"))?;
        let spread = ctx
            .catalog
            .spread(key)
            .cloned()
            .ok_or_else(|| crate::domain::draw::DrawError::UnknownSpread(key.to_string()))?;
        Ok(DrawPrepared {
            session_id: *session.id(),
            spread,
        })
    }

    async fn act(&self, prepared: &DrawPrepared, ctx: &StepContext) -> Result<DrawOutcome, StepError> {
        let cards = draw(ctx.catalog.as_ref(), &prepared.spread.key, ctx.draw_seed)?;
        let summary = draw_summary(&cards);

        let prompt = format!(
            "The visitor chose the {} spread and the cards have been drawn.\n\n\
             Result:\n{summary}\n\n\
             As the tarot reader:\n\
             1. Build a mysterious drawing atmosphere\n\
             2. Reveal the cards\n\
             3. Share your first impression\n\
             4. Get ready for the interpretation\n\
             5. Keep an encouraging tone",
            prepared.spread.name
        );
        let fallback = format!(
            "The cards are on the table.\n{summary}\nLet's see what they have to tell you."
        );

        let narration = ctx
            .narrator
            .narrate(prepared.session_id, self.kind(), &prompt, &fallback)
            .await;
        Ok(DrawOutcome { cards, narration })
    }

    fn commit(
        &self,
        session: &mut Session,
        _prepared: DrawPrepared,
        outcome: DrawOutcome,
    ) -> Result<Action, StepError> {
        session.record_draw(outcome.cards.clone())?;
        record(
            session,
            HistoryRecord::CardsDrawn {
                drawn_cards: outcome.cards,
            },
            outcome.narration,
            Action::Interpretation,
        )
    }
}

/// Reads the drawn cards in light of the topic.
pub struct InterpretationStep;

pub struct InterpretationPrepared {
    session_id: SessionId,
    topic: String,
    cards: Vec<DrawnCard>,
}

#[async_trait]
impl StepUnit for InterpretationStep {
    type Prepared = InterpretationPrepared;
    type Outcome = Narration;

    fn kind(&self) -> StepKind {
        StepKind::Interpretation
    }

    fn prepare(
        &self,
        session: &Session,
        ctx: &StepContext,
    ) -> Result<InterpretationPrepared, StepError> {
        let divination = session.divination();
        let topic = divination
            .topic
            .as_deref()
            .ok_or_else(|| StepError::missing(self.kind(), "topic"))?;
        if divination.drawn_cards.is_empty() {
            return Err(StepError::missing(self.kind(), "drawn_cards"));
        }
        Ok(InterpretationPrepared {
            session_id: *session.id(),
            topic: topic_name(ctx, topic),
            cards: divination.drawn_cards.clone(),
        })
    }

    async fn act(
        &self,
        prepared: &InterpretationPrepared,
        ctx: &StepContext,
    ) -> Result<Narration, StepError> {
        let topic = &prepared.topic;
        let cards_text = prepared
            .cards
            .iter()
            .map(|c| {
                format!(
                    "{}\nMeaning: {}\nKeywords: {}",
                    c.summary_line(),
                    c.current_meaning,
                    c.card.keywords.join(", ")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = format!(
            "Interpret a tarot reading on the topic of {topic}. The cards drawn are:\n\n\
             {cards_text}\n\n\
             As the tarot reader {persona}:\n\
             1. Interpret the cards in depth for the {topic} topic\n\
             2. Explain how the cards relate and what they mean together\n\
             3. Offer concrete guidance for {topic}\n\
             4. Keep the reading positive\n\
             5. Keep the style friendly and relaxed, not too serious\n\
             6. Aim for about 200 words",
            persona = ctx.narrator.persona_name()
        );
        let fallback = format!(
            "Here is what your cards say about {topic}:\n{}",
            prepared
                .cards
                .iter()
                .map(|c| format!("{}: {}", c.summary_line(), c.current_meaning))
                .collect::<Vec<_>>()
                .join("\n")
        );

        Ok(ctx
            .narrator
            .narrate(prepared.session_id, self.kind(), &prompt, &fallback)
            .await)
    }

    fn commit(
        &self,
        session: &mut Session,
        _prepared: InterpretationPrepared,
        outcome: Narration,
    ) -> Result<Action, StepError> {
        session.record_interpretation(outcome.text.clone());
        record(session, HistoryRecord::Interpretation, outcome, Action::Advice)
    }
}

/// Closes the reading with practical, encouraging advice.
pub struct AdviceStep;

pub struct AdvicePrepared {
    session_id: SessionId,
    topic: String,
    interpretation: String,
}

const ADVICE_FALLBACK: &str = "Take what resonates from this reading and trust your own next \
     steps. The cards offer reflection; your choices shape the path. Wishing you all the best! ✨";

#[async_trait]
impl StepUnit for AdviceStep {
    type Prepared = AdvicePrepared;
    type Outcome = Narration;

    fn kind(&self) -> StepKind {
        StepKind::Advice
    }

    fn prepare(&self, session: &Session, ctx: &StepContext) -> Result<AdvicePrepared, StepError> {
        let divination = session.divination();
        let topic = divination
            .topic
            .as_deref()
            .ok_or_else(|| StepError::missing(self.kind(), "topic"))?;
        let interpretation = divination
            .interpretation
            .clone()
            .ok_or_else(|| StepError::missing(self.kind(), "interpretation"))?;
        Ok(AdvicePrepared {
            session_id: *session.id(),
            topic: topic_name(ctx, topic),
            interpretation,
        })
    }

    async fn act(&self, prepared: &AdvicePrepared, ctx: &StepContext) -> Result<Narration, StepError> {
        let prompt = format!(
            "Based on the tarot reading about {topic} you just gave:\n{interpretation}\n\n\
             As the tarot reader {persona}:\n\
             1. Give specific, practical advice\n\
             2. Offer positive encouragement\n\
             3. Help the visitor build confidence and hope\n\
             4. Remind them that tarot inspires but their own effort decides\n\
             5. End with a warm blessing\n\
             6. Aim for about 120 words",
            topic = prepared.topic,
            interpretation = prepared.interpretation,
            persona = ctx.narrator.persona_name()
        );
        Ok(ctx
            .narrator
            .narrate(prepared.session_id, self.kind(), &prompt, ADVICE_FALLBACK)
            .await)
    }

    fn commit(
        &self,
        session: &mut Session,
        _prepared: AdvicePrepared,
        outcome: Narration,
    ) -> Result<Action, StepError> {
        session.complete_with_advice(outcome.text.clone())?;
        record(session, HistoryRecord::Advice, outcome, Action::Completed)
    }
}
