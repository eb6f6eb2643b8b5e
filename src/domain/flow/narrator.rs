//! Narrator - prose for each step, with a mandatory fallback.
//!
//! Wraps the AI provider so that a failed, empty or overdue completion
//! never reaches the visitor: the step's fixed fallback text is used
//! instead and the failure is logged.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::foundation::SessionId;
use crate::domain::session::NarrationSource;
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata};

use super::StepKind;

/// Prose produced for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narration {
    pub text: String,
    pub source: NarrationSource,
}

impl Narration {
    pub fn fallback(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: NarrationSource::Fallback,
        }
    }
}

/// System prompt giving every request the reader's voice.
pub fn persona_prompt(persona_name: &str) -> String {
    format!(
        "You are {name}, a friendly and lightly humorous tarot reader 🔮. \
         Speak like a warm friend chatting, use a few fitting emoji ✨🌟💫, \
         and avoid sounding grave or mystical. Keep every reading positive \
         and constructive. Keep each reply under 150 words. \
         Remember that tarot is a tool for reflection and inspiration, \
         not a prediction of a fixed future.",
        name = persona_name
    )
}

/// Asks the provider for prose and falls back on any failure.
#[derive(Clone)]
pub struct Narrator {
    provider: Arc<dyn AIProvider>,
    persona_name: String,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
    timeout: Duration,
}

impl Narrator {
    pub fn new(provider: Arc<dyn AIProvider>, persona_name: impl Into<String>) -> Self {
        let persona_name = persona_name.into();
        Self {
            provider,
            system_prompt: persona_prompt(&persona_name),
            persona_name,
            max_tokens: 600,
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Upper bound on one narration, provider retries included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Name the reader introduces themselves with.
    pub fn persona_name(&self) -> &str {
        &self.persona_name
    }

    /// Generates prose for `step`, returning `fallback` if the provider
    /// fails, answers with nothing or overruns the narration timeout.
    pub async fn narrate(
        &self,
        session_id: SessionId,
        step: StepKind,
        prompt: &str,
        fallback: &str,
    ) -> Narration {
        let request = CompletionRequest::new(RequestMetadata::new(
            session_id,
            step.as_str(),
            session_id.to_string(),
        ))
        .with_system_prompt(self.system_prompt.clone())
        .with_message(MessageRole::User, prompt)
        .with_max_tokens(self.max_tokens)
        .with_temperature(self.temperature);

        let pending = self.provider.complete(request);
        let completion = match tokio::time::timeout(self.timeout, pending).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    session_id = %session_id,
                    step = step.as_str(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "narration timed out, using fallback"
                );
                return Narration::fallback(fallback);
            }
        };

        match completion {
            Ok(response) if !response.content.trim().is_empty() => Narration {
                text: response.content.trim().to_string(),
                source: NarrationSource::Generated,
            },
            Ok(_) => {
                tracing::warn!(
                    session_id = %session_id,
                    step = step.as_str(),
                    "narration came back empty, using fallback"
                );
                Narration::fallback(fallback)
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    step = step.as_str(),
                    error = %e,
                    "narration failed, using fallback"
                );
                Narration::fallback(fallback)
            }
        }
    }
}

impl std::fmt::Debug for Narrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Narrator")
            .field("provider", &self.provider.provider_info().name)
            .field("persona_name", &self.persona_name)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};

    #[tokio::test]
    async fn returns_generated_text() {
        let provider = Arc::new(MockAIProvider::new().with_response("  Hello, seeker!  "));
        let narrator = Narrator::new(provider.clone(), "Luna");

        let narration = narrator
            .narrate(SessionId::new(), StepKind::Welcome, "greet", "fallback")
            .await;

        assert_eq!(narration.text, "Hello, seeker!");
        assert_eq!(narration.source, NarrationSource::Generated);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn falls_back_on_provider_error() {
        let provider = Arc::new(MockAIProvider::new().with_error(MockError::Unavailable {
            message: "down".to_string(),
        }));
        let narrator = Narrator::new(provider, "Luna");

        let narration = narrator
            .narrate(SessionId::new(), StepKind::Advice, "advise", "Trust yourself.")
            .await;

        assert_eq!(narration, Narration::fallback("Trust yourself."));
    }

    #[tokio::test]
    async fn falls_back_on_blank_completion() {
        let provider = Arc::new(MockAIProvider::new().with_response("   "));
        let narrator = Narrator::new(provider, "Luna");

        let narration = narrator
            .narrate(SessionId::new(), StepKind::Interpretation, "read", "The cards speak.")
            .await;

        assert_eq!(narration.source, NarrationSource::Fallback);
        assert_eq!(narration.text, "The cards speak.");
    }

    #[tokio::test]
    async fn falls_back_when_provider_overruns_timeout() {
        let provider = Arc::new(
            MockAIProvider::new()
                .with_response("too late")
                .with_delay(Duration::from_secs(5)),
        );
        let narrator =
            Narrator::new(provider.clone(), "Luna").with_timeout(Duration::from_millis(50));

        let started = std::time::Instant::now();
        let narration = narrator
            .narrate(SessionId::new(), StepKind::Welcome, "greet", "Welcome, friend.")
            .await;

        assert_eq!(narration, Narration::fallback("Welcome, friend."));
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn slow_provider_within_timeout_is_kept() {
        let provider = Arc::new(
            MockAIProvider::new()
                .with_response("Hello!")
                .with_delay(Duration::from_millis(10)),
        );
        let narrator = Narrator::new(provider, "Luna").with_timeout(Duration::from_secs(5));

        let narration = narrator
            .narrate(SessionId::new(), StepKind::Welcome, "greet", "fallback")
            .await;

        assert_eq!(narration.source, NarrationSource::Generated);
    }

    #[tokio::test]
    async fn sends_persona_prompt_and_step_metadata() {
        let provider = Arc::new(MockAIProvider::new().with_response("ok"));
        let narrator = Narrator::new(provider.clone(), "Luna")
            .with_max_tokens(200)
            .with_temperature(0.3);
        let session_id = SessionId::new();

        narrator
            .narrate(session_id, StepKind::CardDrawing, "reveal", "fallback")
            .await;

        let calls = provider.get_calls();
        assert_eq!(calls.len(), 1);
        let request = &calls[0];
        assert!(request.system_prompt.as_deref().unwrap().contains("Luna"));
        assert_eq!(request.messages[0].content, "reveal");
        assert_eq!(request.max_tokens, Some(200));
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.metadata.step, "card_drawing");
        assert_eq!(request.metadata.session_id, session_id);
    }

    #[test]
    fn persona_prompt_reminds_reflection() {
        let prompt = persona_prompt("Stella");
        assert!(prompt.contains("Stella"));
        assert!(prompt.contains("reflection"));
    }
}
