//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `TAROT_GUIDE` prefix
//! and nested values are separated by a double underscore.
//!
//! # Example
//!
//! ```no_run
//! use tarot_guide::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod divination;
mod error;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use divination::DivinationConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Most narrations one request can trigger: a quick reading narrates the
/// draw, the interpretation and the advice.
pub const MAX_NARRATIONS_PER_REQUEST: u64 = 3;

/// Root application configuration
///
/// Every section has defaults, so an empty environment loads; whether it
/// validates depends on the AI provider having a key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, logging, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration (OpenAI/DeepSeek)
    #[serde(default)]
    pub ai: AiConfig,

    /// Reading configuration (persona, draw seed)
    #[serde(default)]
    pub divination: DivinationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `TAROT_GUIDE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TAROT_GUIDE__AI__PROVIDER=deepseek` -> `ai.provider = deepseek`
    /// - `TAROT_GUIDE__DIVINATION__DRAW_SEED=42` -> `divination.draw_seed = 42`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TAROT_GUIDE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Besides each section, the HTTP request timeout must outlast every
    /// narration a single request can run, or slow providers would surface
    /// as timeouts instead of fallback text.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.divination.validate()?;

        let required_secs = self.narration_budget_secs();
        if self.server.request_timeout_secs <= required_secs {
            return Err(ValidationError::RequestTimeoutTooShort {
                request_secs: self.server.request_timeout_secs,
                required_secs,
            });
        }
        Ok(())
    }

    /// Worst-case seconds spent narrating within one request.
    pub fn narration_budget_secs(&self) -> u64 {
        self.ai
            .narration_timeout_secs
            .saturating_mul(MAX_NARRATIONS_PER_REQUEST)
    }
}
