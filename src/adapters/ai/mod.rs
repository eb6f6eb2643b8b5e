//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `OpenAIProvider` - OpenAI-compatible chat completions (OpenAI, DeepSeek)
//! - `DisabledAIProvider` - Fails every call so readings use fallback text
//! - `MockAIProvider` - Configurable mock for testing

mod disabled_provider;
mod mock_provider;
mod openai_provider;

pub use disabled_provider::DisabledAIProvider;
pub use mock_provider::{MockAIProvider, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider, DEEPSEEK_BASE_URL, OPENAI_BASE_URL};
