//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Text generation for narrative steps
//! - `CardCatalog` - Cards, topics and spreads
//! - `SessionStore` - Keeping sessions between requests

mod ai_provider;
mod card_catalog;
mod session_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use card_catalog::CardCatalog;
pub use session_store::{SessionStore, SessionStoreError};
