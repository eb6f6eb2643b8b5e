//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Chat-completion providers and a scripted mock
//! - `catalog` - Built-in cards, topics and spreads
//! - `storage` - In-memory session store
//! - `http` - axum REST API

pub mod ai;
pub mod catalog;
pub mod http;
pub mod storage;
