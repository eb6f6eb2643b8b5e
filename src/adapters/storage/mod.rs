//! Storage Adapters
//!
//! Implementations of the SessionStore port.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionStore** - Keeps sessions in process memory

mod in_memory_session_store;

pub use in_memory_session_store::InMemorySessionStore;
