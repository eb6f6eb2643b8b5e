//! Session Store Port - Interface for keeping divination sessions.
//!
//! Sessions are loaded before a step runs and saved only after it
//! succeeded, so a failed step leaves the stored copy untouched.

use async_trait::async_trait;

use crate::domain::foundation::SessionId;
use crate::domain::session::Session;

/// Errors that can occur during session store operations
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Port for persisting and loading sessions
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a session
    ///
    /// # Errors
    /// Returns `SessionStoreError::NotFound` if no session exists
    async fn get(&self, id: SessionId) -> Result<Session, SessionStoreError>;

    /// Insert or replace a session
    async fn put(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Remove a session. Removing an unknown id is not an error.
    async fn delete(&self, id: SessionId) -> Result<(), SessionStoreError>;

    /// Check if a session exists
    async fn exists(&self, id: SessionId) -> Result<bool, SessionStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_session() {
        let id = SessionId::new();
        let err = SessionStoreError::NotFound(id);
        assert!(err.to_string().contains("Session not found"));
        assert!(err.to_string().contains(&id.to_string()));
    }
}
