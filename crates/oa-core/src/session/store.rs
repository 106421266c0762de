//! In-memory session store
//!
//! One reader/writer lock guards the whole map. Every write replaces a
//! session wholesale, so readers never see a half-updated entry.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::session::{Session, UserId};

/// Concurrent mapping from user to active conversation
#[derive(Debug, Default, Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<UserId, Session>>>,
}

impl SessionStore {
    /// Create an empty session store
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh session for `user_id`, discarding any previous one
    pub async fn start(&self, user_id: UserId, conversation_id: impl Into<String>) -> Session {
        let session = Session::new(user_id, conversation_id);
        let mut sessions = self.sessions.write().await;
        sessions.insert(user_id, session.clone());
        debug!(
            "Started session for user {}: {}",
            user_id, session.conversation_id
        );
        session
    }

    /// Get a copy of the user's session, if it has a conversation
    pub async fn get(&self, user_id: UserId) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&user_id)
            .filter(|session| session.has_conversation())
            .cloned()
    }

    /// Replace the user's session wholesale
    pub async fn update(&self, user_id: UserId, mut session: Session) {
        session.user_id = user_id;
        let mut sessions = self.sessions.write().await;
        debug!(
            "Updated session for user {}: {}",
            user_id, session.conversation_id
        );
        sessions.insert(user_id, session);
    }

    /// Remove the user's session. Clearing an absent session is a no-op.
    pub async fn clear(&self, user_id: UserId) {
        let mut sessions = self.sessions.write().await;
        if sessions.remove(&user_id).is_some() {
            debug!("Cleared session for user {}", user_id);
        }
    }

    /// Number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_and_get() {
        let store = SessionStore::new();
        store.start(UserId(42), "abc123").await;

        let session = store.get(UserId(42)).await.unwrap();
        assert_eq!(session.conversation_id, "abc123");
        assert_eq!(session.user_id, UserId(42));
    }

    #[tokio::test]
    async fn test_start_overwrites() {
        let store = SessionStore::new();
        store.start(UserId(42), "first").await;
        store.start(UserId(42), "second").await;

        let session = store.get(UserId(42)).await.unwrap();
        assert_eq!(session.conversation_id, "second");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_absent() {
        let store = SessionStore::new();
        assert!(store.get(UserId(1)).await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_empty_conversation_is_absent() {
        let store = SessionStore::new();
        store.start(UserId(42), "").await;
        assert!(store.get(UserId(42)).await.is_none());
    }

    #[tokio::test]
    async fn test_update_replaces() {
        let store = SessionStore::new();
        store.start(UserId(7), "old").await;
        // owner field is normalised to the key
        store.update(UserId(7), Session::new(UserId(99), "xyz")).await;

        let session = store.get(UserId(7)).await.unwrap();
        assert_eq!(session, Session::new(UserId(7), "xyz"));
        assert!(store.get(UserId(99)).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = SessionStore::new();
        store.start(UserId(42), "abc123").await;

        store.clear(UserId(42)).await;
        assert!(store.get(UserId(42)).await.is_none());

        store.clear(UserId(42)).await;
        assert!(store.get(UserId(42)).await.is_none());
    }

    #[tokio::test]
    async fn test_users_are_independent() {
        let store = SessionStore::new();
        store.start(UserId(1), "one").await;
        store.start(UserId(2), "two").await;
        store.clear(UserId(1)).await;

        assert!(store.get(UserId(1)).await.is_none());
        assert_eq!(store.get(UserId(2)).await.unwrap().conversation_id, "two");
    }

    #[tokio::test]
    async fn test_concurrent_writers() {
        let store = SessionStore::new();
        let mut handles = Vec::new();
        for i in 0..32u64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.start(UserId(i % 4), format!("conv-{}", i)).await;
                store.get(UserId(i % 4)).await
            }));
        }
        for handle in handles {
            let session = handle.await.unwrap().unwrap();
            assert!(session.conversation_id.starts_with("conv-"));
        }
        assert_eq!(store.len().await, 4);
    }
}
