//! Session types

use std::fmt;

/// Stable identifier of a chat-platform user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// A user's currently active backend conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Owner of the session
    pub user_id: UserId,
    /// Backend-assigned conversation identifier; empty until one exists
    pub conversation_id: String,
}

impl Session {
    /// Create a session bound to a conversation
    pub fn new(user_id: UserId, conversation_id: impl Into<String>) -> Self {
        Self {
            user_id,
            conversation_id: conversation_id.into(),
        }
    }

    /// A session without a conversation id counts as no session at all
    pub fn has_conversation(&self) -> bool {
        !self.conversation_id.is_empty()
    }
}
