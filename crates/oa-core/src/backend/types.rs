//! Backend wire types

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Open-ended tool description as returned by `GET /tools`
pub type ToolCatalog = serde_json::Map<String, serde_json::Value>;

/// One chat turn sent to `POST /chat`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    /// The user's message or command
    pub input: String,
    /// Existing conversation to continue; omitted to start a new one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Human-readable title for a new conversation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ChatRequest {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    /// Continue a conversation. An empty id leaves the field unset.
    pub fn conversation(mut self, conversation_id: impl Into<String>) -> Self {
        let conversation_id = conversation_id.into();
        self.conversation_id = (!conversation_id.is_empty()).then_some(conversation_id);
        self
    }

    pub fn user(mut self, user_id: impl ToString) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Reply to a chat turn
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatResponse {
    /// Assistant output text
    pub output: String,
    /// Conversation the turn belongs to, populated even when resuming
    pub conversation_id: String,
}

/// Conversation metadata from `GET /conversations`
///
/// The wire object also carries the full message list; it is not read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationList {
    #[serde(default)]
    pub conversations: Vec<ConversationSummary>,
}

/// RFC 3339, or a naive ISO timestamp read as UTC
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
}
