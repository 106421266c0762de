//! Transport-neutral event and reply types

use crate::session::UserId;

/// Chat or channel the event arrived in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Message identifier within a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// What the sender wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// `/name args`; `name` has no leading slash and no `@botname` suffix
    Command { name: String, args: String },
    /// Anything else
    Text(String),
}

impl EventKind {
    /// Split raw message text into a command or freeform text
    pub fn classify(text: &str) -> Self {
        let Some(rest) = text.strip_prefix('/') else {
            return Self::Text(text.to_string());
        };

        let (token, args) = match rest.split_once(char::is_whitespace) {
            Some((token, args)) => (token, args.trim()),
            None => (rest, ""),
        };
        let name = token.split('@').next().unwrap_or_default();

        Self::Command {
            name: name.to_string(),
            args: args.to_string(),
        }
    }
}

/// One inbound chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub sender: UserId,
    pub chat_id: ChatId,
    pub message_id: MessageId,
    pub kind: EventKind,
}

impl InboundEvent {
    /// Build an event from raw message text
    pub fn from_text(sender: UserId, chat_id: ChatId, message_id: MessageId, text: &str) -> Self {
        Self {
            sender,
            chat_id,
            message_id,
            kind: EventKind::classify(text),
        }
    }
}

/// Reply addressed back to the originating chat, threaded under the trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundReply {
    pub chat_id: ChatId,
    pub reply_to: MessageId,
    pub text: String,
}

impl OutboundReply {
    /// Reply to `event` with `text`
    pub fn to(event: &InboundEvent, text: impl Into<String>) -> Self {
        Self {
            chat_id: event.chat_id,
            reply_to: event.message_id,
            text: text.into(),
        }
    }
}
