//! Event dispatcher

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::backend::{ChatBackend, ChatRequest, ConversationSummary, ToolCatalog};
use crate::dispatch::{Command, EventKind, InboundEvent, OutboundReply};
use crate::session::{Session, SessionStore, UserId};

/// Fixed reply texts
pub mod replies {
    pub const START_FAILED: &str = "Error starting new conversation";
    pub const LIST_FAILED: &str = "Error retrieving conversations";
    pub const NO_CONVERSATIONS: &str = "No conversations found";
    pub const TOOLS_FAILED: &str = "Error retrieving server information";
    pub const MESSAGE_FAILED: &str = "Error processing message";
    pub const UNKNOWN_COMMAND: &str = "Unknown command";
}

/// Input sent to the backend when a new conversation is opened
const START_INPUT: &str = "/start";
const NEW_CONVERSATION_TITLE: &str = "New Conversation";

/// Turns inbound events into replies
///
/// Backend failures never escape: each is logged and answered with a fixed
/// text, leaving the sender's session as it was.
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn ChatBackend>,
    sessions: SessionStore,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn ChatBackend>, sessions: SessionStore) -> Self {
        Self { backend, sessions }
    }

    /// Session store shared with this dispatcher
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Handle one event and produce its reply
    pub async fn dispatch(&self, event: &InboundEvent) -> OutboundReply {
        let text = match &event.kind {
            EventKind::Command { name, args } => {
                debug!("Command /{} from user {}", name, event.sender);
                match Command::parse(name, args) {
                    Command::Start(Some(conversation_id)) => {
                        self.resume(event.sender, conversation_id).await
                    }
                    Command::Start(None) => self.start_conversation(event.sender).await,
                    Command::List => self.list_conversations().await,
                    Command::Servers => self.list_tools().await,
                    Command::Help => Command::help_text(),
                    Command::Unknown(_) => replies::UNKNOWN_COMMAND.to_string(),
                }
            }
            EventKind::Text(text) => self.relay_message(event.sender, text).await,
        };

        OutboundReply::to(event, text)
    }

    /// Adopt a caller-supplied conversation id. The backend is not asked
    /// whether it exists; an unknown id fails on the next exchange.
    async fn resume(&self, user_id: UserId, conversation_id: String) -> String {
        let reply = format!("Loaded conversation: {}", conversation_id);
        self.sessions
            .update(user_id, Session::new(user_id, conversation_id))
            .await;
        info!("User {} resumed a conversation", user_id);
        reply
    }

    async fn start_conversation(&self, user_id: UserId) -> String {
        let request = ChatRequest::new(START_INPUT)
            .user(user_id)
            .title(NEW_CONVERSATION_TITLE);

        match self.backend.send_message(&request).await {
            Ok(response) => {
                self.sessions
                    .start(user_id, response.conversation_id.as_str())
                    .await;
                info!(
                    "Started conversation {} for user {}",
                    response.conversation_id, user_id
                );
                response.output
            }
            Err(e) => {
                error!("Failed to start conversation for user {}: {}", user_id, e);
                replies::START_FAILED.to_string()
            }
        }
    }

    async fn list_conversations(&self) -> String {
        match self.backend.list_conversations().await {
            Ok(conversations) if conversations.is_empty() => replies::NO_CONVERSATIONS.to_string(),
            Ok(conversations) => format_conversations(&conversations),
            Err(e) => {
                error!("Failed to list conversations: {}", e);
                replies::LIST_FAILED.to_string()
            }
        }
    }

    async fn list_tools(&self) -> String {
        match self.backend.list_tools().await {
            Ok(tools) => format_tools(&tools),
            Err(e) => {
                error!("Failed to list tools: {}", e);
                replies::TOOLS_FAILED.to_string()
            }
        }
    }

    /// Forward freeform text, continuing the sender's conversation if any
    async fn relay_message(&self, user_id: UserId, text: &str) -> String {
        let current = self.sessions.get(user_id).await;

        let mut request = ChatRequest::new(text).user(user_id);
        if let Some(session) = &current {
            request = request.conversation(session.conversation_id.as_str());
        }

        match self.backend.send_message(&request).await {
            Ok(response) => {
                if current.is_none() {
                    self.sessions
                        .start(user_id, response.conversation_id.as_str())
                        .await;
                    info!(
                        "Started conversation {} for user {}",
                        response.conversation_id, user_id
                    );
                }
                response.output
            }
            Err(e) => {
                error!("Failed to relay message for user {}: {}", user_id, e);
                replies::MESSAGE_FAILED.to_string()
            }
        }
    }
}

/// Render conversation summaries in the order received
fn format_conversations(conversations: &[ConversationSummary]) -> String {
    let mut text = String::from("Recent conversations:\n\n");
    for conversation in conversations {
        text.push_str(&format!(
            "ID: {}\nTitle: {}\nCreated: {}\n\n",
            conversation.id,
            conversation.title.as_deref().unwrap_or_default(),
            conversation.created_at.format("%Y-%m-%d %H:%M:%S"),
        ));
    }
    text
}

/// Render the tool catalogue
///
/// Arrays of `{name, description}` objects become bullet lines; anything
/// else is shown as pretty-printed JSON under its key.
fn format_tools(tools: &ToolCatalog) -> String {
    let mut lines = Vec::new();
    for (key, value) in tools {
        match value {
            Value::Array(items) => lines.extend(items.iter().map(format_tool_entry)),
            Value::String(s) => lines.push(format!("• {}: {}", key, s)),
            other => {
                let rendered = serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string());
                lines.push(format!("• {}: {}", key, rendered));
            }
        }
    }

    if lines.is_empty() {
        return "Available tools: none".to_string();
    }
    format!("Available tools:\n\n{}", lines.join("\n"))
}

fn format_tool_entry(item: &Value) -> String {
    let name = item.get("name").and_then(Value::as_str);
    let description = item.get("description").and_then(Value::as_str);
    match (name, description) {
        (Some(name), Some(description)) => format!("• {}: {}", name, description),
        (Some(name), None) => format!("• {}", name),
        _ => format!("• {}", item),
    }
}
