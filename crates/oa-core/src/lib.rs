//! oa-core: relay core for the OllamaAssist gateway
//!
//! Backend API client, per-user session store and the dispatcher that turns
//! one inbound chat event into one outbound reply. Transport-agnostic; the
//! Telegram adapter lives in `oa-telegram`.

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod session;

pub use backend::{
    BackendClient, ChatBackend, ChatRequest, ChatResponse, ConversationSummary, ToolCatalog,
};
pub use config::{BackendConfig, Config, TelegramConfig};
pub use dispatch::{COMMANDS, ChatId, Command, Dispatcher, EventKind, InboundEvent, MessageId, OutboundReply};
pub use error::{Error, Result};
pub use session::{Session, SessionStore, UserId};
