//! Inbound event dispatch
//!
//! Classifies one chat event, consults the session store, calls the backend
//! and produces exactly one reply for the transport to deliver.

mod command;
mod event;
mod handler;

pub use command::{COMMANDS, Command};
pub use event::{ChatId, EventKind, InboundEvent, MessageId, OutboundReply};
pub use handler::{Dispatcher, replies};
