//! oa-telegram: Telegram transport for oa-gateway
//!
//! Feeds Telegram updates to the [`oa_core::Dispatcher`] and delivers its
//! replies back into the originating chat.

pub mod bot;
pub mod error;
pub mod reply;

pub use bot::TelegramBot;
pub use error::{Result, TelegramError};
