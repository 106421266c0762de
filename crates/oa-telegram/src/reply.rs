//! Conversion between Telegram messages and relay events

use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId as TelegramMessageId, ReplyParameters};
use tracing::{debug, error};

use oa_core::{ChatId as CoreChatId, InboundEvent, MessageId as CoreMessageId, OutboundReply, UserId};

/// Telegram rejects messages longer than this
pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Build a relay event from a text message. Anything without text or
/// without a sender is not relayed.
pub fn inbound_event(msg: &Message) -> Option<InboundEvent> {
    let text = msg.text()?;
    let sender = msg.from.as_ref()?;

    Some(InboundEvent::from_text(
        UserId(sender.id.0),
        CoreChatId(msg.chat.id.0),
        CoreMessageId(msg.id.0),
        text,
    ))
}

/// Send a reply, threading the first chunk under the triggering message.
///
/// Delivery failures are logged and the remaining chunks dropped; the event
/// still counts as handled.
pub async fn deliver(bot: &Bot, reply: &OutboundReply) {
    let chat_id = ChatId(reply.chat_id.0);

    for (i, chunk) in split_reply(&reply.text, MAX_MESSAGE_LENGTH).into_iter().enumerate() {
        let mut request = bot.send_message(chat_id, chunk);
        if i == 0 {
            request = request.reply_parameters(ReplyParameters::new(TelegramMessageId(
                reply.reply_to.0,
            )));
        }

        if let Err(e) = request.await {
            error!("Error sending message to chat {}: {}", chat_id.0, e);
            return;
        }
    }
    debug!("Reply delivered to chat {}", chat_id.0);
}

/// Split text into chunks of at most `max_chars` characters, preferring to
/// break after a newline. A zero limit is treated as one.
pub fn split_reply(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut remaining = text;

    loop {
        let limit = remaining
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(remaining.len());

        if limit == remaining.len() {
            chunks.push(remaining.to_string());
            return chunks;
        }

        let window = &remaining[..limit];
        let cut = match window.rfind('\n') {
            Some(i) if i > 0 => i + 1,
            _ => limit,
        };

        chunks.push(remaining[..cut].to_string());
        remaining = &remaining[cut..];
        if remaining.is_empty() {
            return chunks;
        }
    }
}
