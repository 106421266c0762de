//! Telegram bot implementation

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{BotCommand, ChatAction};
use tracing::{debug, info};

use oa_core::{COMMANDS, EventKind};

use crate::error::{Result, TelegramError};
use crate::reply::{deliver, inbound_event};

/// Relay dispatcher shared with every update handler
type Relay = Arc<oa_core::Dispatcher>;

/// Telegram bot wrapper
pub struct TelegramBot {
    bot: Bot,
    relay: Relay,
}

impl TelegramBot {
    /// Create a new Telegram bot
    pub fn new(token: &str, dispatcher: oa_core::Dispatcher) -> Result<Self> {
        if token.trim().is_empty() {
            return Err(TelegramError::TokenNotSet);
        }

        Ok(Self {
            bot: Bot::new(token),
            relay: Arc::new(dispatcher),
        })
    }

    /// Verify the token against Telegram and return the bot's username
    pub async fn connect(&self) -> Result<String> {
        let me = self.bot.get_me().await?;
        info!("Authorized on account {}", me.username());
        Ok(me.username().to_string())
    }

    /// Publish the command menu shown by Telegram clients
    pub async fn register_commands(&self) -> Result<()> {
        let commands: Vec<BotCommand> = COMMANDS
            .iter()
            .map(|(name, description)| BotCommand::new(*name, *description))
            .collect();

        self.bot.set_my_commands(commands).await?;
        debug!("Registered {} bot commands", COMMANDS.len());
        Ok(())
    }

    /// Long-poll for updates until Ctrl+C
    ///
    /// Updates are queued per sender, so one user's messages are handled in
    /// order while different users are served concurrently.
    pub async fn start(self) -> Result<()> {
        info!("Starting Telegram bot...");

        let handler = Update::filter_message().endpoint(handle_message);

        Dispatcher::builder(self.bot, handler)
            .dependencies(dptree::deps![self.relay])
            .distribution_function(|update: &Update| update.from().map(|user| user.id))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Telegram bot stopped");
        Ok(())
    }
}

/// Relay one message and deliver the reply
async fn handle_message(bot: Bot, msg: Message, relay: Relay) -> Result<()> {
    let Some(event) = inbound_event(&msg) else {
        debug!("Ignoring non-text message {} in chat {}", msg.id.0, msg.chat.id.0);
        return Ok(());
    };

    if matches!(event.kind, EventKind::Text(_)) {
        if let Err(e) = bot.send_chat_action(msg.chat.id, ChatAction::Typing).await {
            debug!("Failed to send typing action: {}", e);
        }
    }

    let reply = relay.dispatch(&event).await;
    deliver(&bot, &reply).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oa_core::{BackendClient, SessionStore};
    use std::time::Duration;

    fn dispatcher() -> oa_core::Dispatcher {
        let client =
            BackendClient::with_timeout("http://localhost:8080", Duration::from_secs(1)).unwrap();
        oa_core::Dispatcher::new(Arc::new(client), SessionStore::new())
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(
            TelegramBot::new("  ", dispatcher()),
            Err(TelegramError::TokenNotSet)
        ));
    }

    #[test]
    fn test_bot_creation() {
        assert!(TelegramBot::new("123456:TEST", dispatcher()).is_ok());
    }
}
