//! oa-gateway: Telegram relay for the OllamaAssist backend
//!
//! Usage:
//!   oa-gateway           - Relay Telegram messages to the backend
//!   oa-gateway --help    - Show help
//!   oa-gateway --version - Show version

use std::sync::Arc;

use oa_core::{BackendClient, Config, Dispatcher, SessionStore};
use oa_telegram::TelegramBot;
use tracing_subscriber::EnvFilter;

/// Run mode
enum RunMode {
    /// Relay until Ctrl+C
    Relay,
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    match parse_args() {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("oa-gateway {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        RunMode::Relay => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Starting oa-gateway...");
    tracing::info!(
        "Backend: {} (timeout {}s, listing limit {})",
        config.backend.url,
        config.backend.timeout_secs,
        config.backend.default_conversation_limit
    );

    let backend = BackendClient::new(&config.backend)
        .map_err(|e| anyhow::anyhow!("Failed to create backend client: {}", e))?;
    let dispatcher = Dispatcher::new(Arc::new(backend), SessionStore::new());

    let bot = TelegramBot::new(&config.telegram.token, dispatcher)
        .map_err(|e| anyhow::anyhow!("Error creating bot: {}", e))?;

    // Unreachable Telegram or a rejected token stops us before any update is read
    bot.connect()
        .await
        .map_err(|e| anyhow::anyhow!("Error connecting to Telegram: {}", e))?;

    if let Err(e) = bot.register_commands().await {
        tracing::warn!("Failed to register bot commands: {}", e);
    }

    tracing::info!("Press Ctrl+C to exit");
    bot.start().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Parse command line arguments
fn parse_args() -> RunMode {
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => return RunMode::Help,
            "--version" | "-v" => return RunMode::Version,
            _ => {}
        }
    }

    RunMode::Relay
}

/// Print help message
fn print_help() {
    println!("oa-gateway - Telegram relay for the OllamaAssist backend");
    println!();
    println!("Usage:");
    println!("  oa-gateway           Relay Telegram messages to the backend");
    println!("  oa-gateway --help    Show this help message");
    println!("  oa-gateway --version Show version");
    println!();
    println!("Configuration is read from ./oa-gateway.toml if present, then the environment:");
    println!("  TELEGRAM_BOT_TOKEN          Telegram bot token (required)");
    println!("  API_SERVER_URL              Backend base URL (default: http://localhost:8080)");
    println!("  DEFAULT_CONVERSATION_LIMIT  Conversations to list (default: 10)");
    println!("  REQUEST_TIMEOUT_SECS        Backend request timeout (default: 30)");
    println!("  RUST_LOG                    Log filter (default: info)");
}
