use chat_completion::CompletionClient;
use message_relay::{MessageRelay, RelayConfig};
use telegram_bot::{BotConfig, TelegramClient};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Configuration errors halt startup
    let backend = CompletionClient::from_env()?;
    let bot_config = BotConfig::from_env()?;

    let (client, me) = TelegramClient::connect(bot_config).await?;

    let mut relay_config = RelayConfig::from_env();
    if let Some(username) = me.username {
        relay_config = relay_config.with_bot_username(username);
    }

    info!(
        "Relaying to model {} (history: {})",
        backend.config().model,
        backend.config().keep_history
    );

    let relay = MessageRelay::new(client, backend, relay_config);

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            futures::future::pending::<()>().await;
        }
    };
    relay.run_with_shutdown(shutdown).await?;

    Ok(())
}
