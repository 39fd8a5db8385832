//! Bot entry point: load config, connect, run until interrupted.

use huebot::client::HueBot;
use huebot::config::BotConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = BotConfig::from_env()?;

    // Initialize tracing (structured logging)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "huebot=info".into()),
        )
        .with_target(true)
        .init();

    tracing::info!("🎨 Starting huebot v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("   Listening for colors in channel {}", config.channel_id);

    let bot = HueBot::new(&config);

    tokio::select! {
        _ = bot.run() => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
