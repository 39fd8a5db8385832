//! High-level bot client combining REST + gateway.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::ChatApi;
use crate::config::BotConfig;
use crate::gateway::Gateway;
use crate::handler::MessageHandler;
use crate::rest::RestClient;

/// The bot: one REST client, one gateway connection, one message handler.
///
/// ```rust,no_run
/// use huebot::{client::HueBot, config::BotConfig};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let bot = HueBot::new(&BotConfig::from_env()?);
///     bot.run().await;
///     Ok(())
/// }
/// ```
pub struct HueBot {
    pub rest: Arc<RestClient>,
    gateway: Gateway,
    handler: Arc<MessageHandler>,
}

impl HueBot {
    pub fn new(config: &BotConfig) -> Self {
        let rest = Arc::new(RestClient::new(&config.token, config.rest_url.as_deref()));
        let gateway = Gateway::new(&config.token, config.gateway_url.as_deref());
        let api: Arc<dyn ChatApi> = rest.clone();
        let handler = Arc::new(MessageHandler::new(api, config.channel_id.clone()));
        Self { rest, gateway, handler }
    }

    /// Run the gateway and handle message events until it shuts down.
    ///
    /// Each event is handled on its own task, so a slow platform call for one
    /// message never delays the next.
    pub async fn run(self) {
        let (tx, mut events) = mpsc::channel(64);
        tokio::spawn(self.gateway.run(tx));

        while let Some(event) = events.recv().await {
            let handler = Arc::clone(&self.handler);
            tokio::spawn(async move {
                handler.handle(&event.server_id, &event.message).await;
            });
        }
    }
}
