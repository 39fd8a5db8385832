//! Bot configuration loaded from environment variables.
//!
//! Supports `.env` files for development. Recognized variables:
//! `HUEBOT_TOKEN`, `HUEBOT_CHANNEL_ID`, and the optional `HUEBOT_REST_URL` /
//! `HUEBOT_GATEWAY_URL` overrides for self-hosted servers.

use serde::Deserialize;

use crate::error::Result;

/// Runtime configuration for the bot process.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot authentication token.
    pub token: String,
    /// The channel the bot listens in.
    pub channel_id: String,
    /// REST API base URL override.
    pub rest_url: Option<String>,
    /// Gateway WebSocket URL override.
    pub gateway_url: Option<String>,
}

impl BotConfig {
    /// Load configuration from the environment (and a `.env` file if
    /// present). A missing token or channel id is a startup error.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        let cfg = config::Config::builder()
            .add_source(config::Environment::with_prefix("HUEBOT"))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_reads_prefixed_vars() {
        std::env::set_var("HUEBOT_TOKEN", "t0ken");
        std::env::set_var("HUEBOT_CHANNEL_ID", "chan-42");

        let config = BotConfig::from_env().unwrap();
        assert_eq!(config.token, "t0ken");
        assert_eq!(config.channel_id, "chan-42");
        assert!(config.rest_url.is_none());
    }
}
