//! Error types for the bot.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    /// The message text matched no color grammar and no color name.
    #[error("color text not recognized")]
    ColorNotRecognized,

    /// The HTTP response had a non-2xx status code.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// An error from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An error from the WebSocket layer.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded at startup.
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, BotError>;
