//! A bot that turns chat messages into personal role colors.
//!
//! Post a color in the configured channel — `255 0 128`, `#1a2b3c`,
//! `cornflowerblue` — and the bot gives you a role named after your user id,
//! colored to match, acknowledged with a reaction on the message.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use huebot::{client::HueBot, config::BotConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::from_env()?;
//!     let bot = HueBot::new(&config);
//!
//!     // Block until the gateway disconnects.
//!     bot.run().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod color;
pub mod config;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod rest;
pub mod roles;
pub mod types;

pub use client::HueBot;
pub use color::Color;
pub use error::{BotError, Result};
pub use gateway::Gateway;
pub use rest::RestClient;
