//! Inbound message handling — the glue between gateway events and role edits.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::ChatApi;
use crate::color::Color;
use crate::error::Result;
use crate::roles::assign_color_role;
use crate::types::Message;

const SUCCESS_REACTION: &str = "✅";
const FAILURE_REACTION: &str = "❌";

/// Handles MESSAGE_CREATE events for the configured color channel.
pub struct MessageHandler {
    api: Arc<dyn ChatApi>,
    channel_id: String,
}

impl MessageHandler {
    pub fn new(api: Arc<dyn ChatApi>, channel_id: String) -> Self {
        Self { api, channel_id }
    }

    /// Process one inbound message, reacting with the outcome.
    ///
    /// Messages outside the configured channel and messages from other bot
    /// accounts are ignored without a reaction. Parse failures and platform
    /// failures both come back as the same failure reaction.
    pub async fn handle(&self, server_id: &str, message: &Message) {
        if message.channel_id != self.channel_id || message.author.bot {
            return;
        }

        let reaction = match self.apply(server_id, message).await {
            Ok(color) => {
                info!(
                    user_id = %message.author.id,
                    color = %format!("#{:06x}", color.packed()),
                    "recolored user role"
                );
                SUCCESS_REACTION
            }
            Err(e) => {
                info!(user_id = %message.author.id, error = %e, "color message rejected");
                FAILURE_REACTION
            }
        };

        if let Err(e) = self
            .api
            .add_reaction(&message.channel_id, &message.id, reaction)
            .await
        {
            warn!(message_id = %message.id, "failed to add outcome reaction: {e}");
        }
    }

    /// Parse the message text and reconcile the author's role.
    async fn apply(&self, server_id: &str, message: &Message) -> Result<Color> {
        let color = Color::parse(&message.content.to_lowercase())?;
        assign_color_role(self.api.as_ref(), server_id, &message.author.id, color).await?;
        Ok(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::types::User;

    fn message(channel: &str, author: &str, bot: bool, content: &str) -> Message {
        Message {
            id: "msg-1".to_owned(),
            channel_id: channel.to_owned(),
            content: content.to_owned(),
            author: User {
                id: author.to_owned(),
                username: None,
                bot,
            },
        }
    }

    fn handler(api: Arc<FakeApi>) -> MessageHandler {
        MessageHandler::new(api, "chan-1".to_owned())
    }

    #[tokio::test]
    async fn test_ignores_other_channels_and_bot_authors() {
        let api = Arc::new(FakeApi::default());
        let handler = handler(Arc::clone(&api));

        handler.handle("srv", &message("chan-2", "user-1", false, "red")).await;
        handler.handle("srv", &message("chan-1", "user-2", true, "red")).await;

        let state = api.state.lock().unwrap();
        assert!(state.roles.is_empty());
        assert!(state.reactions.is_empty());
    }

    #[tokio::test]
    async fn test_valid_color_assigns_role_and_reacts_success() {
        let api = Arc::new(FakeApi::default());
        let handler = handler(Arc::clone(&api));

        // Mixed case exercises the lowercase normalization.
        handler.handle("srv", &message("chan-1", "user-7", false, "CornflowerBlue")).await;

        let state = api.state.lock().unwrap();
        let role = state.roles.iter().find(|r| r.name == "user-7").unwrap();
        assert_eq!(role.color, 0x6495ed);
        assert!(state
            .memberships
            .contains(&("user-7".to_owned(), role.id.clone())));
        assert_eq!(
            state.reactions,
            vec![("chan-1".to_owned(), "msg-1".to_owned(), "✅".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_unparseable_text_reacts_failure_without_role() {
        let api = Arc::new(FakeApi::default());
        let handler = handler(Arc::clone(&api));

        handler.handle("srv", &message("chan-1", "user-1", false, "not a color")).await;

        let state = api.state.lock().unwrap();
        assert!(state.roles.is_empty());
        assert_eq!(
            state.reactions,
            vec![("chan-1".to_owned(), "msg-1".to_owned(), "❌".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_platform_failure_reacts_failure() {
        let api = Arc::new(FakeApi {
            fail_on: Some("edit_role"),
            ..Default::default()
        });
        let handler = handler(Arc::clone(&api));

        handler.handle("srv", &message("chan-1", "user-1", false, "red")).await;

        let state = api.state.lock().unwrap();
        assert_eq!(
            state.reactions,
            vec![("chan-1".to_owned(), "msg-1".to_owned(), "❌".to_owned())]
        );
    }
}
