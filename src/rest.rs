//! REST calls for the five platform operations the bot performs.

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response};
use serde_json::{json, Value};

use crate::api::ChatApi;
use crate::error::{BotError, Result};
use crate::types::{Role, RoleEdit};

const DEFAULT_BASE: &str = "http://localhost:3000/api/v1";

/// HTTP client for the platform's REST API, narrowed to the calls the bot
/// makes.
///
/// ```rust,no_run
/// use huebot::rest::RestClient;
///
/// let rest = RestClient::new("mytoken", None);
/// ```
#[derive(Clone)]
pub struct RestClient {
    http: Client,
    base: String,
    auth: String,
}

impl RestClient {
    /// `token` is the bare bot token; the `Bot` auth scheme is added here.
    pub fn new(token: &str, base_url: Option<&str>) -> Self {
        Self {
            http: Client::new(),
            base: base_url.unwrap_or(DEFAULT_BASE).trim_end_matches('/').to_owned(),
            auth: format!("Bot {token}"),
        }
    }
}

/// Reject a non-2xx response as [`BotError::Api`], mining the platform's
/// `{"error": …}` body for the message.
async fn checked(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| Some(body.get("error")?.as_str()?.to_owned()))
        .unwrap_or_else(|| status.to_string());
    Err(BotError::Api { status: status.as_u16(), message })
}

#[async_trait]
impl ChatApi for RestClient {
    async fn list_roles(&self, server_id: &str) -> Result<Vec<Role>> {
        let resp = self
            .http
            .get(format!("{}/servers/{server_id}/roles", self.base))
            .header(AUTHORIZATION, &self.auth)
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    async fn create_role(&self, server_id: &str) -> Result<Role> {
        // Empty body: the platform fills in default name, color, and flags.
        let resp = self
            .http
            .post(format!("{}/servers/{server_id}/roles", self.base))
            .header(AUTHORIZATION, &self.auth)
            .json(&json!({}))
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    async fn edit_role(&self, server_id: &str, role_id: &str, edit: &RoleEdit) -> Result<Role> {
        let resp = self
            .http
            .patch(format!("{}/servers/{server_id}/roles/{role_id}", self.base))
            .header(AUTHORIZATION, &self.auth)
            .json(edit)
            .send()
            .await?;
        Ok(checked(resp).await?.json().await?)
    }

    async fn add_member_role(&self, server_id: &str, user_id: &str, role_id: &str) -> Result<()> {
        let resp = self
            .http
            .put(format!(
                "{}/servers/{server_id}/members/{user_id}/roles/{role_id}",
                self.base
            ))
            .header(AUTHORIZATION, &self.auth)
            .send()
            .await?;
        checked(resp).await?;
        Ok(())
    }

    async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<()> {
        let resp = self
            .http
            .put(format!(
                "{}/channels/{channel_id}/messages/{message_id}/reactions/{emoji}/@me",
                self.base
            ))
            .header(AUTHORIZATION, &self.auth)
            .send()
            .await?;
        checked(resp).await?;
        Ok(())
    }
}
