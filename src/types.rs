//! Domain types matching the platform's wire models (snake_case field names).

use serde::{Deserialize, Serialize};

// ── Roles ────────────────────────────────────────────────────────────────────

/// A role within a server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    /// Display color, packed as `0xRRGGBB`.
    #[serde(default)]
    pub color: u32,
    /// Whether the role is shown separately in the member list.
    #[serde(default)]
    pub hoist: bool,
    /// Permission bitfield.
    #[serde(default)]
    pub permissions: i64,
    /// Whether the role can be @mentioned.
    #[serde(default)]
    pub mentionable: bool,
}

/// Fields sent when editing a role.
///
/// The platform treats an edit as a full overwrite of these fields, so every
/// edit echoes back the values that should not change.
#[derive(Debug, Clone, Serialize)]
pub struct RoleEdit {
    pub name: String,
    pub color: u32,
    pub hoist: bool,
    pub permissions: i64,
    pub mentionable: bool,
}

impl RoleEdit {
    /// An edit that changes nothing relative to `role`.
    pub fn from_role(role: &Role) -> Self {
        Self {
            name: role.name.clone(),
            color: role.color,
            hoist: role.hoist,
            permissions: role.permissions,
            mentionable: role.mentionable,
        }
    }
}

// ── Users and messages ───────────────────────────────────────────────────────

/// A platform user as embedded in message payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Whether the account is an automated bot account.
    #[serde(default)]
    pub bot: bool,
}

/// An inbound chat message from a MESSAGE_CREATE dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub content: String,
    pub author: User,
}
