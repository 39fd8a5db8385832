//! The narrow platform interface the bot depends on.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Role, RoleEdit};

/// The five platform operations the bot performs.
///
/// Kept deliberately narrow so the role reconciliation and message handling
/// can be exercised against an in-memory fake without a live server.
#[async_trait]
pub trait ChatApi: Send + Sync {
    /// List every role in a server.
    async fn list_roles(&self, server_id: &str) -> Result<Vec<Role>>;

    /// Create a role with platform defaults and return it.
    async fn create_role(&self, server_id: &str) -> Result<Role>;

    /// Overwrite a role's name, color, and flags.
    async fn edit_role(&self, server_id: &str, role_id: &str, edit: &RoleEdit) -> Result<Role>;

    /// Grant a member a role. Granting an already-held role is a no-op.
    async fn add_member_role(&self, server_id: &str, user_id: &str, role_id: &str) -> Result<()>;

    /// Attach a reaction emoji to a message.
    async fn add_reaction(&self, channel_id: &str, message_id: &str, emoji: &str) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory [`ChatApi`] backing the reconciler and handler tests.

    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::{BotError, Result};
    use crate::types::{Role, RoleEdit};

    use super::ChatApi;

    #[derive(Default)]
    pub struct FakeState {
        pub next_id: u64,
        pub roles: Vec<Role>,
        /// (user_id, role_id) pairs.
        pub memberships: HashSet<(String, String)>,
        /// (channel_id, message_id, emoji) triples, in call order.
        pub reactions: Vec<(String, String, String)>,
    }

    /// An in-memory platform. Setting `fail_on` to an operation name makes
    /// that operation return a permission error, for exercising propagation.
    #[derive(Default)]
    pub struct FakeApi {
        pub state: Mutex<FakeState>,
        pub fail_on: Option<&'static str>,
    }

    impl FakeApi {
        pub fn with_role(role: Role) -> Self {
            let api = Self::default();
            api.state.lock().unwrap().roles.push(role);
            api
        }

        fn fail_if(&self, op: &'static str) -> Result<()> {
            if self.fail_on == Some(op) {
                return Err(BotError::Api {
                    status: 403,
                    message: format!("{op} denied"),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ChatApi for FakeApi {
        async fn list_roles(&self, _server_id: &str) -> Result<Vec<Role>> {
            self.fail_if("list_roles")?;
            let roles = self.state.lock().unwrap().roles.clone();
            // Yield so two concurrent upserts can interleave between their
            // list and create steps, the way real network calls do.
            tokio::task::yield_now().await;
            Ok(roles)
        }

        async fn create_role(&self, _server_id: &str) -> Result<Role> {
            self.fail_if("create_role")?;
            tokio::task::yield_now().await;
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let role = Role {
                id: format!("role-{}", state.next_id),
                name: "new role".to_owned(),
                color: 0,
                hoist: false,
                permissions: 0,
                mentionable: false,
            };
            state.roles.push(role.clone());
            Ok(role)
        }

        async fn edit_role(
            &self,
            _server_id: &str,
            role_id: &str,
            edit: &RoleEdit,
        ) -> Result<Role> {
            self.fail_if("edit_role")?;
            let mut state = self.state.lock().unwrap();
            let role = state
                .roles
                .iter_mut()
                .find(|role| role.id == role_id)
                .ok_or_else(|| BotError::Api {
                    status: 404,
                    message: "role not found".to_owned(),
                })?;
            role.name = edit.name.clone();
            role.color = edit.color;
            role.hoist = edit.hoist;
            role.permissions = edit.permissions;
            role.mentionable = edit.mentionable;
            Ok(role.clone())
        }

        async fn add_member_role(
            &self,
            _server_id: &str,
            user_id: &str,
            role_id: &str,
        ) -> Result<()> {
            self.fail_if("add_member_role")?;
            self.state
                .lock()
                .unwrap()
                .memberships
                .insert((user_id.to_owned(), role_id.to_owned()));
            Ok(())
        }

        async fn add_reaction(
            &self,
            channel_id: &str,
            message_id: &str,
            emoji: &str,
        ) -> Result<()> {
            self.fail_if("add_reaction")?;
            self.state.lock().unwrap().reactions.push((
                channel_id.to_owned(),
                message_id.to_owned(),
                emoji.to_owned(),
            ));
            Ok(())
        }
    }
}
