//! Per-user role reconciliation.

use tracing::debug;

use crate::api::ChatApi;
use crate::color::Color;
use crate::error::Result;
use crate::types::RoleEdit;

/// Ensure `user_id` holds a role named after it, colored `color`.
///
/// The role is looked up by name in the server's role list and created with
/// platform defaults when absent; the create is followed by an edit that sets
/// only the name, echoing the created defaults back. The role is then
/// recolored — again echoing every other field unchanged — and granted to the
/// user. Any platform failure aborts the remaining steps and propagates to
/// the caller; there is no partial-success signal.
pub async fn assign_color_role<A>(
    api: &A,
    server_id: &str,
    user_id: &str,
    color: Color,
) -> Result<()>
where
    A: ChatApi + ?Sized,
{
    let roles = api.list_roles(server_id).await?;
    // Duplicate names should not happen; when they do, the last listed role
    // wins so repeated runs keep settling on the same one.
    let existing = roles.into_iter().filter(|role| role.name == user_id).last();

    let role = match existing {
        Some(role) => role,
        None => {
            let created = api.create_role(server_id).await?;
            debug!(role_id = %created.id, user_id, "created color role");
            let mut edit = RoleEdit::from_role(&created);
            edit.name = user_id.to_owned();
            api.edit_role(server_id, &created.id, &edit).await?
        }
    };

    let mut edit = RoleEdit::from_role(&role);
    edit.color = color.packed();
    api.edit_role(server_id, &role.id, &edit).await?;
    api.add_member_role(server_id, user_id, &role.id).await?;
    Ok(())
}
