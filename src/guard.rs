//! Authorization decisions for protected operations.

use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::{AuthzError, PermissionDenied, Result};
use crate::models::RoleCode;
use crate::resolver::{RoleResolver, StoreError};

/// Permit the call only for organization admins or admins of `team_id`.
///
/// Failures are kept distinct: a missing identity is an internal error,
/// a store failure is returned as-is, and only a clean "not an admin"
/// outcome becomes a [`PermissionDenied`] with code `2-400`.
pub async fn require_team_admin<R>(ctx: &RequestContext, resolver: &R, team_id: Uuid) -> Result<()>
where
    R: RoleResolver + ?Sized,
{
    let Some((user_id, global_role)) = ctx.identity() else {
        tracing::error!(%team_id, "team admin check reached without an identity");
        return Err(AuthzError::Internal("user id is not set"));
    };

    let team_role = ctx.bounded(resolver.team_role(ctx, user_id, team_id)).await?;

    let is_global_admin = global_role.is_admin();
    let is_team_admin = matches!(&team_role, Ok(row) if row.role().is_admin());
    if is_global_admin || is_team_admin {
        return Ok(());
    }

    match team_role {
        Err(StoreError::NotFound) | Ok(_) => {
            tracing::info!(%user_id, %team_id, "team admin role required, denying");
            Err(PermissionDenied::team_admin_required().into())
        }
        Err(err) => {
            tracing::warn!(%user_id, %team_id, error = %err, "team role lookup failed");
            Err(err.into())
        }
    }
}

/// The caller's role in `project_id`, or `None` when they have no
/// project-specific grant.
pub async fn caller_project_role<R>(
    ctx: &RequestContext,
    resolver: &R,
    project_id: Uuid,
) -> Result<Option<RoleCode>>
where
    R: RoleResolver + ?Sized,
{
    let Some(user_id) = ctx.user_id() else {
        tracing::error!(%project_id, "project role lookup reached without an identity");
        return Err(AuthzError::Internal("user id is not set"));
    };

    match ctx.bounded(resolver.project_role(ctx, user_id, project_id)).await? {
        Ok(row) => Ok(Some(row.role())),
        Err(StoreError::NotFound) => Ok(None),
        Err(err) => Err(err.into()),
    }
}
