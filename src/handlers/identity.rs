use std::sync::Arc;

use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::identity::RestrictedMode;
use crate::models::RoleCode;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub authenticated: bool,
    pub user_id: Option<Uuid>,
    pub org_role: Option<RoleCode>,
    pub restricted_mode: Option<RestrictedMode>,
    /// True when the restricted-mode overlay limits this caller
    pub restricted: bool,
}

pub async fn me(Extension(ctx): Extension<Arc<RequestContext>>) -> Json<MeResponse> {
    let org_role = ctx.identity().map(|(_, role)| role);
    let restricted_mode = ctx.restricted_mode();
    Json(MeResponse {
        authenticated: ctx.user_id().is_some(),
        user_id: ctx.user_id(),
        org_role,
        restricted_mode,
        restricted: restricted_mode.is_some_and(|mode| mode.is_restricted()),
    })
}
