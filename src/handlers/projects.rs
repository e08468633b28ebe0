use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde::Serialize;
use uuid::Uuid;

use super::require_authenticated;
use crate::app::AppState;
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::guard::caller_project_role;
use crate::models::RoleCode;

#[derive(Debug, Serialize)]
pub struct ProjectRoleResponse {
    pub project_id: Uuid,
    /// None when the caller has no project-specific grant
    pub role: Option<RoleCode>,
}

pub async fn get_project_role(
    State(state): State<AppState>,
    Extension(ctx): Extension<Arc<RequestContext>>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectRoleResponse>, ApiError> {
    require_authenticated(&ctx)?;
    let role = caller_project_role(&ctx, state.resolver.as_ref(), project_id).await?;
    Ok(Json(ProjectRoleResponse { project_id, role }))
}
