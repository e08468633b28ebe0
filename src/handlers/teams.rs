use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require_authenticated;
use crate::app::AppState;
use crate::context::RequestContext;
use crate::error::{ApiError, AuthzError, PermissionDenied};
use crate::guard::require_team_admin;

/// Gate a team mutation: 204 when the caller is an organization or team
/// admin, otherwise the guard's error.
pub async fn check_team_admin(
    State(state): State<AppState>,
    Extension(ctx): Extension<Arc<RequestContext>>,
    Path(team_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_authenticated(&ctx)?;
    require_team_admin(&ctx, state.resolver.as_ref(), team_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct TeamAdminBatch {
    pub team_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct TeamAdminDecision {
    pub team_id: Uuid,
    pub permitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<PermissionDenied>,
}

#[derive(Debug, Serialize)]
pub struct TeamAdminBatchResponse {
    pub results: Vec<TeamAdminDecision>,
}

/// Check several teams in one operation. Denials are reported per team;
/// any other failure aborts the whole batch.
pub async fn check_team_admin_batch(
    State(state): State<AppState>,
    Extension(ctx): Extension<Arc<RequestContext>>,
    Json(input): Json<TeamAdminBatch>,
) -> Result<Json<TeamAdminBatchResponse>, ApiError> {
    require_authenticated(&ctx)?;

    if let Some(limit) = state.config.complexity_limit() {
        if input.team_ids.len() > limit {
            return Err(ApiError::too_complex(input.team_ids.len(), limit));
        }
    }

    let mut results = Vec::with_capacity(input.team_ids.len());
    for team_id in input.team_ids {
        let decision = match require_team_admin(&ctx, state.resolver.as_ref(), team_id).await {
            Ok(()) => TeamAdminDecision {
                team_id,
                permitted: true,
                error: None,
            },
            Err(AuthzError::Denied(denied)) => TeamAdminDecision {
                team_id,
                permitted: false,
                error: Some(denied),
            },
            Err(e) => return Err(e.into()),
        };
        results.push(decision);
    }

    Ok(Json(TeamAdminBatchResponse { results }))
}
