mod dev;
mod identity;
mod projects;
mod teams;

pub use dev::*;
pub use identity::*;
pub use projects::*;
pub use teams::*;

use axum::{
    Router,
    routing::{get, post},
};

use crate::app::AppState;
use crate::context::RequestContext;
use crate::error::ApiError;

pub fn router(state: &AppState) -> Router<AppState> {
    let routes = Router::new()
        .route("/me", get(me))
        .route("/projects/{project_id}/role", get(get_project_role))
        .route("/teams/{team_id}/admin-check", post(check_team_admin))
        .route("/teams/admin-check", post(check_team_admin_batch));

    // Introspection and the playground only exist outside production.
    if state.config.introspection_enabled() {
        routes
            .route("/introspection", get(introspection))
            .route("/playground", get(playground))
    } else {
        routes
    }
}

fn require_authenticated(ctx: &RequestContext) -> Result<(), ApiError> {
    ctx.user_id().map(|_| ()).ok_or_else(ApiError::unauthenticated)
}
