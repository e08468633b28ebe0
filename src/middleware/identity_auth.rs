use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;
use crate::context::RequestContext;
use crate::error::ApiError;
use crate::jwt::verify_access_token;
use crate::util::extract_bearer_token;

/// Create the request's [`RequestContext`] and, when a bearer token is
/// present, establish the caller's identity from it.
///
/// Requests without a token continue anonymously. The context's
/// cancellation token fires when the request future is dropped, so
/// lookups started on behalf of an aborted request stop with it.
pub async fn identity_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx = Arc::new(RequestContext::with_timeout(state.config.request_timeout));

    if let Some(token) = extract_bearer_token(request.headers()) {
        let access = verify_access_token(&state.token_key, token).map_err(|e| {
            tracing::debug!(error = %e, "rejecting access token");
            ApiError::invalid_token()
        })?;
        // Fresh context, so the slot is always empty here.
        if let Err(e) = ctx.store_identity(access.user_id, access.org_role, access.restricted_mode) {
            tracing::error!(error = %e, "identity stored twice");
        }
    }

    let _cancel_on_drop = ctx.cancellation().clone().drop_guard();
    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}
