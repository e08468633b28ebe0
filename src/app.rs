use std::sync::Arc;

use axum::{Router, middleware};
use jwt_simple::prelude::HS256Key;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::handlers;
use crate::middleware::identity_auth;
use crate::resolver::RoleResolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<dyn RoleResolver>,
    pub token_key: Arc<HS256Key>,
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    pub fn new(config: GatewayConfig, resolver: Arc<dyn RoleResolver>, token_key: HS256Key) -> Self {
        Self {
            resolver,
            token_key: Arc::new(token_key),
            config: Arc::new(config),
        }
    }
}

/// Build the gateway. Every route runs behind [`identity_auth`], so
/// handlers always find a `RequestContext` in the request extensions.
pub fn app(state: AppState) -> Router {
    handlers::router(&state)
        .layer(middleware::from_fn_with_state(state.clone(), identity_auth))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
