//! Read-only access to the role store.
//!
//! The store itself is owned elsewhere; this crate only issues the two
//! lookups the guard needs. "No assignment" is reported as
//! [`StoreError::NotFound`] and must be kept apart from every other failure.

mod sqlite;

pub use sqlite::*;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::context::RequestContext;
use crate::models::RoleRow;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("role assignment not found")]
    NotFound,

    #[error("role store unavailable: {0}")]
    Unavailable(String),

    #[error("role store connection error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("role store query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("role store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}

/// Lookups over the persistent role store.
///
/// Implementations must be safe to call concurrently from many requests.
/// The returned future may be dropped at any point when the request is
/// cancelled or times out; implementations should stop any work they
/// started when that happens.
#[async_trait]
pub trait RoleResolver: Send + Sync {
    async fn project_role(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<RoleRow, StoreError>;

    async fn team_role(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
        team_id: Uuid,
    ) -> Result<RoleRow, StoreError>;
}
