//! Request-scoped execution context.
//!
//! A [`RequestContext`] is created by the gateway for every inbound request
//! and dropped when the request completes. It carries the caller's identity
//! (set at most once, before any guard runs) together with the request's
//! cancellation token and deadline, which every role-store lookup honors.

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::identity::{Identity, IdentityAlreadySet, RestrictedMode};
use crate::models::RoleCode;

/// Why a bounded operation stopped before producing a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("request cancelled")]
    Cancelled,
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

#[derive(Debug, Default)]
pub struct RequestContext {
    identity: OnceLock<Identity>,
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            ..Self::default()
        }
    }

    /// Tie this context to an outer cancellation signal.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Attach the caller's identity. Only the first call takes effect.
    pub fn store_identity(
        &self,
        user_id: Uuid,
        global_role: Option<RoleCode>,
        restricted_mode: Option<RestrictedMode>,
    ) -> Result<(), IdentityAlreadySet> {
        self.identity
            .set(Identity {
                user_id,
                global_role,
                restricted_mode,
            })
            .map_err(|_| IdentityAlreadySet {
                existing: self.identity.get().map(|i| i.user_id).unwrap_or_default(),
            })
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.identity.get().map(|i| i.user_id)
    }

    /// User id and global role, or `None` unless both were stored.
    pub fn identity(&self) -> Option<(Uuid, RoleCode)> {
        let identity = self.identity.get()?;
        Some((identity.user_id, identity.global_role?))
    }

    pub fn restricted_mode(&self) -> Option<RestrictedMode> {
        self.identity.get()?.restricted_mode
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Time left before the deadline. `None` means unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Run `fut` until it completes, the request is cancelled, or the
    /// deadline passes. On interruption `fut` is dropped.
    pub async fn bounded<F: Future>(&self, fut: F) -> Result<F::Output, Interrupted> {
        if self.cancellation.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(Interrupted::Cancelled),
            _ = deadline => Err(Interrupted::DeadlineExceeded),
            out = fut => Ok(out),
        }
    }
}
