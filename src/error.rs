use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::context::Interrupted;
use crate::resolver::StoreError;

/// Machine-readable code carried by a team-admin denial. Client
/// integrations match on this value, so it must never change.
pub const TEAM_ADMIN_REQUIRED: &str = "2-400";

const TEAM_ADMIN_REQUIRED_MESSAGE: &str = "organization or team admin role required";

/// Coarse classification of an [`AuthzError`], for callers that route
/// failures without inspecting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Misconfigured call site, e.g. a guard reached without an identity.
    Internal,
    StoreFailure,
    PermissionDenied,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorExtensions {
    pub code: String,
}

/// Client-safe denial. Serializes to the GraphQL error shape
/// `{"message": ..., "extensions": {"code": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct PermissionDenied {
    pub message: String,
    pub extensions: ErrorExtensions,
}

impl PermissionDenied {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            extensions: ErrorExtensions { code: code.into() },
        }
    }

    pub fn team_admin_required() -> Self {
        Self::new(TEAM_ADMIN_REQUIRED_MESSAGE, TEAM_ADMIN_REQUIRED)
    }

    pub fn code(&self) -> &str {
        &self.extensions.code
    }
}

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("internal: {0}")]
    Internal(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Denied(#[from] PermissionDenied),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

impl AuthzError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthzError::Internal(_) => ErrorKind::Internal,
            AuthzError::Store(_) => ErrorKind::StoreFailure,
            AuthzError::Denied(_) => ErrorKind::PermissionDenied,
            AuthzError::Interrupted(_) => ErrorKind::Cancelled,
        }
    }
}

pub type Result<T> = std::result::Result<T, AuthzError>;

/// Non-standard status used when the client went away mid-request.
const CLIENT_CLOSED_REQUEST: u16 = 499;

#[derive(Debug, Serialize)]
struct ErrorEntry {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    errors: Vec<ErrorEntry>,
}

/// Error returned to HTTP clients.
///
/// Permission denials are relayed verbatim; every other failure is
/// logged here and reported with a generic message.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    entry: ErrorEntry,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            entry: ErrorEntry {
                message: message.into(),
                extensions: None,
            },
        }
    }

    pub fn unauthenticated() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "authentication required")
    }

    pub fn invalid_token() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "invalid access token")
    }

    pub fn too_complex(requested: usize, limit: usize) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("operation has complexity {requested}, which exceeds the limit of {limit}"),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<AuthzError> for ApiError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::Denied(denied) => Self {
                status: StatusCode::FORBIDDEN,
                entry: ErrorEntry {
                    message: denied.message,
                    extensions: Some(denied.extensions),
                },
            },
            AuthzError::Internal(reason) => {
                tracing::error!(reason, "authorization reached an invalid state");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
            AuthzError::Store(store) => {
                tracing::error!(error = %store, "role store failure");
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "role store unavailable")
            }
            AuthzError::Interrupted(Interrupted::DeadlineExceeded) => {
                tracing::warn!("authorization timed out");
                Self::new(StatusCode::GATEWAY_TIMEOUT, "request timed out")
            }
            AuthzError::Interrupted(Interrupted::Cancelled) => Self::new(
                StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST),
                "request cancelled",
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            errors: vec![self.entry],
        };
        (self.status, Json(body)).into_response()
    }
}
