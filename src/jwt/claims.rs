use jwt_simple::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::identity::RestrictedMode;
use crate::models::RoleCode;

/// Custom claims carried by an access token. Tokens are minted by the
/// auth service; this crate only verifies them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_role: Option<String>,
    #[serde(default, rename = "restricted", skip_serializing_if = "Option::is_none")]
    pub restricted_mode: Option<RestrictedMode>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("invalid access token: {0}")]
    Invalid(String),
    #[error("access token user id is not a uuid: {0}")]
    InvalidUserId(String),
}

/// Identity fields recovered from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccess {
    pub user_id: Uuid,
    pub org_role: Option<RoleCode>,
    pub restricted_mode: Option<RestrictedMode>,
}

/// Verify an HS256 access token and extract the caller's identity.
///
/// An `orgRole` claim that is present but unrecognized maps to
/// `Observer`; a missing claim stays absent.
pub fn verify_access_token(key: &HS256Key, token: &str) -> Result<VerifiedAccess, TokenError> {
    let claims = key
        .verify_token::<AccessClaims>(token, None)
        .map_err(|e| TokenError::Invalid(e.to_string()))?;
    let custom = claims.custom;

    let user_id = Uuid::parse_str(&custom.user_id)
        .map_err(|_| TokenError::InvalidUserId(custom.user_id.clone()))?;

    Ok(VerifiedAccess {
        user_id,
        org_role: custom.org_role.as_deref().map(RoleCode::parse),
        restricted_mode: custom.restricted_mode,
    })
}
