//! Typed caller identity carried through one request.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use thiserror::Error;
use uuid::Uuid;

use crate::models::RoleCode;

/// Overlay that further limits what a caller may do regardless of role.
///
/// Only exposed here; enforcement belongs to the operations that care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RestrictedMode {
    Unrestricted,
    /// Caller holds an install-time token and may only complete setup.
    Install,
}

impl RestrictedMode {
    pub fn is_restricted(&self) -> bool {
        !matches!(self, RestrictedMode::Unrestricted)
    }
}

/// The authenticated caller, as established once at request entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub global_role: Option<RoleCode>,
    pub restricted_mode: Option<RestrictedMode>,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("identity already set for this request (user {existing})")]
pub struct IdentityAlreadySet {
    pub existing: Uuid,
}
