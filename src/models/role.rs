use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Privilege level of a caller, either organization-wide or scoped to a
/// team or project.
///
/// Variants are declared from least to most privileged so the derived
/// `Ord` matches `Admin > Member > Observer`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoleCode {
    Observer,
    Member,
    Admin,
}

impl RoleCode {
    /// Parse a role code as stored in the role store.
    ///
    /// Anything other than the canonical `admin` / `member` tokens maps to
    /// `Observer`. Use `str::parse` instead when unknown input should be
    /// rejected.
    pub fn parse(s: &str) -> Self {
        if s == Self::Admin.as_ref() {
            Self::Admin
        } else if s == Self::Member.as_ref() {
            Self::Member
        } else {
            if s != Self::Observer.as_ref() {
                tracing::warn!(role_code = %s, "unrecognized role code, treating as observer");
            }
            Self::Observer
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, RoleCode::Admin)
    }
}
