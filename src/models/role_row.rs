use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RoleCode;

/// A single role assignment read from the role store.
///
/// `scope_id` is the team or project the assignment applies to. The raw
/// `role_code` is kept as stored so data-quality problems stay visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRow {
    pub user_id: Uuid,
    pub scope_id: Uuid,
    pub role_code: String,
}

impl RoleRow {
    pub fn role(&self) -> RoleCode {
        RoleCode::parse(&self.role_code)
    }
}
