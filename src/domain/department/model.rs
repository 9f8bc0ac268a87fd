use chrono::{DateTime, Utc};

use crate::domain::lifecycle::LifecycleState;
use crate::domain::role::RoleKind;

#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub status: LifecycleState,
    /// Historical link to a role; never consulted for authorization.
    pub associated_role: Option<RoleKind>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Department {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

#[derive(Debug, Clone)]
pub struct NewDepartment {
    pub name: String,
    pub description: Option<String>,
    pub status: LifecycleState,
    pub associated_role: Option<RoleKind>,
}

#[derive(Debug, Clone, Default)]
pub struct DepartmentChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<LifecycleState>,
}
