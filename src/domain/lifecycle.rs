//! Lifecycle shared by questions and departments.

use std::fmt;

use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Prepared but not yet offered to users.
    Draft,
    Active,
    /// Withdrawn; kept for history and statistics.
    Retired,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Retired => "retired",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "retired" => Ok(Self::Retired),
            other => Err(DomainError::Validation(format!(
                "Unknown status '{}'; expected draft, active or retired",
                other
            ))),
        }
    }

    pub fn is_active(&self) -> bool {
        *self == Self::Active
    }

    /// Target state for the legacy `active` boolean.
    pub fn from_active_flag(active: bool) -> Self {
        if active {
            Self::Active
        } else {
            Self::Retired
        }
    }

    pub fn activate(self) -> DomainResult<Self> {
        self.transition_to(Self::Active)
    }

    pub fn retire(self) -> DomainResult<Self> {
        self.transition_to(Self::Retired)
    }

    /// Staying put is always allowed; nothing returns to `Draft`.
    pub fn transition_to(self, target: Self) -> DomainResult<Self> {
        use LifecycleState::*;

        match (self, target) {
            (Draft, Draft | Active | Retired)
            | (Active, Active | Retired)
            | (Retired, Active | Retired) => Ok(target),
            (Active, Draft) | (Retired, Draft) => Err(DomainError::Validation(format!(
                "Cannot move from {} back to draft",
                self
            ))),
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
