use std::fmt;

use thiserror::Error;

/// Why an authorization check refused the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// The caller's authority set lacks the role the action needs.
    RoleMismatch,
    /// The caller's department or year differs from the target's.
    ScopeMismatch,
    /// The action is only open to the owner of the target record.
    SelfOnly,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RoleMismatch => "role_mismatch",
            Self::ScopeMismatch => "scope_mismatch",
            Self::SelfOnly => "self_only",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden ({reason}): {message}")]
    Forbidden { reason: DenyReason, message: String },

    /// Storage or crypto failure the caller cannot act on.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn forbidden(reason: DenyReason, message: impl Into<String>) -> Self {
        Self::Forbidden {
            reason,
            message: message.into(),
        }
    }

    /// Machine-readable discriminator surfaced in API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Validation(_) => "validation_error",
            Self::Conflict(_) => "conflict",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Forbidden { reason, .. } => reason.as_str(),
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn deny_reason(&self) -> Option<DenyReason> {
        match self {
            Self::Forbidden { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
