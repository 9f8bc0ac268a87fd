//! Role kinds and the authority set derived from them.
//!
//! Roles are a closed enumeration: every authorization branch matches on
//! [`RoleKind`] exhaustively, so adding a role is a compile-time change.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::shared::DomainError;

/// One of the four fixed roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleKind {
    Student,
    Staff,
    AcademicDirector,
    ExecutiveDirector,
}

impl RoleKind {
    pub const ALL: [RoleKind; 4] = [
        RoleKind::Student,
        RoleKind::Staff,
        RoleKind::AcademicDirector,
        RoleKind::ExecutiveDirector,
    ];

    /// Stable row id in the `roles` table.
    pub fn id(self) -> i32 {
        match self {
            Self::Student => 1,
            Self::Staff => 2,
            Self::AcademicDirector => 3,
            Self::ExecutiveDirector => 4,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.id() == id)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Staff => "staff",
            Self::AcademicDirector => "academic_director",
            Self::ExecutiveDirector => "executive_director",
        }
    }

    /// Rendered authority tag, e.g. `ROLE_ACADEMIC_DIRECTOR`.
    pub fn authority(self) -> &'static str {
        match self {
            Self::Student => "ROLE_STUDENT",
            Self::Staff => "ROLE_STAFF",
            Self::AcademicDirector => "ROLE_ACADEMIC_DIRECTOR",
            Self::ExecutiveDirector => "ROLE_EXECUTIVE_DIRECTOR",
        }
    }

    pub fn is_director(self) -> bool {
        match self {
            Self::AcademicDirector | Self::ExecutiveDirector => true,
            Self::Student | Self::Staff => false,
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| DomainError::Validation(format!("Role {} does not exist", s)))
    }
}

/// The set of roles a caller holds for this request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthoritySet(BTreeSet<RoleKind>);

impl AuthoritySet {
    /// `{primary} ∪ assigned`.
    pub fn from_roles(
        primary: Option<RoleKind>,
        assigned: impl IntoIterator<Item = RoleKind>,
    ) -> Self {
        let mut set: BTreeSet<RoleKind> = primary.into_iter().collect();
        set.extend(assigned);
        Self(set)
    }

    pub fn contains(&self, role: RoleKind) -> bool {
        self.0.contains(&role)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_executive(&self) -> bool {
        self.contains(RoleKind::ExecutiveDirector)
    }

    pub fn is_director(&self) -> bool {
        self.0.iter().any(|r| r.is_director())
    }

    pub fn iter(&self) -> impl Iterator<Item = RoleKind> + '_ {
        self.0.iter().copied()
    }

    /// Authority strings in a stable order.
    pub fn rendered(&self) -> Vec<String> {
        self.0.iter().map(|r| r.authority().to_string()).collect()
    }
}

impl FromIterator<RoleKind> for AuthoritySet {
    fn from_iter<I: IntoIterator<Item = RoleKind>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_the_table() {
        for role in RoleKind::ALL {
            assert_eq!(RoleKind::from_id(role.id()), Some(role));
        }
        assert_eq!(RoleKind::from_id(0), None);
    }

    #[test]
    fn parse_is_case_insensitive_and_rejects_unknown() {
        assert_eq!(
            "Academic_Director".parse::<RoleKind>().unwrap(),
            RoleKind::AcademicDirector
        );
        assert!(matches!(
            "admin".parse::<RoleKind>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn authority_set_unions_primary_and_assigned() {
        let set = AuthoritySet::from_roles(
            Some(RoleKind::Staff),
            [RoleKind::Student, RoleKind::Staff],
        );
        assert_eq!(set.rendered(), vec!["ROLE_STUDENT", "ROLE_STAFF"]);
        assert!(!set.is_director());
    }

    #[test]
    fn authority_set_without_primary_uses_assignments() {
        let set = AuthoritySet::from_roles(None, [RoleKind::ExecutiveDirector]);
        assert!(set.is_executive());
        assert!(set.is_director());
        assert!(AuthoritySet::from_roles(None, []).is_empty());
    }
}
