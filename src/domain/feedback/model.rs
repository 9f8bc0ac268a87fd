use chrono::{DateTime, Utc};

use crate::shared::{DomainError, DomainResult};

/// A rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rating(i32);

impl Rating {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;

    pub fn new(value: i32) -> DomainResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::Validation(format!(
                "Rating must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )))
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub id: i32,
    pub user_id: i32,
    pub question_id: i32,
    pub rating: Rating,
    pub notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub user_id: i32,
    pub question_id: i32,
    pub rating: Rating,
    pub notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

/// Overwrite applied to an existing record on resubmission.
#[derive(Debug, Clone)]
pub struct FeedbackRevision {
    pub rating: Rating,
    pub notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds() {
        assert_eq!(Rating::new(1).unwrap().value(), 1);
        assert_eq!(Rating::new(5).unwrap().value(), 5);
        assert!(Rating::new(0).is_err());
        assert!(Rating::new(6).is_err());
    }
}
