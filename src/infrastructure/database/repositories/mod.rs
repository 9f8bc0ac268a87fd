//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod department_repository;
pub mod feedback_repository;
pub mod question_repository;
pub mod repository_provider;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;

use sea_orm::{DbErr, SqlErr};

use crate::domain::DomainError;

/// Constraint violations become `Conflict`; everything else is internal.
///
/// A foreign-key violation reads as "still referenced", which is what deletes
/// hit. Inserts that can point at a vanished parent check
/// [`is_missing_reference`] first.
pub(crate) fn db_err(e: DbErr) -> DomainError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => {
            DomainError::Conflict(format!("Unique constraint violated: {}", msg))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
            DomainError::Conflict(format!("Record is still referenced: {}", msg))
        }
        _ => DomainError::Internal(format!("Database error: {}", e)),
    }
}

pub(crate) fn is_missing_reference(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
