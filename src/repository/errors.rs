use thiserror::Error;

use crate::domain::types::TypeConstraintError;

/// Failures raised by category repositories.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// No record with the requested identifier exists.
    #[error("record not found")]
    NotFound,
    /// A writer panicked while holding the collection lock.
    #[error("category collection lock poisoned")]
    Poisoned,
    /// A value derived by the store, such as the next `sort_order`, violates
    /// its domain constraint.
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

/// Convenient alias for results returned from repository functions.
pub type RepositoryResult<T> = Result<T, RepositoryError>;
