//! Error types for the candidate pool and schedule source collaborators.

use thiserror::Error;

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;

/// Errors returned by pool collaborators.
///
/// Empty result sets are not errors: `query` returns `Ok(vec![])` when
/// nothing matches. These variants cover genuine collaborator failures.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The backing provider rejected or failed a query.
    #[error("Pool query failed during {operation}: {details}")]
    Query { operation: String, details: String },

    /// The provider is unreachable or refusing connections.
    #[error("Pool unavailable: {details} (retryable: {retryable})")]
    Unavailable { details: String, retryable: bool },

    /// A referenced entity does not exist.
    #[error("{entity} not found: '{id}'")]
    NotFound { entity: String, id: String },
}

impl PoolError {
    /// Create a query error.
    pub fn query(operation: impl Into<String>, details: impl Into<String>) -> Self {
        PoolError::Query {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Create an unavailability error.
    pub fn unavailable(details: impl Into<String>, retryable: bool) -> Self {
        PoolError::Unavailable {
            details: details.into(),
            retryable,
        }
    }

    /// Create a not-found error.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        PoolError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Whether retrying the operation could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PoolError::Unavailable {
                retryable: true,
                ..
            }
        )
    }
}
