//! Error taxonomy for graph operations

use thiserror::Error;

/// Result alias used across the graph layer
pub type Result<T> = std::result::Result<T, GraphError>;

/// Failures raised while validating, building or executing graph queries.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Invalid label '{0}': only ASCII letters, digits and underscores are allowed")]
    InvalidLabel(String),

    #[error(
        "Invalid relationship type '{0}': only ASCII letters, digits and underscores are allowed"
    )]
    InvalidRelationshipType(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Graph store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("{operation} failed: {message}")]
    Store { operation: String, message: String },

    /// The CREATE matched no endpoint pair, so nothing was written
    #[error("Failed to create relationship: no node matched {from} and {to}")]
    RelationshipNotCreated { from: String, to: String },
}

impl GraphError {
    pub fn store(operation: &str, err: impl std::fmt::Display) -> Self {
        GraphError::Store {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }

    /// True for errors the caller caused (bad identifiers), as opposed to store failures
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            GraphError::InvalidLabel(_) | GraphError::InvalidRelationshipType(_)
        )
    }
}
