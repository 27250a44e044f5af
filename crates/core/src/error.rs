use crate::types::DbId;

/// Domain error taxonomy shared by every diagram use case.
///
/// The orchestrator only ever surfaces these variants; the transport layer
/// maps each one to a status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A well-formed, legal puzzle that has no completion.
    #[error("Unsolvable: {0}")]
    Unsolvable(String),

    /// The operation observed a cancellation signal before finishing.
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
