use crate::types::DbId;

/// Domain-level error type shared across the workspace.
///
/// Variants deliberately mirror the failure classes the HTTP layer
/// distinguishes; the API crate's `error` module owns the mapping to
/// status codes and client-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A lookup by id came up empty. `entity` is the human-readable
    /// kind, e.g. `"Document"`.
    #[error("{entity} with id {id} does not exist")]
    NotFound { entity: &'static str, id: DbId },

    /// Input rejected before touching storage.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The request contradicts current state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing or unusable credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Valid credentials, insufficient rights.
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("internal error: {0}")]
    Internal(String),
}
