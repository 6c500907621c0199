/// Errors surfaced by the storage layer.
///
/// Absent records are not errors here: lookups return `Ok(None)` and
/// deletes return `Ok(false)` so callers can decide how to present them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Version conflict: expected version {expected}, found {actual}")]
    VersionConflict { expected: i32, actual: i32 },
}
