use dochive_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Immutable snapshot of a document taken at each successful mutation.
/// `author_id` is the user whose write produced the snapshot.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct DocumentVersion {
    pub id: DbId,
    pub document_id: DbId,
    pub version: i32,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub author_id: DbId,
    pub change_description: String,
    pub created_at: Timestamp,
}
