use dochive_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::document::Document;
use super::user::UserResponse;

/// Append-only audit record of a document mutation.
///
/// `document_id` is `None` for deletion records: the document they
/// describe no longer exists, so they carry no reference to it.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Activity {
    pub id: DbId,
    pub user_id: DbId,
    pub document_id: Option<DbId>,
    pub activity_type: String,
    pub description: String,
    pub created_at: Timestamp,
}

/// An activity joined with its acting user and, where one still exists,
/// its document.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityWithContext {
    #[serde(flatten)]
    pub activity: Activity,
    pub user: UserResponse,
    pub document: Option<Document>,
}
