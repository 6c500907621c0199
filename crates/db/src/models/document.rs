use dochive_core::types::{DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

use super::user::UserResponse;
use super::version::DocumentVersion;

/// Current state of a knowledge document. `version` starts at 1 and
/// increments by exactly 1 on every successful update.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Document {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub author_id: DbId,
    pub version: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields for creating a document. Validation happens in the API layer
/// before this reaches the store.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
    pub summary: Option<String>,
    pub tags: Vec<String>,
    pub author_id: DbId,
}

/// Partial update for a document. Omitted fields keep their previous
/// value; `summary` distinguishes "leave alone" (absent) from "clear"
/// (explicit null) via the double `Option`.
///
/// `expected_version` is an optional precondition: when present, the
/// update fails with a version conflict unless it matches the document's
/// current version at the time the update is applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub summary: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub expected_version: Option<i32>,
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// A document joined with its resolved author, as returned by listings
/// and search.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentWithAuthor {
    #[serde(flatten)]
    pub document: Document,
    pub author: UserResponse,
}

/// A single document with its author and full version history,
/// newest version first.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentWithDetails {
    #[serde(flatten)]
    pub document: Document,
    pub author: UserResponse,
    pub versions: Vec<DocumentVersion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_distinguishes_absent_summary_from_null() {
        let absent: DocumentPatch = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert!(absent.summary.is_none());

        let cleared: DocumentPatch = serde_json::from_str(r#"{"summary": null}"#).unwrap();
        assert_eq!(cleared.summary, Some(None));

        let set: DocumentPatch = serde_json::from_str(r#"{"summary": "short"}"#).unwrap();
        assert_eq!(set.summary, Some(Some("short".to_string())));
    }

    #[test]
    fn patch_defaults_to_all_absent() {
        let patch: DocumentPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.title.is_none());
        assert!(patch.content.is_none());
        assert!(patch.summary.is_none());
        assert!(patch.tags.is_none());
        assert!(patch.expected_version.is_none());
    }
}
