//! In-process storage backend.
//!
//! One `RwLock` guards the whole state. Each logical mutation holds the
//! write guard for its full duration, which gives the same atomicity the
//! PostgreSQL backend gets from transactions: the version counter and the
//! version log can never be observed disagreeing.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dochive_core::document::{
    activity_description, matches_literal, ACTIVITY_CREATED, ACTIVITY_DELETED, ACTIVITY_UPDATED,
    CHANGE_DOCUMENT_UPDATED, CHANGE_INITIAL_VERSION,
};
use dochive_core::types::DbId;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{
    Activity, ActivityWithContext, Document, DocumentPatch, DocumentVersion, DocumentWithAuthor,
    DocumentWithDetails, NewDocument, NewUser, User, UserResponse,
};
use crate::repositories::{ActivityRepository, DocumentRepository, UserRepository};

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<DbId, User>,
    documents: BTreeMap<DbId, Document>,
    versions: BTreeMap<DbId, DocumentVersion>,
    activities: BTreeMap<DbId, Activity>,
    next_user_id: DbId,
    next_document_id: DbId,
    next_version_id: DbId,
    next_activity_id: DbId,
}

impl MemoryState {
    fn push_version(&mut self, document: &Document, author_id: DbId, change_description: &str) {
        self.next_version_id += 1;
        let snapshot = DocumentVersion {
            id: self.next_version_id,
            document_id: document.id,
            version: document.version,
            title: document.title.clone(),
            content: document.content.clone(),
            summary: document.summary.clone(),
            tags: document.tags.clone(),
            author_id,
            change_description: change_description.to_string(),
            created_at: Utc::now(),
        };
        self.versions.insert(snapshot.id, snapshot);
    }

    fn push_activity(
        &mut self,
        user_id: DbId,
        document_id: Option<DbId>,
        activity_type: &str,
        title: &str,
    ) {
        self.next_activity_id += 1;
        let activity = Activity {
            id: self.next_activity_id,
            user_id,
            document_id,
            activity_type: activity_type.to_string(),
            description: activity_description(activity_type, title),
            created_at: Utc::now(),
        };
        self.activities.insert(activity.id, activity);
    }
}

/// Repositories over process memory. Cloning shares the underlying state.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::Conflict(
                "Email is already registered".to_string(),
            ));
        }
        state.next_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.next_user_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            display_name: new_user.display_name,
            role: new_user.role,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.state.read().await.users.len() as i64)
    }

    async fn update_display_name(
        &self,
        id: DbId,
        display_name: &str,
    ) -> Result<Option<User>, StoreError> {
        let mut state = self.state.write().await;
        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        user.display_name = display_name.to_string();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[async_trait]
impl DocumentRepository for MemoryStore {
    async fn create(&self, new_document: NewDocument) -> Result<Document, StoreError> {
        let mut state = self.state.write().await;
        state.next_document_id += 1;
        let now = Utc::now();
        // The author FK is only enforced by the relational backend.
        let document = Document {
            id: state.next_document_id,
            title: new_document.title,
            content: new_document.content,
            summary: new_document.summary,
            tags: new_document.tags,
            author_id: new_document.author_id,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        state.documents.insert(document.id, document.clone());
        state.push_version(&document, document.author_id, CHANGE_INITIAL_VERSION);
        state.push_activity(
            document.author_id,
            Some(document.id),
            ACTIVITY_CREATED,
            &document.title,
        );
        Ok(document)
    }

    async fn update(
        &self,
        id: DbId,
        patch: DocumentPatch,
        editor_id: DbId,
    ) -> Result<Option<Document>, StoreError> {
        let mut state = self.state.write().await;
        let Some(current) = state.documents.get(&id).cloned() else {
            return Ok(None);
        };

        if let Some(expected) = patch.expected_version {
            if expected != current.version {
                return Err(StoreError::VersionConflict {
                    expected,
                    actual: current.version,
                });
            }
        }

        let mut document = current;
        if let Some(title) = patch.title {
            document.title = title;
        }
        if let Some(content) = patch.content {
            document.content = content;
        }
        if let Some(summary) = patch.summary {
            document.summary = summary;
        }
        if let Some(tags) = patch.tags {
            document.tags = tags;
        }
        document.version += 1;
        document.updated_at = Utc::now();

        state.documents.insert(id, document.clone());
        state.push_version(&document, editor_id, CHANGE_DOCUMENT_UPDATED);
        state.push_activity(editor_id, Some(id), ACTIVITY_UPDATED, &document.title);
        Ok(Some(document))
    }

    async fn delete(&self, id: DbId, editor_id: DbId) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        let Some(document) = state.documents.remove(&id) else {
            return Ok(false);
        };
        state.versions.retain(|_, v| v.document_id != id);
        state.activities.retain(|_, a| a.document_id != Some(id));
        state.push_activity(editor_id, None, ACTIVITY_DELETED, &document.title);
        Ok(true)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Document>, StoreError> {
        Ok(self.state.read().await.documents.get(&id).cloned())
    }

    async fn get_with_details(&self, id: DbId) -> Result<Option<DocumentWithDetails>, StoreError> {
        let state = self.state.read().await;
        let Some(document) = state.documents.get(&id).cloned() else {
            return Ok(None);
        };

        // Author must resolve or the whole lookup fails.
        let Some(author) = state.users.get(&document.author_id) else {
            tracing::warn!(
                document_id = document.id,
                author_id = document.author_id,
                "Document author could not be resolved"
            );
            return Ok(None);
        };
        let author = UserResponse::from(author);

        let mut versions: Vec<DocumentVersion> = state
            .versions
            .values()
            .filter(|v| v.document_id == id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version.cmp(&a.version));

        Ok(Some(DocumentWithDetails {
            author,
            document,
            versions,
        }))
    }

    async fn list_with_authors(&self) -> Result<Vec<DocumentWithAuthor>, StoreError> {
        let state = self.state.read().await;
        Ok(ordered_with_authors(&state, |_| true))
    }

    async fn search(&self, query: &str) -> Result<Vec<DocumentWithAuthor>, StoreError> {
        let state = self.state.read().await;
        Ok(ordered_with_authors(&state, |d| {
            matches_literal(query, &d.title, &d.content, d.summary.as_deref(), &d.tags)
        }))
    }

    async fn list_versions(&self, document_id: DbId) -> Result<Vec<DocumentVersion>, StoreError> {
        let state = self.state.read().await;
        let mut versions: Vec<DocumentVersion> = state
            .versions
            .values()
            .filter(|v| v.document_id == document_id)
            .cloned()
            .collect();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(versions)
    }
}

/// Documents passing `keep`, most recently updated first, joined with
/// their authors. Documents whose author cannot be resolved are dropped.
fn ordered_with_authors(
    state: &MemoryState,
    keep: impl Fn(&Document) -> bool,
) -> Vec<DocumentWithAuthor> {
    let mut documents: Vec<Document> = state
        .documents
        .values()
        .filter(|d| keep(d))
        .cloned()
        .collect();
    documents.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));

    documents
        .into_iter()
        .filter_map(|document| match state.users.get(&document.author_id) {
            Some(user) => Some(DocumentWithAuthor {
                author: UserResponse::from(user),
                document,
            }),
            None => {
                tracing::warn!(
                    document_id = document.id,
                    author_id = document.author_id,
                    "Dropping document with unresolvable author"
                );
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

#[async_trait]
impl ActivityRepository for MemoryStore {
    async fn recent(&self, limit: i64) -> Result<Vec<ActivityWithContext>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .activities
            .values()
            .rev()
            .take(limit.max(0) as usize)
            .filter_map(|activity| match state.users.get(&activity.user_id) {
                Some(user) => {
                    let document = activity
                        .document_id
                        .and_then(|id| state.documents.get(&id).cloned());
                    Some(ActivityWithContext {
                        user: UserResponse::from(user),
                        document,
                        activity: activity.clone(),
                    })
                }
                None => {
                    tracing::warn!(
                        activity_id = activity.id,
                        user_id = activity.user_id,
                        "Dropping activity with unresolvable user"
                    );
                    None
                }
            })
            .collect())
    }
}
