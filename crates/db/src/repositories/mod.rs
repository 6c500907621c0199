//! Storage access behind backend-neutral traits.
//!
//! Two backends exist: the PostgreSQL repositories for production and an
//! in-process [`memory::MemoryStore`] used by the test suites. [`Storage`]
//! bundles one repository per entity and is selected once at startup,
//! never hard-coded.

pub mod activity_repo;
pub mod document_repo;
pub mod memory;
pub mod user_repo;

use std::sync::Arc;

use async_trait::async_trait;
use dochive_core::types::DbId;

use crate::error::StoreError;
use crate::models::{
    ActivityWithContext, Document, DocumentPatch, DocumentVersion, DocumentWithAuthor,
    DocumentWithDetails, NewDocument, NewUser, User,
};
use crate::DbPool;

// ---------------------------------------------------------------------------
// Repository traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with [`StoreError::Conflict`] when the
    /// email is already registered.
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Total number of accounts. The first account registered becomes an
    /// admin, so registration checks this.
    async fn count(&self) -> Result<i64, StoreError>;

    async fn update_display_name(
        &self,
        id: DbId,
        display_name: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Replace the stored credential. Returns `false` if the user does
    /// not exist.
    async fn update_password(&self, id: DbId, password_hash: &str) -> Result<bool, StoreError>;
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Create a document at version 1, appending the initial version
    /// snapshot and a "created" activity in the same transaction.
    async fn create(&self, new_document: NewDocument) -> Result<Document, StoreError>;

    /// Merge a partial update over the current state, bump `version` by
    /// exactly 1, and append the post-merge snapshot plus an "updated"
    /// activity, all in one transaction. Returns `Ok(None)` when the
    /// document does not exist. When the patch carries an
    /// `expected_version` that does not match, fails with
    /// [`StoreError::VersionConflict`] and writes nothing.
    async fn update(
        &self,
        id: DbId,
        patch: DocumentPatch,
        editor_id: DbId,
    ) -> Result<Option<Document>, StoreError>;

    /// Hard-delete a document together with all of its version snapshots
    /// and activities, dependents first, in one transaction, then record
    /// a "deleted" activity that carries no document reference. Returns
    /// `false` when the document does not exist.
    async fn delete(&self, id: DbId, editor_id: DbId) -> Result<bool, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Document>, StoreError>;

    /// The document with its author and full version history (newest
    /// version first). Returns `Ok(None)` when the document is absent or
    /// its author cannot be resolved.
    async fn get_with_details(&self, id: DbId) -> Result<Option<DocumentWithDetails>, StoreError>;

    /// Every document with its resolved author, most recently updated
    /// first. Not paginated; the whole set is materialized.
    async fn list_with_authors(&self) -> Result<Vec<DocumentWithAuthor>, StoreError>;

    /// Case-insensitive literal substring search over title, content,
    /// summary, and tags. Returns the matching subset of
    /// [`Self::list_with_authors`] in the same order.
    async fn search(&self, query: &str) -> Result<Vec<DocumentWithAuthor>, StoreError>;

    /// All version snapshots for a document, newest first. Empty when the
    /// document has none (including when it does not exist).
    async fn list_versions(&self, document_id: DbId) -> Result<Vec<DocumentVersion>, StoreError>;
}

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// The `limit` most recent activities, newest first, each joined with
    /// its acting user and (where one still exists) its document.
    /// Activities whose user cannot be resolved are silently dropped.
    async fn recent(&self, limit: i64) -> Result<Vec<ActivityWithContext>, StoreError>;
}

// ---------------------------------------------------------------------------
// Storage bundle
// ---------------------------------------------------------------------------

/// The set of repositories the application runs against.
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub activities: Arc<dyn ActivityRepository>,
    pool: Option<DbPool>,
}

impl Storage {
    /// Repositories backed by PostgreSQL.
    pub fn postgres(pool: DbPool) -> Self {
        Self {
            users: Arc::new(user_repo::PgUserRepo::new(pool.clone())),
            documents: Arc::new(document_repo::PgDocumentRepo::new(pool.clone())),
            activities: Arc::new(activity_repo::PgActivityRepo::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Repositories backed by an in-process store. The test suites run
    /// against this; it also serves local development without a database.
    pub fn memory() -> Self {
        let store = memory::MemoryStore::new();
        Self {
            users: Arc::new(store.clone()),
            documents: Arc::new(store.clone()),
            activities: Arc::new(store),
            pool: None,
        }
    }

    /// Whether the backing store is reachable. The in-process store is
    /// always healthy.
    pub async fn healthy(&self) -> bool {
        match &self.pool {
            Some(pool) => crate::health_check(pool).await.is_ok(),
            None => true,
        }
    }
}
