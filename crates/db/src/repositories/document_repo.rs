use std::collections::HashMap;

use async_trait::async_trait;
use dochive_core::document::{
    activity_description, ACTIVITY_CREATED, ACTIVITY_DELETED, ACTIVITY_UPDATED,
    CHANGE_DOCUMENT_UPDATED, CHANGE_INITIAL_VERSION,
};
use dochive_core::types::DbId;

use crate::error::StoreError;
use crate::models::{
    Document, DocumentPatch, DocumentVersion, DocumentWithAuthor, DocumentWithDetails, NewDocument,
    User, UserResponse,
};
use crate::repositories::user_repo::USER_COLUMNS;
use crate::repositories::DocumentRepository;
use crate::DbPool;

pub(crate) const DOCUMENT_COLUMNS: &str =
    "id, title, content, summary, tags, author_id, version, created_at, updated_at";

const VERSION_COLUMNS: &str =
    "id, document_id, version, title, content, summary, tags, author_id, change_description, created_at";

/// PostgreSQL-backed [`DocumentRepository`].
///
/// Every mutation runs the document write, the version snapshot, and the
/// activity record inside one transaction so a crash cannot leave the
/// version counter disagreeing with the version log.
pub struct PgDocumentRepo {
    pool: DbPool,
}

impl PgDocumentRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Resolve authors for a batch of documents, preserving document
    /// order. Documents whose author cannot be resolved are dropped.
    async fn attach_authors(
        &self,
        documents: Vec<Document>,
    ) -> Result<Vec<DocumentWithAuthor>, StoreError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<DbId> = documents.iter().map(|d| d.author_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(&author_ids)
        .fetch_all(&self.pool)
        .await?;
        let users_by_id: HashMap<DbId, User> = users.into_iter().map(|u| (u.id, u)).collect();

        Ok(documents
            .into_iter()
            .filter_map(|document| match users_by_id.get(&document.author_id) {
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
            .collect())
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepo {
    async fn create(&self, new_document: NewDocument) -> Result<Document, StoreError> {
        let mut tx = self.pool.begin().await?;

        let document = sqlx::query_as::<_, Document>(&format!(
            "INSERT INTO documents (title, content, summary, tags, author_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(&new_document.title)
        .bind(&new_document.content)
        .bind(&new_document.summary)
        .bind(&new_document.tags)
        .bind(new_document.author_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_version(&mut tx, &document, document.author_id, CHANGE_INITIAL_VERSION).await?;
        insert_activity(
            &mut tx,
            document.author_id,
            Some(document.id),
            ACTIVITY_CREATED,
            &activity_description(ACTIVITY_CREATED, &document.title),
        )
        .await?;

        tx.commit().await?;
        Ok(document)
    }

    async fn update(
        &self,
        id: DbId,
        patch: DocumentPatch,
        editor_id: DbId,
    ) -> Result<Option<Document>, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Row lock serializes racing editors: the loser re-reads the
        // winner's state and applies on top of it, so each successful
        // update bumps the version by exactly 1.
        let current = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
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

        let document = sqlx::query_as::<_, Document>(&format!(
            "UPDATE documents SET \
                title = COALESCE($2, title), \
                content = COALESCE($3, content), \
                summary = CASE WHEN $4::BOOL THEN $5 ELSE summary END, \
                tags = COALESCE($6, tags), \
                version = version + 1, \
                updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {DOCUMENT_COLUMNS}"
        ))
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.content)
        .bind(patch.summary.is_some())
        .bind(patch.summary.clone().flatten())
        .bind(&patch.tags)
        .fetch_one(&mut *tx)
        .await?;

        insert_version(&mut tx, &document, editor_id, CHANGE_DOCUMENT_UPDATED).await?;
        insert_activity(
            &mut tx,
            editor_id,
            Some(document.id),
            ACTIVITY_UPDATED,
            &activity_description(ACTIVITY_UPDATED, &document.title),
        )
        .await?;

        tx.commit().await?;
        Ok(Some(document))
    }

    async fn delete(&self, id: DbId, editor_id: DbId) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let existing = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(document) = existing else {
            return Ok(false);
        };

        // Dependents first; the schema deliberately has no ON DELETE
        // CASCADE, so ordering is load-bearing.
        sqlx::query("DELETE FROM document_versions WHERE document_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM activities WHERE document_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_activity(
            &mut tx,
            editor_id,
            None,
            ACTIVITY_DELETED,
            &activity_description(ACTIVITY_DELETED, &document.title),
        )
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Document>, StoreError> {
        let document = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(document)
    }

    async fn get_with_details(&self, id: DbId) -> Result<Option<DocumentWithDetails>, StoreError> {
        let Some(document) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let author = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(document.author_id)
        .fetch_optional(&self.pool)
        .await?;

        // Author must resolve or the whole lookup fails.
        let Some(author) = author else {
            tracing::warn!(
                document_id = document.id,
                author_id = document.author_id,
                "Document author could not be resolved"
            );
            return Ok(None);
        };

        let versions = self.list_versions(id).await?;

        Ok(Some(DocumentWithDetails {
            author: UserResponse::from(&author),
            document,
            versions,
        }))
    }

    async fn list_with_authors(&self) -> Result<Vec<DocumentWithAuthor>, StoreError> {
        let documents = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents ORDER BY updated_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        self.attach_authors(documents).await
    }

    async fn search(&self, query: &str) -> Result<Vec<DocumentWithAuthor>, StoreError> {
        let pattern = format!("%{}%", escape_like(query));

        let documents = sqlx::query_as::<_, Document>(&format!(
            "SELECT {DOCUMENT_COLUMNS} FROM documents \
             WHERE title ILIKE $1 \
                OR content ILIKE $1 \
                OR summary ILIKE $1 \
                OR EXISTS (SELECT 1 FROM unnest(tags) AS tag WHERE tag ILIKE $1) \
             ORDER BY updated_at DESC, id DESC"
        ))
        .bind(&pattern)
        .fetch_all(&self.pool)
        .await?;

        self.attach_authors(documents).await
    }

    async fn list_versions(&self, document_id: DbId) -> Result<Vec<DocumentVersion>, StoreError> {
        let versions = sqlx::query_as::<_, DocumentVersion>(&format!(
            "SELECT {VERSION_COLUMNS} FROM document_versions \
             WHERE document_id = $1 \
             ORDER BY version DESC"
        ))
        .bind(document_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(versions)
    }
}

// ---------------------------------------------------------------------------
// Transaction helpers
// ---------------------------------------------------------------------------

async fn insert_version(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    document: &Document,
    author_id: DbId,
    change_description: &str,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO document_versions \
         (document_id, version, title, content, summary, tags, author_id, change_description) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(document.id)
    .bind(document.version)
    .bind(&document.title)
    .bind(&document.content)
    .bind(&document.summary)
    .bind(&document.tags)
    .bind(author_id)
    .bind(change_description)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_activity(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: DbId,
    document_id: Option<DbId>,
    activity_type: &str,
    description: &str,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO activities (user_id, document_id, activity_type, description) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(user_id)
    .bind(document_id)
    .bind(activity_type)
    .bind(description)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Escape LIKE metacharacters so a user query only ever matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like("50% done_now"), "50\\% done\\_now");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }
}
