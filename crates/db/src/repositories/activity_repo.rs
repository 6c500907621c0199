use std::collections::HashMap;

use async_trait::async_trait;
use dochive_core::types::DbId;

use crate::error::StoreError;
use crate::models::{Activity, ActivityWithContext, Document, User, UserResponse};
use crate::repositories::document_repo::DOCUMENT_COLUMNS;
use crate::repositories::user_repo::USER_COLUMNS;
use crate::repositories::ActivityRepository;
use crate::DbPool;

const ACTIVITY_COLUMNS: &str = "id, user_id, document_id, activity_type, description, created_at";

/// PostgreSQL-backed [`ActivityRepository`].
pub struct PgActivityRepo {
    pool: DbPool,
}

impl PgActivityRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepo {
    async fn recent(&self, limit: i64) -> Result<Vec<ActivityWithContext>, StoreError> {
        let activities = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        if activities.is_empty() {
            return Ok(Vec::new());
        }

        let mut user_ids: Vec<DbId> = activities.iter().map(|a| a.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
        ))
        .bind(&user_ids)
        .fetch_all(&self.pool)
        .await?;
        let users_by_id: HashMap<DbId, User> = users.into_iter().map(|u| (u.id, u)).collect();

        let mut document_ids: Vec<DbId> =
            activities.iter().filter_map(|a| a.document_id).collect();
        document_ids.sort_unstable();
        document_ids.dedup();

        let documents = if document_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, Document>(&format!(
                "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ANY($1)"
            ))
            .bind(&document_ids)
            .fetch_all(&self.pool)
            .await?
        };
        let documents_by_id: HashMap<DbId, Document> =
            documents.into_iter().map(|d| (d.id, d)).collect();

        Ok(activities
            .into_iter()
            .filter_map(|activity| match users_by_id.get(&activity.user_id) {
                Some(user) => {
                    let document = activity
                        .document_id
                        .and_then(|id| documents_by_id.get(&id).cloned());
                    Some(ActivityWithContext {
                        user: UserResponse::from(user),
                        document,
                        activity,
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
