//! Handler for the `/activities` feed.

use axum::extract::{Query, State};
use axum::Json;
use dochive_core::search::{clamp_limit, DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT};
use dochive_db::models::activity::ActivityWithContext;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query string for `GET /activities/recent`.
#[derive(Debug, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

/// GET /api/v1/activities/recent?limit=N
///
/// The newest activity entries, most recent first. Entries whose acting
/// user cannot be resolved are dropped, so fewer than `limit` rows may
/// come back.
pub async fn recent(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<ActivityQuery>,
) -> AppResult<Json<DataResponse<Vec<ActivityWithContext>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_ACTIVITY_LIMIT, MAX_ACTIVITY_LIMIT);
    let activities = state.storage.activities.recent(limit).await?;
    Ok(Json(DataResponse { data: activities }))
}
