//! Handler for `/search`: literal substring matching, with an optional
//! semantic mode backed by the AI provider.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use dochive_ai::DocumentSnippet;
use dochive_core::types::DbId;
use dochive_db::models::document::DocumentWithAuthor;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Query string for `GET /search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    /// `"literal"` (default) or `"semantic"`.
    pub mode: Option<String>,
}

/// Response body for `GET /search`. `mode` reports the strategy that
/// actually produced the results, so callers can tell when a semantic
/// request fell back to literal matching.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub data: Vec<DocumentWithAuthor>,
    pub mode: &'static str,
}

/// GET /api/v1/search?q=...&mode=literal|semantic
pub async fn search(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let query = params.q.trim();
    if query.is_empty() {
        return Ok(Json(SearchResponse {
            data: Vec::new(),
            mode: "literal",
        }));
    }

    match params.mode.as_deref() {
        None | Some("literal") => {
            let data = state.storage.documents.search(query).await?;
            Ok(Json(SearchResponse {
                data,
                mode: "literal",
            }))
        }
        Some("semantic") => semantic_search(&state, query).await,
        Some(other) => Err(AppError::BadRequest(format!(
            "Unknown search mode {other:?}; expected \"literal\" or \"semantic\""
        ))),
    }
}

/// Rank the document set by relevance via the AI provider. Any upstream
/// trouble degrades to literal matching instead of failing the request.
async fn semantic_search(state: &AppState, query: &str) -> AppResult<Json<SearchResponse>> {
    let Some(ai) = &state.ai else {
        tracing::warn!("Semantic search requested without an AI provider; using literal matching");
        let data = state.storage.documents.search(query).await?;
        return Ok(Json(SearchResponse {
            data,
            mode: "literal",
        }));
    };

    let documents = state.storage.documents.list_with_authors().await?;
    let snippets: Vec<DocumentSnippet> = documents
        .iter()
        .map(|d| DocumentSnippet::new(d.document.id, &d.document.title, &d.document.content))
        .collect();

    match ai.rank_documents(query, &snippets).await {
        Ok(ranking) => {
            // Map ranked ids back onto the loaded documents, keeping the
            // provider's order. Ids the provider invented are skipped.
            let mut by_id: HashMap<DbId, DocumentWithAuthor> = documents
                .into_iter()
                .map(|d| (d.document.id, d))
                .collect();
            let data = ranking
                .iter()
                .filter_map(|ranked| by_id.remove(&ranked.id))
                .collect();
            Ok(Json(SearchResponse {
                data,
                mode: "semantic",
            }))
        }
        Err(err) => {
            tracing::warn!(error = %err, "Semantic ranking failed; falling back to literal matching");
            let data = state.storage.documents.search(query).await?;
            Ok(Json(SearchResponse {
                data,
                mode: "literal",
            }))
        }
    }
}
