//! Handlers for the `/ai` resource: summarize, tag, and answer endpoints.
//!
//! These call the provider on demand and hand the reply straight back.
//! Nothing is persisted here; a caller who likes a suggestion feeds it
//! back through `PUT /documents/{id}`.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use dochive_ai::{AiClient, DocumentSnippet};
use dochive_core::document::{validate_content, validate_title};
use dochive_core::error::CoreError;
use dochive_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// How many top-ranked documents are handed to the provider as context
/// when answering a question.
const MAX_ANSWER_CONTEXT: usize = 5;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /ai/summarize` and `POST /ai/tags`. Takes the
/// draft text itself rather than a document id, so unsaved edits can be
/// summarized too.
#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub title: String,
    pub content: String,
}

/// Response body for `POST /ai/summarize`.
#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// Response body for `POST /ai/tags`.
#[derive(Debug, Serialize)]
pub struct TagsResponse {
    pub tags: Vec<String>,
}

/// Request body for `POST /ai/answer`.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub question: String,
}

/// Response body for `POST /ai/answer`. `sources` names the documents
/// the provider was given as context, most relevant first.
#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub sources: Vec<AnswerSource>,
}

/// One document backing an answer.
#[derive(Debug, Serialize)]
pub struct AnswerSource {
    pub id: DbId,
    pub title: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/ai/summarize
///
/// Summarize a draft in a few sentences of plain text.
pub async fn summarize(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<DraftRequest>,
) -> AppResult<Json<SummarizeResponse>> {
    let ai = require_ai(&state)?;
    validate_title(&input.title)?;
    validate_content(&input.content)?;

    let summary = ai.summarize(&input.title, &input.content).await?;
    Ok(Json(SummarizeResponse { summary }))
}

/// POST /api/v1/ai/tags
///
/// Suggest tags for a draft.
pub async fn tags(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<DraftRequest>,
) -> AppResult<Json<TagsResponse>> {
    let ai = require_ai(&state)?;
    validate_title(&input.title)?;
    validate_content(&input.content)?;

    let tags = ai.generate_tags(&input.title, &input.content).await?;
    Ok(Json(TagsResponse { tags }))
}

/// POST /api/v1/ai/answer
///
/// Answer a free-form question over the document set. The documents are
/// ranked by relevance first and only the top few are handed over as
/// context; those become the cited sources.
pub async fn answer(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<AnswerRequest>,
) -> AppResult<Json<AnswerResponse>> {
    let ai = require_ai(&state)?;
    let question = input.question.trim();
    if question.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Question must not be empty".into(),
        )));
    }

    // 1. Rank the document set and keep the most relevant few as context.
    let documents = state.storage.documents.list_with_authors().await?;
    let snippets: Vec<DocumentSnippet> = documents
        .iter()
        .map(|d| DocumentSnippet::new(d.document.id, &d.document.title, &d.document.content))
        .collect();

    let ranking = if snippets.is_empty() {
        Vec::new()
    } else {
        ai.rank_documents(question, &snippets).await?
    };

    let context: Vec<DocumentSnippet> = ranking
        .iter()
        .take(MAX_ANSWER_CONTEXT)
        .filter_map(|ranked| snippets.iter().find(|s| s.id == ranked.id).cloned())
        .collect();

    // 2. Answer over that context and name the documents it came from.
    let answer = ai.answer(question, &context).await?;
    let sources = context
        .iter()
        .map(|s| AnswerSource {
            id: s.id,
            title: s.title.clone(),
        })
        .collect();

    Ok(Json(AnswerResponse { answer, sources }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The AI endpoints refuse outright when no provider is configured.
fn require_ai(state: &AppState) -> Result<&Arc<AiClient>, AppError> {
    state.ai.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("AI features are not configured on this server".into())
    })
}
