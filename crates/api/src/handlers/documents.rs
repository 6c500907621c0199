//! Handlers for the `/documents` resource.
//!
//! Create, read, update, and delete flow through the document repository,
//! which keeps the version log and activity trail consistent with every
//! mutation. Ownership is enforced here, before anything reaches the store.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use dochive_core::document::{validate_content, validate_summary, validate_tags, validate_title};
use dochive_core::error::CoreError;
use dochive_core::roles::ROLE_ADMIN;
use dochive_core::types::DbId;
use dochive_db::models::document::{
    Document, DocumentPatch, DocumentWithAuthor, DocumentWithDetails, NewDocument,
};
use dochive_db::models::version::DocumentVersion;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /documents`.
#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/documents
///
/// Every document with its resolved author, most recently updated first.
pub async fn list(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<DocumentWithAuthor>>>> {
    let documents = state.storage.documents.list_with_authors().await?;
    Ok(Json(DataResponse { data: documents }))
}

/// POST /api/v1/documents
///
/// Create a document authored by the caller. Starts at version 1.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateDocumentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Document>>)> {
    // 1. Validate all incoming fields.
    validate_title(&input.title)?;
    validate_content(&input.content)?;
    if let Some(summary) = &input.summary {
        validate_summary(summary)?;
    }
    validate_tags(&input.tags)?;

    // 2. The caller becomes the author.
    let document = state
        .storage
        .documents
        .create(NewDocument {
            title: input.title,
            content: input.content,
            summary: input.summary,
            tags: input.tags,
            author_id: auth.user_id,
        })
        .await?;

    tracing::info!(
        document_id = document.id,
        user_id = auth.user_id,
        "Document created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// GET /api/v1/documents/{id}
///
/// The document with its author and full version history, newest first.
pub async fn get_by_id(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DocumentWithDetails>>> {
    let details = state
        .storage
        .documents
        .get_with_details(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))?;
    Ok(Json(DataResponse { data: details }))
}

/// PUT /api/v1/documents/{id}
///
/// Partial update. Omitted fields keep their value; `"summary": null`
/// clears the summary. Bumps the version and snapshots the new state.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(patch): Json<DocumentPatch>,
) -> AppResult<Json<DataResponse<Document>>> {
    // 1. The document must exist and the caller must be allowed to edit it.
    let existing = state
        .storage
        .documents
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))?;
    ensure_can_edit(&auth, &existing)?;

    // 2. Validate whichever fields the patch carries.
    if let Some(title) = &patch.title {
        validate_title(title)?;
    }
    if let Some(content) = &patch.content {
        validate_content(content)?;
    }
    if let Some(Some(summary)) = &patch.summary {
        validate_summary(summary)?;
    }
    if let Some(tags) = &patch.tags {
        validate_tags(tags)?;
    }

    // 3. Apply. `None` here means the document vanished between the
    //    ownership check and the write; report it as not found either way.
    let updated = state
        .storage
        .documents
        .update(id, patch, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))?;

    tracing::info!(
        document_id = id,
        user_id = auth.user_id,
        version = updated.version,
        "Document updated"
    );
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/documents/{id}
///
/// Hard delete: removes the document, its versions, and its activities,
/// then records a deletion entry in the feed. Returns 204 No Content.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = state
        .storage
        .documents
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))?;
    ensure_can_edit(&auth, &existing)?;

    let deleted = state.storage.documents.delete(id, auth.user_id).await?;
    if deleted {
        tracing::info!(document_id = id, user_id = auth.user_id, "Document deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))
    }
}

/// GET /api/v1/documents/{id}/versions
///
/// The document's version history, newest first.
pub async fn list_versions(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<DocumentVersion>>>> {
    // Missing documents 404 rather than answering with an empty history.
    if state.storage.documents.find_by_id(id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }));
    }

    let versions = state.storage.documents.list_versions(id).await?;
    Ok(Json(DataResponse { data: versions }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Only the document's author or an admin may modify it.
fn ensure_can_edit(auth: &AuthUser, document: &Document) -> Result<(), AppError> {
    if document.author_id == auth.user_id || auth.role == ROLE_ADMIN {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Only the author or an admin may modify this document".into(),
        )))
    }
}
