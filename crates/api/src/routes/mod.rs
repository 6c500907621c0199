pub mod activities;
pub mod ai;
pub mod auth;
pub mod documents;
pub mod health;
pub mod search;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register             create account (public; first account = admin)
/// /auth/login                issue access token (public)
/// /auth/me                   profile (GET), display name (PUT)
/// /auth/me/password          change password (PUT)
///
/// /documents                 list (GET), create (POST)
/// /documents/{id}            get, update, delete
/// /documents/{id}/versions   version history, newest first (GET)
///
/// /search                    ?q=...&mode=literal|semantic (GET)
///
/// /ai/summarize              draft -> summary (POST)
/// /ai/tags                   draft -> suggested tags (POST)
/// /ai/answer                 question -> answer + sources (POST)
///
/// /activities/recent         newest feed entries (GET, ?limit=N)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Account registration, login, and profile.
        .nest("/auth", auth::router())
        // The versioned document store.
        .nest("/documents", documents::router())
        // Literal and semantic search over the document set.
        .nest("/search", search::router())
        // On-demand AI assistance.
        .nest("/ai", ai::router())
        // The audit/activity feed.
        .nest("/activities", activities::router())
}
