//! Route definitions for the `/ai` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

/// Routes mounted at `/ai`. All of them answer 503 when no provider is
/// configured.
///
/// ```text
/// POST /summarize  -> summarize
/// POST /tags       -> tags
/// POST /answer     -> answer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summarize", post(ai::summarize))
        .route("/tags", post(ai::tags))
        .route("/answer", post(ai::answer))
}
