//! Route definition for the `/activities` feed.

use axum::routing::get;
use axum::Router;

use crate::handlers::activities;
use crate::state::AppState;

/// Routes mounted at `/activities`.
///
/// ```text
/// GET /recent -> recent (?limit=N)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/recent", get(activities::recent))
}
