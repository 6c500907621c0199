//! Route definition for `/search`.

use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Routes mounted at `/search`.
///
/// ```text
/// GET / -> search (?q=...&mode=literal|semantic)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search::search))
}
