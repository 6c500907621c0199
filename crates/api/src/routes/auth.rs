//! Route definitions for the `/auth` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register     -> register (public)
/// POST /login        -> login (public)
/// GET  /me           -> me
/// PUT  /me           -> update_profile
/// PUT  /me/password  -> change_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me).put(auth::update_profile))
        .route("/me/password", put(auth::change_password))
}
