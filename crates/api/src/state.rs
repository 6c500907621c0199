use std::sync::Arc;

use dochive_ai::AiClient;
use dochive_db::Storage;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable: contents are behind `Arc` or are already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Repository bundle for the selected storage backend.
    pub storage: Storage,
    /// Server configuration (JWT settings, timeouts).
    pub config: Arc<ServerConfig>,
    /// Generative-text provider client. `None` when no API key is
    /// configured; AI endpoints then refuse and semantic search falls
    /// back to literal matching.
    pub ai: Option<Arc<AiClient>>,
}
