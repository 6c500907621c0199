//! Dochive API server library.
//!
//! Exposes the building blocks (config, state, error handling, router,
//! routes) so the integration tests and the binary entrypoint can both
//! assemble the same application.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
