//! Request handlers, one submodule per resource.
//!
//! Handlers validate input, enforce ownership, delegate to the repositories
//! in `dochive_db` (or the AI client), and map errors via [`crate::error::AppError`].

pub mod activities;
pub mod ai;
pub mod auth;
pub mod documents;
pub mod search;
