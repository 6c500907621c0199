//! Dochive domain layer.
//!
//! Pure types, validation, and matching logic shared by the repository,
//! AI, and API crates. This crate has no internal dependencies so any
//! future CLI or worker tooling can use it directly.

pub mod document;
pub mod error;
pub mod roles;
pub mod search;
pub mod types;
