//! Client for the generative-text provider backing summarization, tag
//! suggestion, semantic ranking, and question answering.
//!
//! The provider is any OpenAI-compatible chat-completion endpoint. The
//! rest of the workspace treats it as a black box returning text or JSON;
//! parsing of its replies lives here, behind [`AiClient`].

pub mod client;
pub mod config;
pub mod prompts;

pub use client::{AiClient, AiError, DocumentSnippet, RankedDocument};
pub use config::AiConfig;
