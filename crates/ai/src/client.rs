//! Chat-completion client for the generative-text provider.

use serde::{Deserialize, Serialize};

use crate::config::AiConfig;
use crate::prompts;

/// HTTP client for an OpenAI-compatible chat-completion provider.
pub struct AiClient {
    client: reqwest::Client,
    config: AiConfig,
}

/// Minimal view of a document handed to the provider for ranking and
/// question answering. The excerpt is truncated so large documents do
/// not blow up the prompt.
#[derive(Debug, Clone)]
pub struct DocumentSnippet {
    pub id: i64,
    pub title: String,
    pub excerpt: String,
}

/// Longest excerpt included in a prompt, in characters.
pub const MAX_EXCERPT_CHARS: usize = 600;

impl DocumentSnippet {
    pub fn new(id: i64, title: &str, body: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            excerpt: truncate_chars(body, MAX_EXCERPT_CHARS),
        }
    }
}

/// One entry of the provider's relevance ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedDocument {
    pub id: i64,
    /// Relevance score from 0 (unrelated) to 100 (exact match).
    pub relevance: u8,
}

/// Errors from the generative-text provider.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("AI provider error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider answered 2xx but the payload was not usable.
    #[error("Malformed AI response: {0}")]
    Malformed(String),
}

// Chat-completion wire format.

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl AiClient {
    pub fn new(config: AiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Summarize a document in a few sentences of plain text.
    pub async fn summarize(&self, title: &str, content: &str) -> Result<String, AiError> {
        let reply = self
            .complete(&prompts::summarize_prompt(title, content))
            .await?;
        Ok(reply.trim().to_string())
    }

    /// Suggest tags for a document. The provider is asked for a JSON
    /// array of short strings; anything else fails as [`AiError::Malformed`].
    pub async fn generate_tags(&self, title: &str, content: &str) -> Result<Vec<String>, AiError> {
        let reply = self.complete(&prompts::tags_prompt(title, content)).await?;
        prompts::parse_tags(&reply)
    }

    /// Rank documents by semantic relevance to a query. Returns the
    /// provider's ranking (most relevant first); documents the provider
    /// judges irrelevant are simply absent.
    pub async fn rank_documents(
        &self,
        query: &str,
        documents: &[DocumentSnippet],
    ) -> Result<Vec<RankedDocument>, AiError> {
        let reply = self
            .complete(&prompts::ranking_prompt(query, documents))
            .await?;
        prompts::parse_rankings(&reply)
    }

    /// Answer a free-form question over the given documents.
    pub async fn answer(
        &self,
        question: &str,
        documents: &[DocumentSnippet],
    ) -> Result<String, AiError> {
        let reply = self
            .complete(&prompts::answer_prompt(question, documents))
            .await?;
        Ok(reply.trim().to_string())
    }

    // ---- private helpers ----

    /// Run one chat completion and return the assistant's text reply.
    async fn complete(&self, user_prompt: &str) -> Result<String, AiError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompts::SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_url))
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let reply = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AiError::Malformed("reply contained no choices".to_string()))?;

        tracing::debug!(chars = reply.len(), "AI provider replied");
        Ok(reply)
    }
}

/// Truncate to at most `max` characters without splitting a code point.
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
