use std::time::Duration;

/// Connection settings for the generative-text provider.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Base URL of the provider, without a trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request.
    pub api_key: String,
    /// Model name passed through to the provider.
    pub model: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl AiConfig {
    /// Load provider settings from environment variables.
    ///
    /// | Variable | Required | Default | Description |
    /// |----------|----------|---------|-------------|
    /// | `AI_API_KEY` | yes | - | Bearer token for the provider |
    /// | `AI_API_URL` | no | `https://api.openai.com/v1` | Base URL of the chat-completion API |
    /// | `AI_MODEL` | no | `gpt-4o-mini` | Model name |
    /// | `AI_TIMEOUT_SECS` | no | `30` | Per-request timeout in seconds |
    ///
    /// Returns `None` when `AI_API_KEY` is unset. The application treats
    /// that as "AI features disabled" rather than a startup failure.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("AI_API_KEY").ok()?;

        let api_url = std::env::var("AI_API_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let model = std::env::var("AI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let timeout_secs = std::env::var("AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(30);

        Some(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
