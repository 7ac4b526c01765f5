//! Errors from the generative-text service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("GEMINI_API_KEY not set. Get an API key from https://ai.google.dev/")]
    MissingApiKey,

    /// The provider explicitly flagged the prompt.
    #[error("Response blocked: {0}")]
    Blocked(String),

    /// The provider answered without any readable content.
    #[error("Response empty or blocked: {0}")]
    EmptyResponse(String),

    #[error("Failed to parse model reply: {0}")]
    Parse(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}
