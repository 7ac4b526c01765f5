//! AI text service: sentiment classification and summaries.

mod config;
mod error;
mod gemini;
mod prompts;
mod provider;
mod reply;

pub use config::GeminiConfig;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use prompts::{sentiment_prompt, summary_prompt};
pub use provider::{SentimentProvider, SUMMARY_EMPTY, SUMMARY_ERROR, SUMMARY_NO_KEY};
pub use reply::{
    classify_outcome, interpret_response, parse_sentiment_reply, strip_code_fence,
    summary_from_outcome, GenerateContentResponse,
};
