//! The capability the application needs from a remote text service.

use async_trait::async_trait;

use crate::models::SentimentResult;

/// Summary returned when no API key is configured.
pub const SUMMARY_NO_KEY: &str = "AI Summary Unavailable (No Key)";
/// Summary returned when the service answered with nothing.
pub const SUMMARY_EMPTY: &str = "No summary generated.";
/// Summary returned when the request failed.
pub const SUMMARY_ERROR: &str = "Summary Error";

/// Sentiment classification and summarization of a text.
///
/// Both operations are infallible: failures are folded into sentinel values
/// so a broken remote service never aborts an analysis.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// Human-readable name shown while a request is in flight.
    fn name(&self) -> &str;

    async fn analyze_sentiment(&self, text: &str) -> SentimentResult;

    async fn generate_summary(&self, text: &str) -> String;
}
