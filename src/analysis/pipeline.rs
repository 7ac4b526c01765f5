//! One full analysis: local statistics, then the remote sentiment and summary.

use thiserror::Error;
use tracing::debug;

use super::TextAnalyzer;
use crate::llm::SentimentProvider;
use crate::models::{NewAnalysis, SentimentResult};

/// Summary recorded when the remote service was not consulted.
pub const SUMMARY_SKIPPED: &str = "N/A";

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Input text is empty")]
    EmptyInput,
}

/// Analyze `text`, consulting `provider` for sentiment and summary.
///
/// Without a provider the record carries the `SKIPPED` sentinel. Remote
/// failures never surface here; they are folded into sentinel values.
pub async fn analyze_text(
    text: &str,
    provider: Option<&dyn SentimentProvider>,
) -> Result<NewAnalysis, AnalysisError> {
    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyInput);
    }

    let stats = TextAnalyzer::new().analyze(text);
    debug!("Local stats: {:?}", stats);

    let (sentiment, summary) = match provider {
        Some(provider) => {
            let sentiment = provider.analyze_sentiment(text).await;
            let summary = provider.generate_summary(text).await;
            debug!("AI result: {:?}, Summary: {}", sentiment, summary);
            (sentiment, summary)
        }
        None => (SentimentResult::skipped(), SUMMARY_SKIPPED.to_string()),
    };

    Ok(NewAnalysis {
        text: text.to_string(),
        stats,
        sentiment,
        summary,
    })
}
