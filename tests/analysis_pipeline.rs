//! Analysis pipeline with a deterministic provider in place of the remote service.

use async_trait::async_trait;
use tempfile::TempDir;
use text_analyzer::analysis::{analyze_text, AnalysisError};
use text_analyzer::llm::{classify_outcome, SentimentProvider};
use text_analyzer::models::{Sentiment, SentimentResult};
use text_analyzer::storage::HistoryStore;

/// Answers like the real service would, via the same reply classification.
struct CannedProvider {
    reply: &'static str,
}

#[async_trait]
impl SentimentProvider for CannedProvider {
    fn name(&self) -> &str {
        "Canned"
    }

    async fn analyze_sentiment(&self, _text: &str) -> SentimentResult {
        classify_outcome(Ok(self.reply.to_string()))
    }

    async fn generate_summary(&self, text: &str) -> String {
        format!("{} words", text.split_whitespace().count())
    }
}

#[tokio::test]
async fn analysis_is_stored_with_sentiment_and_summary() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("db.json"));
    let provider = CannedProvider {
        reply: "```json\n{\"sentiment\": \"POSITIVE\", \"confidence\": \"HIGH\"}\n```",
    };

    let analysis = analyze_text("I love this product", Some(&provider))
        .await
        .unwrap();
    let id = store.save(analysis).unwrap();

    let record = &store.get_history(1)[0];
    assert_eq!(record.id, id);
    assert_eq!(record.sentiment, Sentiment::Positive);
    assert_eq!(record.confidence, "HIGH");
    assert_eq!(record.summary, "4 words");
    assert_eq!(record.word_count, 4);
    assert_eq!(record.char_count, 19);
    assert_eq!(record.line_count, 1);
}

#[tokio::test]
async fn malformed_reply_is_stored_as_unknown() {
    let provider = CannedProvider {
        reply: "Sure! The sentiment is positive.",
    };
    let analysis = analyze_text("fine", Some(&provider)).await.unwrap();
    assert_eq!(analysis.sentiment, SentimentResult::parse_error());
    assert_eq!(analysis.sentiment.sentiment, Sentiment::Unknown);
}

#[tokio::test]
async fn empty_input_never_reaches_the_store() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::new(dir.path().join("db.json"));
    let provider = CannedProvider { reply: "{}" };

    let result = analyze_text("", Some(&provider)).await;
    assert!(matches!(result, Err(AnalysisError::EmptyInput)));
    assert_eq!(store.count(), 0);
    assert!(!store.path().exists());
}
