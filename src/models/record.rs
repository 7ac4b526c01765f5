//! Analysis records as persisted in the history store.
//!
//! A record is created once per analysis, gets its identity and timestamp from
//! the store, and is never modified afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::sentiment::{Sentiment, SentimentResult};
use crate::analysis::TextStatistics;
use crate::utils::{truncate_chars, value_to_string};

/// Number of characters shown wherever a record's text is previewed.
pub const SNIPPET_CHARS: usize = 100;

/// The result of analyzing a text, before it has been stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalysis {
    pub text: String,
    pub stats: TextStatistics,
    pub sentiment: SentimentResult,
    pub summary: String,
}

/// A stored analysis.
///
/// `text` always holds the full analyzed text; previews are derived with
/// [`AnalysisRecord::snippet`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct AnalysisRecord {
    pub id: String,
    pub timestamp: String,
    pub text: String,
    pub word_count: usize,
    pub char_count: usize,
    pub line_count: usize,
    pub sentiment: Sentiment,
    pub confidence: String,
    pub summary: String,
}

/// Column names in serialization order, used by the tabular exporters.
pub const RECORD_COLUMNS: [&str; 9] = [
    "id",
    "timestamp",
    "text",
    "word_count",
    "char_count",
    "line_count",
    "sentiment",
    "confidence",
    "summary",
];

/// A single exported cell.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Count(usize),
}

impl AnalysisRecord {
    /// Build a record from a finished analysis. Only the store calls this.
    pub(crate) fn from_analysis(id: String, timestamp: String, analysis: NewAnalysis) -> Self {
        Self {
            id,
            timestamp,
            text: analysis.text,
            word_count: analysis.stats.word_count,
            char_count: analysis.stats.char_count,
            line_count: analysis.stats.line_count,
            sentiment: analysis.sentiment.sentiment,
            confidence: analysis.sentiment.confidence,
            summary: analysis.summary,
        }
    }

    /// Preview of the text, at most [`SNIPPET_CHARS`] characters plus `...`.
    pub fn snippet(&self) -> String {
        truncate_chars(&self.text, SNIPPET_CHARS)
    }

    /// First 19 characters of the timestamp (`YYYY-MM-DDTHH:MM:SS`).
    pub fn short_timestamp(&self) -> &str {
        match self.timestamp.char_indices().nth(19) {
            Some((idx, _)) => &self.timestamp[..idx],
            None => &self.timestamp,
        }
    }

    /// Cell values in [`RECORD_COLUMNS`] order.
    pub fn fields(&self) -> [FieldValue<'_>; 9] {
        [
            FieldValue::Text(&self.id),
            FieldValue::Text(&self.timestamp),
            FieldValue::Text(&self.text),
            FieldValue::Count(self.word_count),
            FieldValue::Count(self.char_count),
            FieldValue::Count(self.line_count),
            FieldValue::Text(self.sentiment.as_str()),
            FieldValue::Text(&self.confidence),
            FieldValue::Text(&self.summary),
        ]
    }
}

/// On-disk shape, tolerant of records written by older releases which kept a
/// truncated `text` next to a `full_text` copy and stored the model's
/// `sentiment` and `confidence` values as they came back, numbers included.
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default)]
    id: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    full_text: Option<String>,
    #[serde(default)]
    word_count: usize,
    #[serde(default)]
    char_count: usize,
    #[serde(default)]
    line_count: usize,
    #[serde(default)]
    sentiment: Value,
    #[serde(default)]
    confidence: Value,
    #[serde(default)]
    summary: String,
}

impl From<StoredRecord> for AnalysisRecord {
    fn from(r: StoredRecord) -> Self {
        Self {
            id: r.id,
            timestamp: r.timestamp,
            text: r.full_text.or(r.text).unwrap_or_default(),
            word_count: r.word_count,
            char_count: r.char_count,
            line_count: r.line_count,
            sentiment: scalar_text(&r.sentiment)
                .map(Sentiment::from)
                .unwrap_or_default(),
            confidence: scalar_text(&r.confidence).unwrap_or_default(),
            summary: r.summary,
        }
    }
}

/// Null (or an absent key) means "not recorded".
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => Some(value_to_string(other)),
    }
}
