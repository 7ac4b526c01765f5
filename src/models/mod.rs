//! Data models for the analysis history.

mod record;
mod sentiment;

pub use record::{AnalysisRecord, FieldValue, NewAnalysis, RECORD_COLUMNS, SNIPPET_CHARS};
pub use sentiment::{
    Sentiment, SentimentResult, CONFIDENCE_CONTENT_BLOCKED, CONFIDENCE_FILTERS_TRIGGERED,
    CONFIDENCE_NONE, CONFIDENCE_PARSE_ERROR,
};
