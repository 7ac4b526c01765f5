//! Local text analysis: word, character and line counts, and the full
//! analysis pipeline built on top of them.

mod pipeline;
mod stats;

pub use pipeline::{analyze_text, AnalysisError, SUMMARY_SKIPPED};
pub use stats::{TextAnalyzer, TextStatistics};
