//! Markdown report rendering.

use std::fmt::Write;

use chrono::{DateTime, Local};

use crate::models::AnalysisRecord;

/// Render a human-readable report of `records`.
pub fn render_markdown(records: &[AnalysisRecord], generated_at: DateTime<Local>) -> String {
    let mut out = String::new();
    out.push_str("# Analysis History Export\n\n");
    let _ = write!(out, "Generated on: {}\n\n", generated_at.to_rfc3339());

    for record in records {
        let id = if record.id.is_empty() { "N/A" } else { &record.id };
        let _ = writeln!(out, "## ID: {}", id);
        let _ = write!(out, "**Date:** {}\n\n", record.timestamp);
        let _ = writeln!(
            out,
            "**Sentiment:** {} ({})",
            record.sentiment, record.confidence
        );
        let _ = write!(
            out,
            "**Stats:** {} words, {} characters, {} lines.\n\n",
            record.word_count, record.char_count, record.line_count
        );

        if !record.summary.is_empty() {
            out.push_str("### Summary\n");
            let _ = write!(out, "{}\n\n", record.summary);
        }

        out.push_str("### Text Snippet\n");
        out.push_str(&blockquote(&record.snippet()));
        out.push_str("\n---\n\n");
    }

    out
}

/// Prefix every line with `> ` so multi-line text stays inside the quote.
fn blockquote(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        out.push_str("> ");
        out.push_str(line);
        out.push('\n');
    }
    if out.is_empty() {
        out.push_str(">\n");
    }
    out
}
