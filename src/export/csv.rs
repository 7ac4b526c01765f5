//! CSV rendering.

use std::fmt::Write;

use crate::models::{AnalysisRecord, FieldValue, RECORD_COLUMNS};

/// Quote a field if it contains a delimiter, quote or line break.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Render records as CSV: a header of record keys, then one row per record.
pub fn render_csv(records: &[AnalysisRecord]) -> String {
    let mut output = String::new();
    output.push_str(&RECORD_COLUMNS.join(","));
    output.push_str("\r\n");

    for record in records {
        let row: Vec<String> = record
            .fields()
            .iter()
            .map(|field| match field {
                FieldValue::Text(s) => escape_csv(s),
                FieldValue::Count(n) => n.to_string(),
            })
            .collect();
        // Writing to a String cannot fail.
        let _ = write!(output, "{}\r\n", row.join(","));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;

    fn record(text: &str, summary: &str) -> AnalysisRecord {
        AnalysisRecord {
            id: "id-1".to_string(),
            timestamp: "2026-01-02T03:04:05".to_string(),
            text: text.to_string(),
            word_count: 2,
            char_count: text.chars().count(),
            line_count: 1,
            sentiment: Sentiment::Negative,
            confidence: "LOW".to_string(),
            summary: summary.to_string(),
        }
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn test_header_lists_record_keys() {
        let csv = render_csv(&[record("x", "y")]);
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "id,timestamp,text,word_count,char_count,line_count,sentiment,confidence,summary"
        );
    }

    #[test]
    fn test_row_values_are_escaped() {
        let csv = render_csv(&[record("hello, world", "fine")]);
        let row = csv.split("\r\n").nth(1).unwrap();
        assert_eq!(
            row,
            "id-1,2026-01-02T03:04:05,\"hello, world\",2,12,1,NEGATIVE,LOW,fine"
        );
    }
}
