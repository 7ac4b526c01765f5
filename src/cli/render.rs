//! Result and history tables, and the marks leading status lines.

use std::fmt;

use console::{style, StyledObject};

use text_analyzer::models::{AnalysisRecord, NewAnalysis, Sentiment};

const RULE_WIDTH: usize = 60;

/// Coloured glyph printed in front of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Done,
    Step,
    Warn,
    Fail,
    Item,
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyph = match self {
            Self::Done => style("✓").green(),
            Self::Step => style("→").cyan(),
            Self::Warn => style("!").yellow(),
            Self::Fail => style("✗").red(),
            Self::Item => style("•").dim(),
        };
        write!(f, "{}", glyph)
    }
}

/// Colour a sentiment cell: green for positive, red for negative, yellow otherwise.
pub fn sentiment_style<D>(sentiment: &Sentiment, cell: D) -> StyledObject<D> {
    match sentiment {
        Sentiment::Positive => style(cell).green(),
        Sentiment::Negative => style(cell).red(),
        _ => style(cell).yellow(),
    }
}

/// Collapse line breaks so a preview stays on one table row.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn print_results(analysis: &NewAnalysis) {
    let sentiment = &analysis.sentiment.sentiment;

    println!("\n{}", style("Analysis Results").bold());
    println!("{}", "-".repeat(RULE_WIDTH));
    println!("{:<12} Value", "Metric");
    println!("{}", "-".repeat(RULE_WIDTH));
    println!("{:<12} {}", "Words", analysis.stats.word_count);
    println!("{:<12} {}", "Characters", analysis.stats.char_count);
    println!("{:<12} {}", "Lines", analysis.stats.line_count);
    println!(
        "{:<12} {}",
        "Sentiment",
        sentiment_style(sentiment, sentiment.as_str())
    );
    println!("{:<12} {}", "Confidence", analysis.sentiment.confidence);

    let mut summary = analysis.summary.lines();
    println!(
        "{:<12} {}",
        "AI Summary",
        style(summary.next().unwrap_or_default()).italic()
    );
    for line in summary {
        println!("{:<12} {}", "", style(line).italic());
    }
    println!("{}", "-".repeat(RULE_WIDTH));
}

pub fn print_history(records: &[AnalysisRecord]) {
    println!("\n{}", style("Recent Analysis History").bold());
    println!("{}", "-".repeat(RULE_WIDTH));
    println!("{:<19}  {:<12}  Snippet", "Timestamp", "Sentiment");
    println!("{}", "-".repeat(RULE_WIDTH));

    for record in records {
        let cell = format!("{:<12}", record.sentiment.as_str());
        println!(
            "{}  {}  {}",
            style(format!("{:<19}", record.short_timestamp())).dim(),
            sentiment_style(&record.sentiment, cell),
            single_line(&record.snippet())
        );
    }
}
