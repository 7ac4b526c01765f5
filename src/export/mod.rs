//! Export of stored analyses to CSV, Markdown and Google Sheets.

mod csv;
mod markdown;
mod sheets;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::models::AnalysisRecord;

pub use self::csv::{escape_csv, render_csv};
pub use self::markdown::render_markdown;
pub use self::sheets::{
    build_rows, truncate_cell, ServiceAccountKey, SheetsError, SheetsExporter, CELL_CHAR_LIMIT,
    TRUNCATION_MARKER,
};

/// Default CSV export filename.
pub const CSV_FILENAME: &str = "export_history.csv";
/// Default Markdown export filename.
pub const MARKDOWN_FILENAME: &str = "export_history.md";

/// Errors from the file exporters.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Writes export files into a single directory.
#[derive(Debug, Clone)]
pub struct ReportExporter {
    export_dir: PathBuf,
}

impl ReportExporter {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Write records as CSV. `Ok(None)` when there is nothing to export.
    pub fn to_csv(&self, records: &[AnalysisRecord]) -> Result<Option<PathBuf>, ExportError> {
        self.to_csv_named(records, CSV_FILENAME)
    }

    pub fn to_csv_named(
        &self,
        records: &[AnalysisRecord],
        filename: &str,
    ) -> Result<Option<PathBuf>, ExportError> {
        if records.is_empty() {
            warn!("No data to export.");
            return Ok(None);
        }
        let path = self.write(filename, &render_csv(records))?;
        info!("Exported {} records to {}", records.len(), path.display());
        Ok(Some(path))
    }

    /// Write records as a Markdown report. `Ok(None)` when there is nothing to export.
    pub fn to_markdown(&self, records: &[AnalysisRecord]) -> Result<Option<PathBuf>, ExportError> {
        self.to_markdown_named(records, MARKDOWN_FILENAME)
    }

    pub fn to_markdown_named(
        &self,
        records: &[AnalysisRecord],
        filename: &str,
    ) -> Result<Option<PathBuf>, ExportError> {
        if records.is_empty() {
            warn!("No data to export.");
            return Ok(None);
        }
        let report = render_markdown(records, chrono::Local::now());
        let path = self.write(filename, &report)?;
        info!("Exported {} records to {}", records.len(), path.display());
        Ok(Some(path))
    }

    /// Write `contents` to `<export_dir>/<filename>` and return the absolute path.
    fn write(&self, filename: &str, contents: &str) -> Result<PathBuf, ExportError> {
        let io_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| ExportError::Io { path, source }
        };

        fs::create_dir_all(&self.export_dir).map_err(io_err(&self.export_dir))?;
        let path = self.export_dir.join(filename);
        fs::write(&path, contents).map_err(io_err(&path))?;
        fs::canonicalize(&path).map_err(io_err(&path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use tempfile::TempDir;

    fn record(id: &str, text: &str) -> AnalysisRecord {
        AnalysisRecord {
            id: id.to_string(),
            timestamp: "2026-01-02T03:04:05.000000+00:00".to_string(),
            text: text.to_string(),
            word_count: text.split_whitespace().count(),
            char_count: text.chars().count(),
            line_count: 1,
            sentiment: Sentiment::Positive,
            confidence: "HIGH".to_string(),
            summary: "A summary.".to_string(),
        }
    }

    #[test]
    fn test_empty_export_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let export_dir = dir.path().join("exports");
        let exporter = ReportExporter::new(&export_dir);

        assert!(exporter.to_csv(&[]).unwrap().is_none());
        assert!(exporter.to_markdown(&[]).unwrap().is_none());
        assert!(!export_dir.exists());
    }

    #[test]
    fn test_csv_export_writes_absolute_path() {
        let dir = TempDir::new().unwrap();
        let exporter = ReportExporter::new(dir.path().join("exports"));

        let path = exporter
            .to_csv(&[record("1", "hello"), record("2", "bye")])
            .unwrap()
            .unwrap();

        assert!(path.is_absolute());
        assert!(path.ends_with(CSV_FILENAME));
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 3);
    }

    #[test]
    fn test_markdown_export_writes_file() {
        let dir = TempDir::new().unwrap();
        let exporter = ReportExporter::new(dir.path().join("exports"));

        let path = exporter
            .to_markdown(&[record("abc", "hello")])
            .unwrap()
            .unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# Analysis History Export"));
        assert!(contents.contains("## ID: abc"));
    }
}
