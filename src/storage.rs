//! Flat-file history store.
//!
//! All records live in a single JSON array. Every save reads the whole file,
//! appends, and rewrites it. There is no locking: two processes saving at
//! the same time can lose one of the writes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::models::{AnalysisRecord, NewAnalysis};

/// Errors from writing the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// What was found on disk.
enum Loaded {
    Missing,
    Records(Vec<AnalysisRecord>),
    Corrupt(String),
}

/// Append-only store of [`AnalysisRecord`]s in a JSON file.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Store a new analysis, assigning its id and timestamp. Returns the id.
    pub fn save(&self, analysis: NewAnalysis) -> Result<String, StoreError> {
        Ok(self.save_record(analysis)?.id)
    }

    /// Like [`HistoryStore::save`], returning the full stored record.
    pub fn save_record(&self, analysis: NewAnalysis) -> Result<AnalysisRecord, StoreError> {
        let mut records = match self.load() {
            Loaded::Missing => Vec::new(),
            Loaded::Records(records) => records,
            Loaded::Corrupt(reason) => {
                self.set_aside_corrupt(&reason);
                Vec::new()
            }
        };

        let record = AnalysisRecord::from_analysis(
            uuid::Uuid::new_v4().to_string(),
            Local::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            analysis,
        );
        records.push(record.clone());
        self.write_all(&records)?;

        debug!("Saved analysis record: {}", record.id);
        Ok(record)
    }

    /// The `limit` most recently saved records, newest first.
    ///
    /// A missing or unreadable store yields an empty list.
    pub fn get_history(&self, limit: usize) -> Vec<AnalysisRecord> {
        let records = match self.load() {
            Loaded::Records(records) => records,
            Loaded::Missing | Loaded::Corrupt(_) => return Vec::new(),
        };

        let start = records.len().saturating_sub(limit);
        records.into_iter().skip(start).rev().collect()
    }

    /// Total number of readable records.
    pub fn count(&self) -> usize {
        match self.load() {
            Loaded::Records(records) => records.len(),
            Loaded::Missing | Loaded::Corrupt(_) => 0,
        }
    }

    fn load(&self) -> Loaded {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Loaded::Missing,
            Err(e) => {
                error!("Error loading database {}: {}", self.path.display(), e);
                return Loaded::Corrupt(e.to_string());
            }
        };

        match serde_json::from_str(&contents) {
            Ok(records) => Loaded::Records(records),
            Err(e) => {
                error!("Error loading database {}: {}", self.path.display(), e);
                Loaded::Corrupt(e.to_string())
            }
        }
    }

    /// Move an unreadable store out of the way so the next write cannot destroy it.
    fn set_aside_corrupt(&self, reason: &str) {
        let mut backup = self.path.clone().into_os_string();
        backup.push(".corrupt");
        let backup = PathBuf::from(backup);

        match fs::rename(&self.path, &backup) {
            Ok(()) => warn!(
                "History at {} is unreadable ({}); moved to {}",
                self.path.display(),
                reason,
                backup.display()
            ),
            Err(e) => warn!(
                "History at {} is unreadable ({}) and could not be moved aside: {}",
                self.path.display(),
                reason,
                e
            ),
        }
    }

    fn write_all(&self, records: &[AnalysisRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(records)?;
        fs::write(&self.path, json).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TextAnalyzer;
    use crate::models::{Sentiment, SentimentResult};
    use tempfile::TempDir;

    fn analysis(text: &str) -> NewAnalysis {
        NewAnalysis {
            text: text.to_string(),
            stats: TextAnalyzer::new().analyze(text),
            sentiment: SentimentResult::new(Sentiment::Neutral, "LOW"),
            summary: "summary".to_string(),
        }
    }

    fn store(dir: &TempDir) -> HistoryStore {
        HistoryStore::new(dir.path().join("subdir").join("db.json"))
    }

    #[test]
    fn test_save_writes_record_with_id_and_timestamp() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        let id = store.save(analysis("Test input")).unwrap();
        assert!(!id.is_empty());
        assert!(store.path().exists());

        let contents = fs::read_to_string(store.path()).unwrap();
        let saved: Vec<serde_json::Value> = serde_json::from_str(&contents).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0]["id"], id.as_str());
        assert_eq!(saved[0]["text"], "Test input");
        assert_eq!(saved[0]["word_count"], 2);
        assert!(!saved[0]["timestamp"].as_str().unwrap().is_empty());
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        for text in ["First", "Second", "Third"] {
            store.save(analysis(text)).unwrap();
        }

        let history = store.get_history(2);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "Third");
        assert_eq!(history[1].text, "Second");
    }

    #[test]
    fn test_history_limit_larger_than_store() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.save(analysis("only")).unwrap();
        assert_eq!(store.get_history(10).len(), 1);
        assert!(store.get_history(0).is_empty());
    }

    #[test]
    fn test_missing_store_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.get_history(5).is_empty());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_corrupt_store_is_empty_history() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{not json").unwrap();
        let store = HistoryStore::new(&path);
        assert!(store.get_history(5).is_empty());
    }

    #[test]
    fn test_save_over_corrupt_store_keeps_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        fs::write(&path, "{not json").unwrap();
        let store = HistoryStore::new(&path);

        store.save(analysis("fresh")).unwrap();

        assert_eq!(store.count(), 1);
        let backup = dir.path().join("db.json.corrupt");
        assert_eq!(fs::read_to_string(backup).unwrap(), "{not json");
    }
}
