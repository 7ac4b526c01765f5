//! The application shell: wires the components together for one session.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use text_analyzer::analysis::analyze_text;
use text_analyzer::config::Settings;
use text_analyzer::export::{ReportExporter, ServiceAccountKey, SheetsExporter};
use text_analyzer::input::{load_document, resolve_input_path, source_label};
use text_analyzer::llm::{GeminiClient, SentimentProvider};
use text_analyzer::models::AnalysisRecord;
use text_analyzer::pdf::PdfTextExtractor;
use text_analyzer::storage::HistoryStore;
use text_analyzer::utils::char_prefix;

use super::render::{self, Mark};
use super::ExportFormat;

/// Records shown by the history view.
pub const HISTORY_LIMIT: usize = 5;
/// Most recent records included in an export.
pub const EXPORT_LIMIT: usize = 100;

pub struct App {
    settings: Settings,
    store: HistoryStore,
    provider: Option<Box<dyn SentimentProvider>>,
    pdf: PdfTextExtractor,
    exporter: ReportExporter,
}

impl App {
    /// Build the application with the Gemini client as provider.
    pub fn new(settings: Settings) -> Self {
        let provider: Option<Box<dyn SentimentProvider>> =
            match GeminiClient::new(settings.gemini.clone()) {
                Ok(client) => Some(Box::new(client)),
                Err(e) => {
                    warn!("AI client unavailable, analyses will skip it: {}", e);
                    None
                }
            };
        Self::with_provider(settings, provider)
    }

    pub fn with_provider(settings: Settings, provider: Option<Box<dyn SentimentProvider>>) -> Self {
        Self {
            store: HistoryStore::new(settings.database_path()),
            exporter: ReportExporter::new(&settings.export_dir),
            pdf: PdfTextExtractor::default(),
            provider,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    fn spinner(&self) -> ProgressBar {
        let name = self
            .provider
            .as_ref()
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| "AI".to_string());

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Consulting {}...", name));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// Analyze `text`, store the result and print it.
    ///
    /// Returns the stored record; `None` when the input was refused or the
    /// record could not be saved.
    pub async fn perform_analysis(&self, text: &str, source: &str) -> Option<AnalysisRecord> {
        if text.trim().is_empty() {
            println!("{} Error: Input text is empty.", Mark::Fail);
            return None;
        }

        println!("\n{} Analyzing {}...", Mark::Step, source);

        let pb = self.spinner();
        let outcome = analyze_text(text, self.provider.as_deref()).await;
        pb.finish_and_clear();

        let analysis = match outcome {
            Ok(analysis) => analysis,
            Err(e) => {
                println!("{} Error: {}.", Mark::Fail, e);
                return None;
            }
        };

        let saved = match self.store.save_record(analysis.clone()) {
            Ok(record) => {
                println!(
                    "{} Analysis saved (ID: {})",
                    Mark::Done,
                    char_prefix(&record.id, 8)
                );
                Some(record)
            }
            Err(e) => {
                error!("DB Save failed: {}", e);
                println!("{} Warning: Could not save to database.", Mark::Warn);
                None
            }
        };

        render::print_results(&analysis);
        saved
    }

    /// Analyze a file given on the command line.
    ///
    /// A missing file is reported and is not an error.
    pub async fn analyze_file(&self, path: &Path) -> anyhow::Result<Option<AnalysisRecord>> {
        match load_document(path, &self.pdf) {
            Ok(text) => Ok(self.perform_analysis(&text, &source_label(path)).await),
            Err(e) if e.is_not_found() => {
                println!(
                    "{} Error: File not found: {}",
                    Mark::Fail,
                    path.display()
                );
                Ok(None)
            }
            Err(e) => Err(anyhow::anyhow!("Error reading {}: {}", path.display(), e)),
        }
    }

    /// Analyze interactive input: a path to an existing file, or literal text.
    pub async fn analyze_input(&self, input: &str) -> Option<AnalysisRecord> {
        if let Some(path) = resolve_input_path(input) {
            debug!("Input resolved to file {}", path.display());
            match load_document(&path, &self.pdf) {
                Ok(text) => return self.perform_analysis(&text, &source_label(&path)).await,
                Err(e) => println!("{} Error reading file: {}", Mark::Fail, e),
            }
        }
        self.perform_analysis(input, "Input").await
    }

    pub fn show_history(&self, limit: usize) {
        let history = self.store.get_history(limit);
        if history.is_empty() {
            println!("{} No history found.", Mark::Warn);
            return;
        }
        render::print_history(&history);
    }

    /// Export the `limit` most recent records. Nothing is written when the
    /// history is empty.
    pub async fn export(
        &self,
        format: ExportFormat,
        sheet_name: Option<&str>,
        limit: usize,
    ) -> anyhow::Result<()> {
        let history = self.store.get_history(limit);
        if history.is_empty() {
            println!("{} No history to export.", Mark::Warn);
            return Ok(());
        }

        match format {
            ExportFormat::Csv => {
                if let Some(path) = self.exporter.to_csv(&history)? {
                    report_file("CSV", &path);
                }
            }
            ExportFormat::Markdown => {
                if let Some(path) = self.exporter.to_markdown(&history)? {
                    report_file("Markdown", &path);
                }
            }
            ExportFormat::Sheet => {
                let sheet_name = sheet_name
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .ok_or_else(|| anyhow::anyhow!("A spreadsheet name is required"))?;
                let key = ServiceAccountKey::from_file(&self.settings.credentials_path)?;
                let exporter = SheetsExporter::new()?;
                if let Some(url) = exporter.to_spreadsheet(&history, sheet_name, &key).await? {
                    println!("{} Successfully exported to: {}", Mark::Done, url);
                }
            }
        }
        Ok(())
    }
}

fn report_file(kind: &str, path: &Path) {
    println!(
        "{} Successfully exported {} to: {}",
        Mark::Done,
        kind,
        path.display()
    );
}
