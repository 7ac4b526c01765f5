//! Command-line interface.
//!
//! Without a subcommand, `--text` or `--file`, the interactive menu starts.

mod app;
mod commands;
mod menu;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing::debug;

use text_analyzer::config::{load_settings_with_options, LoadOptions};

use app::{App, EXPORT_LIMIT, HISTORY_LIMIT};
use menu::Prompter;

#[derive(Parser)]
#[command(name = "text-analyzer")]
#[command(about = "Text Analyzer CLI powered by Gemini AI")]
#[command(version)]
pub struct Cli {
    /// Text string to analyze directly
    #[arg(long, conflicts_with = "file")]
    text: Option<String>,

    /// Path to a text or PDF file to analyze
    #[arg(long)]
    file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the history store (overrides config and environment)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Check if debug mode is enabled (for early logging setup).
pub fn is_debug() -> bool {
    std::env::args().any(|arg| arg == "--debug")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Markdown,
    /// Google Sheets spreadsheet shared with the service account
    Sheet,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the most recent analyses
    History {
        /// Number of records to show
        #[arg(short, long, default_value_t = HISTORY_LIMIT)]
        limit: usize,
    },

    /// Export the analysis history
    Export {
        /// Output format
        #[arg(short, long, value_enum)]
        format: ExportFormat,
        /// Spreadsheet name (required for the sheet format)
        #[arg(long, required_if_eq("format", "sheet"))]
        sheet: Option<String>,
        /// Number of most recent records to export
        #[arg(short, long, default_value_t = EXPORT_LIMIT)]
        limit: usize,
    },

    /// List Gemini models that support content generation
    Models,

    /// Check the Gemini integration with a known-positive sentence
    Verify,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        println!("{}", style("DEBUG MODE ENABLED").yellow());
        debug!("Debug mode enabled.");
    }

    let (settings, _config) = load_settings_with_options(LoadOptions {
        config_path: cli.config,
        data_dir: cli.data_dir,
    })
    .await;

    match cli.command {
        Some(Commands::Models) => return commands::cmd_models(&settings).await,
        Some(Commands::Verify) => return commands::cmd_verify(&settings).await,
        _ => {}
    }

    let app = App::new(settings);
    debug!(
        "History store: {}, exports: {}",
        app.store().path().display(),
        app.settings().export_dir.display()
    );

    match cli.command {
        Some(Commands::History { limit }) => commands::cmd_history(&app, limit),
        Some(Commands::Export {
            format,
            sheet,
            limit,
        }) => commands::cmd_export(&app, format, sheet, limit).await,
        Some(Commands::Models) | Some(Commands::Verify) => Ok(()),
        None => {
            if let Some(text) = cli.text {
                app.perform_analysis(&text, "CLI Argument").await;
                Ok(())
            } else if let Some(file) = cli.file {
                app.analyze_file(&file).await.map(|_| ())
            } else {
                let stdin = std::io::stdin();
                let mut prompter = Prompter::new(stdin.lock());
                menu::run_menu(&app, &mut prompter).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_export_sheet_requires_name() {
        assert!(Cli::try_parse_from(["text-analyzer", "export", "--format", "sheet"]).is_err());
        let cli = Cli::try_parse_from([
            "text-analyzer",
            "export",
            "--format",
            "sheet",
            "--sheet",
            "Results",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Export {
                format: ExportFormat::Sheet,
                limit: EXPORT_LIMIT,
                ..
            })
        ));
    }

    #[test]
    fn test_text_and_file_conflict() {
        assert!(
            Cli::try_parse_from(["text-analyzer", "--text", "hi", "--file", "a.txt"]).is_err()
        );
        let cli = Cli::try_parse_from(["text-analyzer", "--text", "hi", "--debug"]).unwrap();
        assert_eq!(cli.text.as_deref(), Some("hi"));
        assert!(cli.debug);
    }

    #[test]
    fn test_history_default_limit() {
        let cli = Cli::try_parse_from(["text-analyzer", "history"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::History { limit: HISTORY_LIMIT })
        ));
    }
}
