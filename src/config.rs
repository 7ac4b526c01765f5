//! Configuration management using the prefer crate for file discovery.
//!
//! Precedence, lowest first: built-in defaults, config file, environment,
//! command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::llm::GeminiConfig;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_DATABASE_FILENAME: &str = "db.json";
pub const DEFAULT_EXPORT_DIR: &str = "exports";
pub const DEFAULT_CREDENTIALS_PATH: &str = "credentials.json";

/// Resolved runtime settings handed to each component.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the history store.
    pub data_dir: PathBuf,
    /// Store filename inside `data_dir`.
    pub database_filename: String,
    /// Directory CSV and Markdown exports are written to.
    pub export_dir: PathBuf,
    /// Service-account key used for spreadsheet export.
    pub credentials_path: PathBuf,
    pub gemini: GeminiConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            database_filename: DEFAULT_DATABASE_FILENAME.to_string(),
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            gemini: GeminiConfig::base_default(),
        }
    }
}

impl Settings {
    /// Full path to the history store.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_filename)
    }
}

/// Spreadsheet export section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<String>,
}

impl SheetsConfig {
    pub fn is_default(&self) -> bool {
        self.credentials_path.is_none()
    }
}

/// Contents of a config file. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Store filename.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<String>,
    #[serde(
        default = "GeminiConfig::base_default",
        skip_serializing_if = "GeminiConfig::is_default"
    )]
    pub gemini: GeminiConfig,
    #[serde(default, skip_serializing_if = "SheetsConfig::is_default")]
    pub sheets: SheetsConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            database: None,
            export_dir: None,
            gemini: GeminiConfig::base_default(),
            sheets: SheetsConfig::default(),
            source_path: None,
        }
    }
}

impl Config {
    /// Discover a `text-analyzer.*` config file in the standard locations.
    pub async fn load() -> Self {
        match prefer::load("text-analyzer").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("{}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// The format follows the extension: TOML, YAML, otherwise JSON.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// The config file's directory, if loaded from a file.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are joined onto `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        resolve_path(path_str, base_dir)
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = self.resolve_path(data_dir, base_dir);
        }
        if let Some(ref database) = self.database {
            settings.database_filename = database.clone();
        }
        if let Some(ref export_dir) = self.export_dir {
            settings.export_dir = self.resolve_path(export_dir, base_dir);
        }
        if let Some(ref credentials) = self.sheets.credentials_path {
            settings.credentials_path = self.resolve_path(credentials, base_dir);
        }
        settings.gemini = self.gemini.clone();
    }
}

fn resolve_path(path_str: &str, base_dir: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(path_str);
    let path = Path::new(expanded.as_ref());

    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Apply environment overrides that concern paths.
///
/// `lookup` returns the value of a variable; empty values are ignored.
fn apply_path_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let cwd = Path::new(".");

    if let Some(dir) = get("TEXT_ANALYZER_DATA_DIR") {
        tracing::debug!("Using TEXT_ANALYZER_DATA_DIR from environment: {}", dir);
        settings.data_dir = resolve_path(&dir, cwd);
    }
    if let Some(path) = get("GOOGLE_CREDENTIALS_PATH") {
        tracing::debug!("Using GOOGLE_CREDENTIALS_PATH from environment: {}", path);
        settings.credentials_path = resolve_path(&path, cwd);
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Data directory (--data-dir flag).
    pub data_dir: Option<PathBuf>,
}

async fn load_file_config(options: &LoadOptions) -> Config {
    if let Some(ref config_path) = options.config_path {
        return match Config::load_from_path(config_path).await {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Config::default()
            }
        };
    }
    Config::load().await
}

/// Resolve settings from defaults, config file, environment and flags.
pub async fn load_settings_with_options(options: LoadOptions) -> (Settings, Config) {
    let config = load_file_config(&options).await;
    let settings = resolve_settings(&config, &options, |name| std::env::var(name).ok());
    (settings, config)
}

fn resolve_settings(
    config: &Config,
    options: &LoadOptions,
    lookup: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    let base_dir = config.base_dir().unwrap_or_else(|| PathBuf::from("."));
    config.apply_to_settings(&mut settings, &base_dir);

    settings.gemini = settings.gemini.with_overrides_from(&lookup);
    apply_path_env(&mut settings, &lookup);

    if let Some(ref data_dir) = options.data_dir {
        settings.data_dir = data_dir.clone();
    }

    if let Some(ref path) = config.source_path {
        tracing::debug!("Loaded config from {}", path.display());
    }
    settings
}
