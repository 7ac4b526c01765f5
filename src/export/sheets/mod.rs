//! Google Sheets export.
//!
//! The target spreadsheet must already exist and be shared with the service
//! account. Its first worksheet is cleared and replaced with a header row
//! plus one row per record.

mod auth;

use std::path::PathBuf;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use auth::ServiceAccountKey;

use crate::models::{AnalysisRecord, FieldValue, RECORD_COLUMNS};
use crate::utils::char_prefix;

/// Longest string written to a single cell before truncation.
pub const CELL_CHAR_LIMIT: usize = 30_000;
/// Appended to truncated cells.
pub const TRUNCATION_MARKER: &str = "... [TRUNCATED]";

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const DRIVE_FILES_API: &str = "https://www.googleapis.com/drive/v3/files";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

#[derive(Debug, Error)]
pub enum SheetsError {
    #[error("Credentials file not found at: {0}")]
    CredentialsNotFound(PathBuf),

    #[error("Invalid service account credentials: {0}")]
    InvalidCredentials(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Spreadsheet '{0}' not found. Did you share it with the service account email?")]
    SpreadsheetNotFound(String),

    #[error("Sheets API error: {0}")]
    Api(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetMeta>,
}

#[derive(Debug, Deserialize)]
struct SheetMeta {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange<'a> {
    range: &'a str,
    major_dimension: &'a str,
    values: &'a [Vec<Value>],
}

/// Cut `value` to [`CELL_CHAR_LIMIT`] characters, marking the cut.
pub fn truncate_cell(value: &str) -> String {
    let prefix = char_prefix(value, CELL_CHAR_LIMIT);
    if prefix.len() == value.len() {
        value.to_string()
    } else {
        format!("{}{}", prefix, TRUNCATION_MARKER)
    }
}

/// Header row followed by one row per record, strings truncated to fit a cell.
pub fn build_rows(records: &[AnalysisRecord]) -> Vec<Vec<Value>> {
    let mut rows = Vec::with_capacity(records.len() + 1);
    rows.push(
        RECORD_COLUMNS
            .iter()
            .map(|c| Value::String(c.to_string()))
            .collect(),
    );

    for record in records {
        rows.push(
            record
                .fields()
                .iter()
                .map(|field| match field {
                    FieldValue::Text(s) => Value::String(truncate_cell(s)),
                    FieldValue::Count(n) => Value::from(*n),
                })
                .collect(),
        );
    }
    rows
}

/// Escape a name for use inside a single-quoted Drive query literal.
fn drive_query_literal(name: &str) -> String {
    name.replace('\\', "\\\\").replace('\'', "\\'")
}

/// A1 range naming a whole worksheet, e.g. `'Sheet 1'`.
fn sheet_range(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

async fn checked(request: RequestBuilder, what: &str) -> Result<reqwest::Response, SheetsError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SheetsError::Api(format!(
        "{} failed with HTTP {}: {}",
        what,
        status,
        body.trim()
    )))
}

/// Pushes records to a remote spreadsheet.
pub struct SheetsExporter {
    client: Client,
}

impl SheetsExporter {
    pub fn new() -> Result<Self, SheetsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { client })
    }

    /// Replace the first worksheet of `sheet_name` with `records`.
    ///
    /// Returns the spreadsheet URL, or `Ok(None)` when there is nothing to export.
    pub async fn to_spreadsheet(
        &self,
        records: &[AnalysisRecord],
        sheet_name: &str,
        key: &ServiceAccountKey,
    ) -> Result<Option<String>, SheetsError> {
        if records.is_empty() {
            warn!("No data to export.");
            return Ok(None);
        }

        let token = key.access_token(&self.client).await?;
        let spreadsheet_id = self.find_spreadsheet(&token, sheet_name).await?;
        let title = self.first_sheet_title(&token, &spreadsheet_id).await?;
        let range = sheet_range(&title);

        debug!("Clearing worksheet {} of {}", title, spreadsheet_id);
        checked(
            self.client
                .post(format!(
                    "{}/{}/values/{}:clear",
                    SHEETS_API,
                    spreadsheet_id,
                    urlencoding::encode(&range)
                ))
                .bearer_auth(&token)
                .json(&serde_json::json!({})),
            "Clearing worksheet",
        )
        .await?;

        let rows = build_rows(records);
        let start = format!("{}!A1", range);
        checked(
            self.client
                .put(format!(
                    "{}/{}/values/{}",
                    SHEETS_API,
                    spreadsheet_id,
                    urlencoding::encode(&start)
                ))
                .query(&[("valueInputOption", "RAW")])
                .bearer_auth(&token)
                .json(&ValueRange {
                    range: &start,
                    major_dimension: "ROWS",
                    values: &rows,
                }),
            "Writing rows",
        )
        .await?;

        info!("Exported to Google Sheet: {}", sheet_name);
        Ok(Some(format!(
            "https://docs.google.com/spreadsheets/d/{}",
            spreadsheet_id
        )))
    }

    async fn find_spreadsheet(&self, token: &str, name: &str) -> Result<String, SheetsError> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            drive_query_literal(name),
            SPREADSHEET_MIME
        );

        let list: DriveFileList = checked(
            self.client
                .get(DRIVE_FILES_API)
                .query(&[
                    ("q", query.as_str()),
                    ("fields", "files(id,name)"),
                    ("supportsAllDrives", "true"),
                    ("includeItemsFromAllDrives", "true"),
                ])
                .bearer_auth(token),
            "Spreadsheet lookup",
        )
        .await?
        .json()
        .await?;

        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| SheetsError::SpreadsheetNotFound(name.to_string()))
    }

    async fn first_sheet_title(&self, token: &str, id: &str) -> Result<String, SheetsError> {
        let meta: SpreadsheetMeta = checked(
            self.client
                .get(format!("{}/{}", SHEETS_API, id))
                .query(&[("fields", "sheets.properties.title")])
                .bearer_auth(token),
            "Reading spreadsheet metadata",
        )
        .await?
        .json()
        .await?;

        meta.sheets
            .into_iter()
            .next()
            .map(|s| s.properties.title)
            .ok_or_else(|| SheetsError::Api("spreadsheet has no worksheets".to_string()))
    }
}
