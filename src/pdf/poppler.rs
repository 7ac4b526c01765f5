//! PDF text via the poppler command-line tools (`pdfinfo`, `pdftotext`).

use std::path::Path;
use std::process::Command;

use super::extractor::{ExtractionError, ExtractionMode, PdfBackend};

const PDFINFO: &str = "pdfinfo (install poppler-utils)";
const PDFTOTEXT: &str = "pdftotext (install poppler-utils)";

/// Handle command output, extracting stdout on success or returning appropriate error.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
    error_prefix: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) => {
            if output.status.success() {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            } else {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(ExtractionError::ExtractionFailed(format!(
                    "{}: {}",
                    error_prefix,
                    stderr.trim()
                )))
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ExtractionError::ToolNotFound(tool_name.to_string()))
        }
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

/// Read the `Pages:` line of `pdfinfo` output.
fn parse_page_count(info: &str) -> Option<u32> {
    info.lines()
        .find(|line| line.starts_with("Pages:"))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse().ok())
}

/// Poppler-backed [`PdfBackend`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PopplerBackend;

impl PopplerBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for PopplerBackend {
    fn page_count(&self, path: &Path) -> Result<u32, ExtractionError> {
        let output = Command::new("pdfinfo").arg(path).output();
        let info = handle_cmd_output(output, PDFINFO, "pdfinfo failed")?;

        parse_page_count(&info).ok_or_else(|| {
            ExtractionError::ExtractionFailed(format!(
                "pdfinfo reported no page count for {}",
                path.display()
            ))
        })
    }

    fn page_text(
        &self,
        path: &Path,
        page: u32,
        mode: ExtractionMode,
    ) -> Result<String, ExtractionError> {
        let page_str = page.to_string();
        let mode_flag = match mode {
            ExtractionMode::Layout => "-layout",
            ExtractionMode::Plain => "-raw",
        };

        let output = Command::new("pdftotext")
            .args([mode_flag, "-enc", "UTF-8", "-f", &page_str, "-l", &page_str])
            .arg(path)
            .arg("-") // Output to stdout
            .output();

        let text = handle_cmd_output(
            output,
            PDFTOTEXT,
            &format!("pdftotext failed on page {}", page),
        )?;

        // pdftotext ends every page with a form feed
        Ok(text.trim_end_matches(['\u{0c}', '\n']).to_string())
    }
}
