//! Page-by-page PDF text extraction with a plain-mode fallback.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, error, warn};

use super::poppler::PopplerBackend;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExtractionError {
    /// True when the file itself does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// How a page's text is pulled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractionMode {
    /// Preserve the physical layout of the page.
    Layout,
    /// Content-stream order, no layout reconstruction.
    Plain,
}

impl ExtractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Layout => "layout",
            Self::Plain => "plain",
        }
    }
}

/// Source of per-page PDF text.
pub trait PdfBackend {
    /// Number of pages. Failing here means the document is unreadable.
    fn page_count(&self, path: &Path) -> Result<u32, ExtractionError>;

    /// Text of a single 1-based page.
    fn page_text(
        &self,
        path: &Path,
        page: u32,
        mode: ExtractionMode,
    ) -> Result<String, ExtractionError>;
}

/// Extracts the text of every readable page of a PDF.
pub struct PdfTextExtractor<B = PopplerBackend> {
    backend: B,
}

impl Default for PdfTextExtractor<PopplerBackend> {
    fn default() -> Self {
        Self::new(PopplerBackend::new())
    }
}

impl<B: PdfBackend> PdfTextExtractor<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Extract all page texts joined by newlines.
    ///
    /// Page failures are logged and skipped. Errors opening the document, and
    /// a missing extraction tool, are returned.
    pub fn extract_text(&self, path: &Path) -> Result<String, ExtractionError> {
        // Surface a plain "not found" before the backend reports it its own way
        std::fs::metadata(path)?;

        let page_count = self.backend.page_count(path).map_err(|e| {
            error!("Error extracting PDF text from {}: {}", path.display(), e);
            e
        })?;
        debug!("Extracting {} pages from {}", page_count, path.display());

        let mut pages: Vec<String> = Vec::new();
        for page in 1..=page_count {
            if let Some(text) = self.extract_page(path, page)? {
                if !text.is_empty() {
                    pages.push(text);
                }
            }
        }

        Ok(pages.join("\n"))
    }

    /// One page, falling back to plain mode. `Ok(None)` means skipped.
    fn extract_page(&self, path: &Path, page: u32) -> Result<Option<String>, ExtractionError> {
        match self.backend.page_text(path, page, ExtractionMode::Layout) {
            Ok(text) => return Ok(Some(text)),
            Err(e @ ExtractionError::ToolNotFound(_)) => return Err(e),
            Err(e) => {
                warn!(
                    "Failed to extract text from page {} ({} mode): {}",
                    page,
                    ExtractionMode::Layout.as_str(),
                    e
                );
            }
        }

        match self.backend.page_text(path, page, ExtractionMode::Plain) {
            Ok(text) => Ok(Some(text)),
            Err(e @ ExtractionError::ToolNotFound(_)) => Err(e),
            Err(e) => {
                error!(
                    "Failed to extract text from page {} ({} mode): {}",
                    page,
                    ExtractionMode::Plain.as_str(),
                    e
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    /// Scripted backend: per (page, mode) either text or a failure.
    #[derive(Default)]
    struct FakeBackend {
        pages: u32,
        unreadable: bool,
        replies: HashMap<(u32, ExtractionMode), Result<String, String>>,
        calls: RefCell<Vec<(u32, ExtractionMode)>>,
    }

    impl FakeBackend {
        fn with_pages(pages: u32) -> Self {
            Self {
                pages,
                ..Default::default()
            }
        }

        fn reply(mut self, page: u32, mode: ExtractionMode, r: Result<&str, &str>) -> Self {
            self.replies.insert(
                (page, mode),
                r.map(str::to_string).map_err(str::to_string),
            );
            self
        }
    }

    impl PdfBackend for FakeBackend {
        fn page_count(&self, _path: &Path) -> Result<u32, ExtractionError> {
            if self.unreadable {
                return Err(ExtractionError::ExtractionFailed(
                    "Syntax Error: Couldn't find trailer dictionary".to_string(),
                ));
            }
            Ok(self.pages)
        }

        fn page_text(
            &self,
            _path: &Path,
            page: u32,
            mode: ExtractionMode,
        ) -> Result<String, ExtractionError> {
            self.calls.borrow_mut().push((page, mode));
            match self.replies.get(&(page, mode)) {
                Some(Ok(text)) => Ok(text.clone()),
                Some(Err(msg)) if msg == "missing-tool" => {
                    Err(ExtractionError::ToolNotFound("pdftotext".to_string()))
                }
                Some(Err(msg)) => Err(ExtractionError::ExtractionFailed(msg.clone())),
                None => Ok(format!("page {} {}", page, mode.as_str())),
            }
        }
    }

    fn pdf_file() -> NamedTempFile {
        NamedTempFile::new().unwrap()
    }

    #[test]
    fn test_joins_pages_with_newlines() {
        let file = pdf_file();
        let extractor = PdfTextExtractor::new(FakeBackend::with_pages(2));
        let text = extractor.extract_text(file.path()).unwrap();
        assert_eq!(text, "page 1 layout\npage 2 layout");
    }

    #[test]
    fn test_falls_back_to_plain_mode() {
        let file = pdf_file();
        let backend = FakeBackend::with_pages(2).reply(2, ExtractionMode::Layout, Err("bad font"));
        let extractor = PdfTextExtractor::new(backend);
        let text = extractor.extract_text(file.path()).unwrap();
        assert_eq!(text, "page 1 layout\npage 2 plain");
    }

    #[test]
    fn test_skips_page_failing_both_modes() {
        let file = pdf_file();
        let backend = FakeBackend::with_pages(3)
            .reply(2, ExtractionMode::Layout, Err("bad"))
            .reply(2, ExtractionMode::Plain, Err("worse"));
        let extractor = PdfTextExtractor::new(backend);
        let text = extractor.extract_text(file.path()).unwrap();
        assert_eq!(text, "page 1 layout\npage 3 layout");
    }

    #[test]
    fn test_skips_empty_pages() {
        let file = pdf_file();
        let backend = FakeBackend::with_pages(2).reply(1, ExtractionMode::Layout, Ok(""));
        let extractor = PdfTextExtractor::new(backend);
        assert_eq!(extractor.extract_text(file.path()).unwrap(), "page 2 layout");
    }

    #[test]
    fn test_unreadable_document_is_fatal() {
        let file = pdf_file();
        let backend = FakeBackend {
            unreadable: true,
            ..Default::default()
        };
        let extractor = PdfTextExtractor::new(backend);
        assert!(matches!(
            extractor.extract_text(file.path()),
            Err(ExtractionError::ExtractionFailed(_))
        ));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let extractor = PdfTextExtractor::new(FakeBackend::with_pages(1));
        let err = extractor
            .extract_text(Path::new("/nonexistent/dir/file.pdf"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_missing_tool_is_fatal() {
        let file = pdf_file();
        let backend =
            FakeBackend::with_pages(2).reply(1, ExtractionMode::Layout, Err("missing-tool"));
        let extractor = PdfTextExtractor::new(backend);
        assert!(matches!(
            extractor.extract_text(file.path()),
            Err(ExtractionError::ToolNotFound(_))
        ));
    }

    #[test]
    fn test_claimed_page_count_is_not_preallocated() {
        let file = pdf_file();
        let backend =
            FakeBackend::with_pages(u32::MAX).reply(1, ExtractionMode::Layout, Err("missing-tool"));
        let extractor = PdfTextExtractor::new(backend);
        assert!(matches!(
            extractor.extract_text(file.path()),
            Err(ExtractionError::ToolNotFound(_))
        ));
    }

    #[test]
    fn test_plain_mode_only_tried_after_failure() {
        let file = pdf_file();
        let extractor = PdfTextExtractor::new(FakeBackend::with_pages(2));
        extractor.extract_text(file.path()).unwrap();
        let calls = extractor.backend.calls.borrow();
        assert!(calls.iter().all(|(_, mode)| *mode == ExtractionMode::Layout));
        assert_eq!(calls.len(), 2);
    }
}
