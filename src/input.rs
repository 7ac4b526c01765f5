//! Loading analysis input from files and interactive prompts.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::pdf::{ExtractionError, PdfBackend, PdfTextExtractor};

/// True for paths ending in `.pdf`, in any case.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Read a document's text: PDFs through `pdf`, anything else as UTF-8.
pub fn load_document<B: PdfBackend>(
    path: &Path,
    pdf: &PdfTextExtractor<B>,
) -> Result<String, ExtractionError> {
    if is_pdf(path) {
        debug!("Detected PDF file: {}", path.display());
        pdf.extract_text(path)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Label used when announcing what is being analyzed.
pub fn source_label(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    if is_pdf(path) {
        format!("PDF: {}", name)
    } else {
        format!("File: {}", name)
    }
}

/// Trim whitespace and surrounding quotes, as left by drag-and-drop into a terminal.
pub fn clean_input(input: &str) -> &str {
    input.trim().trim_matches(|c| c == '\'' || c == '"')
}

/// Whether typed input should be tried as a file path.
pub fn looks_like_path(input: &str) -> bool {
    let cleaned = clean_input(input);
    !cleaned.is_empty()
        && (Path::new(cleaned).is_file() || cleaned.contains('/') || cleaned.contains('.'))
}

/// The existing file typed input refers to, if any.
///
/// `None` means the input should be analyzed as literal text.
pub fn resolve_input_path(input: &str) -> Option<PathBuf> {
    if !looks_like_path(input) {
        return None;
    }
    let expanded = shellexpand::tilde(clean_input(input));
    let path = PathBuf::from(expanded.as_ref());
    path.exists().then_some(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct NoPdf;

    impl PdfBackend for NoPdf {
        fn page_count(&self, _: &Path) -> Result<u32, ExtractionError> {
            Ok(1)
        }

        fn page_text(
            &self,
            _: &Path,
            _: u32,
            _: crate::pdf::ExtractionMode,
        ) -> Result<String, ExtractionError> {
            Ok("pdf page".to_string())
        }
    }

    #[test]
    fn test_is_pdf_ignores_case() {
        assert!(is_pdf(Path::new("report.PDF")));
        assert!(is_pdf(Path::new("a/b.pdf")));
        assert!(!is_pdf(Path::new("notes.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_load_text_and_pdf() {
        let dir = TempDir::new().unwrap();
        let txt = dir.path().join("notes.txt");
        fs::write(&txt, "line one\nline two").unwrap();
        let pdf = dir.path().join("doc.pdf");
        fs::write(&pdf, b"%PDF-1.4").unwrap();

        let extractor = PdfTextExtractor::new(NoPdf);
        assert_eq!(
            load_document(&txt, &extractor).unwrap(),
            "line one\nline two"
        );
        assert_eq!(load_document(&pdf, &extractor).unwrap(), "pdf page");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let extractor = PdfTextExtractor::new(NoPdf);
        let err = load_document(Path::new("/definitely/missing.txt"), &extractor).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_clean_input() {
        assert_eq!(clean_input("  'some file.txt' "), "some file.txt");
        assert_eq!(clean_input("\"quoted\"\n"), "quoted");
    }

    #[test]
    fn test_plain_sentence_is_literal() {
        assert!(!looks_like_path("I love this product"));
        assert!(resolve_input_path("I love this product").is_none());
        // Looks like a path but nothing is there
        assert!(looks_like_path("Great job."));
        assert!(resolve_input_path("Great job.").is_none());
    }

    #[test]
    fn test_existing_file_resolves() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        fs::write(&path, "hi").unwrap();

        let quoted = format!("'{}'", path.display());
        assert_eq!(resolve_input_path(&quoted), Some(path.clone()));
        assert_eq!(source_label(&path), "File: input.txt");
    }
}
