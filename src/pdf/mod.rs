//! PDF text extraction.
//!
//! Pages are extracted one at a time. A page that fails in the primary
//! layout-preserving mode is retried in plain mode, and a page that fails in
//! both is skipped. Only a failure to open the document as a whole is fatal.

mod extractor;
mod poppler;

pub use extractor::{ExtractionError, ExtractionMode, PdfBackend, PdfTextExtractor};
pub use poppler::PopplerBackend;
