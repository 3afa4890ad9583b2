//! Best-effort PDF text extraction.
//!
//! Text is pulled with `pdf-extract` first; if that fails the pages are
//! walked again with `lopdf`.

pub mod extractor;

pub use extractor::{ExtractedText, ExtractionBackend, PdfTextExtractor};
