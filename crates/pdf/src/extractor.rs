//! PDF text extraction with a fallback backend.

use aitools_core::config::{MIN_CONTENT_LENGTH, PROCESSING_CHUNK_SIZE};
use aitools_core::prompts::truncate_chars;
use aitools_core::{Error, Result};
use std::fmt;
use std::path::Path;

/// Which library produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionBackend {
    PdfExtract,
    Lopdf,
}

impl fmt::Display for ExtractionBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionBackend::PdfExtract => f.write_str("pdf-extract"),
            ExtractionBackend::Lopdf => f.write_str("lopdf"),
        }
    }
}

/// Plain text pulled from a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    /// Pages visited before the character budget was reached, including
    /// pages that had no text.
    pub pages_read: usize,
    pub backend: ExtractionBackend,
}

impl ExtractedText {
    /// The text cut to at most `budget` characters.
    pub fn budgeted(&self, budget: usize) -> &str {
        truncate_chars(&self.text, budget)
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Accumulates page text until the budget is exceeded.
struct PageCollector {
    budget: usize,
    text: String,
    chars: usize,
    pages: usize,
}

impl PageCollector {
    fn new(budget: usize) -> Self {
        Self {
            budget,
            text: String::new(),
            chars: 0,
            pages: 0,
        }
    }

    /// Append one page; returns false once the budget has been exceeded.
    fn push(&mut self, piece: &str) -> bool {
        self.text.push_str(piece);
        self.chars += piece.chars().count();
        self.pages += 1;
        self.chars <= self.budget
    }

    /// Count a page that contributed no text.
    fn skip(&mut self) {
        self.pages += 1;
    }
}

/// Extracts plain text from PDF bytes.
#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    char_budget: usize,
    min_content_length: usize,
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self {
            char_budget: PROCESSING_CHUNK_SIZE,
            min_content_length: MIN_CONTENT_LENGTH,
        }
    }
}

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop reading pages once this many characters have been collected.
    pub fn with_char_budget(mut self, budget: usize) -> Self {
        self.char_budget = budget;
        self
    }

    /// Warn when less than this many characters come out.
    pub fn with_min_content_length(mut self, min: usize) -> Self {
        self.min_content_length = min;
        self
    }

    /// Read and extract a PDF file.
    pub fn extract_file(&self, path: &Path) -> Result<ExtractedText> {
        let bytes = std::fs::read(path)?;
        self.extract(&bytes)
    }

    /// Extract text, falling back to the second backend if the first fails
    /// or finds nothing.
    pub fn extract(&self, bytes: &[u8]) -> Result<ExtractedText> {
        let primary_error = match self.extract_with_pdf_extract(bytes) {
            Ok(extracted) if !extracted.text.trim().is_empty() => return Ok(self.checked(extracted)),
            Ok(_) => "no text found".to_string(),
            Err(e) => e,
        };
        log::warn!("pdf-extract failed ({}), falling back to lopdf", primary_error);

        match self.extract_with_lopdf(bytes) {
            Ok(extracted) if !extracted.text.trim().is_empty() => Ok(self.checked(extracted)),
            Ok(_) => Err(Error::NoText("the document contains no extractable text".to_string())),
            Err(e) => Err(Error::NoText(format!("{}; {}", primary_error, e))),
        }
    }

    fn checked(&self, extracted: ExtractedText) -> ExtractedText {
        let count = extracted.char_count();
        if count < self.min_content_length {
            log::warn!(
                "Only {} characters extracted with {}; the PDF may be scanned",
                count,
                extracted.backend
            );
        } else {
            log::info!(
                "Extracted {} characters from {} pages with {}",
                count,
                extracted.pages_read,
                extracted.backend
            );
        }
        extracted
    }

    /// Per-page extraction; each page is prefixed with its number.
    fn extract_with_pdf_extract(&self, bytes: &[u8]) -> std::result::Result<ExtractedText, String> {
        // pdf-extract panics on some malformed fonts and encodings.
        let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
            .map_err(|_| "pdf-extract panicked".to_string())?
            .map_err(|e| e.to_string())?;

        let mut collector = PageCollector::new(self.char_budget);
        for (i, page) in pages.iter().enumerate() {
            if page.trim().is_empty() {
                collector.skip();
                continue;
            }
            if !collector.push(&format!("\n\n[Page {}]\n{}", i + 1, page)) {
                break;
            }
        }

        Ok(ExtractedText {
            text: collector.text,
            pages_read: collector.pages,
            backend: ExtractionBackend::PdfExtract,
        })
    }

    /// Page walk with lopdf's content-stream text extraction.
    fn extract_with_lopdf(&self, bytes: &[u8]) -> std::result::Result<ExtractedText, String> {
        let document = lopdf::Document::load_mem(bytes).map_err(|e| e.to_string())?;

        let mut collector = PageCollector::new(self.char_budget);
        for page_number in document.get_pages().keys() {
            let page = match document.extract_text(&[*page_number]) {
                Ok(text) => text,
                Err(e) => {
                    log::debug!("lopdf could not read page {}: {}", page_number, e);
                    collector.skip();
                    continue;
                }
            };
            if !collector.push(&page) {
                break;
            }
        }

        Ok(ExtractedText {
            text: collector.text,
            pages_read: collector.pages,
            backend: ExtractionBackend::Lopdf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Build a PDF with one page per entry; `None` is a page without text.
    fn text_pdf(pages: &[Option<&str>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids = Vec::new();
        for text in pages {
            let operations = match text {
                Some(text) => vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
                None => Vec::new(),
            };
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::from(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_extracts_text_with_page_prefix() {
        let bytes = text_pdf(&[Some("Quarterly revenue grew")]);
        let extracted = PdfTextExtractor::new().extract(&bytes).unwrap();

        assert_eq!(extracted.backend, ExtractionBackend::PdfExtract);
        assert!(extracted.text.contains("[Page 1]"));
        assert!(extracted.text.contains("Quarterly"));
        assert_eq!(extracted.pages_read, 1);
    }

    #[test]
    fn test_budget_stops_reading_pages() {
        let bytes = text_pdf(&[
            Some("First page text"),
            Some("Second page text"),
            Some("Third page text"),
        ]);
        let extracted = PdfTextExtractor::new()
            .with_char_budget(10)
            .extract(&bytes)
            .unwrap();

        assert_eq!(extracted.pages_read, 1);
        assert!(extracted.text.contains("[Page 1]"));
        assert!(!extracted.text.contains("[Page 2]"));
    }

    #[test]
    fn test_empty_pages_are_counted_but_not_prefixed() {
        let bytes = text_pdf(&[None, Some("Findings on page two")]);
        let extracted = PdfTextExtractor::new().extract(&bytes).unwrap();

        assert_eq!(extracted.pages_read, 2);
        assert!(!extracted.text.contains("[Page 1]"));
        assert!(extracted.text.contains("[Page 2]"));
    }

    #[test]
    fn test_lopdf_backend_reads_text() {
        let bytes = text_pdf(&[Some("Fallback text"), Some("More fallback")]);
        let extracted = PdfTextExtractor::new().extract_with_lopdf(&bytes).unwrap();

        assert_eq!(extracted.backend, ExtractionBackend::Lopdf);
        assert_eq!(extracted.pages_read, 2);
        assert!(extracted.text.contains("Fallback"));
        assert!(extracted.text.contains("More"));
    }

    #[test]
    fn test_short_text_is_still_returned() {
        let bytes = text_pdf(&[Some("Tiny")]);
        let extracted = PdfTextExtractor::new()
            .with_min_content_length(1_000)
            .extract(&bytes)
            .unwrap();

        assert!(extracted.char_count() < 1_000);
        assert!(extracted.text.contains("Tiny"));
    }

    #[test]
    fn test_page_collector_stops_after_budget() {
        let mut collector = PageCollector::new(10);

        assert!(collector.push("12345"));
        assert!(collector.push("67890"));
        assert!(!collector.push("x"));
        assert_eq!(collector.pages, 3);
        assert_eq!(collector.text, "1234567890x");
    }

    #[test]
    fn test_page_collector_counts_characters() {
        let mut collector = PageCollector::new(3);
        assert!(collector.push("äöü"));
        assert_eq!(collector.chars, 3);
    }

    #[test]
    fn test_budgeted_text() {
        let extracted = ExtractedText {
            text: "abcdef".to_string(),
            pages_read: 1,
            backend: ExtractionBackend::Lopdf,
        };

        assert_eq!(extracted.budgeted(4), "abcd");
        assert_eq!(extracted.budgeted(100), "abcdef");
    }

    #[test]
    fn test_garbage_input_is_an_error() {
        let extractor = PdfTextExtractor::new();
        let result = extractor.extract(b"this is not a pdf");

        assert!(matches!(result, Err(Error::NoText(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let extractor = PdfTextExtractor::new();
        let result = extractor.extract_file(Path::new("/nonexistent/report.pdf"));

        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn test_backend_names() {
        assert_eq!(ExtractionBackend::PdfExtract.to_string(), "pdf-extract");
        assert_eq!(ExtractionBackend::Lopdf.to_string(), "lopdf");
    }
}
