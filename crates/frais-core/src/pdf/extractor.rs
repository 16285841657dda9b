//! PDF page text extraction using lopdf and pdf-extract.

use lopdf::{Document, Object};
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::{PdfProcessor, PdfType, Result};
use crate::error::PdfError;

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    /// Maximum pages to read (0 = unlimited).
    max_pages: usize,
    /// Minimum text length for the document to count as text-based.
    min_text_length: usize,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone, Serialize)]
pub struct PdfContent {
    /// Type of PDF content.
    pub pdf_type: PdfType,
    /// Pages with their text, in page order.
    pub pages: Vec<PdfPage>,
    /// Number of image XObjects found in the document.
    pub image_count: usize,
}

impl PdfContent {
    /// Text of the first page, or an empty string.
    pub fn first_page_text(&self) -> &str {
        self.pages.first().map(|p| p.text.as_str()).unwrap_or("")
    }
}

/// Content from a single PDF page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            max_pages: 0,
            min_text_length: 50,
        }
    }

    /// Limit the number of pages read (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Set the text length threshold used to classify the document.
    pub fn with_min_text_length(mut self, min_text_length: usize) -> Self {
        self.min_text_length = min_text_length;
        self
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Extract page texts and classify the document in one pass.
    pub fn extract_all(&self) -> Result<PdfContent> {
        let pages = self.extract_pages()?;
        let image_count = self.count_images();

        let text_len: usize = pages.iter().map(|p| p.text.trim().len()).sum();
        let pdf_type = classify(text_len, image_count, self.min_text_length);

        debug!(
            "PDF analysis: {} pages, {} chars text, {} images -> {:?}",
            pages.len(),
            text_len,
            image_count,
            pdf_type
        );

        Ok(PdfContent {
            pdf_type,
            pages,
            image_count,
        })
    }

    /// Number of pages that will be read, honoring the page limit.
    fn pages_to_read(&self) -> u32 {
        let total = self.page_count();
        if self.max_pages == 0 {
            total
        } else {
            total.min(self.max_pages as u32)
        }
    }

    /// Count image XObjects across the whole document.
    fn count_images(&self) -> usize {
        let doc = match self.document.as_ref() {
            Some(d) => d,
            None => return 0,
        };

        doc.objects
            .values()
            .filter(|object| is_image_object(object))
            .count()
    }

    /// Per-page text through lopdf, one page at a time.
    fn lopdf_pages(&self, doc: &Document, count: u32) -> Vec<PdfPage> {
        (1..=count)
            .map(|number| {
                let text = doc.extract_text(&[number]).unwrap_or_else(|e| {
                    warn!("Failed to extract text from page {}: {}", number, e);
                    String::new()
                });
                PdfPage { number, text }
            })
            .collect()
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        if !doc.get_pages().contains_key(&page) {
            return Err(PdfError::InvalidPage(page));
        }

        doc.extract_text(&[page])
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_pages(&self) -> Result<Vec<PdfPage>> {
        let doc = self.document()?;
        let total = self.page_count() as usize;
        let count = self.pages_to_read();

        // pdf-extract keeps word spacing better; lopdf is the per-page fallback
        let mut pages = match pdf_extract::extract_text_from_mem_by_pages(&self.raw_data) {
            Ok(texts) if texts.len() == total => texts
                .into_iter()
                .zip(1u32..)
                .map(|(text, number)| PdfPage { number, text })
                .collect(),
            Ok(texts) => {
                debug!(
                    "pdf-extract returned {} pages for a {} page document, using lopdf",
                    texts.len(),
                    total
                );
                self.lopdf_pages(doc, count)
            }
            Err(e) => {
                debug!("pdf-extract failed ({}), using lopdf", e);
                self.lopdf_pages(doc, count)
            }
        };

        pages.truncate(count as usize);
        trace!("Extracted text from {} pages", pages.len());
        Ok(pages)
    }
}

fn classify(text_len: usize, image_count: usize, min_text_length: usize) -> PdfType {
    match (text_len > min_text_length, image_count > 0) {
        (true, false) => PdfType::Text,
        (false, true) => PdfType::Image,
        (true, true) => PdfType::Hybrid,
        (false, false) => PdfType::Empty,
    }
}

fn is_image_object(obj: &Object) -> bool {
    match obj {
        Object::Stream(stream) => stream
            .dict
            .get(b"Subtype")
            .and_then(|s| s.as_name())
            .map(|name| name == b"Image")
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::build_document;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(extractor.extract_pages().is_err());
    }

    #[test]
    fn test_load_garbage_fails() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_lopdf_pages_order_and_missing_page() {
        let doc = build_document(&["NOM : DUPONT\nPAGE UN", "PAGE DEUX"]);
        let extractor = PdfExtractor::new();

        let pages = extractor.lopdf_pages(&doc, 3);
        let numbers: Vec<u32> = pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert!(pages[0].text.contains("DUPONT"));
        assert!(pages[1].text.contains("PAGE DEUX"));
        assert!(!pages[1].text.contains("DUPONT"));
        assert_eq!(pages[2].text, "");
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(200, 0, 50), PdfType::Text);
        assert_eq!(classify(10, 3, 50), PdfType::Image);
        assert_eq!(classify(200, 3, 50), PdfType::Hybrid);
        assert_eq!(classify(0, 0, 50), PdfType::Empty);
    }
}
