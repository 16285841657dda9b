//! Document pipeline: load, classify, group and extract.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::expense::{ExpenseParser, FormClassifier, RecordExtractor};
use crate::models::config::FraisConfig;
use crate::models::expense::DocumentResult;
use crate::pdf::{PdfContent, PdfExtractor, PdfProcessor};

/// Runs the full extraction for one PDF document at a time.
pub struct ExpensePipeline {
    config: FraisConfig,
    classifier: FormClassifier,
    parser: ExpenseParser,
}

impl ExpensePipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: FraisConfig) -> Self {
        let classifier = FormClassifier::from_config(&config.form);
        let parser = ExpenseParser::from_config(&config.extraction);
        Self {
            config,
            classifier,
            parser,
        }
    }

    /// The configuration this pipeline was built with.
    pub fn config(&self) -> &FraisConfig {
        &self.config
    }

    /// Form classifier used by this pipeline.
    pub fn classifier(&self) -> &FormClassifier {
        &self.classifier
    }

    /// Record parser used by this pipeline.
    pub fn parser(&self) -> &ExpenseParser {
        &self.parser
    }

    /// Load a PDF and extract the text of its pages.
    pub fn load_content(&self, data: &[u8]) -> Result<PdfContent> {
        let mut extractor = PdfExtractor::new()
            .with_max_pages(self.config.pdf.max_pages)
            .with_min_text_length(self.config.pdf.min_text_length);
        extractor.load(data)?;
        Ok(extractor.extract_all()?)
    }

    /// Process an in-memory PDF. `source` labels the resulting records.
    pub fn process_bytes(&self, source: &str, data: &[u8]) -> Result<DocumentResult> {
        let start = Instant::now();

        let content = self.load_content(data)?;
        let page_count = content.pages.len() as u32;

        let form_type = self.classifier.classify(page_count, content.first_page_text());
        info!(
            "{}: {} pages, {:?}, form {}",
            source, page_count, content.pdf_type, form_type
        );

        let mut records = self.parser.extract_records(content.pages, form_type)?;
        for record in &mut records {
            record.source = Some(source.to_string());
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            "{}: {} records in {}ms",
            source,
            records.len(),
            processing_time_ms
        );

        Ok(DocumentResult {
            source: source.to_string(),
            form_type,
            pdf_type: content.pdf_type,
            page_count,
            records,
            processing_time_ms,
        })
    }

    /// Process a PDF file. Records are labeled with the file name.
    pub fn process_file(&self, path: &Path) -> Result<DocumentResult> {
        let data = std::fs::read(path)?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.process_bytes(&source, &data)
    }
}

impl Default for ExpensePipeline {
    fn default() -> Self {
        Self::new(FraisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FraisError, PdfError};

    #[test]
    fn test_invalid_pdf_is_reported() {
        let pipeline = ExpensePipeline::default();
        let err = pipeline.process_bytes("bad.pdf", b"%PDF-garbage").unwrap_err();
        assert!(matches!(err, FraisError::Pdf(PdfError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let pipeline = ExpensePipeline::default();
        let err = pipeline
            .process_file(Path::new("/nonexistent/forms.pdf"))
            .unwrap_err();
        assert!(matches!(err, FraisError::Io(_)));
    }
}
