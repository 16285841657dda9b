//! Expense form classification, agent grouping and field extraction.

mod form;
mod grouping;
mod parser;
pub mod rules;

pub use form::{detect_form_type, FormClassifier};
pub use grouping::{group_agents, page_key, AgentGroup};
pub use parser::ExpenseParser;

pub use crate::models::expense::FormType;

use crate::error::ExtractionError;
use crate::models::expense::AgentRecord;
use crate::pdf::PdfPage;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for per-agent record extractors.
pub trait RecordExtractor {
    /// Extract the record of a single agent group.
    fn extract_record(&self, group: &AgentGroup, form_type: FormType) -> AgentRecord;

    /// Group the pages of a document and extract one record per agent.
    fn extract_records(&self, pages: Vec<PdfPage>, form_type: FormType) -> Result<Vec<AgentRecord>>;
}
