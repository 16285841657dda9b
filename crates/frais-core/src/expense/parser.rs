//! Rule-based expense record parser.

use tracing::{debug, info, warn};

use super::grouping::{group_agents, AgentGroup};
use super::rules::amounts::extract_amounts;
use super::rules::names::{extract_first_name, extract_name};
use super::{RecordExtractor, Result};
use crate::error::ExtractionError;
use crate::models::config::{AmountScope, ExtractionConfig};
use crate::models::expense::{AgentRecord, FormType};
use crate::pdf::PdfPage;

/// Parser that turns page text into per-agent expense records.
pub struct ExpenseParser {
    /// Pages scanned for amounts.
    amount_scope: AmountScope,
    /// Group key for pages without a name.
    default_agent: String,
}

impl ExpenseParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }

    /// Create a parser from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            amount_scope: config.amount_scope,
            default_agent: config.default_agent.clone(),
        }
    }

    /// Set which pages are scanned for amounts.
    pub fn with_amount_scope(mut self, scope: AmountScope) -> Self {
        self.amount_scope = scope;
        self
    }

    /// Set the key of the group collecting unnamed pages.
    pub fn with_default_agent(mut self, label: impl Into<String>) -> Self {
        self.default_agent = label.into();
        self
    }

    /// Group key used for unnamed pages.
    pub fn default_agent(&self) -> &str {
        &self.default_agent
    }

    fn collect_warnings(&self, record: &AgentRecord, form_type: FormType) -> Vec<String> {
        let mut warnings = Vec::new();

        if record.name.is_empty() {
            warnings.push(format!("No agent name on page {}", record.pages_label()));
        }
        if record.amounts.is_empty() {
            warnings.push("No amount to pay found".to_string());
        }
        if record.pages.len() % form_type.pages_per_record() != 0 {
            warnings.push(format!(
                "{} page(s) for a {} form",
                record.pages.len(),
                form_type
            ));
        }

        warnings
    }
}

impl Default for ExpenseParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordExtractor for ExpenseParser {
    fn extract_record(&self, group: &AgentGroup, form_type: FormType) -> AgentRecord {
        let first_text = group.first_page().map(|p| p.text.as_str()).unwrap_or("");

        let amounts = match self.amount_scope {
            AmountScope::FirstPage => extract_amounts(first_text),
            AmountScope::AllPages => group
                .pages
                .iter()
                .flat_map(|p| extract_amounts(&p.text))
                .collect(),
        };

        let mut record = AgentRecord {
            name: extract_name(first_text).unwrap_or_default(),
            first_name: extract_first_name(first_text).unwrap_or_default(),
            amounts,
            pages: group.page_numbers(),
            observations: String::new(),
            form_type,
            source: None,
            warnings: Vec::new(),
        };

        record.warnings = self.collect_warnings(&record, form_type);
        for warning in &record.warnings {
            warn!("{}: {}", group.key, warning);
        }

        debug!(
            "Extracted record for {} ({} amounts, pages {})",
            group.key,
            record.amounts.len(),
            record.pages_label()
        );

        record
    }

    fn extract_records(&self, pages: Vec<PdfPage>, form_type: FormType) -> Result<Vec<AgentRecord>> {
        if !pages.is_empty() && pages.iter().all(|p| p.text.trim().is_empty()) {
            return Err(ExtractionError::NoText(pages.len() as u32));
        }

        info!("Extracting records from {} pages", pages.len());

        let groups = group_agents(pages, &self.default_agent);
        let records = groups
            .iter()
            .map(|group| self.extract_record(group, form_type))
            .collect();

        Ok(records)
    }
}
