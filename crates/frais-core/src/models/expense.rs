//! Expense record models.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;
use crate::expense::rules::amounts::parse_amount;
use crate::pdf::PdfType;

/// Layout family of an expense form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    /// A4 sheets, four pages per agent.
    #[default]
    #[serde(rename = "A4_4pages")]
    A4FourPages,
    /// A3 sheets, two pages per agent.
    #[serde(rename = "A3_2pages")]
    A3TwoPages,
}

impl FormType {
    /// Nominal number of pages one agent's form spans.
    pub fn pages_per_record(&self) -> usize {
        match self {
            FormType::A4FourPages => 4,
            FormType::A3TwoPages => 2,
        }
    }

    /// Label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::A4FourPages => "A4_4pages",
            FormType::A3TwoPages => "A3_2pages",
        }
    }
}

impl fmt::Display for FormType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An amount as printed on the form and its parsed value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// Matched text, e.g. `"125,50"`.
    pub raw: String,

    /// Parsed value.
    pub value: Decimal,
}

impl Amount {
    /// Parse an amount written with `,` or `.` as decimal separator.
    pub fn parse(raw: &str) -> Result<Self, ExtractionError> {
        let value = parse_amount(raw).ok_or_else(|| ExtractionError::Parse {
            field: "amount".to_string(),
            value: raw.to_string(),
        })?;

        Ok(Self {
            raw: raw.trim().to_string(),
            value,
        })
    }
}

/// Extracted data for one agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentRecord {
    /// Family name (NOM).
    pub name: String,

    /// First name (PRENOM).
    pub first_name: String,

    /// "TOTAL A PAYER" amounts in reading order.
    pub amounts: Vec<Amount>,

    /// 1-based page numbers attributed to this agent.
    pub pages: Vec<u32>,

    /// Free-text observations column.
    pub observations: String,

    /// Form type of the source document.
    pub form_type: FormType,

    /// Source document (file name), when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Non-fatal issues found while extracting this record.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl AgentRecord {
    /// Sum of all amounts, saturating at the largest representable value.
    pub fn total(&self) -> Decimal {
        self.amounts
            .iter()
            .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a.value))
    }

    /// Total rounded and rendered with two decimals.
    pub fn total_label(&self) -> String {
        format!("{:.2}", self.total().round_dp(2))
    }

    /// Page numbers joined with `/`, e.g. `"1/2/3"`.
    pub fn pages_label(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Result of processing one PDF document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Source document (file name or caller-provided label).
    pub source: String,

    /// Detected form type.
    pub form_type: FormType,

    /// Text layer analysis.
    pub pdf_type: PdfType,

    /// Number of pages read.
    pub page_count: u32,

    /// One record per agent group.
    pub records: Vec<AgentRecord>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl DocumentResult {
    /// Sum of all record totals, rounded to two decimals.
    pub fn total_label(&self) -> String {
        let total = self
            .records
            .iter()
            .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.total()));
        format!("{:.2}", total.round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn amount(raw: &str) -> Amount {
        Amount::parse(raw).unwrap()
    }

    #[test]
    fn test_amount_parse() {
        let a = amount("125,50");
        assert_eq!(a.raw, "125,50");
        assert_eq!(a.value, Decimal::from_str("125.50").unwrap());

        assert!(Amount::parse("abc").is_err());
    }

    #[test]
    fn test_total_label() {
        let record = AgentRecord {
            amounts: vec![amount("10,5"), amount("20.25"), amount("3")],
            ..Default::default()
        };
        assert_eq!(record.total_label(), "33.75");

        let empty = AgentRecord::default();
        assert_eq!(empty.total_label(), "0.00");
    }

    #[test]
    fn test_pages_label() {
        let record = AgentRecord {
            pages: vec![1, 2, 5],
            ..Default::default()
        };
        assert_eq!(record.pages_label(), "1/2/5");
    }

    #[test]
    fn test_total_does_not_overflow() {
        let huge = Amount {
            raw: "79228162514264337593543950335".to_string(),
            value: Decimal::MAX,
        };
        let record = AgentRecord {
            amounts: vec![huge.clone(), huge, amount("1")],
            ..Default::default()
        };
        assert_eq!(record.total(), Decimal::MAX);

        let document = DocumentResult {
            source: "huge.pdf".to_string(),
            form_type: FormType::A4FourPages,
            pdf_type: PdfType::Text,
            page_count: 1,
            records: vec![record.clone(), record],
            processing_time_ms: 0,
        };
        assert_eq!(document.total_label(), format!("{:.2}", Decimal::MAX));
    }

    #[test]
    fn test_document_total_label() {
        let document = DocumentResult {
            source: "forms.pdf".to_string(),
            form_type: FormType::A3TwoPages,
            pdf_type: PdfType::Text,
            page_count: 4,
            records: vec![
                AgentRecord {
                    amounts: vec![amount("125,50"), amount("30")],
                    ..Default::default()
                },
                AgentRecord {
                    amounts: vec![amount("12.5")],
                    ..Default::default()
                },
            ],
            processing_time_ms: 3,
        };
        assert_eq!(document.total_label(), "168.00");
    }

    #[test]
    fn test_form_type_serde() {
        assert_eq!(
            serde_json::to_string(&FormType::A3TwoPages).unwrap(),
            "\"A3_2pages\""
        );
        assert_eq!(FormType::A4FourPages.pages_per_record(), 4);
        assert_eq!(FormType::default(), FormType::A4FourPages);
    }
}
