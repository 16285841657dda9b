//! JSON report export.

use std::io::Write;

use serde::Serialize;

use super::Result;
use crate::error::ExportError;
use crate::models::expense::{AgentRecord, DocumentResult, FormType};
use crate::pdf::PdfType;

/// Per-document metadata in a report.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentSummary {
    pub source: String,
    pub form_type: FormType,
    pub pdf_type: PdfType,
    pub page_count: u32,
    pub record_count: usize,
    pub processing_time_ms: u64,
}

/// A record with the TOTAL and PAGES cells of the table.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRecord<'a> {
    #[serde(flatten)]
    pub record: &'a AgentRecord,
    /// Total rendered with two decimals.
    pub total: String,
    /// Page numbers joined with `/`.
    pub pages_label: String,
}

impl<'a> From<&'a AgentRecord> for ReportRecord<'a> {
    fn from(record: &'a AgentRecord) -> Self {
        Self {
            record,
            total: record.total_label(),
            pages_label: record.pages_label(),
        }
    }
}

/// JSON report of one extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport<'a> {
    /// RFC 3339 timestamp of the export.
    pub generated_at: String,
    /// Documents the records come from.
    pub documents: Vec<DocumentSummary>,
    /// Records of all documents, in document order.
    pub records: Vec<ReportRecord<'a>>,
}

impl<'a> ExportReport<'a> {
    /// Build a report. Fails with [`ExportError::NoData`] when no record exists.
    pub fn new(documents: &'a [DocumentResult]) -> Result<Self> {
        let records: Vec<ReportRecord<'a>> = documents
            .iter()
            .flat_map(|d| &d.records)
            .map(ReportRecord::from)
            .collect();
        if records.is_empty() {
            return Err(ExportError::NoData);
        }

        let documents = documents
            .iter()
            .map(|d| DocumentSummary {
                source: d.source.clone(),
                form_type: d.form_type,
                pdf_type: d.pdf_type,
                page_count: d.page_count,
                record_count: d.records.len(),
                processing_time_ms: d.processing_time_ms,
            })
            .collect();

        Ok(Self {
            generated_at: chrono::Local::now().to_rfc3339(),
            documents,
            records,
        })
    }
}

/// Write the JSON report of a run.
pub fn write_json<W: Write>(documents: &[DocumentResult], writer: W) -> Result<()> {
    let report = ExportReport::new(documents)?;
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_records;

    fn document(records: Vec<AgentRecord>) -> DocumentResult {
        DocumentResult {
            source: "mission.pdf".to_string(),
            form_type: FormType::A3TwoPages,
            pdf_type: PdfType::Text,
            page_count: 4,
            records,
            processing_time_ms: 3,
        }
    }

    #[test]
    fn test_write_json() {
        let documents = vec![document(sample_records())];
        let mut buffer = Vec::new();
        write_json(&documents, &mut buffer).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["documents"][0]["form_type"], "A3_2pages");
        assert_eq!(value["documents"][0]["record_count"], 2);
        assert_eq!(value["records"][0]["name"], "DUPONT");
        assert_eq!(value["records"][0]["amounts"][0]["raw"], "125,50");
        assert_eq!(value["records"][0]["total"], "155.50");
        assert_eq!(value["records"][0]["pages_label"], "1/2");
        assert_eq!(value["records"][1]["total"], "12.50");
        assert_eq!(value["records"][1]["pages"], serde_json::json!([3, 4]));
        assert!(value["generated_at"].is_string());
    }

    #[test]
    fn test_no_records() {
        let documents = vec![document(Vec::new())];
        let mut buffer = Vec::new();
        assert!(matches!(
            write_json(&documents, &mut buffer),
            Err(ExportError::NoData)
        ));
    }
}
