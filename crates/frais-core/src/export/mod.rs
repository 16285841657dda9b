//! Tabular export of expense records.

mod delimited;
mod report;
mod spreadsheet;

pub use delimited::write_csv;
pub use report::{write_json, DocumentSummary, ExportReport, ReportRecord};
pub use spreadsheet::{to_xlsx_buffer, write_xlsx};

use std::path::Path;

use rust_decimal::Decimal;

use crate::error::ExportError;
use crate::models::expense::AgentRecord;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Excel workbook.
    Xlsx,
    /// Comma-separated values.
    Csv,
    /// JSON report.
    Json,
    /// Aligned plain-text table.
    Text,
}

impl ExportFormat {
    /// Infer the format from a file extension; unknown extensions are text.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "xlsx" => ExportFormat::Xlsx,
            "csv" => ExportFormat::Csv,
            "json" => ExportFormat::Json,
            _ => ExportFormat::Text,
        }
    }
}

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Free text.
    Text(String),
    /// Amount as printed on the form and its value.
    Amount { raw: String, value: Decimal },
    /// Computed number rendered with two decimals.
    Number(Decimal),
    /// No value.
    Empty,
}

impl Cell {
    /// Text rendering of the cell.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Amount { raw, .. } => raw.clone(),
            Cell::Number(n) => format!("{:.2}", n.round_dp(2)),
            Cell::Empty => String::new(),
        }
    }
}

/// Expense records laid out as a table.
///
/// Columns: NOM, PRENOM, MONTANT 1..N, TOTAL, PAGES, OBSERVATIONS, where N
/// is the largest amount count over all records (at least one).
#[derive(Debug, Clone)]
pub struct ExpenseTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    amount_columns: usize,
}

impl ExpenseTable {
    /// Build the table. Fails with [`ExportError::NoData`] for no records.
    pub fn from_records(records: &[AgentRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(ExportError::NoData);
        }

        let amount_columns = records
            .iter()
            .map(|r| r.amounts.len())
            .max()
            .unwrap_or(0)
            .max(1);

        let mut headers = vec!["NOM".to_string(), "PRENOM".to_string()];
        headers.extend((1..=amount_columns).map(|i| format!("MONTANT {}", i)));
        headers.extend(["TOTAL", "PAGES", "OBSERVATIONS"].map(String::from));

        let rows = records
            .iter()
            .map(|record| {
                let mut row = vec![
                    Cell::Text(record.name.clone()),
                    Cell::Text(record.first_name.clone()),
                ];
                row.extend((0..amount_columns).map(|i| match record.amounts.get(i) {
                    Some(a) => Cell::Amount {
                        raw: a.raw.clone(),
                        value: a.value,
                    },
                    None => Cell::Empty,
                }));
                row.push(Cell::Number(record.total()));
                row.push(Cell::Text(record.pages_label()));
                row.push(Cell::Text(record.observations.clone()));
                row
            })
            .collect();

        Ok(Self {
            headers,
            rows,
            amount_columns,
        })
    }

    /// Column headers.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Data rows.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of MONTANT columns.
    pub fn amount_columns(&self) -> usize {
        self.amount_columns
    }

    /// Render as an aligned plain-text table.
    pub fn to_text(&self) -> String {
        let rendered: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(Cell::display).collect())
            .collect();

        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                rendered
                    .iter()
                    .map(|row| row[col].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let format_line = |cells: &[String]| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| {
                    let pad = width - cell.chars().count();
                    format!("{}{}", cell, " ".repeat(pad))
                })
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        let mut output = format_line(&self.headers);
        output.push('\n');
        output.push_str(
            &widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        output.push('\n');
        for row in &rendered {
            output.push_str(&format_line(row));
            output.push('\n');
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expense::Amount;
    use pretty_assertions::assert_eq;

    pub(crate) fn sample_records() -> Vec<AgentRecord> {
        vec![
            AgentRecord {
                name: "DUPONT".to_string(),
                first_name: "JEAN".to_string(),
                amounts: vec![
                    Amount::parse("125,50").unwrap(),
                    Amount::parse("30").unwrap(),
                ],
                pages: vec![1, 2],
                ..Default::default()
            },
            AgentRecord {
                name: "MARTIN".to_string(),
                first_name: "CLAIRE".to_string(),
                amounts: vec![Amount::parse("12.5").unwrap()],
                pages: vec![3, 4],
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_headers() {
        let table = ExpenseTable::from_records(&sample_records()).unwrap();
        assert_eq!(
            table.headers(),
            &[
                "NOM",
                "PRENOM",
                "MONTANT 1",
                "MONTANT 2",
                "TOTAL",
                "PAGES",
                "OBSERVATIONS"
            ]
        );
        assert_eq!(table.amount_columns(), 2);
    }

    #[test]
    fn test_rows() {
        let table = ExpenseTable::from_records(&sample_records()).unwrap();
        let second: Vec<String> = table.rows()[1].iter().map(Cell::display).collect();
        assert_eq!(second, vec!["MARTIN", "CLAIRE", "12.5", "", "12.50", "3/4", ""]);
    }

    #[test]
    fn test_no_amounts_keeps_one_column() {
        let records = vec![AgentRecord {
            name: "VIDE".to_string(),
            pages: vec![1],
            ..Default::default()
        }];
        let table = ExpenseTable::from_records(&records).unwrap();
        assert_eq!(table.amount_columns(), 1);
        assert_eq!(table.rows()[0][3], Cell::Number(Decimal::ZERO));
        assert_eq!(table.rows()[0][3].display(), "0.00");
    }

    #[test]
    fn test_saturated_total() {
        let huge = Amount {
            raw: "79228162514264337593543950335".to_string(),
            value: Decimal::MAX,
        };
        let records = vec![AgentRecord {
            name: "DUPONT".to_string(),
            amounts: vec![huge.clone(), huge],
            pages: vec![1],
            ..Default::default()
        }];

        let table = ExpenseTable::from_records(&records).unwrap();
        assert_eq!(table.rows()[0][4], Cell::Number(Decimal::MAX));
    }

    #[test]
    fn test_no_records() {
        assert!(matches!(
            ExpenseTable::from_records(&[]),
            Err(ExportError::NoData)
        ));
    }

    #[test]
    fn test_to_text() {
        let table = ExpenseTable::from_records(&sample_records()).unwrap();
        let text = table.to_text();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("NOM     PRENOM  MONTANT 1"));
        assert!(lines[2].starts_with("DUPONT  JEAN    125,50"));
        assert!(lines[3].contains("12.50"));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("out.XLSX")), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_path(Path::new("out.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("out.json")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("out")), ExportFormat::Text);
    }
}
