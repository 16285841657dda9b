//! XLSX export using rust_xlsxwriter.

use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use tracing::debug;

use super::{Cell, ExpenseTable, Result};
use crate::models::config::ExportConfig;

fn fill_worksheet(
    worksheet: &mut Worksheet,
    table: &ExpenseTable,
    config: &ExportConfig,
) -> Result<()> {
    worksheet.set_name(&config.sheet_name)?;

    let header_format = Format::new().set_bold();
    let number_format = Format::new().set_num_format(&config.number_format);

    for (col, header) in table.headers().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (row_idx, row) in table.rows().iter().enumerate() {
        let row_num = (row_idx + 1) as u32;

        for (col_idx, cell) in row.iter().enumerate() {
            let col = col_idx as u16;
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(row_num, col, s)?;
                }
                Cell::Amount { raw, value } => match value.to_f64() {
                    Some(n) => {
                        worksheet.write_number_with_format(row_num, col, n, &number_format)?;
                    }
                    None => {
                        worksheet.write_string(row_num, col, raw)?;
                    }
                },
                Cell::Number(value) => {
                    let n = value.round_dp(2).to_f64().unwrap_or_default();
                    worksheet.write_number_with_format(row_num, col, n, &number_format)?;
                }
                Cell::Empty => {}
            }
        }
    }

    worksheet.autofit();
    Ok(())
}

fn build_workbook(table: &ExpenseTable, config: &ExportConfig) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    fill_worksheet(worksheet, table, config)?;
    Ok(workbook)
}

/// Write the table to an XLSX file with one worksheet.
pub fn write_xlsx(table: &ExpenseTable, path: &Path, config: &ExportConfig) -> Result<()> {
    let mut workbook = build_workbook(table, config)?;
    workbook.save(path)?;
    debug!("Wrote {} rows to {}", table.rows().len(), path.display());
    Ok(())
}

/// Render the table as XLSX bytes.
pub fn to_xlsx_buffer(table: &ExpenseTable, config: &ExportConfig) -> Result<Vec<u8>> {
    let mut workbook = build_workbook(table, config)?;
    Ok(workbook.save_to_buffer()?)
}
