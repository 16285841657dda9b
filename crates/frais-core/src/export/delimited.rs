//! CSV export.

use std::io::Write;

use super::{Cell, ExpenseTable, Result};

/// Write the table as CSV. Amounts keep their printed form.
pub fn write_csv<W: Write>(table: &ExpenseTable, writer: W, delimiter: u8) -> Result<()> {
    let mut wtr = ::csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    wtr.write_record(table.headers())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(Cell::display))?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::sample_records;

    #[test]
    fn test_write_csv() {
        let table = ExpenseTable::from_records(&sample_records()).unwrap();
        let mut buffer = Vec::new();
        write_csv(&table, &mut buffer, b',').unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines[0],
            "NOM,PRENOM,MONTANT 1,MONTANT 2,TOTAL,PAGES,OBSERVATIONS"
        );
        assert_eq!(lines[1], "DUPONT,JEAN,\"125,50\",30,155.50,1/2,");
        assert_eq!(lines[2], "MARTIN,CLAIRE,12.5,,12.50,3/4,");
    }

    #[test]
    fn test_semicolon_delimiter() {
        let table = ExpenseTable::from_records(&sample_records()).unwrap();
        let mut buffer = Vec::new();
        write_csv(&table, &mut buffer, b';').unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.contains("DUPONT;JEAN;125,50;30;155.50;1/2;"));
    }
}
