//! CSV export
//!
//! Writes expenses as flat tabular rows. The column set is the contract the
//! import side understands, so an exported file re-imports cleanly (and
//! entirely as duplicates).

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Expense;

/// Export columns, in order
pub const EXPORT_COLUMNS: [&str; 7] = [
    "id",
    "date",
    "amount",
    "category",
    "note",
    "created_at",
    "updated_at",
];

/// Write all expenses to CSV
pub fn export_expenses_csv<W: Write>(writer: W, expenses: &[Expense]) -> LedgerResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(EXPORT_COLUMNS)
        .map_err(|e| LedgerError::Export(e.to_string()))?;

    for expense in expenses {
        csv_writer
            .write_record([
                expense.id.to_string(),
                expense.date.clone(),
                expense.amount.canonical(),
                expense.category.clone(),
                expense.note.clone(),
                expense.created_at.to_rfc3339(),
                expense.updated_at.to_rfc3339(),
            ])
            .map_err(|e| LedgerError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_header_and_rows() {
        let expenses = vec![
            Expense::new("12.50", "Food", "lunch, with drinks", Some("2024-03-01")).unwrap(),
            Expense::new("7", "Travel", "", Some("2024-03-15")).unwrap(),
        ];

        let mut out = Vec::new();
        export_expenses_csv(&mut out, &expenses).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,date,amount,category,note,created_at,updated_at"
        );
        // Comma in the note gets quoted
        assert!(text.contains("\"lunch, with drinks\""));
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_export_empty_is_header_only() {
        let mut out = Vec::new();
        export_expenses_csv(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
