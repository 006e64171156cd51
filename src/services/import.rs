//! CSV import service
//!
//! Translates flat tabular rows back into expenses, skipping duplicates.
//! A row is a duplicate when its `(normalized amount, date, category, note)`
//! tuple already exists among the loaded expenses or earlier rows of the
//! same batch. Rows failing amount or date validation are silently skipped
//! and counted as not-imported.

use std::collections::HashSet;
use std::io::Read;

use serde::Deserialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Expense;
use crate::storage::Store;

/// Category assigned to imported rows without one
const IMPORT_CATEGORY: &str = "Imported";

/// Outcome of one import run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub duplicates: usize,
    pub invalid: usize,
}

/// One CSV row; unknown columns are ignored, missing ones default to empty
#[derive(Debug, Deserialize)]
struct ImportRow {
    #[serde(default)]
    amount: String,
    /// Accepted alias for the amount column
    #[serde(default)]
    amt: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    note: String,
    #[serde(default)]
    date: String,
}

/// Service for importing expenses from CSV
pub struct ImportService<'a> {
    store: &'a Store,
}

impl<'a> ImportService<'a> {
    /// Create a new import service
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Import expenses from CSV data with a header row
    pub fn import_csv<R: Read>(&self, reader: R) -> LedgerResult<ImportSummary> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let mut data = self.store.load()?;
        let mut seen: HashSet<_> = data.expenses.iter().map(|e| e.dedup_key()).collect();
        let mut summary = ImportSummary::default();

        for row in csv_reader.deserialize::<ImportRow>() {
            let row = match row {
                Ok(row) => row,
                Err(_) => {
                    summary.invalid += 1;
                    continue;
                }
            };

            let amount_raw = if row.amount.trim().is_empty() {
                if row.amt.trim().is_empty() {
                    "0"
                } else {
                    row.amt.trim()
                }
            } else {
                row.amount.trim()
            };
            let category = if row.category.trim().is_empty() {
                IMPORT_CATEGORY
            } else {
                row.category.trim()
            };
            let date = if row.date.trim().is_empty() {
                None
            } else {
                Some(row.date.trim())
            };

            let expense = match Expense::new(amount_raw, category, &row.note, date) {
                Ok(expense) => expense,
                Err(_) => {
                    summary.invalid += 1;
                    continue;
                }
            };

            if !seen.insert(expense.dedup_key()) {
                summary.duplicates += 1;
                continue;
            }

            data.categories.insert(expense.category.clone());
            data.expenses.push(expense);
            summary.imported += 1;
        }

        if summary.imported > 0 {
            self.store.save(&data)?;
        }
        Ok(summary)
    }

    /// Import expenses from a CSV file on disk
    pub fn import_csv_file(&self, path: &std::path::Path) -> LedgerResult<ImportSummary> {
        let file = std::fs::File::open(path)
            .map_err(|e| LedgerError::Import(format!("Failed to open {}: {}", path.display(), e)))?;
        self.import_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerPaths;
    use crate::export::export_expenses_csv;
    use crate::services::ExpenseService;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, Store) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, Store::new(paths))
    }

    #[test]
    fn test_import_basic() {
        let (_temp_dir, store) = test_store();
        let service = ImportService::new(&store);

        let csv = "date,amount,category,note\n\
                   2024-03-01,12.50,Food,lunch\n\
                   2024-03-02,30,Travel,train\n";
        let summary = service.import_csv(csv.as_bytes()).unwrap();

        assert_eq!(summary.imported, 2);
        assert_eq!(summary.duplicates, 0);
        assert_eq!(summary.invalid, 0);

        let data = store.load().unwrap();
        assert_eq!(data.expenses.len(), 2);
        assert!(data.categories.contains("Food"));
        assert!(data.categories.contains("Travel"));
    }

    #[test]
    fn test_import_defaults_and_aliases() {
        let (_temp_dir, store) = test_store();
        let service = ImportService::new(&store);

        let csv = "date,amt,category,note\n\
                   2024-03-01,9.99,,\n";
        let summary = service.import_csv(csv.as_bytes()).unwrap();
        assert_eq!(summary.imported, 1);

        let data = store.load().unwrap();
        assert_eq!(data.expenses[0].amount.canonical(), "9.99");
        assert_eq!(data.expenses[0].category, "Imported");
    }

    #[test]
    fn test_invalid_rows_skipped_silently() {
        let (_temp_dir, store) = test_store();
        let service = ImportService::new(&store);

        let csv = "date,amount,category,note\n\
                   2024-03-01,abc,Food,bad amount\n\
                   not a date,5,Food,bad date\n\
                   2024-03-02,5,Food,fine\n";
        let summary = service.import_csv(csv.as_bytes()).unwrap();

        assert_eq!(summary.imported, 1);
        assert_eq!(summary.invalid, 2);
        assert_eq!(store.load().unwrap().expenses.len(), 1);
    }

    #[test]
    fn test_duplicates_within_batch() {
        let (_temp_dir, store) = test_store();
        let service = ImportService::new(&store);

        let csv = "date,amount,category,note\n\
                   2024-03-01,5,Food,same\n\
                   2024-03-01,5,Food,same\n";
        let summary = service.import_csv(csv.as_bytes()).unwrap();

        assert_eq!(summary.imported, 1);
        assert_eq!(summary.duplicates, 1);
    }

    #[test]
    fn test_reimporting_export_yields_zero_new_rows() {
        let (_temp_dir, store) = test_store();
        let expenses = ExpenseService::new(&store);
        let service = ImportService::new(&store);

        expenses
            .create("12.50", "Food", "lunch", Some("2024-03-01"))
            .unwrap();
        expenses
            .create("7.00", "Travel", "", Some("2024-03-15"))
            .unwrap();

        let mut exported = Vec::new();
        export_expenses_csv(&mut exported, &store.load().unwrap().expenses).unwrap();

        let first = service.import_csv(exported.as_slice()).unwrap();
        assert_eq!(first.imported, 0);
        assert_eq!(first.duplicates, 2);

        // And again, against the unchanged store
        let second = service.import_csv(exported.as_slice()).unwrap();
        assert_eq!(second.imported, 0);
        assert_eq!(second.duplicates, 2);
        assert_eq!(store.load().unwrap().expenses.len(), 2);
    }
}
