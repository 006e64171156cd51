//! Reporting service
//!
//! Derives monthly totals, overall stats and category rollups from the
//! stored dataset. Read-only.

use std::collections::BTreeMap;

use crate::error::LedgerResult;
use crate::models::Money;
use crate::storage::Store;

/// Bucket name for expenses whose stored date does not parse
pub const UNKNOWN_BUCKET: &str = "unknown";

/// Overall dataset statistics
#[derive(Debug, Clone)]
pub struct LedgerStats {
    pub count: usize,
    pub total: Money,
    pub average: Money,
    /// Top categories by summed amount, descending; ties keep
    /// first-encountered order
    pub top_categories: Vec<(String, Money)>,
}

/// Service for summaries and reports
pub struct ReportService<'a> {
    store: &'a Store,
}

impl<'a> ReportService<'a> {
    /// Create a new report service
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Total spent per month; unparsable dates land in [`UNKNOWN_BUCKET`]
    /// rather than being dropped
    pub fn monthly_totals(&self) -> LedgerResult<BTreeMap<String, Money>> {
        let data = self.store.load()?;
        let mut totals: BTreeMap<String, Money> = BTreeMap::new();

        for expense in &data.expenses {
            let bucket = expense
                .month_key()
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| UNKNOWN_BUCKET.to_string());
            *totals.entry(bucket).or_default() += expense.amount;
        }

        Ok(totals)
    }

    /// Count, total, average and top-5 categories
    pub fn stats(&self) -> LedgerResult<LedgerStats> {
        let data = self.store.load()?;

        let count = data.expenses.len();
        let total: Money = data.expenses.iter().map(|e| e.amount).sum();
        let average = Money::average(total, count);

        // Accumulate in first-encountered order so the ranking's tie-break
        // is the stored sequence
        let mut by_category: Vec<(String, Money)> = Vec::new();
        for expense in &data.expenses {
            match by_category.iter_mut().find(|(c, _)| *c == expense.category) {
                Some((_, sum)) => *sum += expense.amount,
                None => by_category.push((expense.category.clone(), expense.amount)),
            }
        }
        by_category.sort_by(|a, b| b.1.cmp(&a.1));
        by_category.truncate(5);

        Ok(LedgerStats {
            count,
            total,
            average,
            top_categories: by_category,
        })
    }
}
