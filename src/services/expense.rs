//! Expense service
//!
//! CRUD and query operations over the expense collection. Every mutating
//! operation loads the dataset, mutates it in memory and saves it back
//! atomically; nothing is cached across operations.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseId};
use crate::storage::Store;

/// Partial field update for an expense; `None` fields are retained
#[derive(Debug, Clone, Default)]
pub struct ExpensePatch {
    pub amount: Option<String>,
    pub category: Option<String>,
    pub note: Option<String>,
    pub date: Option<String>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none() && self.category.is_none() && self.note.is_none() && self.date.is_none()
    }
}

/// A field that failed validation during a partial update
#[derive(Debug, Clone)]
pub struct RejectedField {
    pub field: &'static str,
    pub reason: String,
}

/// Result of a partial update: the stored expense plus any fields whose new
/// values were rejected (valid sibling fields still committed)
#[derive(Debug, Clone)]
pub struct UpdateOutcome {
    pub expense: Expense,
    pub rejected: Vec<RejectedField>,
}

/// Service for expense management
pub struct ExpenseService<'a> {
    store: &'a Store,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Create and persist a new expense
    ///
    /// Amount and date are validated before any mutation occurs. The
    /// expense's category is registered as a side effect.
    pub fn create(
        &self,
        amount_raw: &str,
        category: &str,
        note: &str,
        date_raw: Option<&str>,
    ) -> LedgerResult<Expense> {
        let expense = Expense::new(amount_raw, category, note, date_raw)?;

        let mut data = self.store.load()?;
        data.categories.insert(expense.category.clone());
        data.expenses.push(expense.clone());
        self.store.save(&data)?;

        Ok(expense)
    }

    /// First expense whose id starts with `prefix`, in the store's current
    /// (insertion) ordering
    pub fn find_by_id_prefix(&self, prefix: &str) -> LedgerResult<Option<Expense>> {
        let data = self.store.load()?;
        Ok(data
            .expenses
            .iter()
            .find(|e| e.id.matches_prefix(prefix))
            .cloned())
    }

    /// Every expense whose id starts with `prefix`, in insertion order
    pub fn find_all_by_id_prefix(&self, prefix: &str) -> LedgerResult<Vec<Expense>> {
        let data = self.store.load()?;
        Ok(data
            .expenses
            .iter()
            .filter(|e| e.id.matches_prefix(prefix))
            .cloned()
            .collect())
    }

    /// Apply a partial update to the expense with the given id
    ///
    /// Each supplied field is validated independently: an invalid amount or
    /// date rejects only that field while valid sibling fields commit.
    /// `updated_at` is refreshed and any new category string is registered.
    pub fn update(&self, id: ExpenseId, patch: ExpensePatch) -> LedgerResult<UpdateOutcome> {
        let mut data = self.store.load()?;
        let expense = data
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;

        let mut rejected = Vec::new();

        if let Some(raw) = &patch.amount {
            match crate::models::Money::parse(raw) {
                Ok(amount) => expense.amount = amount,
                Err(e) => rejected.push(RejectedField {
                    field: "amount",
                    reason: e.to_string(),
                }),
            }
        }

        if let Some(category) = &patch.category {
            let category = category.trim();
            if category.is_empty() {
                rejected.push(RejectedField {
                    field: "category",
                    reason: "category cannot be empty".into(),
                });
            } else {
                expense.category = category.to_string();
            }
        }

        if let Some(note) = &patch.note {
            expense.note = note.trim().to_string();
        }

        if let Some(raw) = &patch.date {
            match crate::models::dates::parse_to_iso(raw) {
                Ok(date) => expense.date = date,
                Err(e) => rejected.push(RejectedField {
                    field: "date",
                    reason: e.to_string(),
                }),
            }
        }

        expense.touch();
        let updated = expense.clone();
        data.categories.insert(updated.category.clone());
        self.store.save(&data)?;

        Ok(UpdateOutcome {
            expense: updated,
            rejected,
        })
    }

    /// Delete every expense whose id starts with `prefix`
    ///
    /// Zero matches is not an error: returns 0 without touching the store.
    pub fn delete_by_id_prefix(&self, prefix: &str) -> LedgerResult<usize> {
        let mut data = self.store.load()?;
        let before = data.expenses.len();
        data.expenses.retain(|e| !e.id.matches_prefix(prefix));
        let removed = before - data.expenses.len();

        if removed > 0 {
            self.store.save(&data)?;
        }
        Ok(removed)
    }

    /// Case-insensitive substring search over category, note and the
    /// canonical amount string, newest first
    pub fn search(&self, term: &str) -> LedgerResult<Vec<Expense>> {
        let needle = term.trim().to_lowercase();
        let data = self.store.load()?;

        let mut results: Vec<Expense> = data
            .expenses
            .into_iter()
            .filter(|e| {
                e.category.to_lowercase().contains(&needle)
                    || e.note.to_lowercase().contains(&needle)
                    || e.amount.canonical().contains(&needle)
            })
            .collect();
        sort_by_date_desc(&mut results);
        Ok(results)
    }

    /// Up to `limit` most-recent expenses; no limit returns all
    pub fn list(&self, limit: Option<usize>) -> LedgerResult<Vec<Expense>> {
        let data = self.store.load()?;
        let mut expenses = data.expenses;
        sort_by_date_desc(&mut expenses);
        if let Some(limit) = limit {
            expenses.truncate(limit);
        }
        Ok(expenses)
    }
}

/// Stable sort, so expenses sharing a date keep their insertion order
fn sort_by_date_desc(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| b.date.cmp(&a.date));
}
