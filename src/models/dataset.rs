//! The root aggregate persisted as one unit
//!
//! Everything the application knows lives in one document: the ordered
//! expense sequence, the per-month budgets and the category set. Missing
//! keys in a stored document default to empty collections.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::expense::Expense;
use super::money::Money;
use super::month::MonthKey;

/// Full dataset: expenses, budgets and categories
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Expenses in insertion order
    #[serde(default)]
    pub expenses: Vec<Expense>,

    /// One budget amount per month, last-write-wins
    #[serde(default)]
    pub budgets: BTreeMap<MonthKey, Money>,

    /// Known category names (may include categories with zero expenses)
    #[serde(default)]
    pub categories: BTreeSet<String>,
}

impl Dataset {
    /// Number of expenses referencing a category
    pub fn linked_expense_count(&self, category: &str) -> usize {
        self.expenses
            .iter()
            .filter(|e| e.category == category)
            .count()
    }

    /// Sum of amounts attributed to `month` (unparsable dates excluded)
    pub fn month_total(&self, month: &MonthKey) -> Money {
        self.expenses
            .iter()
            .filter(|e| e.month_key().as_ref() == Some(month))
            .map(|e| e.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(amount: &str, category: &str, date: &str) -> Expense {
        Expense::new(amount, category, "", Some(date)).unwrap()
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let ds: Dataset = serde_json::from_str("{}").unwrap();
        assert!(ds.expenses.is_empty());
        assert!(ds.budgets.is_empty());
        assert!(ds.categories.is_empty());

        let ds: Dataset = serde_json::from_str(r#"{"expenses": []}"#).unwrap();
        assert!(ds.budgets.is_empty());
    }

    #[test]
    fn test_linked_expense_count() {
        let mut ds = Dataset::default();
        ds.expenses.push(expense("1", "Food", "2024-03-01"));
        ds.expenses.push(expense("2", "Food", "2024-03-02"));
        ds.expenses.push(expense("3", "Rent", "2024-03-03"));

        assert_eq!(ds.linked_expense_count("Food"), 2);
        assert_eq!(ds.linked_expense_count("Rent"), 1);
        assert_eq!(ds.linked_expense_count("Travel"), 0);
    }

    #[test]
    fn test_month_total() {
        let mut ds = Dataset::default();
        ds.expenses.push(expense("12.50", "Food", "2024-03-01"));
        ds.expenses.push(expense("7.00", "Food", "2024-03-15"));
        ds.expenses.push(expense("99", "Food", "2024-04-01"));

        let march: MonthKey = "2024-03".parse().unwrap();
        assert_eq!(ds.month_total(&march).canonical(), "19.50");
    }

    #[test]
    fn test_round_trip_preserves_expense_order() {
        let mut ds = Dataset::default();
        for i in 0..5 {
            ds.expenses.push(expense("1", &format!("C{}", i), "2024-03-01"));
        }

        let json = serde_json::to_string(&ds).unwrap();
        let back: Dataset = serde_json::from_str(&json).unwrap();
        let order: Vec<_> = back.expenses.iter().map(|e| e.category.clone()).collect();
        assert_eq!(order, vec!["C0", "C1", "C2", "C3", "C4"]);
    }
}
