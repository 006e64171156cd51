//! Budget service
//!
//! Per-month budget amounts and spent-vs-budget comparison. Budgets are
//! keyed by `YYYY-MM`; setting the same month twice is last-write-wins.

use crate::error::LedgerResult;
use crate::models::{Expense, Money, MonthKey};
use crate::storage::Store;

/// Spent-vs-budget figures for one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetStatus {
    pub month: MonthKey,
    pub spent: Money,
    pub budget: Option<Money>,
    pub remaining: Option<Money>,
    pub exceeded: bool,
}

/// Raised after an insert pushes a month's total over its budget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetAlert {
    pub month: MonthKey,
    pub spent: Money,
    pub budget: Money,
}

/// Service for budget management
pub struct BudgetService<'a> {
    store: &'a Store,
}

impl<'a> BudgetService<'a> {
    /// Create a new budget service
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Set the budget for a month; last-write-wins
    ///
    /// Fails with `InvalidDate` for a malformed month key and
    /// `InvalidAmount` for a malformed amount, before any mutation.
    pub fn set(&self, month_raw: &str, amount_raw: &str) -> LedgerResult<(MonthKey, Money)> {
        let month: MonthKey = month_raw.parse()?;
        let amount = Money::parse(amount_raw)?;

        let mut data = self.store.load()?;
        data.budgets.insert(month.clone(), amount);
        self.store.save(&data)?;

        Ok((month, amount))
    }

    /// Spent-vs-budget status for a month
    pub fn status(&self, month: &MonthKey) -> LedgerResult<BudgetStatus> {
        let data = self.store.load()?;

        let spent = data.month_total(month);
        let budget = data.budgets.get(month).copied();
        let remaining = budget.map(|b| b - spent);
        let exceeded = remaining.map(|r| r.is_negative()).unwrap_or(false);

        Ok(BudgetStatus {
            month: month.clone(),
            spent,
            budget,
            remaining,
            exceeded,
        })
    }

    /// Check whether `expense`'s month is now over budget
    ///
    /// Read-only; returns `None` when the expense's date doesn't parse, no
    /// budget is set for the month, or the total doesn't exceed it.
    pub fn check_alert(&self, expense: &Expense) -> LedgerResult<Option<BudgetAlert>> {
        let Some(month) = expense.month_key() else {
            return Ok(None);
        };

        let data = self.store.load()?;
        let Some(budget) = data.budgets.get(&month).copied() else {
            return Ok(None);
        };

        let spent = data.month_total(&month);
        if spent > budget {
            Ok(Some(BudgetAlert {
                month,
                spent,
                budget,
            }))
        } else {
            Ok(None)
        }
    }
}
