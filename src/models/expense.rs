//! Expense model
//!
//! A single recorded monetary outflow with amount, category, note and an
//! attributed date (which may be backdated, and is distinct from the
//! creation timestamp).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dates;
use super::ids::ExpenseId;
use super::money::Money;
use super::month::MonthKey;
use crate::error::LedgerResult;

/// Category assigned when the user leaves the field blank
pub const DEFAULT_CATEGORY: &str = "Misc";

/// A recorded expense entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier, immutable after creation
    pub id: ExpenseId,

    /// Exact decimal amount; may be negative (refunds)
    pub amount: Money,

    /// Category name, never empty
    pub category: String,

    /// Free text, may be empty
    #[serde(default)]
    pub note: String,

    /// Attributed date in ISO form. Kept as a string so foreign values
    /// loaded from disk survive and aggregate into the "unknown" bucket.
    pub date: String,

    /// When the expense was created
    pub created_at: DateTime<Utc>,

    /// When the expense was last modified
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Build a new expense from raw user input
    ///
    /// Validates amount and date before constructing anything; a blank
    /// category becomes [`DEFAULT_CATEGORY`] and an omitted date becomes the
    /// current time.
    pub fn new(
        amount_raw: &str,
        category: &str,
        note: &str,
        date_raw: Option<&str>,
    ) -> LedgerResult<Self> {
        let amount = Money::parse(amount_raw)?;
        let date = match date_raw {
            Some(raw) if !raw.trim().is_empty() => dates::parse_to_iso(raw)?,
            _ => dates::now_iso(),
        };

        let category = category.trim();
        let now = Utc::now();
        Ok(Self {
            id: ExpenseId::new(),
            amount,
            category: if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category.to_string()
            },
            note: note.trim().to_string(),
            date,
            created_at: now,
            updated_at: now,
        })
    }

    /// The month this expense is attributed to, `None` when the stored date
    /// does not parse
    pub fn month_key(&self) -> Option<MonthKey> {
        dates::parse_stored(&self.date).map(|dt| MonthKey::from_datetime(&dt))
    }

    /// Refresh the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// The tuple that identifies an already-imported row
    pub fn dedup_key(&self) -> (String, String, String, String) {
        (
            self.amount.canonical(),
            self.date.clone(),
            self.category.clone(),
            self.note.clone(),
        )
    }
}
