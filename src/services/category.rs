//! Category service
//!
//! Maintains the set of known categories and the cascade rules applied when
//! a category that is still referenced by expenses gets removed. All
//! mutation happens on a loaded copy of the dataset and is persisted only on
//! commit, so an aborted cascade never leaves partial state behind.

use crate::error::{LedgerError, LedgerResult};
use crate::models::DEFAULT_CATEGORY;
use crate::storage::Store;

/// What to do with expenses that reference a category being removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeAction {
    /// Remove the category and every referencing expense
    Delete,
    /// Rewrite every referencing expense to the given category
    Reassign(String),
    /// Leave everything unchanged
    Abort,
}

/// Result of a remove call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeOutcome {
    /// Whether the category was actually removed
    pub removed: bool,
    /// Number of expenses that referenced the category
    pub affected: usize,
}

/// Service for category management
pub struct CategoryService<'a> {
    store: &'a Store,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Idempotent set-insert; returns whether the name was new
    pub fn add(&self, name: &str) -> LedgerResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation("category name cannot be empty".into()));
        }

        let mut data = self.store.load()?;
        let inserted = data.categories.insert(name.to_string());
        if inserted {
            self.store.save(&data)?;
        }
        Ok(inserted)
    }

    /// All known category names, sorted
    pub fn list(&self) -> LedgerResult<Vec<String>> {
        let data = self.store.load()?;
        Ok(data.categories.iter().cloned().collect())
    }

    /// Number of expenses referencing `name`, so the caller can prompt
    /// before choosing a cascade action
    pub fn linked_count(&self, name: &str) -> LedgerResult<usize> {
        let data = self.store.load()?;
        Ok(data.linked_expense_count(name))
    }

    /// Remove a category, applying `action` to referencing expenses
    ///
    /// Unreferenced categories are removed unconditionally, whatever the
    /// action. `Abort` persists nothing.
    pub fn remove(&self, name: &str, action: CascadeAction) -> LedgerResult<CascadeOutcome> {
        let name = name.trim();
        let mut data = self.store.load()?;

        let known = data.categories.contains(name);
        let affected = data.linked_expense_count(name);
        if !known && affected == 0 {
            return Err(LedgerError::category_not_found(name));
        }

        if affected == 0 {
            data.categories.remove(name);
            self.store.save(&data)?;
            return Ok(CascadeOutcome {
                removed: true,
                affected: 0,
            });
        }

        match action {
            CascadeAction::Abort => Ok(CascadeOutcome {
                removed: false,
                affected,
            }),
            CascadeAction::Delete => {
                data.expenses.retain(|e| e.category != name);
                data.categories.remove(name);
                self.store.save(&data)?;
                Ok(CascadeOutcome {
                    removed: true,
                    affected,
                })
            }
            CascadeAction::Reassign(new_name) => {
                let new_name = new_name.trim().to_string();
                if new_name.is_empty() {
                    return Err(LedgerError::Validation(
                        "reassignment target cannot be empty".into(),
                    ));
                }
                for expense in data.expenses.iter_mut() {
                    if expense.category == name {
                        expense.category = new_name.clone();
                        expense.touch();
                    }
                }
                data.categories.remove(name);
                data.categories.insert(new_name);
                self.store.save(&data)?;
                Ok(CascadeOutcome {
                    removed: true,
                    affected,
                })
            }
        }
    }

    /// Ensure every category value actually used by an expense is present in
    /// the registry; saves only when something changed
    pub fn sync_from_usage(&self) -> LedgerResult<usize> {
        let mut data = self.store.load()?;
        let used: Vec<String> = data.expenses.iter().map(|e| e.category.clone()).collect();

        let mut added = 0;
        for category in used {
            if data.categories.insert(category) {
                added += 1;
            }
        }
        if added > 0 {
            self.store.save(&data)?;
        }
        Ok(added)
    }
}
