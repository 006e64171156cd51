//! Service layer for spendlog
//!
//! Business logic on top of the storage layer. Every mutating service
//! operation runs a full load-mutate-save cycle against the store.

pub mod budget;
pub mod category;
pub mod expense;
pub mod import;
pub mod report;

pub use budget::{BudgetAlert, BudgetService, BudgetStatus};
pub use category::{CascadeAction, CascadeOutcome, CategoryService};
pub use expense::{ExpensePatch, ExpenseService, UpdateOutcome};
pub use import::{ImportService, ImportSummary};
pub use report::{LedgerStats, ReportService};
