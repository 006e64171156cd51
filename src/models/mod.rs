//! Core data models for spendlog
//!
//! This module contains the data structures that make up the persisted
//! dataset: expenses, budgets, categories and the value types they use.

pub mod dataset;
pub mod dates;
pub mod expense;
pub mod ids;
pub mod money;
pub mod month;

pub use dataset::Dataset;
pub use expense::{Expense, DEFAULT_CATEGORY};
pub use ids::ExpenseId;
pub use money::Money;
pub use month::MonthKey;
