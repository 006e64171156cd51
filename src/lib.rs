//! spendlog - Interactive personal expense ledger
//!
//! Records expenses, categorizes them, tracks monthly budgets and produces
//! summaries, all persisted to a single local JSON document saved with
//! atomic replace and a rolling one-slot backup.
//!
//! # Architecture
//!
//! - `config`: path management (data file, staging path, backup slot)
//! - `error`: custom error types
//! - `models`: core data model (expenses, money, budgets, categories)
//! - `storage`: the record store with atomic load/save
//! - `services`: business logic layer
//! - `export`: CSV export and text reports
//! - `audit`: append-only operation log
//! - `cli`: the interactive command loop

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
