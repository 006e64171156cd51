//! Configuration and path management for spendlog

pub mod paths;

pub use paths::LedgerPaths;
