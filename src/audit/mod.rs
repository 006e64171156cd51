//! Append-only audit logging
//!
//! Records one JSONL entry per mutating operation. Best-effort by policy:
//! audit failures never fail the operation being recorded.

pub mod entry;
pub mod logger;

pub use entry::AuditEntry;
pub use logger::AuditLogger;
