//! Audit entry model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of the audit log: what happened and when
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation happened
    pub at: DateTime<Utc>,

    /// Operation name ("add", "delete", "setbudget", ...)
    pub action: String,

    /// Human-readable detail of what changed
    pub detail: String,
}

impl AuditEntry {
    /// Create an entry timestamped now
    pub fn now(action: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            at: Utc::now(),
            action: action.into(),
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_round_trip() {
        let entry = AuditEntry::now("add", "expense 12.50 Food");
        let json = serde_json::to_string(&entry).unwrap();
        let back: AuditEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.action, "add");
        assert_eq!(back.detail, "expense 12.50 Food");
    }
}
