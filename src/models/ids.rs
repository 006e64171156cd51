//! Strongly-typed ID wrapper for expenses
//!
//! The newtype keeps expense ids distinct from plain strings and owns the
//! prefix-matching rule used by interactive lookups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Globally unique expense identifier, immutable after creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The 8-character short form used in listings
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }

    /// Check whether the hyphenated string form starts with `prefix`
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        self.0.to_string().starts_with(prefix)
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ExpenseId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
