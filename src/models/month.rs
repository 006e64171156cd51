//! Month key for budgeting periods
//!
//! A `YYYY-MM` string identifying one calendar month. Used as the key of the
//! budget mapping and for monthly aggregation.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// A validated `YYYY-MM` budgeting period identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthKey(String);

impl MonthKey {
    /// The month a datetime falls in
    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        Self(format!("{:04}-{:02}", dt.year(), dt.month()))
    }

    /// The current local month
    pub fn current() -> Self {
        Self::from_datetime(&Local::now().naive_local())
    }

    /// The key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MonthKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let valid = s.len() == 7
            && s.as_bytes()[4] == b'-'
            && s[..4].chars().all(|c| c.is_ascii_digit())
            && matches!(s[5..].parse::<u8>(), Ok(1..=12));
        if !valid {
            return Err(LedgerError::InvalidDate(format!(
                "{} (expected YYYY-MM)",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }
}
