//! Multi-format date parsing
//!
//! Accepted formats are tried in a fixed priority order: ISO 8601 datetime
//! first, then `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `DD-MM-YYYY`,
//! `DD/MM/YYYY`. The order is stable because it decides ambiguous strings
//! like `01-02-2024` (parsed day-first).

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::error::{LedgerError, LedgerResult};

/// Storage form for attributed dates and timestamps
const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a date string in one of the accepted formats
pub fn parse_date(input: &str) -> LedgerResult<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return Err(LedgerError::InvalidDate("date required".into()));
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(midnight(d));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    for fmt in ["%d-%m-%Y", "%d/%m/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(midnight(d));
        }
    }

    Err(LedgerError::InvalidDate(format!(
        "{} (use YYYY-MM-DD or ISO format)",
        s
    )))
}

/// Parse and re-emit in the canonical ISO storage form
pub fn parse_to_iso(input: &str) -> LedgerResult<String> {
    Ok(parse_date(input)?.format(ISO_FORMAT).to_string())
}

/// Current local time in the canonical ISO storage form
pub fn now_iso() -> String {
    Local::now().naive_local().format(ISO_FORMAT).to_string()
}

/// Try to parse an already-stored date string; `None` for foreign or corrupt
/// values (those bucket as "unknown" in aggregation)
pub fn parse_stored(stored: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(stored, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

fn midnight(d: NaiveDate) -> NaiveDateTime {
    d.and_hms_opt(0, 0, 0).expect("midnight is a valid time")
}
