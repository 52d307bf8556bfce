//! UTC clock helpers and the soft-delete sentinel.
//!
//! # Responsibility
//! - Produce the sortable datetime text stored in every timestamp column.
//! - Own the "not deleted" sentinel used by the soft-delete lifecycle.
//!
//! # Invariants
//! - All timestamps are UTC and formatted with `DATETIME_FORMAT`, so string
//!   ordering equals chronological ordering.
//! - A row is alive exactly when its `soft_deleted_at` is strictly greater than
//!   the current instant. `MAX_DATETIME` therefore means "never deleted".

use chrono::{NaiveDateTime, Utc};

/// Storage format for every timestamp column.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Maximal timestamp stored in `soft_deleted_at` for records that are alive.
pub const MAX_DATETIME: &str = "9999-12-31 23:59:59";

/// Returns the current UTC instant in storage format.
pub fn now_datetime() -> String {
    Utc::now().format(DATETIME_FORMAT).to_string()
}

/// Parses a stored timestamp. Returns `None` for empty or malformed text.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), DATETIME_FORMAT).ok()
}

/// Returns whether the given `soft_deleted_at` value lies in the past.
///
/// Unparseable values are reported as not past.
pub fn is_past(value: &str) -> bool {
    match parse_datetime(value) {
        Some(at) => at < Utc::now().naive_utc(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_past, now_datetime, parse_datetime, MAX_DATETIME};

    #[test]
    fn now_datetime_roundtrips_through_parse() {
        let now = now_datetime();
        assert_eq!(now.len(), 19);
        assert!(parse_datetime(&now).is_some());
    }

    #[test]
    fn sentinel_is_never_in_the_past() {
        assert!(!is_past(MAX_DATETIME));
        assert!(MAX_DATETIME > now_datetime().as_str());
    }

    #[test]
    fn old_timestamp_is_in_the_past_and_garbage_is_not() {
        assert!(is_past("2001-01-01 00:00:00"));
        assert!(!is_past(""));
        assert!(!is_past("yesterday"));
    }
}
