//! Timestamp utilities

use chrono::{DateTime, Datelike, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current calendar year (UTC)
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Decade bucket for a year (`floor(year / 10) * 10`)
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
    }

    #[test]
    fn test_current_year_is_plausible() {
        let year = current_year();
        assert!((2000..2100).contains(&year));
    }

    #[test]
    fn test_decade_of() {
        assert_eq!(decade_of(1984), 1980);
        assert_eq!(decade_of(1990), 1990);
        assert_eq!(decade_of(2009), 2000);
        assert_eq!(decade_of(-5), -10);
    }
}
