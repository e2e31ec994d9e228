//! Cell-level coercion helpers.
//!
//! Every helper here is total: a value that cannot be coerced becomes `None`
//! (or `0.0` for byte counts) instead of an error.

use chrono::{DateTime, NaiveDateTime};

/// Parses a string as `f64`, returning `None` for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Converts epoch seconds (with an optional fractional part) to a UTC timestamp.
///
/// Returns `None` for non-finite values and values outside chrono's range.
pub fn epoch_to_datetime(seconds: f64) -> Option<NaiveDateTime> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    // floor() keeps the fraction in [0, 1); rounding can still land on 1e9.
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos).map(|dt| dt.naive_utc())
}

/// Clamps a byte count into the non-negative finite range.
pub fn coerce_bytes(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(""), None);
        assert_eq!(parse_f64("  "), None);
        assert_eq!(parse_f64("1024"), Some(1024.0));
        assert_eq!(parse_f64("  3.5  "), Some(3.5));
        assert_eq!(parse_f64("invalid"), None);
    }

    #[test]
    fn test_epoch_to_datetime_whole_seconds() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 5)
            .unwrap();
        assert_eq!(epoch_to_datetime(1_704_067_205.0), Some(expected));
    }

    #[test]
    fn test_epoch_to_datetime_keeps_fraction() {
        let dt = epoch_to_datetime(1_704_067_205.25).unwrap();
        assert_eq!(dt.and_utc().timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_epoch_to_datetime_rejects_non_finite() {
        assert_eq!(epoch_to_datetime(f64::NAN), None);
        assert_eq!(epoch_to_datetime(f64::INFINITY), None);
        assert_eq!(epoch_to_datetime(1e300), None);
    }

    #[test]
    fn test_coerce_bytes() {
        assert_eq!(coerce_bytes(42.0), 42.0);
        assert_eq!(coerce_bytes(-1.0), 0.0);
        assert_eq!(coerce_bytes(f64::NAN), 0.0);
        assert_eq!(coerce_bytes(f64::INFINITY), 0.0);
    }
}
