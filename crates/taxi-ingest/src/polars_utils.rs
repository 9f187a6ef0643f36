//! Polars AnyValue utility functions.
//!
//! Helpers for turning Polars `AnyValue` cells into the textual forms used
//! by the bulk-transfer serializer and the summary export.

use chrono::DateTime;
use polars::prelude::{AnyValue, TimeUnit};

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null; timestamps render in SQL form.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "true" } else { "false" }.to_string(),
        AnyValue::Datetime(v, unit, _) => datetime_to_string(v, unit),
        AnyValue::DatetimeOwned(v, unit, _) => datetime_to_string(v, unit),
        other => other.to_string(),
    }
}

/// Formats an epoch offset in the given unit as `YYYY-MM-DD HH:MM:SS.ffffff`.
pub fn datetime_to_string(value: i64, unit: TimeUnit) -> String {
    let datetime = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    };
    match datetime {
        Some(dt) => dt.naive_utc().format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
        None => String::new(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::{datetime_to_string, format_numeric};
    use polars::prelude::TimeUnit;

    #[test]
    fn formats_numerics_without_trailing_noise() {
        assert_eq!(format_numeric(4.0), "4");
        assert_eq!(format_numeric(9.5), "9.5");
        assert_eq!(format_numeric(10.0), "10");
        assert_eq!(format_numeric(0.0), "0");
    }

    #[test]
    fn formats_microsecond_timestamps() {
        // 2023-01-01T00:00:00
        assert_eq!(
            datetime_to_string(1_672_531_200_000_000, TimeUnit::Microseconds),
            "2023-01-01 00:00:00.000000"
        );
    }
}
