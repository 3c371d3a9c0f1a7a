//! Byte-count and date rendering helpers.

use chrono::DateTime;

const UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Render a byte count as a human-readable string ("12.3 MB").
///
/// 1024-based. Whole bytes stay unscaled.
pub fn format_bytes(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Render a unix timestamp as `YYYY-MM-DD`, or `None` when out of range.
pub fn format_epoch_date(epoch: i64) -> Option<String> {
    DateTime::from_timestamp(epoch, 0).map(|dt| dt.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_stay_unscaled() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
    }

    #[test]
    fn scales_through_units() {
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(12_897_484), "12.3 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.0 GB");
    }

    #[test]
    fn renders_epoch_dates() {
        assert_eq!(format_epoch_date(0).as_deref(), Some("1970-01-01"));
        assert_eq!(format_epoch_date(1_700_000_000).as_deref(), Some("2023-11-14"));
    }
}
