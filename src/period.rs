//! Month/year folder names derived from modification times.

use chrono::{DateTime, Local, TimeZone};
use std::time::SystemTime;

/// English month names as produced by `%B`.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const PERIOD_FORMAT: &str = "%B %Y";

/// Formats epoch seconds as `"<Month> <Year>"` in the local time zone.
///
/// Timestamps chrono cannot represent fall back to the epoch.
///
/// ```
/// use foldersort::period::period_key;
///
/// // Mid-month, so the result holds in every time zone.
/// assert_eq!(period_key(1_710_504_000), "March 2024");
/// ```
pub fn period_key(timestamp: i64) -> String {
    let local = Local.timestamp_opt(timestamp, 0).earliest().unwrap_or_default();
    format_period(&local)
}

/// Same as [`period_key`], for a file's `modified()` time.
pub fn period_key_for(time: SystemTime) -> String {
    format_period(&DateTime::<Local>::from(time))
}

fn format_period(time: &DateTime<Local>) -> String {
    time.format(PERIOD_FORMAT).to_string()
}

/// True when `name` begins with one of [`MONTH_NAMES`].
///
/// This is how period folders are told apart from user folders, so a user
/// folder named `"May notes"` is also left alone.
pub fn starts_with_month_name(name: &str) -> bool {
    MONTH_NAMES.iter().any(|month| name.starts_with(month))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_period_key_format() {
        assert_eq!(period_key(1_686_830_400), "June 2023");
        assert_eq!(period_key(1_668_513_600), "November 2022");
    }

    #[test]
    fn test_same_month_same_key() {
        // 2 March and 28 March 2024, noon UTC.
        assert_eq!(period_key(1_709_380_800), period_key(1_711_627_200));
        assert_eq!(period_key(1_709_380_800), "March 2024");
    }

    #[test]
    fn test_period_key_for_matches_epoch_seconds() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(1_610_712_000);
        assert_eq!(period_key_for(time), period_key(1_610_712_000));
        assert_eq!(period_key_for(time), "January 2021");
    }

    #[test]
    fn test_out_of_range_timestamp_does_not_panic() {
        let key = period_key(i64::MAX);
        assert!(starts_with_month_name(&key));
    }

    #[test]
    fn test_starts_with_month_name() {
        assert!(starts_with_month_name("June 2023"));
        assert!(starts_with_month_name("December"));
        assert!(starts_with_month_name("May notes"));
        assert!(!starts_with_month_name("june 2023"));
        assert!(!starts_with_month_name("MyProject"));
        assert!(!starts_with_month_name("Others"));
    }
}
