//! Time utilities for the trailing-week upload histogram

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Days covered by the upload histogram, today included
pub const TRAILING_WEEK_DAYS: i64 = 7;

/// Short weekday name for a calendar day
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use storage_health::utils::time::weekday_label;
/// let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(weekday_label(date), "Mon");
/// ```
pub fn weekday_label(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

/// The seven calendar days ending at `today`, oldest first
pub fn trailing_week(today: NaiveDate) -> Vec<NaiveDate> {
    (0..TRAILING_WEEK_DAYS)
        .rev()
        .map(|days_ago| today - Duration::days(days_ago))
        .collect()
}

/// Whole calendar days from `timestamp`'s UTC date to `today`
///
/// Negative for timestamps after `today`.
pub fn days_ago(today: NaiveDate, timestamp: &DateTime<Utc>) -> i64 {
    (today - timestamp.date_naive()).num_days()
}
