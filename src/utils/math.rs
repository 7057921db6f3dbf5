//! Percentage helpers with zero-total guards for report shares

/// Share of `part` in `total` as a percentage, 0.0 for an empty total
///
/// # Examples
/// ```
/// use storage_health::utils::math::safe_percentage;
///
/// assert_eq!(safe_percentage(1, 4), 25.0);
/// assert_eq!(safe_percentage(3, 0), 0.0);
/// ```
#[inline]
pub fn safe_percentage(part: usize, total: usize) -> f64 {
    safe_percentage_u64(part as u64, total as u64)
}

/// Byte-total variant of [`safe_percentage`]
///
/// Totals above 2^53 lose precision in the cast.
#[inline]
pub fn safe_percentage_u64(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}
