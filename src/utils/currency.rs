//! Cost display helpers

/// Monthly cost rounded to cents, e.g. `$12.34`
///
/// # Examples
/// ```
/// use storage_health::utils::currency::format_cost;
///
/// assert_eq!(format_cost(0.0), "$0.00");
/// assert_eq!(format_cost(6.99), "$6.99");
/// assert_eq!(format_cost(0.016_038), "$0.02");
/// ```
pub fn format_cost(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Per-TiB rate as shown next to a projection, e.g. `$6.99/TiB/month`
pub fn format_rate(rate_per_tib: f64) -> String {
    format!("{}/TiB/month", format_cost(rate_per_tib))
}
