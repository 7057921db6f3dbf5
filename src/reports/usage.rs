//! Storage usage report formatters
//!
//! Console output shows the category breakdown with shares of the totals, the
//! trailing-week upload histogram and the monthly cost projection. JSON output
//! carries the same view so consumers do not recompute percentages.

use super::utils::{export_json, format_bytes, format_number};
use super::OutputFormat;
use crate::errors::AppResult;
use crate::types::{AnalyticsSnapshot, Category, DailyUploadCount};
use crate::utils::currency::{format_cost, format_rate};
use crate::utils::math::{safe_percentage, safe_percentage_u64};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Widest histogram bar in characters
const HISTOGRAM_WIDTH: usize = 30;

#[derive(Debug, Clone, Serialize)]
pub struct CategoryUsage {
    pub category: Category,
    pub object_count: usize,
    pub total_bytes: u64,
    pub object_percentage: f64,
    pub byte_percentage: f64,
}

/// Presentation view of an [`AnalyticsSnapshot`]
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub total_objects: usize,
    pub total_bytes: u64,
    pub categories: Vec<CategoryUsage>,
    pub daily_uploads: Vec<DailyUploadCount>,
    pub uploads_this_week: usize,
    pub estimated_monthly_cost: f64,
    pub rate_per_tib: f64,
    pub generated_at: DateTime<Utc>,
}

impl UsageReport {
    /// Categories keep their fixed order, including empty ones
    pub fn from_snapshot(snapshot: &AnalyticsSnapshot, rate_per_tib: f64) -> Self {
        let categories = Category::ALL
            .iter()
            .map(|category| {
                let object_count = snapshot.count_for(*category);
                let total_bytes = snapshot.bytes_for(*category);
                CategoryUsage {
                    category: *category,
                    object_count,
                    total_bytes,
                    object_percentage: safe_percentage(object_count, snapshot.total_objects),
                    byte_percentage: safe_percentage_u64(total_bytes, snapshot.total_bytes),
                }
            })
            .collect();

        Self {
            total_objects: snapshot.total_objects,
            total_bytes: snapshot.total_bytes,
            categories,
            daily_uploads: snapshot.daily_uploads.clone(),
            uploads_this_week: snapshot.uploads_this_week(),
            estimated_monthly_cost: snapshot.estimated_monthly_cost,
            rate_per_tib,
            generated_at: snapshot.generated_at,
        }
    }
}

pub fn format_usage_report(report: &UsageReport, format: &OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Json => export_json(report),
        OutputFormat::Console => {
            let mut output = String::new();
            output.push_str("\n📦 STORAGE USAGE\n");
            output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
            output.push_str(&format!(
                "Total:            {} across {} objects\n",
                format_bytes(report.total_bytes),
                format_number(report.total_objects as u64)
            ));
            output.push_str(&format!(
                "Estimated cost:   {} per month at {}\n\n",
                format_cost(report.estimated_monthly_cost),
                format_rate(report.rate_per_tib)
            ));

            for usage in &report.categories {
                output.push_str(&format!(
                    "{:<12} {:>10} objects ({:>5.1}%)  {:>12} ({:>5.1}%)\n",
                    usage.category.display_name(),
                    format_number(usage.object_count as u64),
                    usage.object_percentage,
                    format_bytes(usage.total_bytes),
                    usage.byte_percentage
                ));
            }

            output.push_str(&format!(
                "\nUploads, last 7 days ({} total):\n",
                format_number(report.uploads_this_week as u64)
            ));
            output.push_str(&format_histogram(&report.daily_uploads));

            output.push_str(&format!(
                "\nGenerated at {}\n",
                report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
            Ok(output)
        }
    }
}

/// One bar per day, scaled to the busiest day
fn format_histogram(days: &[DailyUploadCount]) -> String {
    let peak = days.iter().map(|day| day.count).max().unwrap_or(0);
    let mut output = String::new();

    for day in days {
        let width = if peak == 0 {
            0
        } else {
            // Round up so any non-zero day gets at least one block
            (day.count * HISTOGRAM_WIDTH).div_ceil(peak)
        };
        output.push_str(&format!(
            "  {} {:<width$} {}\n",
            day.label,
            "█".repeat(width),
            day.count,
            width = HISTOGRAM_WIDTH
        ));
    }

    output
}
