//! Storage usage aggregation.
//!
//! Folds a set of object records into per-category counts and byte totals,
//! a trailing seven-day upload histogram and a monthly cost projection. Every
//! call rebuilds the snapshot from the full input, so the category partition
//! always matches the totals.

use crate::analysis::classifier::CategoryClassifier;
use crate::analysis::cost::CostEstimator;
use crate::types::{AnalyticsSnapshot, Category, DailyUploadCount, ObjectRecord};
use crate::utils::time::{days_ago, trailing_week, weekday_label, TRAILING_WEEK_DAYS};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct AnalyticsAggregator {
    estimator: CostEstimator,
}

impl AnalyticsAggregator {
    pub fn new(estimator: CostEstimator) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &CostEstimator {
        &self.estimator
    }

    /// Aggregate relative to the current UTC day
    pub fn aggregate(&self, records: &[ObjectRecord]) -> AnalyticsSnapshot {
        self.aggregate_at(records, Utc::now())
    }

    /// Aggregate relative to an explicit instant
    pub fn aggregate_at(&self, records: &[ObjectRecord], now: DateTime<Utc>) -> AnalyticsSnapshot {
        let today = now.date_naive();

        let mut category_counts: BTreeMap<Category, usize> =
            Category::ALL.iter().map(|category| (*category, 0)).collect();
        let mut category_bytes: BTreeMap<Category, u64> =
            Category::ALL.iter().map(|category| (*category, 0)).collect();
        let mut day_buckets = [0usize; TRAILING_WEEK_DAYS as usize];
        let mut total_bytes: u64 = 0;
        let mut dropped_days = 0usize;

        for record in records {
            let category = CategoryClassifier::classify(&record.content_type, &record.filename);
            *category_counts.entry(category).or_default() += 1;
            // Byte totals saturate at u64::MAX
            let bytes = category_bytes.entry(category).or_default();
            *bytes = bytes.saturating_add(record.size_bytes);
            total_bytes = total_bytes.saturating_add(record.size_bytes);

            let age = days_ago(today, &record.created_at);
            if (0..TRAILING_WEEK_DAYS).contains(&age) {
                // Index 6 is today, index 0 is six days ago
                day_buckets[(TRAILING_WEEK_DAYS - 1 - age) as usize] += 1;
            } else {
                dropped_days += 1;
            }
        }

        let daily_uploads = trailing_week(today)
            .into_iter()
            .zip(day_buckets)
            .map(|(date, count)| DailyUploadCount {
                label: weekday_label(date),
                date,
                count,
            })
            .collect();

        debug!(
            "Aggregated {} objects ({} bytes), {} outside the trailing week",
            records.len(),
            total_bytes,
            dropped_days
        );

        AnalyticsSnapshot {
            total_objects: records.len(),
            total_bytes,
            category_counts,
            category_bytes,
            daily_uploads,
            estimated_monthly_cost: self.estimator.estimate(total_bytes),
            generated_at: now,
        }
    }
}
