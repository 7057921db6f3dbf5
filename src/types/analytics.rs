//! Storage usage analytics types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed usage buckets; `Other` is the catch-all so categories partition every object set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Photos,
    Videos,
    Audio,
    Documents,
    Other,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Photos,
        Category::Videos,
        Category::Audio,
        Category::Documents,
        Category::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Photos => "Photos",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Documents => "Documents",
            Category::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Raw metadata of one stored object, from a live listing or a cached snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    pub size_bytes: u64,
    #[serde(default)]
    pub content_type: String,
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

/// One bar of the trailing-week upload histogram
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyUploadCount {
    /// Short weekday name, e.g. "Mon"
    pub label: String,
    pub date: NaiveDate,
    pub count: usize,
}

/// Categorised usage statistics, rebuilt from scratch on every refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_objects: usize,
    pub total_bytes: u64,
    pub category_counts: BTreeMap<Category, usize>,
    pub category_bytes: BTreeMap<Category, u64>,
    /// Seven entries, oldest first, today last
    pub daily_uploads: Vec<DailyUploadCount>,
    pub estimated_monthly_cost: f64,
    pub generated_at: DateTime<Utc>,
}

impl AnalyticsSnapshot {
    pub fn count_for(&self, category: Category) -> usize {
        self.category_counts.get(&category).copied().unwrap_or(0)
    }

    pub fn bytes_for(&self, category: Category) -> u64 {
        self.category_bytes.get(&category).copied().unwrap_or(0)
    }

    /// Whether the categories partition the totals exactly
    pub fn is_consistent(&self) -> bool {
        self.category_counts.values().sum::<usize>() == self.total_objects
            && self
                .category_bytes
                .values()
                .fold(0u64, |sum, bytes| sum.saturating_add(*bytes))
                == self.total_bytes
    }

    /// Uploads counted in the trailing-week histogram
    pub fn uploads_this_week(&self) -> usize {
        self.daily_uploads.iter().map(|day| day.count).sum()
    }
}
