use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::csv::DataOrigin;
use crate::domain::question::Question;

/// Per-company question counts bucketed by timeframe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRollup {
    pub name: String,
    pub total_problems: usize,
    pub thirty_days: usize,
    pub three_months: usize,
    pub six_months: usize,
    pub more_than_six_months: usize,
    pub all: usize,
}

impl CompanyRollup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultySlice {
    pub name: String,
    pub value: usize,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframeSlice {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsStats {
    pub total_problems: usize,
    pub total_companies: usize,
    pub difficulty_distribution: Vec<DifficultySlice>,
    pub timeframe_distribution: Vec<TimeframeSlice>,
    pub top_topics: Vec<TopicCount>,
}

/// Inclusive numeric bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self { min: 0.0, max: 100.0 }
    }
}

impl Bounds {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Global min/max of the numeric fields the range filters work on
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeStats {
    pub occurrences: Bounds,
    pub frequency: Bounds,
    pub acceptance: Bounds,
}

/// Last commit touching the source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitInfo {
    pub sha: String,
    pub author: String,
    pub date: String,
    pub message: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub snapshot_id: String,
    pub processed_at: DateTime<Utc>,
    pub last_updated: String,
    pub last_commit_hash: String,
    pub commit_url: String,
    pub commit_author: String,
    pub commit_message: String,
    pub source: DataOrigin,
    pub source_sha256: String,
    pub row_count: usize,
    pub skipped_rows: usize,
}

/// Everything derived from one data load. Never patched; a refresh
/// replaces it as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub questions: Vec<Question>,
    pub companies: Vec<CompanyRollup>,
    pub stats: AnalyticsStats,
    pub ranges: RangeStats,
    pub metadata: SnapshotMetadata,
}
