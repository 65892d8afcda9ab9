use serde::{Deserialize, Serialize};

use crate::domain::analytics::Bounds;

/// How a multi-select filter combines its selections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    And,
    #[default]
    Or,
}

/// Optional bounds; an unset side falls back to the global stat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn resolve(&self, global: Bounds) -> Bounds {
        Bounds {
            min: self.min.unwrap_or(global.min),
            max: self.max.unwrap_or(global.max),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub search_term: String,
    pub selected_companies: Vec<String>,
    pub selected_difficulties: Vec<String>,
    pub selected_timeframes: Vec<String>,
    pub selected_topics: Vec<String>,
    pub show_multi_company: bool,
    pub company_filter_mode: FilterMode,
    pub topic_filter_mode: FilterMode,
    pub occurrences_range: RangeFilter,
    pub frequency_range: RangeFilter,
    pub acceptance_range: RangeFilter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Title,
    Difficulty,
    Frequency,
    AcceptanceRate,
    Timeframe,
    Occurrences,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortState {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}
