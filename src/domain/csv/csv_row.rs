// ============================================================
// CSV ROW TYPES
// ============================================================
// Raw and normalized question rows, plus header resolution

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::{AppError, Result};

/// Columns every question CSV must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "difficulty",
    "title",
    "frequency",
    "acceptance_rate",
    "link",
    "company",
    "timeframe",
    "topics",
];

/// Positions of the required columns inside a header row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvHeader {
    /// Header names as they appeared (trimmed, unquoted)
    pub names: Vec<String>,
    difficulty: usize,
    title: usize,
    frequency: usize,
    acceptance_rate: usize,
    link: usize,
    company: usize,
    timeframe: usize,
    topics: usize,
}

impl CsvHeader {
    /// Resolve the required columns, failing when any is missing.
    pub fn resolve(names: Vec<String>) -> Result<Self> {
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|required| !names.iter().any(|name| name == required))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::ValidationError(format!(
                "CSV header is missing required columns: {}",
                missing.join(", ")
            )));
        }

        let index_of = |column: &str| names.iter().position(|name| name == column).unwrap_or(0);

        Ok(Self {
            difficulty: index_of("difficulty"),
            title: index_of("title"),
            frequency: index_of("frequency"),
            acceptance_rate: index_of("acceptance_rate"),
            link: index_of("link"),
            company: index_of("company"),
            timeframe: index_of("timeframe"),
            topics: index_of("topics"),
            names,
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Map split values onto the named fields. The caller guarantees the
    /// value count equals the header count.
    pub fn raw_row(&self, values: &[String]) -> RawRow {
        let get = |idx: usize| values.get(idx).cloned().unwrap_or_default();
        RawRow {
            difficulty: get(self.difficulty),
            title: get(self.title),
            frequency: get(self.frequency),
            acceptance_rate: get(self.acceptance_rate),
            link: get(self.link),
            company: get(self.company),
            timeframe: get(self.timeframe),
            topics: get(self.topics),
        }
    }
}

/// One CSV line after the quote-aware split, still untyped text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub difficulty: String,
    pub title: String,
    pub frequency: String,
    pub acceptance_rate: String,
    pub link: String,
    pub company: String,
    pub timeframe: String,
    pub topics: String,
}

/// A validated question row with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub difficulty: String,
    pub title: String,
    pub frequency: f64,
    pub acceptance_rate: f64,
    pub link: String,
    pub company: String,
    pub timeframe: String,
    pub topics: String,
}

impl NormalizedRow {
    /// Topics of this row split on `,`, `;` or `|`
    pub fn topic_list(&self) -> Vec<String> {
        split_topics(&self.topics)
    }
}

/// Why a data row was skipped during normalization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRejection {
    FieldCountMismatch { expected: usize, found: usize },
    MissingTitle,
    MissingCompany,
    MissingTimeframe,
}

impl fmt::Display for RowRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRejection::FieldCountMismatch { expected, found } => {
                write!(f, "expected {} fields, found {}", expected, found)
            }
            RowRejection::MissingTitle => write!(f, "missing title"),
            RowRejection::MissingCompany => write!(f, "missing company"),
            RowRejection::MissingTimeframe => write!(f, "missing timeframe"),
        }
    }
}

/// Split a delimiter-joined topic string, trimming and dropping empties.
pub fn split_topics(topics: &str) -> Vec<String> {
    topics
        .split([',', ';', '|'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
