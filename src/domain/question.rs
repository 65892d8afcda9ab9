use serde::{Deserialize, Serialize};

use crate::domain::csv::{split_topics, NormalizedRow};

/// An interview problem aggregated over every CSV row sharing its title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub title: String,
    pub difficulty: String,
    pub frequency: f64,
    pub acceptance_rate: f64,
    pub link: String,
    pub topics: String,
    /// Sorted, distinct
    pub companies: Vec<String>,
    /// Sorted, distinct
    pub timeframes: Vec<String>,
    /// Every row that contributed, in input order. Filters match against
    /// these rather than the deduplicated arrays.
    #[serde(rename = "originalRows")]
    pub original_rows: Vec<NormalizedRow>,
}

impl Question {
    /// Start a question from the first row seen for its title.
    pub fn from_first_row(row: &NormalizedRow) -> Self {
        Self {
            title: row.title.clone(),
            difficulty: row.difficulty.clone(),
            frequency: row.frequency,
            acceptance_rate: row.acceptance_rate,
            link: row.link.clone(),
            topics: row.topics.clone(),
            companies: Vec::new(),
            timeframes: Vec::new(),
            original_rows: Vec::new(),
        }
    }

    /// Number of raw rows behind this question.
    pub fn occurrences(&self) -> usize {
        self.original_rows.len()
    }

    pub fn topic_list(&self) -> Vec<String> {
        split_topics(&self.topics)
    }

    pub fn primary_timeframe(&self) -> &str {
        self.timeframes.first().map(String::as_str).unwrap_or("")
    }

    /// Distinct timeframes of the rows reported by `company`, in row order.
    pub fn timeframes_for_company(&self, company: &str) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in self.original_rows.iter().filter(|r| r.company == company) {
            if !seen.contains(&row.timeframe.as_str()) {
                seen.push(row.timeframe.as_str());
            }
        }
        seen
    }
}

/// Difficulty rank used for sorting; unknown values sit with Medium.
pub fn difficulty_rank(difficulty: &str) -> u8 {
    match difficulty.trim().to_ascii_uppercase().as_str() {
        "EASY" => 1,
        "MEDIUM" => 2,
        "HARD" => 3,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(company: &str, timeframe: &str) -> NormalizedRow {
        NormalizedRow {
            difficulty: "Easy".into(),
            title: "Two Sum".into(),
            frequency: 50.0,
            acceptance_rate: 50.0,
            link: String::new(),
            company: company.into(),
            timeframe: timeframe.into(),
            topics: "Array".into(),
        }
    }

    #[test]
    fn test_timeframes_for_company_uses_co_occurrence() {
        let mut q = Question::from_first_row(&row("Google", "1 Month"));
        q.original_rows = vec![
            row("Google", "1 Month"),
            row("Meta", "3 Months"),
            row("Google", "1 Month"),
            row("Google", "All"),
        ];
        assert_eq!(q.timeframes_for_company("Google"), vec!["1 Month", "All"]);
        assert_eq!(q.timeframes_for_company("Meta"), vec!["3 Months"]);
        assert!(q.timeframes_for_company("Amazon").is_empty());
    }

    #[test]
    fn test_difficulty_rank_is_case_insensitive() {
        assert_eq!(difficulty_rank("easy"), 1);
        assert_eq!(difficulty_rank("HARD"), 3);
        assert_eq!(difficulty_rank("Medium"), 2);
        assert_eq!(difficulty_rank("Unknown"), 2);
    }

    #[test]
    fn test_serializes_original_rows_key() {
        let q = Question::from_first_row(&row("Google", "1 Month"));
        let json = serde_json::to_value(&q).unwrap();
        assert!(json.get("originalRows").is_some());
        assert!(json.get("acceptance_rate").is_some());
    }
}
