// ============================================================
// FILTER / SORT ENGINE
// ============================================================
// Pure predicates and comparators over aggregated questions

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::application::use_cases::question_aggregator::aggregate_questions;
use crate::domain::analytics::RangeStats;
use crate::domain::csv::NormalizedRow;
use crate::domain::filter::{FilterMode, FilterState, SortDirection, SortField, SortState};
use crate::domain::question::{difficulty_rank, Question};

/// Lowercased, trimmed search text; `None` when blank.
fn search_needle(term: &str) -> Option<String> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn row_matches_search(row: &NormalizedRow, needle: &str) -> bool {
    row.title.to_lowercase().contains(needle) || row.topics.to_lowercase().contains(needle)
}

fn row_passes(
    question: &Question,
    row: &NormalizedRow,
    filters: &FilterState,
    needle: Option<&str>,
) -> bool {
    if let Some(needle) = needle {
        if !row_matches_search(row, needle) {
            return false;
        }
    }

    if !filters.selected_companies.is_empty() {
        let ok = match filters.company_filter_mode {
            FilterMode::Or => filters.selected_companies.contains(&row.company),
            FilterMode::And => filters
                .selected_companies
                .iter()
                .all(|c| question.companies.contains(c)),
        };
        if !ok {
            return false;
        }
    }

    if !filters.selected_difficulties.is_empty()
        && !filters.selected_difficulties.contains(&row.difficulty)
    {
        return false;
    }

    if !filters.selected_timeframes.is_empty()
        && !filters.selected_timeframes.contains(&row.timeframe)
    {
        return false;
    }

    if !filters.selected_topics.is_empty() {
        let topics = row.topic_list();
        let ok = match filters.topic_filter_mode {
            FilterMode::Or => filters.selected_topics.iter().any(|t| topics.contains(t)),
            FilterMode::And => filters.selected_topics.iter().all(|t| topics.contains(t)),
        };
        if !ok {
            return false;
        }
    }

    true
}

/// Whether a question survives the filter set.
pub fn question_matches(question: &Question, filters: &FilterState, ranges: &RangeStats) -> bool {
    let needle = search_needle(&filters.search_term);
    let any_row = question
        .original_rows
        .iter()
        .any(|row| row_passes(question, row, filters, needle.as_deref()));
    if !any_row {
        return false;
    }

    let occurrences = filters.occurrences_range.resolve(ranges.occurrences);
    let frequency = filters.frequency_range.resolve(ranges.frequency);
    let acceptance = filters.acceptance_range.resolve(ranges.acceptance);
    if !occurrences.contains(question.occurrences() as f64)
        || !frequency.contains(question.frequency)
        || !acceptance.contains(question.acceptance_rate)
    {
        return false;
    }

    !filters.show_multi_company || question.companies.len() > 1
}

/// Keep the questions matching `filters`, preserving input order.
pub fn filter_questions(
    questions: &[Question],
    filters: &FilterState,
    ranges: &RangeStats,
) -> Vec<Question> {
    questions
        .iter()
        .filter(|q| question_matches(q, filters, ranges))
        .cloned()
        .collect()
}

fn compare(a: &Question, b: &Question, field: SortField) -> Ordering {
    match field {
        SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortField::Difficulty => difficulty_rank(&a.difficulty).cmp(&difficulty_rank(&b.difficulty)),
        SortField::Frequency => a.frequency.total_cmp(&b.frequency),
        SortField::AcceptanceRate => a.acceptance_rate.total_cmp(&b.acceptance_rate),
        SortField::Timeframe => a.primary_timeframe().cmp(b.primary_timeframe()),
        SortField::Occurrences => a.occurrences().cmp(&b.occurrences()),
    }
}

/// Stable sort; descending reverses the comparator so ties keep their order.
pub fn sort_questions(questions: &mut [Question], sort: SortState) {
    questions.sort_by(|a, b| {
        let ord = compare(a, b, sort.field);
        match sort.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// Window over a result list. `limit == None` returns everything after
/// `offset`.
pub fn paginate<T: Clone>(items: &[T], offset: usize, limit: Option<usize>) -> Vec<T> {
    let start = offset.min(items.len());
    let end = match limit {
        Some(limit) => start.saturating_add(limit).min(items.len()),
        None => items.len(),
    };
    items[start..end].to_vec()
}

/// Page of questions plus the size of the full result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPage {
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

/// Simple row filter behind `GET /process-csv`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowQuery {
    pub company: Option<String>,
    pub difficulty: Option<String>,
    pub timeframe: Option<String>,
    pub search: Option<String>,
}

/// `None`, blank and `"all"` disable a selector.
fn active(selector: &Option<String>) -> Option<&str> {
    match selector.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(s) if s.eq_ignore_ascii_case("all") => None,
        Some(s) => Some(s),
    }
}

impl RowQuery {
    pub fn matches(&self, row: &NormalizedRow) -> bool {
        if let Some(company) = active(&self.company) {
            if row.company != company {
                return false;
            }
        }
        if let Some(difficulty) = active(&self.difficulty) {
            if row.difficulty != difficulty {
                return false;
            }
        }
        if let Some(timeframe) = active(&self.timeframe) {
            if row.timeframe != timeframe {
                return false;
            }
        }
        match self.search.as_deref().and_then(search_needle) {
            Some(needle) => row_matches_search(row, &needle),
            None => true,
        }
    }

    /// Filter the raw rows behind `questions`, re-aggregate the survivors
    /// and cut one page out of the result.
    pub fn run(&self, questions: &[Question], offset: usize, limit: Option<usize>) -> QuestionPage {
        let rows: Vec<NormalizedRow> = questions
            .iter()
            .flat_map(|q| q.original_rows.iter())
            .filter(|row| self.matches(row))
            .cloned()
            .collect();
        let regrouped = aggregate_questions(&rows);
        QuestionPage {
            total_questions: regrouped.len(),
            questions: paginate(&regrouped, offset, limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::rollup_calculator::range_stats;
    use crate::domain::filter::RangeFilter;

    fn row(title: &str, difficulty: &str, company: &str, timeframe: &str, topics: &str) -> NormalizedRow {
        NormalizedRow {
            difficulty: difficulty.into(),
            title: title.into(),
            frequency: 50.0,
            acceptance_rate: 50.0,
            link: String::new(),
            company: company.into(),
            timeframe: timeframe.into(),
            topics: topics.into(),
        }
    }

    fn questions() -> Vec<Question> {
        let mut qs = aggregate_questions(&[
            row("Two Sum", "Easy", "Google", "1 Month", "Array,Hash Table"),
            row("Two Sum", "Easy", "Meta", "3 Months", "Array,Hash Table"),
            row("LRU Cache", "Medium", "Amazon", "All", "Design;Hash Table"),
            row("Word Ladder", "Hard", "Google", "6 Months", "Graph|BFS"),
        ]);
        for q in qs.iter_mut() {
            match q.title.as_str() {
                "Two Sum" => q.frequency = 90.0,
                "LRU Cache" => q.frequency = 40.0,
                _ => q.frequency = 10.0,
            }
        }
        qs
    }

    fn titles(qs: &[Question]) -> Vec<&str> {
        qs.iter().map(|q| q.title.as_str()).collect()
    }

    fn run(filters: &FilterState) -> Vec<Question> {
        let qs = questions();
        let ranges = range_stats(&qs);
        filter_questions(&qs, filters, &ranges)
    }

    #[test]
    fn test_empty_filters_keep_everything() {
        assert_eq!(run(&FilterState::default()).len(), 3);
        assert!(filter_questions(&[], &FilterState::default(), &RangeStats::default()).is_empty());
    }

    #[test]
    fn test_search_matches_title_or_topics() {
        let filters = FilterState {
            search_term: "  hash ".into(),
            ..Default::default()
        };
        assert_eq!(titles(&run(&filters)), vec!["LRU Cache", "Two Sum"]);

        let filters = FilterState {
            search_term: "ladder".into(),
            ..Default::default()
        };
        assert_eq!(titles(&run(&filters)), vec!["Word Ladder"]);
    }

    #[test]
    fn test_company_and_or_duality() {
        let single = vec!["Meta".to_string()];
        let or = FilterState {
            selected_companies: single.clone(),
            company_filter_mode: FilterMode::Or,
            ..Default::default()
        };
        let and = FilterState {
            selected_companies: single,
            company_filter_mode: FilterMode::And,
            ..Default::default()
        };
        assert_eq!(titles(&run(&or)), titles(&run(&and)));

        let both = FilterState {
            selected_companies: vec!["Google".into(), "Meta".into()],
            company_filter_mode: FilterMode::And,
            ..Default::default()
        };
        assert_eq!(titles(&run(&both)), vec!["Two Sum"]);

        let either = FilterState {
            company_filter_mode: FilterMode::Or,
            ..both
        };
        assert_eq!(titles(&run(&either)), vec!["Two Sum", "Word Ladder"]);
    }

    #[test]
    fn test_row_predicates_must_hold_on_the_same_row() {
        // Two Sum is asked by Meta and in the 1 Month window, but not both at once.
        let filters = FilterState {
            selected_companies: vec!["Meta".into()],
            selected_timeframes: vec!["1 Month".into()],
            ..Default::default()
        };
        assert!(run(&filters).is_empty());
    }

    #[test]
    fn test_topic_modes() {
        let and = FilterState {
            selected_topics: vec!["Array".into(), "Hash Table".into()],
            topic_filter_mode: FilterMode::And,
            ..Default::default()
        };
        assert_eq!(titles(&run(&and)), vec!["Two Sum"]);

        let or = FilterState {
            topic_filter_mode: FilterMode::Or,
            ..and
        };
        assert_eq!(titles(&run(&or)), vec!["LRU Cache", "Two Sum"]);
    }

    #[test]
    fn test_difficulty_selection() {
        let filters = FilterState {
            selected_difficulties: vec!["Hard".into(), "Medium".into()],
            ..Default::default()
        };
        assert_eq!(titles(&run(&filters)), vec!["LRU Cache", "Word Ladder"]);
    }

    #[test]
    fn test_range_boundary_is_inclusive() {
        let at_max = FilterState {
            frequency_range: RangeFilter::between(10.0, 90.0),
            ..Default::default()
        };
        assert_eq!(run(&at_max).len(), 3);

        let below_max = FilterState {
            frequency_range: RangeFilter::between(10.0, 89.0),
            ..Default::default()
        };
        assert_eq!(titles(&run(&below_max)), vec!["LRU Cache", "Word Ladder"]);
    }

    #[test]
    fn test_occurrence_range_upper_bound_is_inclusive() {
        let at_max = FilterState {
            occurrences_range: RangeFilter::between(1.0, 2.0),
            ..Default::default()
        };
        assert!(titles(&run(&at_max)).contains(&"Two Sum"));

        let below_max = FilterState {
            occurrences_range: RangeFilter::between(1.0, 1.0),
            ..Default::default()
        };
        assert_eq!(titles(&run(&below_max)), vec!["LRU Cache", "Word Ladder"]);
    }

    #[test]
    fn test_occurrence_range_with_global_fallback() {
        let filters = FilterState {
            occurrences_range: RangeFilter { min: Some(2.0), max: None },
            ..Default::default()
        };
        assert_eq!(titles(&run(&filters)), vec!["Two Sum"]);
    }

    #[test]
    fn test_multi_company_only() {
        let filters = FilterState {
            show_multi_company: true,
            ..Default::default()
        };
        assert_eq!(titles(&run(&filters)), vec!["Two Sum"]);
    }

    #[test]
    fn test_sort_by_frequency_both_directions() {
        let mut qs = questions();
        sort_questions(&mut qs, SortState::new(SortField::Frequency, SortDirection::Asc));
        assert_eq!(titles(&qs), vec!["Word Ladder", "LRU Cache", "Two Sum"]);
        sort_questions(&mut qs, SortState::new(SortField::Frequency, SortDirection::Desc));
        assert_eq!(titles(&qs), vec!["Two Sum", "LRU Cache", "Word Ladder"]);
    }

    #[test]
    fn test_sort_is_stable_in_both_directions() {
        let mut qs = aggregate_questions(&[
            row("a", "Easy", "G", "All", ""),
            row("b", "Easy", "G", "All", ""),
            row("c", "Hard", "G", "All", ""),
        ]);
        sort_questions(&mut qs, SortState::new(SortField::Difficulty, SortDirection::Asc));
        assert_eq!(titles(&qs), vec!["a", "b", "c"]);
        sort_questions(&mut qs, SortState::new(SortField::Difficulty, SortDirection::Desc));
        assert_eq!(titles(&qs), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sort_by_difficulty_unknown_sits_with_medium() {
        let mut qs = aggregate_questions(&[
            row("h", "Hard", "G", "All", ""),
            row("u", "Unknown", "G", "All", ""),
            row("e", "Easy", "G", "All", ""),
        ]);
        sort_questions(&mut qs, SortState::new(SortField::Difficulty, SortDirection::Asc));
        assert_eq!(titles(&qs), vec!["e", "u", "h"]);
    }

    #[test]
    fn test_paginate() {
        let items = vec![1, 2, 3, 4, 5];
        assert_eq!(paginate(&items, 1, Some(2)), vec![2, 3]);
        assert_eq!(paginate(&items, 4, Some(10)), vec![5]);
        assert_eq!(paginate(&items, 9, Some(1)), Vec::<i32>::new());
        assert_eq!(paginate(&items, 0, None), items);
    }

    #[test]
    fn test_row_query_reaggregates() {
        let query = RowQuery {
            company: Some("Google".into()),
            difficulty: Some("all".into()),
            ..Default::default()
        };
        let page = query.run(&questions(), 0, None);
        assert_eq!(page.total_questions, 2);
        let two_sum = page.questions.iter().find(|q| q.title == "Two Sum").unwrap();
        assert_eq!(two_sum.companies, vec!["Google"]);
        assert_eq!(two_sum.occurrences(), 1);
    }

    #[test]
    fn test_row_query_pagination_and_search() {
        let query = RowQuery {
            search: Some("HASH".into()),
            ..Default::default()
        };
        let page = query.run(&questions(), 1, Some(1));
        assert_eq!(page.total_questions, 2);
        assert_eq!(titles(&page.questions), vec!["Two Sum"]);
    }
}
