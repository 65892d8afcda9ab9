// ============================================================
// STATS / ROLLUP CALCULATOR
// ============================================================
// Company rollups, histograms, top topics and range bounds

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::analytics::{
    AnalyticsStats, Bounds, CompanyRollup, DifficultySlice, RangeStats, TimeframeSlice,
    TopicCount,
};
use crate::domain::question::{difficulty_rank, Question};

pub const TOP_TOPICS_LIMIT: usize = 20;

const EASY_COLOR: &str = "#22c55e";
const MEDIUM_COLOR: &str = "#f59e0b";
const HARD_COLOR: &str = "#ef4444";
const OTHER_COLOR: &str = "#6b7280";

const THIRTY_DAYS_KEYWORDS: [&str; 2] = ["1 month", "thirty"];
const THREE_MONTHS_KEYWORDS: [&str; 2] = ["3 month", "three"];
const SIX_MONTHS_KEYWORDS: [&str; 2] = ["6 month", "six"];
const MORE_THAN_SIX_MONTHS_KEYWORDS: [&str; 2] = ["more than", "over"];
const ALL_KEYWORDS: [&str; 1] = ["all"];

fn mentions(timeframes: &[String], keywords: &[&str]) -> bool {
    timeframes
        .iter()
        .any(|tf| keywords.iter().any(|kw| tf.contains(kw)))
}

/// One rollup per company, sorted by total problems (descending, ties in
/// first-seen order).
///
/// For each (question, company) pair the timeframes considered are the ones
/// that company's rows of the question carry. A bucket counts the pair at
/// most once, but one pair may land in several buckets.
pub fn company_rollups(questions: &[Question]) -> Vec<CompanyRollup> {
    let mut rollups: Vec<CompanyRollup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for question in questions {
        for company in &question.companies {
            let slot = *index.entry(company.clone()).or_insert_with(|| {
                rollups.push(CompanyRollup::new(company.clone()));
                rollups.len() - 1
            });

            let timeframes: Vec<String> = question
                .timeframes_for_company(company)
                .into_iter()
                .map(str::to_lowercase)
                .collect();

            let rollup = &mut rollups[slot];
            rollup.total_problems += 1;
            if mentions(&timeframes, &THIRTY_DAYS_KEYWORDS) {
                rollup.thirty_days += 1;
            }
            if mentions(&timeframes, &THREE_MONTHS_KEYWORDS) {
                rollup.three_months += 1;
            }
            if mentions(&timeframes, &SIX_MONTHS_KEYWORDS) {
                rollup.six_months += 1;
            }
            if mentions(&timeframes, &MORE_THAN_SIX_MONTHS_KEYWORDS) {
                rollup.more_than_six_months += 1;
            }
            if mentions(&timeframes, &ALL_KEYWORDS) {
                rollup.all += 1;
            }
        }
    }

    rollups.sort_by(|a, b| b.total_problems.cmp(&a.total_problems));
    rollups
}

pub fn difficulty_color(difficulty: &str) -> &'static str {
    match difficulty.trim().to_ascii_uppercase().as_str() {
        "EASY" => EASY_COLOR,
        "MEDIUM" => MEDIUM_COLOR,
        "HARD" => HARD_COLOR,
        _ => OTHER_COLOR,
    }
}

fn is_known_difficulty(difficulty: &str) -> bool {
    matches!(
        difficulty.trim().to_ascii_uppercase().as_str(),
        "EASY" | "MEDIUM" | "HARD"
    )
}

/// Questions per difficulty; Easy, Medium, Hard first, then the rest by name.
pub fn difficulty_distribution(questions: &[Question]) -> Vec<DifficultySlice> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for q in questions {
        *counts.entry(q.difficulty.as_str()).or_insert(0) += 1;
    }

    let mut slices: Vec<DifficultySlice> = counts
        .into_iter()
        .map(|(name, value)| DifficultySlice {
            name: name.to_string(),
            value,
            color: difficulty_color(name).to_string(),
        })
        .collect();

    slices.sort_by(|a, b| {
        let rank = |s: &DifficultySlice| {
            if is_known_difficulty(&s.name) {
                difficulty_rank(&s.name)
            } else {
                u8::MAX
            }
        };
        rank(a).cmp(&rank(b)).then_with(|| a.name.cmp(&b.name))
    });
    slices
}

/// Questions referencing each timeframe, ordered by timeframe name.
pub fn timeframe_distribution(questions: &[Question]) -> Vec<TimeframeSlice> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for q in questions {
        for tf in &q.timeframes {
            *counts.entry(tf.as_str()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|(name, value)| TimeframeSlice {
            name: name.to_string(),
            value,
        })
        .collect()
}

/// Most frequent topics; ties keep first-seen order.
pub fn top_topics(questions: &[Question], limit: usize) -> Vec<TopicCount> {
    let mut topics: Vec<TopicCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for q in questions {
        for topic in q.topic_list() {
            match index.get(&topic) {
                Some(&slot) => topics[slot].count += 1,
                None => {
                    index.insert(topic.clone(), topics.len());
                    topics.push(TopicCount {
                        name: topic,
                        count: 1,
                    });
                }
            }
        }
    }

    topics.sort_by(|a, b| b.count.cmp(&a.count));
    topics.truncate(limit);
    topics
}

pub fn analytics_stats(questions: &[Question]) -> AnalyticsStats {
    let total_companies = questions
        .iter()
        .flat_map(|q| q.companies.iter())
        .collect::<HashSet<_>>()
        .len();

    AnalyticsStats {
        total_problems: questions.len(),
        total_companies,
        difficulty_distribution: difficulty_distribution(questions),
        timeframe_distribution: timeframe_distribution(questions),
        top_topics: top_topics(questions, TOP_TOPICS_LIMIT),
    }
}

fn bounds_of(values: impl Iterator<Item = f64>) -> Bounds {
    let mut bounds: Option<Bounds> = None;
    for v in values {
        let v = if v.is_nan() { 0.0 } else { v };
        bounds = Some(match bounds {
            None => Bounds { min: v, max: v },
            Some(b) => Bounds {
                min: b.min.min(v),
                max: b.max.max(v),
            },
        });
    }
    bounds.unwrap_or_default()
}

/// Global min/max for the range filters. An empty set yields `0..=100` for
/// every field.
pub fn range_stats(questions: &[Question]) -> RangeStats {
    if questions.is_empty() {
        return RangeStats::default();
    }
    RangeStats {
        occurrences: bounds_of(questions.iter().map(|q| q.occurrences() as f64)),
        frequency: bounds_of(questions.iter().map(|q| q.frequency)),
        acceptance: bounds_of(questions.iter().map(|q| q.acceptance_rate)),
    }
}
