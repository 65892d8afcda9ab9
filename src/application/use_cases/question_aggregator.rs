// ============================================================
// QUESTION AGGREGATOR
// ============================================================
// Group normalized rows by title into Question entities

use std::collections::{BTreeSet, HashMap};

use crate::domain::csv::NormalizedRow;
use crate::domain::question::Question;

struct Accumulator {
    question: Question,
    companies: BTreeSet<String>,
    timeframes: BTreeSet<String>,
}

/// Group rows by title.
///
/// The first row of a title fixes difficulty, frequency, acceptance rate,
/// link and topics. Every row adds its company and timeframe and is kept in
/// `original_rows`. Output is ordered by title, case-insensitively.
pub fn aggregate_questions(rows: &[NormalizedRow]) -> Vec<Question> {
    let mut order: Vec<Accumulator> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in rows {
        let title = row.title.as_str();
        if title.is_empty() {
            continue;
        }

        let slot = match index.get(title) {
            Some(&slot) => slot,
            None => {
                order.push(Accumulator {
                    question: Question::from_first_row(row),
                    companies: BTreeSet::new(),
                    timeframes: BTreeSet::new(),
                });
                index.insert(title, order.len() - 1);
                order.len() - 1
            }
        };

        let acc = &mut order[slot];
        if !row.company.is_empty() {
            acc.companies.insert(row.company.clone());
        }
        if !row.timeframe.is_empty() {
            acc.timeframes.insert(row.timeframe.clone());
        }
        acc.question.original_rows.push(row.clone());
    }

    let mut questions: Vec<Question> = order
        .into_iter()
        .filter(|acc| !acc.companies.is_empty())
        .map(|acc| {
            let mut question = acc.question;
            question.companies = acc.companies.into_iter().collect();
            question.timeframes = acc.timeframes.into_iter().collect();
            question
        })
        .collect();

    questions.sort_by(|a, b| {
        a.title
            .to_lowercase()
            .cmp(&b.title.to_lowercase())
            .then_with(|| a.title.cmp(&b.title))
    });
    questions
}
