// ============================================================
// ROW NORMALIZER
// ============================================================
// Turn split CSV lines into typed question rows

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::csv::{CsvHeader, NormalizedRow, RawRow, RowRejection};
use crate::infrastructure::csv::SplitLine;

pub const DEFAULT_DIFFICULTY: &str = "Medium";
pub const DEFAULT_FREQUENCY: f64 = 50.0;
pub const DEFAULT_ACCEPTANCE_RATE: f64 = 50.0;

/// ASCII digits only; other Unicode digits are stripped like any other text.
static NON_NUMERIC_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.]").unwrap());

/// Longest leading float, the way a lenient float parser reads "42.5%" or
/// "1.2.3".
static LEADING_FLOAT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?").unwrap());

/// Rows that made it through, plus the rejected ones by line number
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub rows: Vec<NormalizedRow>,
    pub rejected: Vec<(usize, RowRejection)>,
}

impl NormalizedBatch {
    pub fn skipped(&self) -> usize {
        self.rejected.len()
    }
}

/// Normalize one split line against the header.
pub fn normalize_row(
    header: &CsvHeader,
    values: &[String],
) -> std::result::Result<NormalizedRow, RowRejection> {
    if values.len() != header.len() {
        return Err(RowRejection::FieldCountMismatch {
            expected: header.len(),
            found: values.len(),
        });
    }

    normalize_raw(header.raw_row(values))
}

pub fn normalize_raw(raw: RawRow) -> std::result::Result<NormalizedRow, RowRejection> {
    let title = raw.title.trim();
    if title.is_empty() {
        return Err(RowRejection::MissingTitle);
    }
    let company = raw.company.trim();
    if company.is_empty() {
        return Err(RowRejection::MissingCompany);
    }
    let timeframe = raw.timeframe.trim();
    if timeframe.is_empty() {
        return Err(RowRejection::MissingTimeframe);
    }

    let difficulty = match raw.difficulty.trim() {
        "" => DEFAULT_DIFFICULTY.to_string(),
        d => d.to_string(),
    };

    Ok(NormalizedRow {
        difficulty,
        title: title.to_string(),
        frequency: parse_frequency(&raw.frequency),
        acceptance_rate: parse_acceptance_rate(&raw.acceptance_rate),
        link: raw.link.trim().to_string(),
        company: company.to_string(),
        timeframe: timeframe.to_string(),
        topics: raw.topics.trim().to_string(),
    })
}

/// Normalize every split line, collecting rejections instead of failing.
pub fn normalize_lines(header: &CsvHeader, lines: &[SplitLine]) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    for line in lines {
        match normalize_row(header, &line.values) {
            Ok(row) => batch.rows.push(row),
            Err(rejection) => {
                tracing::debug!(line = line.line_no, %rejection, "Skipping CSV row");
                batch.rejected.push((line.line_no, rejection));
            }
        }
    }
    batch
}

/// Strip everything but digits and dots, then read the leading float.
/// `"75%"` is 75, blank or unparsable text falls back to 50.
pub fn parse_frequency(value: &str) -> f64 {
    let digits = NON_NUMERIC_PATTERN.replace_all(value, "");
    parse_leading_float(&digits).unwrap_or(DEFAULT_FREQUENCY)
}

/// Read the leading float; values at or below 1 are fractions and get
/// scaled to percent. Rounded to two decimals, never clamped.
pub fn parse_acceptance_rate(value: &str) -> f64 {
    match parse_leading_float(value) {
        Some(rate) => {
            let percent = if rate <= 1.0 { rate * 100.0 } else { rate };
            round_half_up(percent, 2)
        }
        None => DEFAULT_ACCEPTANCE_RATE,
    }
}

fn parse_leading_float(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let matched = LEADING_FLOAT_PATTERN.find(trimmed)?;
    matched.as_str().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Half rounds toward positive infinity.
fn round_half_up(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::csv::REQUIRED_COLUMNS;

    fn header() -> CsvHeader {
        CsvHeader::resolve(REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()).unwrap()
    }

    fn values(items: [&str; 8]) -> Vec<String> {
        items.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_frequency_parsing() {
        assert_eq!(parse_frequency("75%"), 75.0);
        assert_eq!(parse_frequency(""), 50.0);
        assert_eq!(parse_frequency("abc"), 50.0);
        assert_eq!(parse_frequency(" 12.5 times"), 12.5);
        assert_eq!(parse_frequency("1.2.3"), 1.2);
        assert_eq!(parse_frequency("."), 50.0);
        // The sign is stripped with everything else.
        assert_eq!(parse_frequency("-5"), 5.0);
    }

    #[test]
    fn test_non_ascii_digits_are_not_numeric() {
        // U+0663 is an Arabic-Indic digit.
        assert_eq!(parse_frequency("7\u{663}5"), 75.0);
        assert_eq!(parse_acceptance_rate("\u{663}"), 50.0);
    }

    #[test]
    fn test_acceptance_rate_scaling() {
        assert_eq!(parse_acceptance_rate("0.42"), 42.0);
        assert_eq!(parse_acceptance_rate("85"), 85.0);
        assert_eq!(parse_acceptance_rate("1"), 100.0);
        assert_eq!(parse_acceptance_rate("0.123456"), 12.35);
        assert_eq!(parse_acceptance_rate("33.333"), 33.33);
        assert_eq!(parse_acceptance_rate("47.3%"), 47.3);
        assert_eq!(parse_acceptance_rate("n/a"), 50.0);
        assert_eq!(parse_acceptance_rate(""), 50.0);
    }

    #[test]
    fn test_acceptance_rate_is_not_clamped() {
        // Out-of-range source values pass through unchanged.
        assert_eq!(parse_acceptance_rate("150"), 150.0);
        assert_eq!(parse_acceptance_rate("-0.5"), -50.0);
    }

    #[test]
    fn test_normalize_applies_defaults() {
        let row = normalize_row(
            &header(),
            &values(["", " Two Sum ", "", "abc", " https://l ", "Google", "1 Month", " Array "]),
        )
        .unwrap();
        assert_eq!(row.difficulty, "Medium");
        assert_eq!(row.title, "Two Sum");
        assert_eq!(row.frequency, 50.0);
        assert_eq!(row.acceptance_rate, 50.0);
        assert_eq!(row.link, "https://l");
        assert_eq!(row.topics, "Array");
    }

    #[test]
    fn test_normalize_rejections() {
        let h = header();
        assert_eq!(
            normalize_row(&h, &values(["Easy", " ", "1", "1", "l", "G", "All", "T"])),
            Err(RowRejection::MissingTitle)
        );
        assert_eq!(
            normalize_row(&h, &values(["Easy", "A", "1", "1", "l", "", "All", "T"])),
            Err(RowRejection::MissingCompany)
        );
        assert_eq!(
            normalize_row(&h, &values(["Easy", "A", "1", "1", "l", "G", "", "T"])),
            Err(RowRejection::MissingTimeframe)
        );
        assert_eq!(
            normalize_row(&h, &["A".to_string()]),
            Err(RowRejection::FieldCountMismatch { expected: 8, found: 1 })
        );
    }

    #[test]
    fn test_normalize_lines_collects_rejections() {
        let lines = vec![
            SplitLine {
                line_no: 2,
                values: values(["Easy", "A", "1", "1", "l", "G", "All", "T"]),
            },
            SplitLine {
                line_no: 3,
                values: vec![String::new()],
            },
        ];
        let batch = normalize_lines(&header(), &lines);
        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.skipped(), 1);
        assert_eq!(batch.rejected[0].0, 3);
    }
}
