// ============================================================
// CSV PARSER
// ============================================================
// Byte decoding, header resolution and the quote-aware row split

use encoding_rs::UTF_8;

use crate::domain::csv::CsvHeader;
use crate::domain::error::{AppError, Result};

/// A data line after splitting, with its 1-based line number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitLine {
    pub line_no: usize,
    pub values: Vec<String>,
}

/// Header plus every split data line of one CSV document
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub header: CsvHeader,
    pub lines: Vec<SplitLine>,
}

/// Question CSV parser
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser;

impl CsvParser {
    pub fn new() -> Self {
        Self
    }

    /// Decode raw bytes as UTF-8, honouring a BOM and replacing invalid
    /// sequences instead of failing.
    pub fn decode(bytes: &[u8]) -> String {
        let (text, _, had_errors) = UTF_8.decode(bytes);
        if had_errors {
            tracing::warn!("CSV contained invalid UTF-8 sequences; replaced");
        }
        text.into_owned()
    }

    /// Parse CSV text into a resolved header and split data lines.
    ///
    /// The header is split on plain commas; data lines go through
    /// [`split_row`]. Blank lines are kept so the normalizer can count them
    /// as rejected rows.
    pub fn parse_content(&self, content: &str) -> Result<ParsedCsv> {
        let trimmed = content.trim_start_matches('\u{FEFF}').trim();
        if trimmed.is_empty() {
            return Err(AppError::ValidationError("CSV content is empty".to_string()));
        }

        let mut lines = trimmed.split('\n');
        let header_line = lines.next().unwrap_or_default();
        let names = header_line
            .split(',')
            .map(|h| h.trim().replace('"', ""))
            .collect();
        let header = CsvHeader::resolve(names)?;

        let lines = lines
            .enumerate()
            .map(|(idx, line)| SplitLine {
                line_no: idx + 2,
                values: split_row(line),
            })
            .collect();

        Ok(ParsedCsv { header, lines })
    }
}

/// Split one CSV line into fields.
///
/// A `"` toggles the quoted state unless the character right before it is
/// a backslash, in which case it is kept as a literal. A `,` outside quotes
/// ends the field. Every field is then trimmed and stripped of all `"`.
/// This is not RFC 4180: `a,\"b,d` yields `["a", "\b", "d"]`.
pub fn split_row(line: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut in_quote = false;
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for ch in line.chars() {
        if ch == '"' && prev != Some('\\') {
            in_quote = !in_quote;
        } else if ch == ',' && !in_quote {
            values.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
        prev = Some(ch);
    }
    values.push(current.trim().to_string());

    values
        .into_iter()
        .map(|v| v.trim().replace('"', ""))
        .collect()
}
