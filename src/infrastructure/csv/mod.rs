// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV decoding, row splitting and data sources

mod csv_parser;
mod sources;

pub use csv_parser::{split_row, CsvParser, ParsedCsv, SplitLine};
pub use sources::{CsvSource, LocalCsvSource, RemoteCsvSource};
