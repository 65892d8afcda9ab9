// ============================================================
// CSV DOMAIN LAYER
// ============================================================
// Row types, header resolution and upload limits
// No I/O, no async

mod csv_row;
mod data_origin;
mod upload_policy;

pub use csv_row::{split_topics, CsvHeader, NormalizedRow, RawRow, RowRejection, REQUIRED_COLUMNS};
pub use data_origin::DataOrigin;
pub use upload_policy::UploadPolicy;
