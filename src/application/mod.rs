pub mod use_cases;

pub use use_cases::analytics_service::{AnalyticsService, QueryResult, QuestionQuery};
pub use use_cases::csv_ingestor::CsvIngestor;
pub use use_cases::filter_engine::{QuestionPage, RowQuery};
