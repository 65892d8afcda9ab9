pub mod analytics_service;
pub mod csv_ingestor;
pub mod filter_engine;
pub mod question_aggregator;
pub mod rollup_calculator;
pub mod row_normalizer;
