pub mod analytics;
pub mod error;
pub mod filter;
pub mod question;

// CSV row types
pub mod csv;
