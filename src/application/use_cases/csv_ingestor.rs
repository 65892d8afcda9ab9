// ============================================================
// CSV INGESTOR
// ============================================================
// Remote-then-local loading and upload validation

use std::sync::Arc;

use crate::domain::csv::{DataOrigin, UploadPolicy};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::activity_log::ActivityLog;
use crate::infrastructure::csv::CsvSource;

const LOG_SOURCE: &str = "CSV Ingestor";

/// CSV text together with where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCsv {
    pub text: String,
    pub origin: DataOrigin,
}

pub struct CsvIngestor {
    primary: Arc<dyn CsvSource>,
    fallback: Arc<dyn CsvSource>,
    policy: UploadPolicy,
    log: ActivityLog,
}

impl CsvIngestor {
    pub fn new(
        primary: Arc<dyn CsvSource>,
        fallback: Arc<dyn CsvSource>,
        policy: UploadPolicy,
        log: ActivityLog,
    ) -> Self {
        Self {
            primary,
            fallback,
            policy,
            log,
        }
    }

    /// One attempt at the primary source, then one at the fallback.
    pub async fn load(&self) -> Result<LoadedCsv> {
        self.log.info(
            LOG_SOURCE,
            &format!("Fetching CSV from {}", self.primary.location()),
        );

        match self.primary.fetch().await {
            Ok(text) => {
                self.log.info(
                    LOG_SOURCE,
                    &format!(
                        "Fetched {} bytes from {}",
                        text.len(),
                        self.primary.origin().description()
                    ),
                );
                return Ok(LoadedCsv {
                    text,
                    origin: self.primary.origin(),
                });
            }
            Err(err) => {
                self.log.warn(
                    LOG_SOURCE,
                    &format!(
                        "Fetch from {} failed ({}), trying {}",
                        self.primary.location(),
                        err,
                        self.fallback.location()
                    ),
                );
            }
        }

        match self.load_fallback().await {
            Ok(loaded) => Ok(loaded),
            Err(err) => {
                self.log.error(
                    LOG_SOURCE,
                    &format!("Fallback source failed: {}", err),
                );
                Err(AppError::NotFound(
                    "No data available. Please upload a CSV file first.".to_string(),
                ))
            }
        }
    }

    /// Read the fallback source only; used when a client explicitly asks
    /// for the local copy.
    pub async fn load_fallback(&self) -> Result<LoadedCsv> {
        let text = self.fallback.fetch().await?;
        self.log.info(
            LOG_SOURCE,
            &format!(
                "Loaded {} bytes from {}",
                text.len(),
                self.fallback.location()
            ),
        );
        Ok(LoadedCsv {
            text,
            origin: self.fallback.origin(),
        })
    }

    /// Validate uploaded text against the upload policy.
    pub fn accept_upload(&self, text: String) -> Result<LoadedCsv> {
        if let Err(reason) = self.policy.check(&text) {
            self.log.warn(LOG_SOURCE, &format!("Upload rejected: {}", reason));
            return Err(AppError::ValidationError(reason));
        }
        self.log.info(
            LOG_SOURCE,
            &format!("Accepted upload of {} bytes", text.len()),
        );
        Ok(LoadedCsv {
            text,
            origin: DataOrigin::Upload,
        })
    }
}
