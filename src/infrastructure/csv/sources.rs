// ============================================================
// CSV SOURCES
// ============================================================
// Remote raw-file fetch and local cached copy

use std::path::PathBuf;

use async_trait::async_trait;

use super::CsvParser;
use crate::domain::csv::DataOrigin;
use crate::domain::error::{AppError, Result};

/// Anything that can produce the question CSV as text
#[async_trait]
pub trait CsvSource: Send + Sync {
    fn origin(&self) -> DataOrigin;

    /// Human-readable location for logs
    fn location(&self) -> String;

    async fn fetch(&self) -> Result<String>;
}

pub struct RemoteCsvSource {
    client: reqwest::Client,
    url: String,
}

impl RemoteCsvSource {
    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CsvSource for RemoteCsvSource {
    fn origin(&self) -> DataOrigin {
        DataOrigin::Remote
    }

    fn location(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::NetworkError(format!(
                "Failed to fetch CSV data: {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::NetworkError(format!("Failed to read response body: {}", e)))?;

        Ok(CsvParser::decode(&bytes))
    }
}

pub struct LocalCsvSource {
    path: PathBuf,
}

impl LocalCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CsvSource for LocalCsvSource {
    fn origin(&self) -> DataOrigin {
        DataOrigin::Local
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<String> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::FileError(format!(
                "Failed to read local CSV file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(CsvParser::decode(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[tokio::test]
    async fn test_local_source_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "title,company\nA,B").unwrap();

        let source = LocalCsvSource::new(file.path());
        assert_eq!(source.origin(), DataOrigin::Local);
        assert_eq!(source.fetch().await.unwrap(), "title,company\nA,B");
    }

    #[tokio::test]
    async fn test_local_source_missing_file_is_file_error() {
        let source = LocalCsvSource::new("/definitely/not/here.csv");
        let err = source.fetch().await.unwrap_err();
        assert_eq!(err.code(), "FILE_ERROR");
    }

    #[tokio::test]
    async fn test_remote_source_unreachable_is_network_error() {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        let source = RemoteCsvSource::with_client(client, "http://127.0.0.1:1/codedata.csv");
        let err = source.fetch().await.unwrap_err();
        assert_eq!(err.code(), "NETWORK_ERROR");
    }
}
