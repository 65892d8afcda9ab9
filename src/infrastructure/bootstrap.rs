use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tracing::error;

use crate::application::{AnalyticsService, CsvIngestor};
use crate::infrastructure::activity_log::ActivityLog;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::{LocalCsvSource, RemoteCsvSource};
use crate::infrastructure::github::GitHubClient;

/// Wire the data sources, commit lookup and analytics service from config.
pub fn setup(config: &AppConfig, log: ActivityLog) -> Result<Arc<AnalyticsService>, Box<dyn Error>> {
    let timeout = Duration::from_secs(config.source.request_timeout_secs);

    let http = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| {
            error!(error = %err, "Failed to build HTTP client");
            err
        })?;

    let remote = Arc::new(RemoteCsvSource::with_client(
        http.clone(),
        config.source.remote_url.clone(),
    ));
    let local = Arc::new(LocalCsvSource::new(config.source.local_path.clone()));

    let ingestor = CsvIngestor::new(
        remote,
        local,
        config.source.upload_policy(),
        log.clone(),
    );
    let commits = Arc::new(GitHubClient::with_client(http, config.github.clone()));

    log.info(
        "Bootstrap",
        &format!(
            "Data source {} (fallback {})",
            config.source.remote_url,
            config.source.local_path.display()
        ),
    );

    Ok(Arc::new(AnalyticsService::new(ingestor, commits, log)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_falls_back_to_local_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "difficulty,title,frequency,acceptance_rate,link,company,timeframe,topics\n\
             Easy,Two Sum,90,0.49,https://l,Google,1 Month,Array"
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.source.remote_url = "http://127.0.0.1:1/codedata.csv".to_string();
        config.source.local_path = file.path().to_path_buf();
        config.source.request_timeout_secs = 2;
        config.github.enabled = false;

        let service = setup(&config, ActivityLog::default()).unwrap();
        let snapshot = service.refresh().await.unwrap();
        assert_eq!(snapshot.questions.len(), 1);
        assert_eq!(snapshot.questions[0].acceptance_rate, 49.0);
        assert_eq!(snapshot.metadata.commit_message, "Commit lookup disabled");
    }
}
