use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::domain::analytics::CommitInfo;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::GitHubConfig;

/// Provides commit metadata for the data file. Implementations never fail;
/// they degrade to a placeholder commit instead.
#[async_trait]
pub trait CommitInfoProvider: Send + Sync {
    async fn last_commit(&self) -> CommitInfo;
}

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    sha: String,
    commit: GitHubCommitDetail,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitDetail {
    author: GitHubCommitAuthor,
    message: String,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitAuthor {
    name: String,
    date: String,
}

pub struct GitHubClient {
    client: reqwest::Client,
    config: GitHubConfig,
}

impl GitHubClient {
    pub fn with_client(client: reqwest::Client, config: GitHubConfig) -> Self {
        Self { client, config }
    }

    fn commits_url(&self) -> String {
        let base = self.config.api_base.trim_end_matches('/');
        if self.config.file_path.is_empty() {
            format!(
                "{}/repos/{}/{}/commits?per_page=1",
                base, self.config.owner, self.config.repo
            )
        } else {
            format!(
                "{}/repos/{}/{}/commits?path={}&per_page=1",
                base, self.config.owner, self.config.repo, self.config.file_path
            )
        }
    }

    fn fallback(&self, message: &str) -> CommitInfo {
        CommitInfo {
            sha: "unknown".to_string(),
            author: "Unknown".to_string(),
            date: Utc::now().to_rfc3339(),
            message: message.to_string(),
            url: format!(
                "https://github.com/{}/{}/commits",
                self.config.owner, self.config.repo
            ),
        }
    }

    async fn fetch_last_commit(&self) -> Result<CommitInfo> {
        let url = self.commits_url();
        tracing::info!(%url, "Fetching last commit info from GitHub API");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github.v3+json")
            .header("User-Agent", &self.config.user_agent)
            .send()
            .await
            .map_err(|e| AppError::NetworkError(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(AppError::NetworkError(
                "GitHub API rate limit exceeded".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(AppError::NetworkError(format!("GitHub API error: {}", status)));
        }

        let commits: Vec<GitHubCommit> = response
            .json()
            .await
            .map_err(|e| AppError::DataProcessingError(format!("Failed to parse JSON: {}", e)))?;

        let commit = commits
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound("No commits found for the CSV file".to_string()))?;

        tracing::info!(
            sha = %commit.sha.chars().take(7).collect::<String>(),
            date = %commit.commit.author.date,
            "Fetched last commit info"
        );

        Ok(CommitInfo {
            sha: commit.sha,
            author: commit.commit.author.name,
            date: commit.commit.author.date,
            message: commit.commit.message,
            url: commit.html_url,
        })
    }
}

#[async_trait]
impl CommitInfoProvider for GitHubClient {
    async fn last_commit(&self) -> CommitInfo {
        if !self.config.enabled {
            return self.fallback("Commit lookup disabled");
        }

        match self.fetch_last_commit().await {
            Ok(info) => info,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to fetch GitHub commit info, using fallback");
                let message = if err.message().contains("rate limit") {
                    "Unable to fetch commit info (rate limited)"
                } else {
                    "Unable to fetch commit info"
                };
                self.fallback(message)
            }
        }
    }
}
