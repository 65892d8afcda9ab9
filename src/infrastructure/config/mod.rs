use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::csv::UploadPolicy;
use crate::domain::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "leetcode-analytics.toml";
pub const CONFIG_PATH_ENV: &str = "LCA_CONFIG";
pub const ENV_PREFIX: &str = "LCA_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub github: GitHubConfig,
    pub webhook: WebhookConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            cors_permissive: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Raw-file URL of the question CSV
    pub remote_url: String,
    /// Local copy used when the remote fetch fails
    pub local_path: PathBuf,
    pub max_upload_bytes: usize,
    pub request_timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            remote_url:
                "https://raw.githubusercontent.com/AlliterationofA/PublicFiles/main/codedata.csv"
                    .to_string(),
            local_path: PathBuf::from("public/data/codedata.csv"),
            max_upload_bytes: 10 * 1024 * 1024,
            request_timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    pub fn upload_policy(&self) -> UploadPolicy {
        UploadPolicy::default().with_max_bytes(self.max_upload_bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub enabled: bool,
    pub api_base: String,
    pub owner: String,
    pub repo: String,
    pub file_path: String,
    pub user_agent: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_base: "https://api.github.com".to_string(),
            owner: "AlliterationofA".to_string(),
            repo: "PublicFiles".to_string(),
            file_path: "codedata.csv".to_string(),
            user_agent: "LeetCode-Analytics-App".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Push ref that triggers a refresh
    pub branch_ref: String,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            branch_ref: "refs/heads/main".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Capacity of the in-memory activity log
    pub max_entries: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            max_entries: 200,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::ValidationError(
                "server.port must be > 0".to_string(),
            ));
        }
        url::Url::parse(&self.source.remote_url).map_err(|e| {
            AppError::ValidationError(format!(
                "source.remote_url is not a valid URL ({}): {}",
                self.source.remote_url, e
            ))
        })?;
        if self.github.enabled {
            url::Url::parse(&self.github.api_base).map_err(|e| {
                AppError::ValidationError(format!(
                    "github.api_base is not a valid URL ({}): {}",
                    self.github.api_base, e
                ))
            })?;
        }
        if self.source.request_timeout_secs == 0 {
            return Err(AppError::ValidationError(
                "source.request_timeout_secs must be > 0".to_string(),
            ));
        }
        if self.logging.max_entries == 0 {
            return Err(AppError::ValidationError(
                "logging.max_entries must be > 0".to_string(),
            ));
        }
        self.source
            .upload_policy()
            .validate()
            .map_err(|e| AppError::ValidationError(format!("Invalid upload policy: {}", e)))?;
        Ok(())
    }
}

pub struct ConfigService;

impl ConfigService {
    /// Load configuration from layered sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (`LCA_SERVER__PORT`, `LCA_SOURCE__LOCAL_PATH`, ...)
    /// 2. TOML file at `$LCA_CONFIG`, else `leetcode-analytics.toml` if present
    /// 3. Built-in defaults
    pub fn load() -> Result<AppConfig> {
        let _ = dotenvy::dotenv();

        let file = std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        Self::load_from(Some(&file))
    }

    pub fn load_from(file: Option<&Path>) -> Result<AppConfig> {
        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if let Some(path) = file {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Failed to load config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.webhook.branch_ref, "refs/heads/main");
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 8080\n\n[source]\nlocal_path = \"data/questions.csv\"\n"
        )
        .unwrap();

        let config = ConfigService::load_from(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.source.local_path, PathBuf::from("data/questions.csv"));
    }

    #[test]
    fn test_invalid_remote_url_rejected() {
        let mut config = AppConfig::default();
        config.source.remote_url = "not a url".to_string();
        assert!(matches!(
            config.validate(),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn test_disabled_github_skips_api_base_check() {
        let mut config = AppConfig::default();
        config.github.enabled = false;
        config.github.api_base = String::new();
        assert!(config.validate().is_ok());
    }
}
