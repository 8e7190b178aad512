//! Configuration file loading and validation

use super::project::{resolve_token, ProjectInfo};
use super::stages::StageCatalog;
use super::{RawReleaseConfig, ReleaseConfig};
use crate::error::{ReleaseError, Result};
use std::path::Path;
use std::time::Duration;
use tokio::fs;

/// Configuration file looked up when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "release.config.yaml";
/// Gateway timeout when the file does not set `gatewayTimeoutSecs`
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file extension; anything unknown is read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => ConfigFormat::Json,
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }

    pub fn parse(self, content: &str) -> std::result::Result<RawReleaseConfig, String> {
        match self {
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Reads a release configuration file into a validated [`ReleaseConfig`]
pub struct ConfigLoader {
    env_lookup: EnvLookup,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Loader resolving the fallback token from the process environment
    pub fn new() -> Self {
        Self {
            env_lookup: Box::new(|key| std::env::var(key).ok()),
        }
    }

    /// Loader with a custom environment, for tests
    pub fn with_env<F>(env_lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            env_lookup: Box::new(env_lookup),
        }
    }

    pub async fn load(&self, path: &Path) -> Result<ReleaseConfig> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ReleaseError::ConfigMissing {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => {
                return Err(ReleaseError::ConfigInvalid {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        let format = ConfigFormat::from_path(path);
        tracing::debug!("Loading {:?} configuration from {}", format, path.display());

        let raw = format
            .parse(&content)
            .map_err(|message| ReleaseError::ConfigInvalid {
                path: path.to_path_buf(),
                message,
            })?;

        self.validate(raw, path)
    }

    /// Check required fields and derive everything the workflow needs
    pub fn validate(&self, raw: RawReleaseConfig, path: &Path) -> Result<ReleaseConfig> {
        let project_id = raw
            .project_id
            .map(|id| id.to_string())
            .filter(|id| !id.trim().is_empty())
            .ok_or(ReleaseError::ConfigIncomplete { field: "projectId" })?;

        let git = raw
            .git
            .filter(|git| !git.trim().is_empty())
            .ok_or(ReleaseError::ConfigIncomplete { field: "git" })?;

        let project =
            ProjectInfo::from_remote(&git).map_err(|message| ReleaseError::ConfigInvalid {
                path: path.to_path_buf(),
                message,
            })?;

        let token = resolve_token(raw.private_token.as_deref(), &self.env_lookup);
        if token.is_none() {
            tracing::warn!("No private token configured, merge request queries are unauthenticated");
        }

        let stages = raw
            .stages
            .unwrap_or_else(|| StageCatalog::from_entries(Vec::new()));

        Ok(ReleaseConfig {
            project_id: project_id.trim().to_string(),
            token,
            project,
            stages,
            gateway_timeout: Duration::from_secs(
                raw.gateway_timeout_secs
                    .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS),
            ),
            prompt_timeout: raw.prompt_timeout_secs.map(Duration::from_secs),
        })
    }
}
