//! Release configuration
//!
//! A single file (YAML, JSON or TOML) names the project, its git remote, an
//! optional access token and the stage catalog. [`ConfigLoader`] turns it
//! into a validated [`ReleaseConfig`] before any repository work starts.

pub mod loader;
pub mod project;
pub mod stages;

pub use loader::{ConfigFormat, ConfigLoader, DEFAULT_CONFIG_FILE, DEFAULT_GATEWAY_TIMEOUT_SECS};
pub use project::{resolve_token, ProjectInfo, TOKEN_ENV_VAR};
pub use stages::{
    StageCatalog, StageConfig, StageDetail, StageEntry, DEFAULT_PRODUCTION_BRANCH,
    PRODUCTION_STAGE,
};

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Project identifiers may be numeric ids or `group/name` paths
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProjectId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectId::Number(id) => write!(f, "{id}"),
            ProjectId::Text(id) => write!(f, "{id}"),
        }
    }
}

/// Configuration file as written, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReleaseConfig {
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub private_token: Option<String>,
    #[serde(default)]
    pub git: Option<String>,
    #[serde(default)]
    pub stages: Option<StageCatalog>,
    #[serde(default)]
    pub gateway_timeout_secs: Option<u64>,
    #[serde(default)]
    pub prompt_timeout_secs: Option<u64>,
}

/// Validated configuration, read-only for the rest of the run
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    pub project_id: String,
    pub token: Option<String>,
    pub project: ProjectInfo,
    pub stages: StageCatalog,
    pub gateway_timeout: Duration,
    pub prompt_timeout: Option<Duration>,
}
