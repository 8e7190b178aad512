//! Application module
//!
//! Wires the real collaborators (system git, GitLab, terminal) into a
//! [`WorkflowDriver`] and resolves the run into an exit code.

pub mod config;
pub mod error_handling;
pub mod logging;

pub use config::AppConfig;
pub use error_handling::{handle_fatal_error, report_outcome};
pub use logging::init_logging;

use crate::config::ConfigLoader;
use crate::error::{Outcome, Result};
use crate::gateway::GitLabGateway;
use crate::git::GitCommandRunner;
use crate::interaction::{TerminalDisplay, TerminalPrompter};
use crate::release::{ReleaseReport, WorkflowDriver};
use crate::subprocess::TokioProcessRunner;
use std::sync::Arc;
use tracing::debug;

/// Load configuration, build the collaborators and run one release
pub async fn run_release(config: &AppConfig) -> Outcome<ReleaseReport> {
    match build_driver(config).await {
        Ok(driver) => driver.execute().await,
        Err(err) => Outcome::from(Err(err)),
    }
}

async fn build_driver(config: &AppConfig) -> Result<WorkflowDriver> {
    let config_path = config.resolved_config_path();
    debug!("Loading release configuration from {}", config_path.display());
    let release = ConfigLoader::new().load(&config_path).await?;

    let repo = GitCommandRunner::new(Arc::new(TokioProcessRunner), config.working_dir.clone());
    let gateway = GitLabGateway::new(
        &release.project.host_base,
        &release.project_id,
        release.token.clone(),
        release.gateway_timeout,
    )?;
    debug!("Merge requests are queried at {}", gateway.endpoint());

    Ok(WorkflowDriver::new(
        Arc::new(repo),
        Arc::new(TerminalPrompter::new(release.prompt_timeout)),
        Arc::new(gateway),
        Arc::new(TerminalDisplay::new()),
        release.project,
        release.stages,
    ))
}
