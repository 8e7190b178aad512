//! Stage selection

use super::context::ResolvedStage;
use crate::config::StageCatalog;
use crate::error::Result;
use crate::interaction::{PromptError, Prompter};
use std::sync::Arc;

pub struct StageResolver {
    prompter: Arc<dyn Prompter>,
}

impl StageResolver {
    pub fn new(prompter: Arc<dyn Prompter>) -> Self {
        Self { prompter }
    }

    /// Ask for a stage, offering names in configuration order
    pub async fn resolve(&self, stages: &StageCatalog) -> Result<ResolvedStage> {
        let names = stages.names();
        let index = self
            .prompter
            .select("Select the stage to release", &names)
            .await?;

        let name = names
            .get(index)
            .ok_or_else(|| PromptError::Unexpected(format!("choice {index} is out of range")))?;
        let config = stages
            .get(name)
            .ok_or_else(|| PromptError::Unexpected(format!("unknown stage '{name}'")))?;

        tracing::info!("Releasing stage '{}' from branch '{}'", name, config.branch);
        Ok(ResolvedStage {
            name: name.clone(),
            branch: config.branch.clone(),
            job_identifier: config.job_identifier.clone(),
        })
    }
}
