//! Per-run state shared by the workflow steps

use crate::config::PRODUCTION_STAGE;

/// Stage picked by the operator, resolved to its branch and build job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStage {
    pub name: String,
    pub branch: String,
    pub job_identifier: Option<String>,
}

impl ResolvedStage {
    pub fn is_production(&self) -> bool {
        self.name == PRODUCTION_STAGE
    }
}

/// Created once per run after stage selection
#[derive(Debug, Clone)]
pub struct WorkflowContext {
    pub stage: ResolvedStage,
    /// Branch checked out when the run started
    pub origin_branch: String,
    pub local_branches: Vec<String>,
}

impl WorkflowContext {
    /// The operator is already on the stage's deployment branch
    pub fn is_danger(&self) -> bool {
        self.origin_branch == self.stage.branch
    }

    /// Non-production runs switch back to the origin branch at the end
    pub fn needs_restore(&self) -> bool {
        !self.stage.is_production() && !self.is_danger()
    }
}
