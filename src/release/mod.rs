//! Release workflow orchestration
//!
//! [`WorkflowDriver`] sequences one release run:
//!
//! 1. [`StatusChecker`] commits pending work and syncs the current branch
//! 2. [`StageResolver`] asks which stage to release
//! 3. the origin branch and local branch list are captured
//! 4. [`BranchSynchronizer`] merges into the stage branch, or gates production
//!    on open merge requests through [`MergeGate`]
//! 5. production only: [`TagIssuer`] publishes a tag and an approval summary
//!    is printed
//! 6. non-production runs switch back to the origin branch

pub mod branch;
pub mod context;
pub mod merge_gate;
pub mod stage;
pub mod status;
pub mod summary;
pub mod tag;

pub use branch::BranchSynchronizer;
pub use context::{ResolvedStage, WorkflowContext};
pub use merge_gate::{GateDecision, MergeGate};
pub use stage::StageResolver;
pub use status::{is_conventional_commit, validate_commit_message, StatusChecker, COMMIT_TYPES};
pub use summary::{approval_rows, diff_url, stage_notice};
pub use tag::{next_free_tag, tag_base, DiffTool, IssuedTag, TagIssuer};

use crate::config::{ProjectInfo, StageCatalog};
use crate::error::{Outcome, Result};
use crate::gateway::MergeRequestGateway;
use crate::git::Repository;
use crate::interaction::{ProgressDisplay, Prompter};
use chrono::NaiveDate;
use std::sync::Arc;

/// What a finished run did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    pub stage: String,
    pub branch: String,
    pub job_identifier: Option<String>,
    pub tag: Option<String>,
    pub diff_url: Option<String>,
    /// Branch checked out again at the end of a non-production run
    pub restored_branch: Option<String>,
}

pub struct WorkflowDriver {
    repo: Arc<dyn Repository>,
    prompter: Arc<dyn Prompter>,
    gateway: Arc<dyn MergeRequestGateway>,
    display: Arc<dyn ProgressDisplay>,
    project: ProjectInfo,
    stages: StageCatalog,
    today: NaiveDate,
}

impl WorkflowDriver {
    pub fn new(
        repo: Arc<dyn Repository>,
        prompter: Arc<dyn Prompter>,
        gateway: Arc<dyn MergeRequestGateway>,
        display: Arc<dyn ProgressDisplay>,
        project: ProjectInfo,
        stages: StageCatalog,
    ) -> Self {
        Self {
            repo,
            prompter,
            gateway,
            display,
            project,
            stages,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Override the date used for generated tag names
    pub fn with_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Run the workflow and fold the result into an [`Outcome`]
    pub async fn execute(&self) -> Outcome<ReleaseReport> {
        let outcome = Outcome::from(self.run().await);
        match &outcome {
            Outcome::Success(report) => {
                tracing::info!("Release of stage '{}' finished", report.stage)
            }
            Outcome::Cancelled { step } => tracing::info!("Release cancelled at {}", step),
            Outcome::Failed(err) => tracing::error!("Release failed: {}", err),
        }
        outcome
    }

    pub async fn run(&self) -> Result<ReleaseReport> {
        StatusChecker::new(
            self.repo.clone(),
            self.prompter.clone(),
            self.display.clone(),
        )
        .check_and_commit()
        .await?;

        let stage = StageResolver::new(self.prompter.clone())
            .resolve(&self.stages)
            .await?;

        self.repo.pull().await?;
        let local = self.repo.local_branches().await?;
        let ctx = WorkflowContext {
            origin_branch: local.require_current()?.to_string(),
            local_branches: local.all.clone(),
            stage,
        };
        tracing::debug!(
            "Origin branch '{}', target branch '{}'",
            ctx.origin_branch,
            ctx.stage.branch
        );

        let gate = MergeGate::new(
            self.gateway.clone(),
            self.prompter.clone(),
            self.display.clone(),
            self.project.merge_requests_url(),
        );
        BranchSynchronizer::new(
            self.repo.clone(),
            self.prompter.clone(),
            self.display.clone(),
            gate,
        )
        .reconcile(&ctx)
        .await?;

        let mut report = ReleaseReport {
            stage: ctx.stage.name.clone(),
            branch: ctx.stage.branch.clone(),
            job_identifier: ctx.stage.job_identifier.clone(),
            tag: None,
            diff_url: None,
            restored_branch: None,
        };

        if ctx.stage.is_production() {
            self.publish_release(&ctx, &mut report).await?;
        } else if ctx.needs_restore() {
            self.repo.checkout(&ctx.origin_branch).await?;
            self.display
                .info(&format!("Switched back to {}", ctx.origin_branch));
            report.restored_branch = Some(ctx.origin_branch.clone());
        }

        Ok(report)
    }

    async fn publish_release(&self, ctx: &WorkflowContext, report: &mut ReleaseReport) -> Result<()> {
        self.repo.fetch_tags().await?;
        let existing = self.repo.tags().await?;

        let issued = TagIssuer::new(
            self.repo.clone(),
            self.prompter.clone(),
            self.display.clone(),
            self.project.project_name.clone(),
            self.today,
        )
        .issue(&ctx.stage.name, &existing)
        .await?;

        let diff = diff_url(
            issued.diff_tool,
            &self.project,
            self.stages.production_branch(),
            &ctx.origin_branch,
        );

        self.display.success(&format!(
            "Release tag {} is ready, request approval with the summary below",
            issued.tag
        ));
        let rows = approval_rows(
            &self.project,
            ctx.stage.job_identifier.as_deref(),
            &issued.tag,
            &diff,
        );
        self.display.table(&rows);

        report.tag = Some(issued.tag);
        report.diff_url = Some(diff);
        Ok(())
    }
}
