//! Local/remote branch reconciliation for the selected stage

use super::context::WorkflowContext;
use super::merge_gate::{GateDecision, MergeGate};
use super::summary::stage_notice;
use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::interaction::{ProgressDisplay, Prompter};
use std::sync::Arc;

const REMOTE: &str = "origin";

pub struct BranchSynchronizer {
    repo: Arc<dyn Repository>,
    prompter: Arc<dyn Prompter>,
    display: Arc<dyn ProgressDisplay>,
    gate: MergeGate,
}

impl BranchSynchronizer {
    pub fn new(
        repo: Arc<dyn Repository>,
        prompter: Arc<dyn Prompter>,
        display: Arc<dyn ProgressDisplay>,
        gate: MergeGate,
    ) -> Self {
        Self {
            repo,
            prompter,
            display,
            gate,
        }
    }

    pub async fn reconcile(&self, ctx: &WorkflowContext) -> Result<()> {
        let stage = &ctx.stage;

        if ctx.is_danger() {
            let question = format!(
                "You are working directly on '{}', the deployment branch of stage '{}'. Continue?",
                stage.branch, stage.name
            );
            if !self.prompter.confirm(&question).await? {
                return Err(ReleaseError::cancelled("deployment branch confirmation"));
            }
        }

        if stage.is_production() {
            return self.sync_production(ctx).await;
        }

        // On the deployment branch itself there is nothing to switch, merge or push
        if !ctx.is_danger() {
            self.switch_to_target(ctx).await?;
            self.merge_origin_branch(ctx).await?;
        }

        self.display
            .success(&stage_notice(&stage.name, stage.job_identifier.as_deref()));
        Ok(())
    }

    async fn sync_production(&self, ctx: &WorkflowContext) -> Result<()> {
        match self.gate.clearance().await? {
            GateDecision::Proceed => {}
            GateDecision::Blocked {
                open_merge_requests,
            } => {
                tracing::info!("Release blocked by {} open merge request(s)", open_merge_requests);
                return Err(ReleaseError::cancelled("merge request gate"));
            }
        }

        let target = &ctx.stage.branch;
        self.display.info(&format!(
            "Pulling {REMOTE}/{target} into {}",
            ctx.origin_branch
        ));
        self.repo.pull_from(REMOTE, target).await?;
        self.repo.push().await?;
        Ok(())
    }

    /// Check out a fresh copy of the target branch from the remote
    async fn switch_to_target(&self, ctx: &WorkflowContext) -> Result<()> {
        let target = &ctx.stage.branch;
        let upstream = format!("{REMOTE}/{target}");

        if ctx.local_branches.iter().any(|b| b == target) {
            // Never merge onto stale local history
            self.repo.delete_local_branch(target, true).await?;
            self.repo.checkout_tracking(target, &upstream).await?;
            self.repo.pull().await?;
            self.display.info(&format!("Switched to a fresh copy of {target}"));
            return Ok(());
        }

        let all = self.repo.all_branches().await?;
        if all.has_remote(REMOTE, target) {
            self.repo.checkout_tracking(target, &upstream).await?;
            self.display.info(&format!("Switched to {target}, tracking {upstream}"));
            return Ok(());
        }

        self.display.error(&format!(
            "Branch '{target}' does not exist on {REMOTE}, create it first"
        ));
        self.repo.checkout(&ctx.origin_branch).await?;
        Err(ReleaseError::BranchNotFoundRemote {
            branch: target.clone(),
        })
    }

    async fn merge_origin_branch(&self, ctx: &WorkflowContext) -> Result<()> {
        let from = &ctx.origin_branch;
        let into = &ctx.stage.branch;

        match self.repo.merge(from).await {
            Ok(()) => {}
            Err(err) if err.is_merge_conflict() => {
                tracing::error!("{}", err);
                self.display
                    .error("Automatic merge failed, resolve the conflicts manually and release again");
                return Err(ReleaseError::MergeConflict {
                    from: from.clone(),
                    into: into.clone(),
                });
            }
            Err(err) => return Err(err.into()),
        }
        self.display.info(&format!("Merged {from} -> {into}"));

        self.repo.push().await?;
        self.display.info(&format!("Pushed {into}"));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::context::ResolvedStage;
    use crate::testing::{Answer, FakeRepository, RecordingDisplay, RepoCall, ScriptedPrompter, StubGateway};

    struct Fixture {
        repo: FakeRepository,
        prompter: ScriptedPrompter,
        gateway: StubGateway,
        display: RecordingDisplay,
    }

    impl Fixture {
        fn new(repo: FakeRepository, answers: Vec<Answer>, gateway: StubGateway) -> Self {
            Self {
                repo,
                prompter: ScriptedPrompter::new(answers),
                gateway,
                display: RecordingDisplay::new(),
            }
        }

        fn synchronizer(&self) -> BranchSynchronizer {
            let gate = MergeGate::new(
                Arc::new(self.gateway.clone()),
                Arc::new(self.prompter.clone()),
                Arc::new(self.display.clone()),
                "https://gitlab.example.com/team/web-app/-/merge_requests",
            );
            BranchSynchronizer::new(
                Arc::new(self.repo.clone()),
                Arc::new(self.prompter.clone()),
                Arc::new(self.display.clone()),
                gate,
            )
        }

        fn context(&self, stage: &str, branch: &str, job: Option<&str>) -> WorkflowContext {
            WorkflowContext {
                stage: ResolvedStage {
                    name: stage.to_string(),
                    branch: branch.to_string(),
                    job_identifier: job.map(str::to_string),
                },
                origin_branch: self.repo.current_branch().unwrap(),
                local_branches: self.repo.local_branch_names(),
            }
        }
    }

    #[tokio::test]
    async fn test_local_target_is_recreated_from_remote() {
        let fx = Fixture::new(
            FakeRepository::builder()
                .current_branch("feature-x")
                .local_branches(["dev"])
                .remote_branches(["dev", "master"])
                .build(),
            vec![],
            StubGateway::default(),
        );
        let ctx = fx.context("dev", "dev", Some("web-dev"));

        fx.synchronizer().reconcile(&ctx).await.unwrap();

        assert_eq!(
            fx.repo.calls(),
            vec![
                RepoCall::DeleteLocalBranch {
                    name: "dev".to_string(),
                    force: true
                },
                RepoCall::CheckoutTracking {
                    name: "dev".to_string(),
                    start_point: "origin/dev".to_string()
                },
                RepoCall::Pull,
                RepoCall::Merge("feature-x".to_string()),
                RepoCall::Push,
            ]
        );
        assert!(fx.display.contains("web-dev"));
    }

    #[tokio::test]
    async fn test_remote_only_target_is_tracked_without_delete() {
        let fx = Fixture::new(
            FakeRepository::builder()
                .current_branch("feature-x")
                .remote_branches(["test"])
                .build(),
            vec![],
            StubGateway::default(),
        );
        let ctx = fx.context("test", "test", None);

        fx.synchronizer().reconcile(&ctx).await.unwrap();

        assert_eq!(
            fx.repo.mutating_calls(),
            vec![
                RepoCall::CheckoutTracking {
                    name: "test".to_string(),
                    start_point: "origin/test".to_string()
                },
                RepoCall::Merge("feature-x".to_string()),
                RepoCall::Push,
            ]
        );
        assert!(fx.display.contains("Jenkins or GitLab CI"));
    }

    #[tokio::test]
    async fn test_missing_target_fails_and_restores_origin() {
        let fx = Fixture::new(
            FakeRepository::builder()
                .current_branch("feature-x")
                .remote_branches(["master"])
                .build(),
            vec![],
            StubGateway::default(),
        );
        let ctx = fx.context("gray", "gray", None);

        let err = fx.synchronizer().reconcile(&ctx).await.unwrap_err();

        assert!(matches!(err, ReleaseError::BranchNotFoundRemote { ref branch } if branch == "gray"));
        assert_eq!(
            fx.repo.mutating_calls(),
            vec![RepoCall::Checkout("feature-x".to_string())]
        );
        assert_eq!(fx.repo.current_branch().as_deref(), Some("feature-x"));
    }

    #[tokio::test]
    async fn test_danger_branch_short_circuits_after_confirmation() {
        let fx = Fixture::new(
            FakeRepository::builder()
                .current_branch("dev")
                .remote_branches(["dev"])
                .build(),
            vec![Answer::Confirm(true)],
            StubGateway::default(),
        );
        let ctx = fx.context("dev", "dev", None);

        fx.synchronizer().reconcile(&ctx).await.unwrap();

        assert!(fx.repo.calls().is_empty());
        assert_eq!(fx.prompter.asked().len(), 1);
        assert!(fx.prompter.asked()[0].contains("deployment branch"));
    }

    #[tokio::test]
    async fn test_danger_branch_declined_cancels() {
        let fx = Fixture::new(
            FakeRepository::builder().current_branch("dev").build(),
            vec![Answer::Confirm(false)],
            StubGateway::default(),
        );
        let ctx = fx.context("dev", "dev", None);

        let err = fx.synchronizer().reconcile(&ctx).await.unwrap_err();

        assert!(err.is_cancellation());
        assert!(fx.repo.calls().is_empty());
    }

    #[tokio::test]
    async fn test_merge_conflict_is_reported_distinctly() {
        let fx = Fixture::new(
            FakeRepository::builder()
                .current_branch("feature-x")
                .remote_branches(["dev"])
                .merge_conflict()
                .build(),
            vec![],
            StubGateway::default(),
        );
        let ctx = fx.context("dev", "dev", None);

        let err = fx.synchronizer().reconcile(&ctx).await.unwrap_err();

        assert!(matches!(
            err,
            ReleaseError::MergeConflict { ref from, ref into } if from == "feature-x" && into == "dev"
        ));
        assert!(!fx.repo.calls().contains(&RepoCall::Push));
        assert!(fx.display.contains("Automatic merge failed"));
    }

    #[tokio::test]
    async fn test_production_pulls_after_gate_clears() {
        let fx = Fixture::new(
            FakeRepository::builder()
                .current_branch("release-1")
                .remote_branches(["master"])
                .build(),
            vec![Answer::Confirm(true)],
            StubGateway::counts([2, 0]),
        );
        let ctx = fx.context("online", "master", None);

        fx.synchronizer().reconcile(&ctx).await.unwrap();

        assert_eq!(fx.gateway.calls(), 2);
        assert_eq!(
            fx.repo.calls(),
            vec![
                RepoCall::PullFrom {
                    remote: "origin".to_string(),
                    branch: "master".to_string()
                },
                RepoCall::Push,
            ]
        );
    }

    #[tokio::test]
    async fn test_production_blocked_gate_cancels_without_pull() {
        let fx = Fixture::new(
            FakeRepository::builder().current_branch("release-1").build(),
            vec![Answer::Confirm(false)],
            StubGateway::counts([4]),
        );
        let ctx = fx.context("online", "master", None);

        let err = fx.synchronizer().reconcile(&ctx).await.unwrap_err();

        assert!(matches!(err, ReleaseError::Cancelled { ref step } if step == "merge request gate"));
        assert!(fx.repo.calls().is_empty());
    }
}
