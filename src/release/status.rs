//! Working-tree check and the commit-or-abort decision

use crate::error::{ReleaseError, Result};
use crate::git::Repository;
use crate::interaction::{ProgressDisplay, Prompter};
use std::sync::Arc;

/// Allowed conventional-commit type with a short explanation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitType {
    pub name: &'static str,
    pub description: &'static str,
}

pub const COMMIT_TYPES: [CommitType; 7] = [
    CommitType {
        name: "feat",
        description: "new feature",
    },
    CommitType {
        name: "fix",
        description: "bug fix",
    },
    CommitType {
        name: "docs",
        description: "documentation only",
    },
    CommitType {
        name: "style",
        description: "formatting, no behaviour change",
    },
    CommitType {
        name: "refactor",
        description: "code change that neither fixes a bug nor adds a feature",
    },
    CommitType {
        name: "test",
        description: "adding or fixing tests",
    },
    CommitType {
        name: "chore",
        description: "build process or tooling",
    },
];

/// `true` iff the message starts with `<type>:` for a known type
pub fn is_conventional_commit(message: &str) -> bool {
    COMMIT_TYPES.iter().any(|commit_type| {
        message
            .strip_prefix(commit_type.name)
            .is_some_and(|rest| rest.starts_with(':'))
    })
}

pub fn validate_commit_message(message: &str) -> std::result::Result<(), String> {
    if is_conventional_commit(message) {
        Ok(())
    } else {
        Err("Commit message does not follow the convention, please try again".to_string())
    }
}

/// Prompt text listing the accepted types
pub fn commit_prompt() -> String {
    let types: Vec<String> = COMMIT_TYPES
        .iter()
        .map(|t| format!("{}: {}", t.name, t.description))
        .collect();
    format!("Commit message ({})", types.join("; "))
}

pub struct StatusChecker {
    repo: Arc<dyn Repository>,
    prompter: Arc<dyn Prompter>,
    display: Arc<dyn ProgressDisplay>,
}

impl StatusChecker {
    pub fn new(
        repo: Arc<dyn Repository>,
        prompter: Arc<dyn Prompter>,
        display: Arc<dyn ProgressDisplay>,
    ) -> Self {
        Self {
            repo,
            prompter,
            display,
        }
    }

    /// Commit pending changes if the operator agrees, then sync the current
    /// branch with its upstream. Returns whether a commit was made.
    pub async fn check_and_commit(&self) -> Result<bool> {
        self.display.info("Checking the working tree...");
        let status = self.repo.status().await?;

        let committed = if status.is_clean() {
            tracing::debug!("Working tree is clean");
            false
        } else {
            self.display.warning(&format!(
                "{} uncommitted change(s) in the working tree",
                status.len()
            ));
            if !self.prompter.confirm("Commit them now?").await? {
                return Err(ReleaseError::cancelled("commit confirmation"));
            }

            let message = self
                .prompter
                .input(&commit_prompt(), &validate_commit_message)
                .await?;

            self.repo.stage_all().await?;
            self.repo.commit(&message).await?;
            self.display.info("Local commit created");
            true
        };

        self.display.info("Pulling the latest changes...");
        self.repo.pull().await?;
        self.display.info("Pushing local commits to the remote...");
        self.repo.push().await?;

        Ok(committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Answer, FakeRepository, RecordingDisplay, RepoCall, ScriptedPrompter};

    fn checker(repo: &FakeRepository, prompter: &ScriptedPrompter) -> StatusChecker {
        StatusChecker::new(
            Arc::new(repo.clone()),
            Arc::new(prompter.clone()),
            Arc::new(RecordingDisplay::new()),
        )
    }

    #[test]
    fn test_commit_message_validator() {
        for ok in ["feat: add x", "fix: y", "docs:z", "style: a", "refactor: b", "test: c", "chore: d", "feat:add x"] {
            assert!(is_conventional_commit(ok), "{ok}");
        }
        for bad in ["Feat: x", "feat add x", "feature: x", "fixup: x", "", " feat: x", "wip"] {
            assert!(!is_conventional_commit(bad), "{bad}");
        }
    }

    #[test]
    fn test_commit_prompt_lists_every_type() {
        let prompt = commit_prompt();
        for commit_type in COMMIT_TYPES {
            assert!(prompt.contains(&format!("{}:", commit_type.name)));
        }
    }

    #[tokio::test]
    async fn test_clean_tree_skips_prompt_but_syncs() {
        let repo = FakeRepository::builder().current_branch("feature-x").build();
        let prompter = ScriptedPrompter::default();

        let committed = checker(&repo, &prompter).check_and_commit().await.unwrap();

        assert!(!committed);
        assert!(prompter.asked().is_empty());
        assert_eq!(repo.calls(), vec![RepoCall::Status, RepoCall::Pull, RepoCall::Push]);
    }

    #[tokio::test]
    async fn test_dirty_tree_commits_after_reprompt() {
        let repo = FakeRepository::builder()
            .current_branch("feature-x")
            .dirty()
            .build();
        let prompter = ScriptedPrompter::new([
            Answer::Confirm(true),
            Answer::Text("added login".to_string()),
            Answer::Text("feat: add login".to_string()),
        ]);

        let committed = checker(&repo, &prompter).check_and_commit().await.unwrap();

        assert!(committed);
        assert_eq!(prompter.rejected().len(), 1);
        assert_eq!(prompter.rejected()[0].0, "added login");
        assert_eq!(
            repo.calls(),
            vec![
                RepoCall::Status,
                RepoCall::StageAll,
                RepoCall::Commit("feat: add login".to_string()),
                RepoCall::Pull,
                RepoCall::Push,
            ]
        );
    }

    #[tokio::test]
    async fn test_declining_commit_cancels_without_side_effects() {
        let repo = FakeRepository::builder()
            .current_branch("feature-x")
            .dirty()
            .build();
        let prompter = ScriptedPrompter::new([Answer::Confirm(false)]);

        let err = checker(&repo, &prompter).check_and_commit().await.unwrap_err();

        assert!(err.is_cancellation());
        assert_eq!(repo.calls(), vec![RepoCall::Status]);
    }

    #[tokio::test]
    async fn test_pull_failure_is_fatal() {
        let repo = FakeRepository::builder()
            .current_branch("feature-x")
            .failing_on("pull")
            .build();
        let prompter = ScriptedPrompter::default();

        let err = checker(&repo, &prompter).check_and_commit().await.unwrap_err();

        assert!(matches!(err, ReleaseError::Repository(_)));
        assert!(!repo.calls().contains(&RepoCall::Push));
    }
}
