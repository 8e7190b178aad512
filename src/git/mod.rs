//! Repository collaborator
//!
//! The orchestrator only sees the [`Repository`] traits; [`GitCommandRunner`]
//! implements them by shelling out to the system `git` through a
//! [`ProcessRunner`], so tests can script every primitive.

pub mod error;
pub mod parsers;
pub mod types;

pub use error::GitError;
pub use types::{BranchListing, RepositoryStatus};

use crate::subprocess::{ProcessCommandBuilder, ProcessOutput, ProcessRunner};
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Read-only repository queries
#[async_trait]
pub trait RepositoryReader: Send + Sync {
    /// Working-tree state as five disjoint path sets
    async fn status(&self) -> Result<RepositoryStatus, GitError>;

    /// Local branches and the checked-out one
    async fn local_branches(&self) -> Result<BranchListing, GitError>;

    /// Local and remote-tracking branches (`remotes/<remote>/<name>`)
    async fn all_branches(&self) -> Result<BranchListing, GitError>;

    /// Tag names known locally
    async fn tags(&self) -> Result<BTreeSet<String>, GitError>;
}

/// Repository mutations
#[async_trait]
pub trait RepositoryWriter: Send + Sync {
    /// Stage the whole working tree
    async fn stage_all(&self) -> Result<(), GitError>;

    async fn commit(&self, message: &str) -> Result<(), GitError>;

    /// Pull the current branch from its upstream
    async fn pull(&self) -> Result<(), GitError>;

    /// Pull `branch` from `remote` into the current branch
    async fn pull_from(&self, remote: &str, branch: &str) -> Result<(), GitError>;

    /// Push the current branch to its upstream
    async fn push(&self) -> Result<(), GitError>;

    async fn push_tag(&self, remote: &str, tag: &str) -> Result<(), GitError>;

    async fn delete_local_branch(&self, name: &str, force: bool) -> Result<(), GitError>;

    /// Create `name` from `start_point` and check it out
    async fn checkout_tracking(&self, name: &str, start_point: &str) -> Result<(), GitError>;

    async fn checkout(&self, name: &str) -> Result<(), GitError>;

    /// Merge `from` into the checked-out branch
    async fn merge(&self, from: &str) -> Result<(), GitError>;

    /// Refresh tags from the remote
    async fn fetch_tags(&self) -> Result<(), GitError>;

    async fn create_annotated_tag(&self, name: &str, message: &str) -> Result<(), GitError>;
}

/// Combined trait for everything the orchestrator needs from version control
pub trait Repository: RepositoryReader + RepositoryWriter {}

impl<T: RepositoryReader + RepositoryWriter + ?Sized> Repository for T {}

/// [`Repository`] backed by the system `git`
pub struct GitCommandRunner {
    process_runner: Arc<dyn ProcessRunner>,
    repo_path: PathBuf,
}

impl GitCommandRunner {
    pub fn new(process_runner: Arc<dyn ProcessRunner>, repo_path: impl Into<PathBuf>) -> Self {
        Self {
            process_runner,
            repo_path: repo_path.into(),
        }
    }

    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Run git and fail on a non-zero exit
    async fn run_git_command(&self, args: &[&str]) -> Result<ProcessOutput, GitError> {
        // Force untranslated messages so failure classification stays stable
        let command = ProcessCommandBuilder::new("git")
            .args(args)
            .env("LC_ALL", "C")
            .current_dir(&self.repo_path)
            .build();
        let command_line = command.to_string();

        let output = self.process_runner.run(command).await?;
        if output.status.success() {
            Ok(output)
        } else {
            tracing::debug!("{} exited with {:?}", command_line, output.status);
            Err(parsers::classify_failure(
                &command_line,
                &output.stdout,
                &output.stderr,
            ))
        }
    }
}

#[async_trait]
impl RepositoryReader for GitCommandRunner {
    async fn status(&self) -> Result<RepositoryStatus, GitError> {
        let output = self.run_git_command(&["status", "--porcelain=v2"]).await?;
        Ok(parsers::parse_status_output(&output.stdout))
    }

    async fn local_branches(&self) -> Result<BranchListing, GitError> {
        let output = self
            .run_git_command(&["branch", "--list", "--no-color"])
            .await?;
        Ok(parsers::parse_branch_output(&output.stdout))
    }

    async fn all_branches(&self) -> Result<BranchListing, GitError> {
        let output = self
            .run_git_command(&["branch", "--all", "--no-color"])
            .await?;
        Ok(parsers::parse_branch_output(&output.stdout))
    }

    async fn tags(&self) -> Result<BTreeSet<String>, GitError> {
        let output = self.run_git_command(&["tag", "--list"]).await?;
        Ok(parsers::parse_tag_output(&output.stdout))
    }
}

#[async_trait]
impl RepositoryWriter for GitCommandRunner {
    async fn stage_all(&self) -> Result<(), GitError> {
        self.run_git_command(&["add", "-A"]).await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run_git_command(&["commit", "-m", message]).await?;
        Ok(())
    }

    async fn pull(&self) -> Result<(), GitError> {
        self.run_git_command(&["pull"]).await?;
        Ok(())
    }

    async fn pull_from(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run_git_command(&["pull", remote, branch]).await?;
        Ok(())
    }

    async fn push(&self) -> Result<(), GitError> {
        self.run_git_command(&["push"]).await?;
        Ok(())
    }

    async fn push_tag(&self, remote: &str, tag: &str) -> Result<(), GitError> {
        self.run_git_command(&["push", remote, tag]).await?;
        Ok(())
    }

    async fn delete_local_branch(&self, name: &str, force: bool) -> Result<(), GitError> {
        let flag = if force { "-D" } else { "-d" };
        self.run_git_command(&["branch", flag, name]).await?;
        Ok(())
    }

    async fn checkout_tracking(&self, name: &str, start_point: &str) -> Result<(), GitError> {
        self.run_git_command(&["checkout", "-b", name, start_point])
            .await?;
        Ok(())
    }

    async fn checkout(&self, name: &str) -> Result<(), GitError> {
        self.run_git_command(&["checkout", name]).await?;
        Ok(())
    }

    async fn merge(&self, from: &str) -> Result<(), GitError> {
        self.run_git_command(&["merge", "--no-edit", from]).await?;
        Ok(())
    }

    async fn fetch_tags(&self) -> Result<(), GitError> {
        self.run_git_command(&["fetch", "--tags"]).await?;
        Ok(())
    }

    async fn create_annotated_tag(&self, name: &str, message: &str) -> Result<(), GitError> {
        self.run_git_command(&["tag", "-a", name, "-m", message])
            .await?;
        Ok(())
    }
}
