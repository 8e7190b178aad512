//! In-memory repository that records every call

use crate::git::{BranchListing, GitError, RepositoryReader, RepositoryStatus, RepositoryWriter};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// One primitive invoked on a [`FakeRepository`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoCall {
    Status,
    LocalBranches,
    AllBranches,
    Tags,
    StageAll,
    Commit(String),
    Pull,
    PullFrom { remote: String, branch: String },
    Push,
    PushTag { remote: String, tag: String },
    DeleteLocalBranch { name: String, force: bool },
    CheckoutTracking { name: String, start_point: String },
    Checkout(String),
    Merge(String),
    FetchTags,
    CreateAnnotatedTag { name: String, message: String },
}

impl RepoCall {
    /// Operation name, as used by [`FakeRepositoryBuilder::failing_on`]
    pub fn name(&self) -> &'static str {
        match self {
            RepoCall::Status => "status",
            RepoCall::LocalBranches => "local_branches",
            RepoCall::AllBranches => "all_branches",
            RepoCall::Tags => "tags",
            RepoCall::StageAll => "stage_all",
            RepoCall::Commit(_) => "commit",
            RepoCall::Pull => "pull",
            RepoCall::PullFrom { .. } => "pull_from",
            RepoCall::Push => "push",
            RepoCall::PushTag { .. } => "push_tag",
            RepoCall::DeleteLocalBranch { .. } => "delete_local_branch",
            RepoCall::CheckoutTracking { .. } => "checkout_tracking",
            RepoCall::Checkout(_) => "checkout",
            RepoCall::Merge(_) => "merge",
            RepoCall::FetchTags => "fetch_tags",
            RepoCall::CreateAnnotatedTag { .. } => "create_annotated_tag",
        }
    }

    /// Whether the call only reads repository state
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            RepoCall::Status | RepoCall::LocalBranches | RepoCall::AllBranches | RepoCall::Tags
        )
    }
}

#[derive(Debug, Default)]
struct FakeState {
    status: RepositoryStatus,
    current: Option<String>,
    local: Vec<String>,
    remote: Vec<String>,
    tags: BTreeSet<String>,
    merge_conflict: bool,
    failing: HashSet<&'static str>,
    calls: Vec<RepoCall>,
}

/// Builder for a configured [`FakeRepository`]
#[derive(Debug, Default)]
pub struct FakeRepositoryBuilder {
    state: FakeState,
}

impl FakeRepositoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checked-out branch; also added to the local branch list
    pub fn current_branch(mut self, branch: &str) -> Self {
        self.state.current = Some(branch.to_string());
        if !self.state.local.iter().any(|b| b == branch) {
            self.state.local.push(branch.to_string());
        }
        self
    }

    pub fn local_branches<I, S>(mut self, branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for branch in branches {
            let branch = branch.as_ref().to_string();
            if !self.state.local.contains(&branch) {
                self.state.local.push(branch);
            }
        }
        self
    }

    /// Branches present on `origin`
    pub fn remote_branches<I, S>(mut self, branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.state
            .remote
            .extend(branches.into_iter().map(|b| b.as_ref().to_string()));
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.state
            .tags
            .extend(tags.into_iter().map(|t| t.as_ref().to_string()));
        self
    }

    pub fn status(mut self, status: RepositoryStatus) -> Self {
        self.state.status = status;
        self
    }

    /// Working tree with one modified file
    pub fn dirty(self) -> Self {
        let mut status = RepositoryStatus::new();
        status.modified.insert(PathBuf::from("src/main.rs"));
        self.status(status)
    }

    pub fn detached(mut self) -> Self {
        self.state.current = None;
        self
    }

    /// Every merge reports a conflict
    pub fn merge_conflict(mut self) -> Self {
        self.state.merge_conflict = true;
        self
    }

    /// Make the named operation (see [`RepoCall::name`]) fail
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.state.failing.insert(operation);
        self
    }

    pub fn build(self) -> FakeRepository {
        FakeRepository {
            state: Arc::new(Mutex::new(self.state)),
        }
    }
}

/// Repository double simulating branch bookkeeping in memory
#[derive(Clone)]
pub struct FakeRepository {
    state: Arc<Mutex<FakeState>>,
}

impl FakeRepository {
    pub fn builder() -> FakeRepositoryBuilder {
        FakeRepositoryBuilder::new()
    }

    pub fn calls(&self) -> Vec<RepoCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Calls that change repository state
    pub fn mutating_calls(&self) -> Vec<RepoCall> {
        self.calls().into_iter().filter(|c| !c.is_query()).collect()
    }

    pub fn current_branch(&self) -> Option<String> {
        self.state.lock().unwrap().current.clone()
    }

    pub fn local_branch_names(&self) -> Vec<String> {
        self.state.lock().unwrap().local.clone()
    }

    pub fn tag_names(&self) -> BTreeSet<String> {
        self.state.lock().unwrap().tags.clone()
    }

    /// Record the call and fail it if scripted to
    fn record(&self, call: RepoCall) -> Result<std::sync::MutexGuard<'_, FakeState>, GitError> {
        let mut state = self.state.lock().unwrap();
        let name = call.name();
        state.calls.push(call);
        if state.failing.contains(name) {
            return Err(GitError::CommandFailed {
                command: format!("git {name}"),
                stderr: "scripted failure".to_string(),
            });
        }
        Ok(state)
    }
}

fn command_failed(command: String, stderr: &str) -> GitError {
    GitError::CommandFailed {
        command,
        stderr: stderr.to_string(),
    }
}

#[async_trait]
impl RepositoryReader for FakeRepository {
    async fn status(&self) -> Result<RepositoryStatus, GitError> {
        let state = self.record(RepoCall::Status)?;
        Ok(state.status.clone())
    }

    async fn local_branches(&self) -> Result<BranchListing, GitError> {
        let state = self.record(RepoCall::LocalBranches)?;
        Ok(BranchListing {
            current: state.current.clone(),
            all: state.local.clone(),
        })
    }

    async fn all_branches(&self) -> Result<BranchListing, GitError> {
        let state = self.record(RepoCall::AllBranches)?;
        let mut all = state.local.clone();
        all.extend(state.remote.iter().map(|b| format!("remotes/origin/{b}")));
        Ok(BranchListing {
            current: state.current.clone(),
            all,
        })
    }

    async fn tags(&self) -> Result<BTreeSet<String>, GitError> {
        let state = self.record(RepoCall::Tags)?;
        Ok(state.tags.clone())
    }
}

#[async_trait]
impl RepositoryWriter for FakeRepository {
    async fn stage_all(&self) -> Result<(), GitError> {
        self.record(RepoCall::StageAll)?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<(), GitError> {
        let mut state = self.record(RepoCall::Commit(message.to_string()))?;
        if state.status.is_clean() {
            return Err(command_failed(
                format!("git commit -m {message}"),
                "nothing to commit, working tree clean",
            ));
        }
        state.status = RepositoryStatus::new();
        Ok(())
    }

    async fn pull(&self) -> Result<(), GitError> {
        self.record(RepoCall::Pull)?;
        Ok(())
    }

    async fn pull_from(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        self.record(RepoCall::PullFrom {
            remote: remote.to_string(),
            branch: branch.to_string(),
        })?;
        Ok(())
    }

    async fn push(&self) -> Result<(), GitError> {
        self.record(RepoCall::Push)?;
        Ok(())
    }

    async fn push_tag(&self, remote: &str, tag: &str) -> Result<(), GitError> {
        let state = self.record(RepoCall::PushTag {
            remote: remote.to_string(),
            tag: tag.to_string(),
        })?;
        if !state.tags.contains(tag) {
            return Err(command_failed(
                format!("git push {remote} {tag}"),
                "src refspec does not match any",
            ));
        }
        Ok(())
    }

    async fn delete_local_branch(&self, name: &str, force: bool) -> Result<(), GitError> {
        let mut state = self.record(RepoCall::DeleteLocalBranch {
            name: name.to_string(),
            force,
        })?;
        if state.current.as_deref() == Some(name) {
            return Err(command_failed(
                format!("git branch -D {name}"),
                "cannot delete the branch which you are currently on",
            ));
        }
        state.local.retain(|b| b != name);
        Ok(())
    }

    async fn checkout_tracking(&self, name: &str, start_point: &str) -> Result<(), GitError> {
        let mut state = self.record(RepoCall::CheckoutTracking {
            name: name.to_string(),
            start_point: start_point.to_string(),
        })?;
        let command = format!("git checkout -b {name} {start_point}");
        if state.local.iter().any(|b| b == name) {
            return Err(command_failed(command, "a branch with that name already exists"));
        }
        let remote_branch = start_point.strip_prefix("origin/").unwrap_or(start_point);
        let known = state.remote.iter().any(|b| b == remote_branch)
            || state.local.iter().any(|b| b == start_point);
        if !known {
            return Err(command_failed(command, "not a valid object name"));
        }
        state.local.push(name.to_string());
        state.current = Some(name.to_string());
        Ok(())
    }

    async fn checkout(&self, name: &str) -> Result<(), GitError> {
        let mut state = self.record(RepoCall::Checkout(name.to_string()))?;
        if !state.local.iter().any(|b| b == name) {
            if state.remote.iter().any(|b| b == name) {
                state.local.push(name.to_string());
            } else {
                return Err(command_failed(
                    format!("git checkout {name}"),
                    "pathspec did not match any file(s) known to git",
                ));
            }
        }
        state.current = Some(name.to_string());
        Ok(())
    }

    async fn merge(&self, from: &str) -> Result<(), GitError> {
        let state = self.record(RepoCall::Merge(from.to_string()))?;
        if state.merge_conflict {
            return Err(GitError::MergeConflict {
                detail: format!("CONFLICT (content): Merge conflict merging {from}"),
            });
        }
        Ok(())
    }

    async fn fetch_tags(&self) -> Result<(), GitError> {
        self.record(RepoCall::FetchTags)?;
        Ok(())
    }

    async fn create_annotated_tag(&self, name: &str, message: &str) -> Result<(), GitError> {
        let mut state = self.record(RepoCall::CreateAnnotatedTag {
            name: name.to_string(),
            message: message.to_string(),
        })?;
        if !state.tags.insert(name.to_string()) {
            return Err(command_failed(
                format!("git tag -a {name}"),
                "tag already exists",
            ));
        }
        Ok(())
    }
}
