//! Repository operation error types

use crate::error::ErrorCode;
use crate::subprocess::ProcessError;
use thiserror::Error;

/// Failures reported by the repository collaborator
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Repository is in detached HEAD state")]
    DetachedHead,

    #[error("Current branch has no upstream: {detail}")]
    NoUpstream { detail: String },

    #[error("Automatic merge failed: {detail}")]
    MergeConflict { detail: String },

    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Failed to run git: {0}")]
    Process(#[from] ProcessError),
}

impl GitError {
    pub fn code(&self) -> u16 {
        match self {
            GitError::NotARepository => ErrorCode::GIT_NOT_REPO,
            GitError::DetachedHead => ErrorCode::GIT_DETACHED_HEAD,
            GitError::NoUpstream { .. } => ErrorCode::GIT_NO_UPSTREAM,
            GitError::MergeConflict { .. } => ErrorCode::GIT_MERGE_CONFLICT,
            GitError::CommandFailed { .. } => ErrorCode::GIT_COMMAND_FAILED,
            GitError::Process(_) => ErrorCode::GIT_PROCESS,
        }
    }

    pub fn is_merge_conflict(&self) -> bool {
        matches!(self, GitError::MergeConflict { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_stay_in_repository_range() {
        let errors = [
            GitError::NotARepository,
            GitError::DetachedHead,
            GitError::NoUpstream {
                detail: "no tracking information".to_string(),
            },
            GitError::MergeConflict {
                detail: "CONFLICT (content)".to_string(),
            },
            GitError::CommandFailed {
                command: "git push".to_string(),
                stderr: "rejected".to_string(),
            },
            GitError::Process(ProcessError::CommandNotFound("git".to_string())),
        ];

        for err in &errors {
            assert!((3000..4000).contains(&err.code()), "{err}");
        }
        assert!(errors[3].is_merge_conflict());
        assert!(!errors[4].is_merge_conflict());
    }

    #[test]
    fn test_command_failed_message() {
        let err = GitError::CommandFailed {
            command: "git push origin dev".to_string(),
            stderr: "remote rejected".to_string(),
        };
        assert_eq!(err.to_string(), "`git push origin dev` failed: remote rejected");
    }
}
