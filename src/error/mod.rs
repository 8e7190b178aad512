use std::path::PathBuf;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

use crate::gateway::GatewayError;
use crate::git::GitError;
use crate::interaction::PromptError;

/// Every way a release run can stop short of success
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Configuration file not found: {}", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("Configuration is incomplete: `{field}` is required")]
    ConfigIncomplete { field: &'static str },

    #[error("Invalid configuration in {}: {message}", path.display())]
    ConfigInvalid { path: PathBuf, message: String },

    #[error("Release cancelled at {step}")]
    Cancelled { step: String },

    #[error("Branch '{branch}' does not exist on origin, create it first")]
    BranchNotFoundRemote { branch: String },

    #[error("Automatic merge of '{from}' into '{into}' failed, resolve the conflicts manually and release again")]
    MergeConflict { from: String, into: String },

    #[error(transparent)]
    Repository(#[from] GitError),

    #[error("Merge request query failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Prompt failed: {0}")]
    Interaction(PromptError),
}

impl ReleaseError {
    pub fn cancelled(step: impl Into<String>) -> Self {
        Self::Cancelled { step: step.into() }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::ConfigMissing { .. } => ErrorCode::CONFIG_NOT_FOUND,
            Self::ConfigIncomplete { .. } => ErrorCode::CONFIG_MISSING_REQUIRED,
            Self::ConfigInvalid { .. } => ErrorCode::CONFIG_INVALID,
            Self::Cancelled { .. } => ErrorCode::WORKFLOW_CANCELLED,
            Self::BranchNotFoundRemote { .. } => ErrorCode::WORKFLOW_BRANCH_NOT_FOUND_REMOTE,
            Self::MergeConflict { .. } => ErrorCode::WORKFLOW_MERGE_CONFLICT,
            Self::Repository(err) => err.code(),
            Self::Gateway(err) => err.code(),
            Self::Interaction(PromptError::TimedOut(_)) => ErrorCode::PROMPT_TIMEOUT,
            Self::Interaction(_) => ErrorCode::PROMPT_GENERIC,
        }
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigMissing { .. } | Self::ConfigIncomplete { .. } | Self::ConfigInvalid { .. } => 2,
            Self::Cancelled { .. } => 3,
            Self::BranchNotFoundRemote { .. } | Self::MergeConflict { .. } | Self::Repository(_) => 4,
            Self::Gateway(_) => 5,
            Self::Interaction(_) => 6,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        format!("[E{:04}] {}", self.code(), self)
    }
}

impl From<PromptError> for ReleaseError {
    fn from(err: PromptError) -> Self {
        match err {
            PromptError::InputClosed => Self::cancelled("prompt (input closed)"),
            other => Self::Interaction(other),
        }
    }
}

/// Type alias for Results using ReleaseError
pub type Result<T> = std::result::Result<T, ReleaseError>;

/// How a run ended, resolved once into a process exit code
#[derive(Debug)]
pub enum Outcome<T> {
    Success(T),
    Cancelled { step: String },
    Failed(ReleaseError),
}

impl<T> Outcome<T> {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Success(_) => 0,
            Self::Cancelled { .. } => 3,
            Self::Failed(err) => err.exit_code(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(ReleaseError::Cancelled { step }) => Self::Cancelled { step },
            Err(err) => Self::Failed(err),
        }
    }
}
