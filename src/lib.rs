//! # stage-release
//!
//! Interactive release workflow for a git repository hosted on GitLab.
//!
//! ## Usage
//!
//! ```bash
//! stage-release [-c release.config.yaml] [-v]
//! ```
//!
//! ## Modules
//!
//! - `app` - CLI configuration, logging and outcome reporting
//! - `config` - Release configuration loading and stage normalisation
//! - `error` - Error taxonomy, error codes and run outcomes
//! - `gateway` - Open merge request queries against the code host
//! - `git` - Repository operations over the system `git`
//! - `interaction` - Operator prompts and progress display
//! - `release` - The workflow orchestrator
//! - `subprocess` - Process execution abstraction for testing
//! - `testing` - Test doubles for every collaborator
pub mod app;
pub mod config;
pub mod error;
pub mod gateway;
pub mod git;
pub mod interaction;
pub mod release;
pub mod subprocess;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
