//! Subprocess abstraction used by the git adapter
//!
//! Production code runs commands through [`TokioProcessRunner`]; tests swap in
//! [`MockProcessRunner`] and assert on the recorded calls.

pub mod builder;
pub mod error;
pub mod mock;
pub mod runner;

pub use builder::ProcessCommandBuilder;
pub use error::ProcessError;
pub use mock::{MockCommandConfig, MockProcessRunner};
pub use runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};
