//! Operator interaction
//!
//! Prompts for answers and notices for progress, kept behind traits so the
//! release workflow can run against scripted doubles.

pub mod display;
pub mod prompts;

pub use display::{render_table, ProgressDisplay, TerminalDisplay};
pub use prompts::{accept_any, InputValidator, PromptError, Prompter, TerminalPrompter};
