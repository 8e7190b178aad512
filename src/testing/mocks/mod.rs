//! Test doubles for every collaborator of the release workflow

pub mod display;
pub mod gateway;
pub mod prompter;
pub mod repository;

pub use display::RecordingDisplay;
pub use gateway::StubGateway;
pub use prompter::{Answer, ScriptedPrompter};
pub use repository::{FakeRepository, FakeRepositoryBuilder, RepoCall};
