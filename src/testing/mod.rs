//! Testing utilities
//!
//! Scripted and recording doubles for the repository, prompter, gateway and
//! display, plus [`TestContext`] bundling them around a [`WorkflowDriver`].

pub mod mocks;

pub use mocks::{
    Answer, FakeRepository, FakeRepositoryBuilder, RecordingDisplay, RepoCall, ScriptedPrompter,
    StubGateway,
};

use crate::config::{ProjectInfo, StageCatalog, StageEntry};
use crate::release::WorkflowDriver;
use chrono::NaiveDate;
use std::sync::Arc;

/// Remote used by [`TestContext::new`]
pub const TEST_REMOTE: &str = "git@gitlab.example.com:team/web-app.git";

/// Fakes wired together for one workflow run
pub struct TestContext {
    pub repo: FakeRepository,
    pub prompter: ScriptedPrompter,
    pub gateway: StubGateway,
    pub display: RecordingDisplay,
    pub project: ProjectInfo,
    pub stages: StageCatalog,
    pub today: NaiveDate,
}

impl TestContext {
    /// Context for `team/web-app` with `dev` and `test` stages, dated 2024-01-01
    pub fn new(repo: FakeRepository) -> Self {
        let stages = StageCatalog::from_entries([
            ("dev".to_string(), StageEntry::Branch("dev".to_string())),
            ("test".to_string(), StageEntry::Branch("test".to_string())),
        ]);
        Self {
            repo,
            prompter: ScriptedPrompter::default(),
            gateway: StubGateway::default(),
            display: RecordingDisplay::new(),
            project: ProjectInfo::from_remote(TEST_REMOTE)
                .unwrap_or_else(|err| panic!("test remote must parse: {err}")),
            stages,
            today: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }

    pub fn with_answers<I>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = Answer>,
    {
        self.prompter = ScriptedPrompter::new(answers);
        self
    }

    pub fn with_gateway(mut self, gateway: StubGateway) -> Self {
        self.gateway = gateway;
        self
    }

    pub fn with_stages(mut self, stages: StageCatalog) -> Self {
        self.stages = stages;
        self
    }

    /// Driver sharing state with the fakes held by this context
    pub fn driver(&self) -> WorkflowDriver {
        WorkflowDriver::new(
            Arc::new(self.repo.clone()),
            Arc::new(self.prompter.clone()),
            Arc::new(self.gateway.clone()),
            Arc::new(self.display.clone()),
            self.project.clone(),
            self.stages.clone(),
        )
        .with_date(self.today)
    }
}
