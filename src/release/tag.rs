//! Release tag naming and publication

use crate::error::Result;
use crate::git::Repository;
use crate::interaction::{accept_any, ProgressDisplay, PromptError, Prompter};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// How the review diff for a release is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffTool {
    Arc,
    Compose,
}

impl DiffTool {
    pub const ALL: [DiffTool; 2] = [DiffTool::Arc, DiffTool::Compose];

    pub fn label(self) -> &'static str {
        match self {
            DiffTool::Arc => "arc",
            DiffTool::Compose => "compose",
        }
    }
}

impl fmt::Display for DiffTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `<project>_<YYYYMMDD>_v0`; candidates append a counter starting at 1
pub fn tag_base(project_name: &str, date: NaiveDate) -> String {
    format!("{}_{}_v0", project_name, date.format("%Y%m%d"))
}

/// First `<base><n>` (n >= 1) not present in `existing`
pub fn next_free_tag(base: &str, existing: &BTreeSet<String>) -> String {
    let mut suffix: u64 = 1;
    loop {
        let candidate = format!("{base}{suffix}");
        if !existing.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Manual tags must be non-empty, free of whitespace and unused
pub fn validate_new_tag(tag: &str, existing: &BTreeSet<String>) -> std::result::Result<(), String> {
    if tag.is_empty() {
        Err("Tag name cannot be empty".to_string())
    } else if tag.chars().any(char::is_whitespace) {
        Err("Tag name cannot contain whitespace".to_string())
    } else if existing.contains(tag) {
        Err(format!("Tag '{tag}' already exists, please enter another one"))
    } else {
        Ok(())
    }
}

/// Annotation stored on the release tag
pub fn tag_message(stage_name: &str, description: &str) -> String {
    format!("{stage_name}环境 {description}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedTag {
    pub tag: String,
    pub diff_tool: DiffTool,
}

pub struct TagIssuer {
    repo: Arc<dyn Repository>,
    prompter: Arc<dyn Prompter>,
    display: Arc<dyn ProgressDisplay>,
    project_name: String,
    today: NaiveDate,
}

impl TagIssuer {
    pub fn new(
        repo: Arc<dyn Repository>,
        prompter: Arc<dyn Prompter>,
        display: Arc<dyn ProgressDisplay>,
        project_name: impl Into<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            repo,
            prompter,
            display,
            project_name: project_name.into(),
            today,
        }
    }

    /// Pick a unique tag, annotate it and push it on its own
    pub async fn issue(&self, stage_name: &str, existing: &BTreeSet<String>) -> Result<IssuedTag> {
        let tag = if self
            .prompter
            .confirm("Generate the release tag automatically?")
            .await?
        {
            let tag = next_free_tag(&tag_base(&self.project_name, self.today), existing);
            self.display.info(&format!("Generated tag {tag}"));
            tag
        } else {
            let validator = |input: &str| validate_new_tag(input, existing);
            self.prompter
                .input("Enter the release tag", &validator)
                .await?
        };

        let description = self
            .prompter
            .input("Briefly describe what this release delivers", &accept_any)
            .await?;

        let labels: Vec<String> = DiffTool::ALL.iter().map(|t| t.label().to_string()).collect();
        let choice = self
            .prompter
            .select("Select the tool for the review diff (arc recommended)", &labels)
            .await?;
        let diff_tool = DiffTool::ALL
            .get(choice)
            .copied()
            .ok_or_else(|| PromptError::Unexpected(format!("choice {choice} is out of range")))?;

        self.repo
            .create_annotated_tag(&tag, &tag_message(stage_name, &description))
            .await?;
        self.repo.push_tag("origin", &tag).await?;
        self.display.info(&format!("Tag {tag} pushed to origin"));

        Ok(IssuedTag { tag, diff_tool })
    }
}
