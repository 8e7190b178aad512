use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::subprocess::ProcessCommand;

/// Fluent construction of a [`ProcessCommand`]
pub struct ProcessCommandBuilder {
    command: ProcessCommand,
}

impl ProcessCommandBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            command: ProcessCommand {
                program: program.to_string(),
                args: Vec::new(),
                env: HashMap::new(),
                working_dir: None,
                timeout: None,
            },
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.command.args.push(arg.to_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.command
            .args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.command.env.insert(key.to_string(), value.to_string());
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.command.working_dir = Some(dir.to_path_buf());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.command.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> ProcessCommand {
        self.command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_collects_args_env_and_dir() {
        let command = ProcessCommandBuilder::new("git")
            .arg("checkout")
            .args(["-b", "dev", "origin/dev"])
            .env("LC_ALL", "C")
            .current_dir(Path::new("/tmp/repo"))
            .build();

        assert_eq!(command.program, "git");
        assert_eq!(command.args, vec!["checkout", "-b", "dev", "origin/dev"]);
        assert_eq!(command.env.get("LC_ALL").map(String::as_str), Some("C"));
        assert_eq!(command.working_dir.as_deref(), Some(Path::new("/tmp/repo")));
        assert!(command.timeout.is_none());
    }

    #[test]
    fn test_display_joins_program_and_args() {
        let command = ProcessCommandBuilder::new("git")
            .args(["push", "origin", "proj_20240101_v01"])
            .build();
        assert_eq!(command.to_string(), "git push origin proj_20240101_v01");
    }
}
