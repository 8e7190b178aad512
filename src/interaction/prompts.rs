//! Operator prompting

use async_trait::async_trait;
use std::io::{self, Write};
use std::time::Duration;
use thiserror::Error;

/// Validator for free-text answers: `Err` carries the message shown before re-prompting
pub type InputValidator<'a> = &'a (dyn Fn(&str) -> Result<(), String> + Send + Sync);

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("input closed before an answer was given")]
    InputClosed,

    #[error("no answer within {0:?}")]
    TimedOut(Duration),

    #[error("no choices provided")]
    NoChoices,

    #[error("prompt task failed: {0}")]
    Unexpected(String),

    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Interactive questions asked during a release
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Yes/no question
    async fn confirm(&self, message: &str) -> Result<bool, PromptError>;

    /// Free text, re-asked until `validator` accepts it
    async fn input(&self, message: &str, validator: InputValidator<'_>) -> Result<String, PromptError>;

    /// Single choice, returning the 0-based index into `choices`
    async fn select(&self, message: &str, choices: &[String]) -> Result<usize, PromptError>;
}

/// Accepts any answer
pub fn accept_any(_input: &str) -> Result<(), String> {
    Ok(())
}

/// Prompter reading answers from stdin
pub struct TerminalPrompter {
    timeout: Option<Duration>,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl TerminalPrompter {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    fn write_prompt(text: &str) -> Result<(), PromptError> {
        let mut stdout = io::stdout();
        write!(stdout, "{text}")?;
        stdout.flush()?;
        Ok(())
    }

    /// Read one trimmed line; end of input means the operator walked away
    async fn read_line(&self) -> Result<String, PromptError> {
        let read = tokio::task::spawn_blocking(|| {
            let mut input = String::new();
            let bytes = io::stdin().read_line(&mut input)?;
            Ok::<_, io::Error>((bytes, input))
        });

        let joined = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| PromptError::TimedOut(limit))?,
            None => read.await,
        };

        let (bytes, input) = joined.map_err(|e| PromptError::Unexpected(e.to_string()))??;
        if bytes == 0 {
            return Err(PromptError::InputClosed);
        }
        Ok(input.trim().to_string())
    }

    /// Interpret a `[Y/n]` answer; empty means yes
    pub fn parse_confirmation(input: &str) -> bool {
        let input = input.trim().to_lowercase();
        input.is_empty() || input == "y" || input == "yes"
    }

    /// Validate and parse a choice input
    /// Returns Some(index) if valid, None if invalid
    pub fn validate_choice_input(input: &str, num_choices: usize) -> Option<usize> {
        if num_choices == 0 {
            return None;
        }

        input.parse::<usize>().ok().and_then(|num| {
            if num > 0 && num <= num_choices {
                Some(num - 1)
            } else {
                None
            }
        })
    }

    /// Format choice prompt message
    pub fn format_choice_prompt(message: &str, choices: &[String]) -> String {
        let mut output = String::new();
        output.push_str(message);
        output.push('\n');
        for (i, choice) in choices.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, choice));
        }
        output
    }

    pub fn format_choice_input_prompt(num_choices: usize) -> String {
        format!("Enter choice (1-{num_choices}): ")
    }

    pub fn format_invalid_choice_message(num_choices: usize) -> String {
        format!("Invalid choice. Please enter a number between 1 and {num_choices}: ")
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn confirm(&self, message: &str) -> Result<bool, PromptError> {
        Self::write_prompt(&format!("? {message} [Y/n]: "))?;
        let input = self.read_line().await?;
        Ok(Self::parse_confirmation(&input))
    }

    async fn input(&self, message: &str, validator: InputValidator<'_>) -> Result<String, PromptError> {
        loop {
            Self::write_prompt(&format!("? {message}: "))?;
            let input = self.read_line().await?;
            match validator(&input) {
                Ok(()) => return Ok(input),
                Err(reason) => {
                    tracing::debug!("Rejected answer {:?}: {}", input, reason);
                    Self::write_prompt(&format!(">> {reason}\n"))?;
                }
            }
        }
    }

    async fn select(&self, message: &str, choices: &[String]) -> Result<usize, PromptError> {
        if choices.is_empty() {
            return Err(PromptError::NoChoices);
        }

        Self::write_prompt(&format!("? {}", Self::format_choice_prompt(message, choices)))?;
        Self::write_prompt(&Self::format_choice_input_prompt(choices.len()))?;

        loop {
            let input = self.read_line().await?;
            if let Some(index) = Self::validate_choice_input(&input, choices.len()) {
                return Ok(index);
            }
            Self::write_prompt(&Self::format_invalid_choice_message(choices.len()))?;
        }
    }
}
