//! Prompter answering from a script

use crate::interaction::{InputValidator, PromptError, Prompter};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One scripted operator answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Confirm(bool),
    Text(String),
    /// Choice by label, resolved against the offered choices
    Choice(String),
}

#[derive(Debug, Default)]
struct PrompterState {
    answers: VecDeque<Answer>,
    asked: Vec<String>,
    rejected: Vec<(String, String)>,
}

/// Prompter popping answers in order; an empty script reads as closed input
#[derive(Clone, Default)]
pub struct ScriptedPrompter {
    state: Arc<Mutex<PrompterState>>,
}

impl ScriptedPrompter {
    pub fn new<I>(answers: I) -> Self
    where
        I: IntoIterator<Item = Answer>,
    {
        Self {
            state: Arc::new(Mutex::new(PrompterState {
                answers: answers.into_iter().collect(),
                ..PrompterState::default()
            })),
        }
    }

    /// Messages of every prompt shown, in order
    pub fn asked(&self) -> Vec<String> {
        self.state.lock().unwrap().asked.clone()
    }

    /// `(answer, reason)` for every text answer the validator refused
    pub fn rejected(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().rejected.clone()
    }

    pub fn remaining(&self) -> usize {
        self.state.lock().unwrap().answers.len()
    }

    fn next_answer(&self, message: &str) -> Result<Answer, PromptError> {
        let mut state = self.state.lock().unwrap();
        state.asked.push(message.to_string());
        state.answers.pop_front().ok_or(PromptError::InputClosed)
    }
}

fn mismatch(expected: &str, got: &Answer, message: &str) -> PromptError {
    PromptError::Unexpected(format!(
        "expected {expected} answer for '{message}', script had {got:?}"
    ))
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn confirm(&self, message: &str) -> Result<bool, PromptError> {
        match self.next_answer(message)? {
            Answer::Confirm(value) => Ok(value),
            other => Err(mismatch("confirm", &other, message)),
        }
    }

    async fn input(&self, message: &str, validator: InputValidator<'_>) -> Result<String, PromptError> {
        loop {
            let text = match self.next_answer(message)? {
                Answer::Text(text) => text,
                other => return Err(mismatch("text", &other, message)),
            };
            match validator(&text) {
                Ok(()) => return Ok(text),
                Err(reason) => self.state.lock().unwrap().rejected.push((text, reason)),
            }
        }
    }

    async fn select(&self, message: &str, choices: &[String]) -> Result<usize, PromptError> {
        if choices.is_empty() {
            return Err(PromptError::NoChoices);
        }
        match self.next_answer(message)? {
            Answer::Choice(label) => choices
                .iter()
                .position(|choice| *choice == label)
                .ok_or_else(|| {
                    PromptError::Unexpected(format!("'{label}' is not one of {choices:?}"))
                }),
            other => Err(mismatch("choice", &other, message)),
        }
    }
}
