//! Test doubles for the wizard's seams.
//!
//! - [`FakeRunner`] - canned tool output, records every invocation
//! - [`ScriptedPrompter`] - answers prompts by label from a script
//! - [`RecordingExecutor`] - records dispatched commands instead of running them
//!
//! These are public so integration tests and downstream front ends can drive
//! full sessions without a terminal or a Titanium install.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::rc::Rc;

use crate::command::CommandLine;
use crate::dispatch::Executor;
use crate::tools::common::{Captured, ToolRunner};
use crate::types::WizardError;
use crate::wizard::Prompter;

/// [`ToolRunner`] that answers from canned responses.
///
/// A response is chosen by the first registered pattern contained in the
/// space-joined argument list. Unmatched invocations exit with code 127.
/// Clones share the same call log.
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    responses: Vec<(String, Captured)>,
    calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `captured` as the response for invocations whose arguments
    /// contain `pattern`.
    pub fn respond(mut self, pattern: impl Into<String>, captured: Captured) -> Self {
        self.responses.push((pattern.into(), captured));
        self
    }

    /// Every invocation so far, program first.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl ToolRunner for FakeRunner {
    fn capture(&self, program: &Path, args: &[&str]) -> Result<Captured, WizardError> {
        let mut call = vec![program.display().to_string()];
        call.extend(args.iter().map(|a| a.to_string()));
        self.calls.borrow_mut().push(call);

        let joined = args.join(" ");
        let response = self
            .responses
            .iter()
            .find(|(pattern, _)| joined.contains(pattern.as_str()))
            .map(|(_, captured)| captured.clone())
            .unwrap_or_else(|| Captured {
                code: Some(127),
                stdout: String::new(),
                stderr: format!("no canned response for `{joined}`"),
            });
        Ok(response)
    }
}

/// A prompt as it was shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShownPrompt {
    pub prompt: String,
    pub options: Vec<String>,
}

/// [`Prompter`] that answers from a script of option labels.
///
/// `Some(label)` selects the option with that exact label; `None` dismisses
/// the prompt.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,
    shown: Vec<ShownPrompt>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
            shown: Vec::new(),
        }
    }

    /// Every prompt shown so far.
    pub fn shown(&self) -> &[ShownPrompt] {
        &self.shown
    }

    /// Whether every scripted answer has been consumed.
    pub fn is_exhausted(&self) -> bool {
        self.answers.is_empty()
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, prompt: &str, options: &[String]) -> Result<Option<usize>, WizardError> {
        self.shown.push(ShownPrompt {
            prompt: prompt.to_string(),
            options: options.to_vec(),
        });
        let answer = self
            .answers
            .pop_front()
            .ok_or_else(|| WizardError::Prompt(format!("script exhausted at `{prompt}`")))?;
        match answer {
            None => Ok(None),
            Some(label) => options
                .iter()
                .position(|o| *o == label)
                .map(Some)
                .ok_or_else(|| {
                    WizardError::Prompt(format!("`{label}` not offered at `{prompt}`: {options:?}"))
                }),
        }
    }
}

/// [`Executor`] that records commands instead of running them.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub executed: Vec<CommandLine>,
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, command: &CommandLine) -> Result<(), WizardError> {
        self.executed.push(command.clone());
        Ok(())
    }
}
