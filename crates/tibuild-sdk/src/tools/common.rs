//! Process plumbing shared by the tool adapters.
//!
//! The wizard never spawns processes directly; it goes through a
//! [`ToolRunner`] so tests can substitute canned output.

use std::path::Path;
use std::process::{Command, Output};

use tracing::debug;

use crate::types::WizardError;

/// Captured result of a finished external program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    /// Exit code, or `None` if the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    /// A successful run with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Whether the program exited with status zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human-readable exit status.
    pub fn status(&self) -> String {
        match self.code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        }
    }

    /// Converts a non-zero exit into [`WizardError::ToolFailed`].
    pub fn into_success(self, tool: &str) -> Result<Self, WizardError> {
        if self.success() {
            Ok(self)
        } else {
            Err(WizardError::ToolFailed {
                tool: tool.to_string(),
                status: self.status(),
                stderr: self.stderr.lines().take(20).collect::<Vec<_>>().join("\n"),
            })
        }
    }
}

impl From<Output> for Captured {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Runs an external program to completion and captures its output.
pub trait ToolRunner {
    /// Runs `program` with `args`, blocking until it exits.
    ///
    /// Returns an error only if the program could not be started; a
    /// non-zero exit is reported through [`Captured::code`].
    fn capture(&self, program: &Path, args: &[&str]) -> Result<Captured, WizardError>;
}

/// [`ToolRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    fn capture(&self, program: &Path, args: &[&str]) -> Result<Captured, WizardError> {
        debug!(program = %program.display(), ?args, "running tool");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| WizardError::ToolLaunch {
                tool: program.display().to_string(),
                source,
            })?;
        let captured = Captured::from(output);
        debug!(status = %captured.status(), bytes = captured.stdout.len(), "tool finished");
        Ok(captured)
    }
}
