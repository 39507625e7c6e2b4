//! Dispatching the assembled command
//!
//! The final step of every session hands one [`CommandLine`] to an
//! [`Executor`]. The real executor streams the child's output straight to the
//! terminal; the dry-run executor only prints what would run.

use std::process::Stdio;

use tracing::info;

use crate::command::CommandLine;
use crate::types::WizardError;

/// Runs a dispatched command.
pub trait Executor {
    /// Executes `command`, returning once it has finished.
    fn execute(&mut self, command: &CommandLine) -> Result<(), WizardError>;
}

/// Spawns the command with inherited stdio and waits for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&mut self, command: &CommandLine) -> Result<(), WizardError> {
        info!(command = %command, "dispatching");
        let status = command
            .to_command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| WizardError::ToolLaunch {
                tool: command.program().to_string(),
                source,
            })?;

        if !status.success() {
            return Err(WizardError::ToolFailed {
                tool: command.program().to_string(),
                status: status.to_string(),
                stderr: "(streamed above)".to_string(),
            });
        }
        Ok(())
    }
}

/// Prints the command instead of running it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunExecutor;

impl Executor for DryRunExecutor {
    fn execute(&mut self, command: &CommandLine) -> Result<(), WizardError> {
        println!("[dry-run] {command}");
        Ok(())
    }
}
