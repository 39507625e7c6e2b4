//! Titanium CLI queries
//!
//! Read-only invocations of the Titanium CLI made while the wizard runs. The
//! build and clean commands themselves are assembled in [`crate::command`]
//! and dispatched, not captured here.

use std::path::Path;

use tracing::debug;

use super::common::ToolRunner;
use super::ios::IosInfo;
use crate::command::path_arg;
use crate::types::{WizardConfig, WizardError};

const TOOL: &str = "titanium";

/// Thin adapter over the Titanium CLI.
pub struct TitaniumCli<'a> {
    config: &'a WizardConfig,
    runner: &'a dyn ToolRunner,
}

impl<'a> TitaniumCli<'a> {
    pub fn new(config: &'a WizardConfig, runner: &'a dyn ToolRunner) -> Self {
        Self { config, runner }
    }

    /// Reads the SDK version a project is pinned to in its `tiapp.xml`.
    ///
    /// Runs `titanium project sdk-version --project-dir <dir> --output=text`
    /// and returns stdout without the trailing newline. The value is passed
    /// to `--sdk` verbatim.
    ///
    /// # Errors
    ///
    /// * [`WizardError::ToolLaunch`] - the CLI could not be started
    /// * [`WizardError::ToolFailed`] - the CLI exited non-zero
    /// * [`WizardError::EmptyOutput`] - the CLI printed nothing
    pub fn sdk_version(&self, project_dir: &Path) -> Result<String, WizardError> {
        let dir = path_arg(project_dir);
        let captured = self
            .runner
            .capture(
                self.config.cli(),
                &["project", "sdk-version", "--project-dir", &dir, "--output=text"],
            )?
            .into_success(TOOL)?;
        let version = captured.stdout.trim_end_matches(['\r', '\n']).to_string();
        if version.trim().is_empty() {
            return Err(WizardError::EmptyOutput {
                tool: format!("{TOOL} project sdk-version"),
            });
        }
        debug!(project = %project_dir.display(), sdk = %version, "detected project SDK");
        Ok(version)
    }

    /// Fetches certificates and provisioning profiles.
    ///
    /// Runs `titanium info --types ios --output json`.
    pub fn ios_info(&self) -> Result<IosInfo, WizardError> {
        let captured = self
            .runner
            .capture(
                self.config.cli(),
                &["info", "--types", "ios", "--output", "json"],
            )?
            .into_success(TOOL)?;
        IosInfo::parse(&captured.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRunner;
    use crate::tools::common::Captured;
    use crate::types::SigningTarget;

    #[test]
    fn test_sdk_version_trims_newline() {
        let runner = FakeRunner::new().respond("project sdk-version", Captured::ok("3.2.3.GA\n"));
        let config = WizardConfig::default();
        let cli = TitaniumCli::new(&config, &runner);
        assert_eq!(cli.sdk_version(Path::new("/proj")).unwrap(), "3.2.3.GA");

        let calls = runner.calls();
        assert_eq!(
            calls[0],
            [
                "/usr/local/bin/titanium",
                "project",
                "sdk-version",
                "--project-dir",
                "/proj",
                "--output=text"
            ]
        );
    }

    #[test]
    fn test_sdk_version_empty_is_error() {
        let runner = FakeRunner::new().respond("project sdk-version", Captured::ok("\n"));
        let config = WizardConfig::default();
        let err = TitaniumCli::new(&config, &runner)
            .sdk_version(Path::new("/proj"))
            .unwrap_err();
        assert!(matches!(err, WizardError::EmptyOutput { .. }));
    }

    #[test]
    fn test_sdk_version_failure_is_error() {
        let runner = FakeRunner::new().respond(
            "project sdk-version",
            Captured {
                code: Some(1),
                stdout: String::new(),
                stderr: "Invalid project directory".into(),
            },
        );
        let config = WizardConfig::default();
        let err = TitaniumCli::new(&config, &runner)
            .sdk_version(Path::new("/nowhere"))
            .unwrap_err();
        assert!(err.to_string().contains("Invalid project directory"));
    }

    #[test]
    fn test_ios_info_parses() {
        let runner = FakeRunner::new().respond(
            "info --types ios",
            Captured::ok(r#"{"iosCerts":{"devNames":["Dev"],"distNames":[]}}"#),
        );
        let config = WizardConfig::default();
        let info = TitaniumCli::new(&config, &runner).ios_info().unwrap();
        assert_eq!(info.certificates(SigningTarget::Device), ["Dev"]);
    }
}
