//! Android SDK queries
//!
//! Uses the legacy `tools/android` script from the configured SDK root to
//! enumerate Android Virtual Devices for emulator builds.

use tracing::debug;

use super::common::ToolRunner;
use crate::types::{WizardConfig, WizardError};

const TOOL: &str = "android";

/// Lists AVD identifiers with `android list avd -c`.
///
/// The compact listing prints one identifier per line; the output is split on
/// any whitespace, so identifiers must not contain spaces.
pub fn list_avds(config: &WizardConfig, runner: &dyn ToolRunner) -> Result<Vec<String>, WizardError> {
    let tool = config.android_tool();
    let captured = runner
        .capture(&tool, &["list", "avd", "-c"])?
        .into_success(TOOL)?;
    let avds: Vec<String> = captured
        .stdout
        .split_whitespace()
        .map(str::to_string)
        .collect();
    debug!(count = avds.len(), "listed Android virtual devices");
    Ok(avds)
}
