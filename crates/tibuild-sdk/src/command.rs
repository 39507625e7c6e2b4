//! Command assembly for the Titanium CLI.
//!
//! Every path through the wizard ends in one [`CommandLine`]. Build commands
//! share a fixed prefix:
//!
//! ```text
//! <cli> build --sdk <sdk> --project-dir <dir> --no-colors --platform <platform> --log-level <level>
//! ```
//!
//! followed by `--ios-version <v>` when an override is configured, followed by
//! the platform-specific options described by [`BuildOptions`]. The clean
//! command bypasses `build` entirely.

use std::fmt;
use std::path::Path;
use std::process::Command;

use crate::types::{
    AndroidTarget, Choice, DeviceFamily, MobilewebTarget, Platform, SigningTarget, SimType,
    WizardConfig,
};

/// A fully assembled external command: program followed by its arguments.
///
/// Arguments may contain empty strings. The simulator options keep a fixed
/// shape (`--sim-type iphone <display> <height>`) where unused flags are
/// empty; [`CommandLine::to_command`] skips those when spawning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    argv: Vec<String>,
}

impl CommandLine {
    /// Creates a command line from a full argument vector (program first).
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    /// The full argument vector, program first.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The program to run.
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    /// Arguments after the program.
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }

    /// Builds a [`Command`] ready to spawn. Empty arguments are dropped.
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.program());
        cmd.args(self.args().iter().filter(|a| !a.is_empty()));
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for arg in self.argv.iter().filter(|a| !a.is_empty()) {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            if arg.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
                write!(f, "'{}'", arg.replace('\'', r"'\''"))?;
            } else {
                f.write_str(arg)?;
            }
        }
        Ok(())
    }
}

impl From<Vec<String>> for CommandLine {
    fn from(argv: Vec<String>) -> Self {
        Self::new(argv)
    }
}

/// Platform-specific trailing options, one variant per leaf of the decision tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOptions {
    /// `--deploy-type <target>`
    Mobileweb(MobilewebTarget),
    /// `--target <target>` for device and Play Store builds.
    Android(AndroidTarget),
    /// `--avd-id <avd>`
    AndroidEmulator { avd: String },
    /// `--sim-type ...`
    IosSimulator(SimType),
    /// Signed device or distribution build.
    IosSigned {
        target: SigningTarget,
        family: DeviceFamily,
        certificate: String,
        profile_uuid: String,
    },
}

impl BuildOptions {
    /// The platform these options belong to.
    pub fn platform(&self) -> Platform {
        match self {
            BuildOptions::Mobileweb(_) => Platform::Mobileweb,
            BuildOptions::Android(_) | BuildOptions::AndroidEmulator { .. } => Platform::Android,
            BuildOptions::IosSimulator(_) | BuildOptions::IosSigned { .. } => Platform::Ios,
        }
    }

    /// Renders the trailing arguments.
    pub fn to_args(&self, config: &WizardConfig, project_dir: &Path) -> Vec<String> {
        match self {
            BuildOptions::Mobileweb(target) => strings(&["--deploy-type", target.as_str()]),
            BuildOptions::Android(target) => strings(&["--target", target.as_str()]),
            BuildOptions::AndroidEmulator { avd } => strings(&["--avd-id", avd]),
            BuildOptions::IosSimulator(sim) => simulator_args(config, *sim),
            BuildOptions::IosSigned {
                target,
                family,
                certificate,
                profile_uuid,
            } => {
                let mut args = strings(&[
                    "--target",
                    target.as_str(),
                    "--pp-uuid",
                    profile_uuid,
                    "--device-family",
                    family.as_str(),
                ]);
                let identity_flag = if target.is_development() {
                    "--developer-name"
                } else {
                    "--distribution-name"
                };
                args.extend(strings(&[identity_flag, certificate]));
                if *target == SigningTarget::DistAdhoc {
                    args.push("--output-dir".to_string());
                    args.push(path_arg(&project_dir.join("dist")));
                }
                args
            }
        }
    }
}

fn simulator_args(config: &WizardConfig, sim: SimType) -> Vec<String> {
    let (display, height) = match sim {
        SimType::NonRetina => ("", ""),
        SimType::Retina => (config.simulator_display.as_str(), ""),
        SimType::RetinaTall => (
            config.simulator_display.as_str(),
            config.simulator_height.as_str(),
        ),
        SimType::Ipad => {
            return strings(&[
                "--sim-type",
                "ipad",
                "--device-family",
                DeviceFamily::Ipad.as_str(),
            ]);
        }
    };
    strings(&["--sim-type", "iphone", display, height])
}

/// Assembles a `titanium build` command.
///
/// # Example
///
/// ```
/// use tibuild_sdk::command::{build_command, BuildOptions};
/// use tibuild_sdk::{MobilewebTarget, WizardConfig};
/// use std::path::Path;
///
/// let config = WizardConfig::default();
/// let cmd = build_command(
///     &config,
///     "3.2.0.GA",
///     Path::new("/proj"),
///     &BuildOptions::Mobileweb(MobilewebTarget::Production),
/// );
/// assert_eq!(cmd.args()[0], "build");
/// assert_eq!(cmd.argv().last().unwrap(), "production");
/// ```
pub fn build_command(
    config: &WizardConfig,
    sdk: &str,
    project_dir: &Path,
    options: &BuildOptions,
) -> CommandLine {
    let mut argv = vec![
        path_arg(config.cli()),
        "build".to_string(),
        "--sdk".to_string(),
        sdk.to_string(),
        "--project-dir".to_string(),
        path_arg(project_dir),
        "--no-colors".to_string(),
        "--platform".to_string(),
        options.platform().as_str().to_string(),
        "--log-level".to_string(),
        config.log_level.clone(),
    ];
    if let Some(version) = &config.ios_version {
        argv.push("--ios-version".to_string());
        argv.push(version.clone());
    }
    argv.extend(options.to_args(config, project_dir));
    CommandLine::new(argv)
}

/// Assembles `titanium clean --no-colors --project-dir <dir>`.
pub fn clean_command(config: &WizardConfig, project_dir: &Path) -> CommandLine {
    CommandLine::new(vec![
        path_arg(config.cli()),
        "clean".to_string(),
        "--no-colors".to_string(),
        "--project-dir".to_string(),
        path_arg(project_dir),
    ])
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}
