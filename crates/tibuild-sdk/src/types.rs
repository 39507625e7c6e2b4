//! Core types for tibuild-sdk.
//!
//! This module defines the fundamental types used throughout the SDK:
//!
//! - [`WizardError`] - Error types for tool invocations and wizard sessions
//! - [`Platform`] - Top-level platform choice (Android, iOS, Mobile Web)
//! - [`AndroidTarget`] / [`IosTarget`] / [`MobilewebTarget`] - Per-platform build targets
//! - [`SimType`] / [`DeviceFamily`] / [`SigningTarget`] - iOS sub-choices
//! - [`WizardConfig`] - Resolved toolchain configuration

use std::path::{Path, PathBuf};

/// Error types for tibuild-sdk operations.
///
/// Every variant that wraps an external tool names the tool, so the message
/// can be shown to the user as-is.
///
/// # Example
///
/// ```ignore
/// use tibuild_sdk::{Wizard, WizardError};
///
/// match wizard.run_session(&mut prompter, &mut executor) {
///     Ok(outcome) => println!("{outcome:?}"),
///     Err(WizardError::NoProject) => eprintln!("ERROR: Must have a project open"),
///     Err(e) => eprintln!("Session failed: {e}"),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    /// No project folder could be found.
    #[error("no Titanium project found. Open a folder containing tiapp.xml or pass project folders explicitly")]
    NoProject,

    /// An external program could not be started.
    #[error("failed to start {tool}: {source}. Check the path in tibuild.toml or on the command line")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// An external program exited unsuccessfully.
    #[error("{tool} failed ({status})\n\nStderr:\n{stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// An external program succeeded but printed nothing where a value was expected.
    #[error("{tool} produced no output")]
    EmptyOutput { tool: String },

    /// Tool output was not the JSON document we expected.
    #[error("could not parse tool output: {0}")]
    Parse(#[from] serde_json::Error),

    /// A dynamically enumerated list turned out to be empty.
    #[error("no {what} available to choose from")]
    NothingToChoose { what: String },

    /// A prompt returned an index outside the offered options.
    #[error("selection {index} is out of range ({len} options)")]
    InvalidSelection { index: usize, len: usize },

    /// The interactive prompt itself failed.
    #[error("prompt failed: {0}")]
    Prompt(String),

    /// Invalid or inconsistent configuration.
    #[error("configuration error: {0}. Check tibuild.toml or CLI flags")]
    Config(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A fixed set of options offered at one step of the wizard.
///
/// Implementors list their variants in prompt order and map each variant to
/// the label shown to the user, which is also the value passed to the
/// Titanium CLI.
pub trait Choice: Copy + Sized + 'static {
    /// All variants, in the order they are offered.
    const ALL: &'static [Self];

    /// The label and CLI value for this variant.
    fn as_str(&self) -> &'static str;

    /// Labels for every variant, in prompt order.
    fn labels() -> Vec<String> {
        Self::ALL.iter().map(|c| c.as_str().to_string()).collect()
    }

    /// Looks up a variant by its label.
    fn parse(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == label)
    }
}

/// Target platform passed to `titanium build --platform`.
///
/// # Example
///
/// ```
/// use tibuild_sdk::{Choice, Platform};
///
/// assert_eq!(Platform::Mobileweb.as_str(), "mobileweb");
/// assert_eq!(Platform::parse("ios"), Some(Platform::Ios));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Mobileweb,
}

impl Choice for Platform {
    const ALL: &'static [Self] = &[Platform::Android, Platform::Ios, Platform::Mobileweb];

    fn as_str(&self) -> &'static str {
        match self {
            Platform::Android => "android",
            Platform::Ios => "ios",
            Platform::Mobileweb => "mobileweb",
        }
    }
}

/// Android build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AndroidTarget {
    /// Run on an emulator; requires choosing an AVD.
    Emulator,
    Device,
    DistPlaystore,
}

impl Choice for AndroidTarget {
    const ALL: &'static [Self] = &[
        AndroidTarget::Emulator,
        AndroidTarget::Device,
        AndroidTarget::DistPlaystore,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            AndroidTarget::Emulator => "emulator",
            AndroidTarget::Device => "device",
            AndroidTarget::DistPlaystore => "dist-playstore",
        }
    }
}

/// iOS build targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IosTarget {
    Simulator,
    Device,
    DistAppstore,
    DistAdhoc,
}

impl IosTarget {
    /// The signing flavour for targets that need a certificate and profile.
    ///
    /// Returns `None` for the simulator.
    pub fn signing(&self) -> Option<SigningTarget> {
        match self {
            IosTarget::Simulator => None,
            IosTarget::Device => Some(SigningTarget::Device),
            IosTarget::DistAppstore => Some(SigningTarget::DistAppstore),
            IosTarget::DistAdhoc => Some(SigningTarget::DistAdhoc),
        }
    }
}

impl Choice for IosTarget {
    const ALL: &'static [Self] = &[
        IosTarget::Simulator,
        IosTarget::Device,
        IosTarget::DistAppstore,
        IosTarget::DistAdhoc,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            IosTarget::Simulator => "simulator",
            IosTarget::Device => "device",
            IosTarget::DistAppstore => "dist-appstore",
            IosTarget::DistAdhoc => "dist-adhoc",
        }
    }
}

/// iOS targets that require a signing certificate and provisioning profile.
///
/// The target decides which certificate category and which provisioning
/// profile category are offered:
///
/// | Target | Certificates | Profiles |
/// |--------|--------------|----------|
/// | `device` | `devNames` | `development` |
/// | `dist-appstore` | `distNames` | `distribution` |
/// | `dist-adhoc` | `distNames` | `adhoc` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningTarget {
    Device,
    DistAppstore,
    DistAdhoc,
}

impl SigningTarget {
    /// Whether this target signs with a developer (rather than distribution) identity.
    pub fn is_development(&self) -> bool {
        matches!(self, SigningTarget::Device)
    }
}

impl Choice for SigningTarget {
    const ALL: &'static [Self] = &[
        SigningTarget::Device,
        SigningTarget::DistAppstore,
        SigningTarget::DistAdhoc,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            SigningTarget::Device => "device",
            SigningTarget::DistAppstore => "dist-appstore",
            SigningTarget::DistAdhoc => "dist-adhoc",
        }
    }
}

/// iOS simulator flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimType {
    /// iPhone 4 class display, no extra flags.
    NonRetina,
    Retina,
    RetinaTall,
    Ipad,
}

impl Choice for SimType {
    const ALL: &'static [Self] = &[
        SimType::NonRetina,
        SimType::Retina,
        SimType::RetinaTall,
        SimType::Ipad,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            SimType::NonRetina => "non-retina",
            SimType::Retina => "retina",
            SimType::RetinaTall => "retina-tall",
            SimType::Ipad => "ipad",
        }
    }
}

/// iOS device families passed to `--device-family`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceFamily {
    Iphone,
    Ipad,
    Universal,
}

impl Choice for DeviceFamily {
    const ALL: &'static [Self] = &[DeviceFamily::Iphone, DeviceFamily::Ipad, DeviceFamily::Universal];

    fn as_str(&self) -> &'static str {
        match self {
            DeviceFamily::Iphone => "iphone",
            DeviceFamily::Ipad => "ipad",
            DeviceFamily::Universal => "universal",
        }
    }
}

/// Mobile Web deploy types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MobilewebTarget {
    Development,
    Production,
}

impl Choice for MobilewebTarget {
    const ALL: &'static [Self] = &[MobilewebTarget::Development, MobilewebTarget::Production];

    fn as_str(&self) -> &'static str {
        match self {
            MobilewebTarget::Development => "development",
            MobilewebTarget::Production => "production",
        }
    }
}

/// Sentinel value meaning "no iOS version override".
pub const IOS_VERSION_UNSET: &str = "unknown";

/// Relative path of the legacy `android` tool inside an Android SDK root.
pub const ANDROID_TOOL_PATH: &str = "tools/android";

/// Values the Titanium CLI accepts for `--log-level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Resolved toolchain configuration for one wizard run.
///
/// Built once (by the CLI from `tibuild.toml` and flags) and read-only
/// afterwards.
///
/// # Example
///
/// ```
/// use tibuild_sdk::WizardConfig;
/// use std::path::Path;
///
/// let config = WizardConfig::default().ios_version("unknown");
/// assert_eq!(config.ios_version, None);
/// assert_eq!(config.android_tool(), Path::new("/opt/android-sdk/tools/android"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// Path to the Titanium CLI executable.
    pub titanium_cli: PathBuf,
    /// Android SDK root directory.
    pub android_sdk: PathBuf,
    /// Value passed to `--log-level`.
    pub log_level: String,
    /// Flag emitted for retina simulators (e.g. `--retina`).
    pub simulator_display: String,
    /// Flag emitted for tall simulators (e.g. `--tall`).
    pub simulator_height: String,
    /// Optional `--ios-version` override.
    pub ios_version: Option<String>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            titanium_cli: PathBuf::from("/usr/local/bin/titanium"),
            android_sdk: PathBuf::from("/opt/android-sdk"),
            log_level: "info".to_string(),
            simulator_display: "--retina".to_string(),
            simulator_height: "--tall".to_string(),
            ios_version: None,
        }
    }
}

impl WizardConfig {
    /// Sets the iOS version override, normalising the `"unknown"` sentinel
    /// and blank values to no override.
    pub fn ios_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        let trimmed = version.trim();
        self.ios_version = if trimmed.is_empty() || trimmed == IOS_VERSION_UNSET {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Path to the Android SDK `android` tool.
    pub fn android_tool(&self) -> PathBuf {
        self.android_sdk.join(ANDROID_TOOL_PATH)
    }

    /// Path to the Titanium CLI.
    pub fn cli(&self) -> &Path {
        &self.titanium_cli
    }

    /// Checks values that would otherwise only fail once a build is running.
    pub fn validate(&self) -> Result<(), WizardError> {
        if self.titanium_cli.as_os_str().is_empty() {
            return Err(WizardError::Config("titanium CLI path is empty".to_string()));
        }
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(WizardError::Config(format!(
                "log level `{}` is not one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }
}
