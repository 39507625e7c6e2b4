//! Configuration file support for tibuild.
//!
//! Settings that rarely change between builds (where the Titanium CLI lives,
//! which Android SDK to use, simulator display flags) are kept in a
//! `tibuild.toml` so they don't have to be passed on every run.
//!
//! ## Configuration File Location
//!
//! The configuration file is searched for in the following order:
//! 1. Current working directory (`./tibuild.toml`)
//! 2. Parent directories (up to the repository root or filesystem root)
//!
//! `--config <path>` skips discovery and loads the named file.
//!
//! ## Example Configuration
//!
//! ```toml
//! [titanium]
//! cli = "/usr/local/bin/titanium"
//! log_level = "info"
//! ios_version = "unknown"
//!
//! [android]
//! sdk = "/opt/android-sdk"
//!
//! [simulator]
//! display = "--retina"
//! height = "--tall"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tibuild_sdk::WizardConfig;
use tibuild_sdk::types::IOS_VERSION_UNSET;

/// The default configuration file name.
pub const CONFIG_FILE_NAME: &str = "tibuild.toml";

/// Root configuration structure for `tibuild.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TibuildConfig {
    /// Titanium CLI settings.
    pub titanium: TitaniumSection,

    /// Android SDK settings.
    pub android: AndroidSection,

    /// iOS simulator display flags.
    pub simulator: SimulatorSection,
}

/// Titanium CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitaniumSection {
    /// Path to the `titanium` executable.
    pub cli: PathBuf,

    /// Value passed to `--log-level` on every build.
    pub log_level: String,

    /// iOS version override. `"unknown"` means no override.
    pub ios_version: String,
}

impl Default for TitaniumSection {
    fn default() -> Self {
        let defaults = WizardConfig::default();
        Self {
            cli: defaults.titanium_cli,
            log_level: defaults.log_level,
            ios_version: IOS_VERSION_UNSET.to_string(),
        }
    }
}

/// Android SDK settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AndroidSection {
    /// Android SDK root; the `android` tool is looked up under `tools/`.
    pub sdk: PathBuf,
}

impl Default for AndroidSection {
    fn default() -> Self {
        Self {
            sdk: WizardConfig::default().android_sdk,
        }
    }
}

/// Flags used for the retina simulator variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorSection {
    /// Flag for retina display, used by `retina` and `retina-tall`.
    pub display: String,

    /// Flag for the tall form factor, used by `retina-tall`.
    pub height: String,
}

impl Default for SimulatorSection {
    fn default() -> Self {
        let defaults = WizardConfig::default();
        Self {
            display: defaults.simulator_display,
            height: defaults.simulator_height,
        }
    }
}

impl TibuildConfig {
    /// Loads configuration from the specified file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: TibuildConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Attempts to find and load configuration starting from the specified directory.
    ///
    /// # Returns
    ///
    /// * `Ok(Some((config, path)))` - Found and loaded configuration with its path
    /// * `Ok(None)` - No configuration file found
    /// * `Err` - If a config file was found but couldn't be parsed
    pub fn discover_from(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.is_file() {
                let config = Self::load_from_file(&config_path)?;
                return Ok(Some((config, config_path)));
            }

            // Stop at repository root or filesystem root
            if current.join(".git").exists() || !current.pop() {
                break;
            }
        }

        Ok(None)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Generates a starter configuration file as a formatted TOML string,
    /// with a comment on every setting.
    pub fn generate_starter_toml() -> String {
        let defaults = TibuildConfig::default();
        format!(
            r#"# tibuild configuration file
# CLI flags override these settings when provided.

[titanium]
# Path to the Titanium CLI
cli = "{cli}"

# Log level passed to `titanium build --log-level`
log_level = "{log_level}"

# iOS version to build against; "{unset}" lets Titanium pick
ios_version = "{unset}"

[android]
# Android SDK root (the AVD list comes from <sdk>/tools/android)
sdk = "{sdk}"

[simulator]
# Flag added for the retina and retina-tall simulators
display = "{display}"

# Flag added for the retina-tall simulator
height = "{height}"
"#,
            cli = defaults.titanium.cli.display(),
            log_level = defaults.titanium.log_level,
            unset = IOS_VERSION_UNSET,
            sdk = defaults.android.sdk.display(),
            display = defaults.simulator.display,
            height = defaults.simulator.height,
        )
    }

    /// Converts file settings into the wizard's runtime configuration.
    pub fn to_wizard_config(&self) -> WizardConfig {
        WizardConfig {
            titanium_cli: self.titanium.cli.clone(),
            android_sdk: self.android.sdk.clone(),
            log_level: self.titanium.log_level.clone(),
            simulator_display: self.simulator.display.clone(),
            simulator_height: self.simulator.height.clone(),
            ios_version: None,
        }
        .ios_version(self.titanium.ios_version.as_str())
    }
}

/// Values given on the command line. `None` keeps the file value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub cli: Option<PathBuf>,
    pub android_sdk: Option<PathBuf>,
    pub log_level: Option<String>,
    pub ios_version: Option<String>,
}

/// Configuration resolver that merges config file values with CLI arguments.
///
/// CLI arguments always take precedence over config file values.
#[derive(Debug, Default)]
pub struct ConfigResolver {
    /// Loaded configuration, if any.
    pub config: Option<TibuildConfig>,

    /// Path to the loaded config file, if any.
    pub config_path: Option<PathBuf>,
}

impl ConfigResolver {
    /// Loads the explicit config file when given, otherwise discovers one
    /// starting from `cwd`.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            let config = TibuildConfig::load_from_file(path)?;
            return Ok(Self {
                config: Some(config),
                config_path: Some(path.to_path_buf()),
            });
        }

        match TibuildConfig::discover_from(cwd)? {
            Some((config, path)) => Ok(Self {
                config: Some(config),
                config_path: Some(path),
            }),
            None => Ok(Self::default()),
        }
    }

    /// File settings with CLI overrides applied, as a plain config.
    pub fn merged(&self, overrides: &CliOverrides) -> TibuildConfig {
        let mut config = self.config.clone().unwrap_or_default();
        if let Some(cli) = &overrides.cli {
            config.titanium.cli = cli.clone();
        }
        if let Some(level) = &overrides.log_level {
            config.titanium.log_level = level.clone();
        }
        if let Some(version) = &overrides.ios_version {
            config.titanium.ios_version = version.clone();
        }
        if let Some(sdk) = &overrides.android_sdk {
            config.android.sdk = sdk.clone();
        }
        config
    }

    /// Resolves the wizard configuration: CLI over file over defaults.
    pub fn resolve(&self, overrides: &CliOverrides) -> WizardConfig {
        self.merged(overrides).to_wizard_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = TibuildConfig::default();
        assert_eq!(config.titanium.cli, PathBuf::from("/usr/local/bin/titanium"));
        assert_eq!(config.titanium.log_level, "info");
        assert_eq!(config.titanium.ios_version, "unknown");
        assert_eq!(config.android.sdk, PathBuf::from("/opt/android-sdk"));
        assert_eq!(config.simulator.display, "--retina");
        assert_eq!(config.simulator.height, "--tall");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: TibuildConfig = toml::from_str(
            r#"
[android]
sdk = "/Users/me/android-sdk"
"#,
        )
        .unwrap();
        assert_eq!(config.android.sdk, PathBuf::from("/Users/me/android-sdk"));
        assert_eq!(config.titanium, TitaniumSection::default());
    }

    #[test]
    fn test_starter_toml_parses_to_defaults() {
        let toml_str = TibuildConfig::generate_starter_toml();
        let parsed: TibuildConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, TibuildConfig::default());
        assert!(toml_str.contains("[simulator]"));
    }

    #[test]
    fn test_to_toml_round_trips() {
        let mut config = TibuildConfig::default();
        config.titanium.ios_version = "7.1".into();
        let parsed: TibuildConfig = toml::from_str(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_discover_walks_up() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("apps").join("MyApp");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[titanium]\nlog_level = \"trace\"\n",
        )
        .unwrap();

        let (config, path) = TibuildConfig::discover_from(&nested).unwrap().unwrap();
        assert_eq!(path, temp_dir.path().join(CONFIG_FILE_NAME));
        assert_eq!(config.titanium.log_level, "trace");
    }

    #[test]
    fn test_discover_stops_at_git_root() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        let repo = temp_dir.path().join("repo");
        std::fs::create_dir_all(repo.join(".git")).unwrap();

        assert!(TibuildConfig::discover_from(&repo).unwrap().is_none());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[titanium\n").unwrap();
        let err = TibuildConfig::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_explicit_path_skips_discovery() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[titanium]\nlog_level = \"debug\"\n",
        )
        .unwrap();
        let explicit = temp_dir.path().join("other.toml");
        std::fs::write(&explicit, "[titanium]\nlog_level = \"error\"\n").unwrap();

        let resolver = ConfigResolver::load(Some(explicit.as_path()), temp_dir.path()).unwrap();
        assert_eq!(resolver.config_path.as_deref(), Some(explicit.as_path()));
        assert_eq!(resolver.resolve(&CliOverrides::default()).log_level, "error");
    }

    #[test]
    fn test_cli_overrides_file() {
        let resolver = ConfigResolver {
            config: Some(
                toml::from_str(
                    r#"
[titanium]
cli = "/opt/ti"
log_level = "debug"
ios_version = "7.0"

[android]
sdk = "/from/file"
"#,
                )
                .unwrap(),
            ),
            config_path: None,
        };
        let overrides = CliOverrides {
            android_sdk: Some(PathBuf::from("/from/flag")),
            ios_version: Some("7.1".into()),
            ..CliOverrides::default()
        };

        let config = resolver.resolve(&overrides);
        assert_eq!(config.titanium_cli, PathBuf::from("/opt/ti"));
        assert_eq!(config.android_sdk, PathBuf::from("/from/flag"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.ios_version.as_deref(), Some("7.1"));
    }

    #[test]
    fn test_unknown_ios_version_means_no_override() {
        let resolver = ConfigResolver::default();
        assert_eq!(resolver.resolve(&CliOverrides::default()).ios_version, None);

        let overrides = CliOverrides {
            ios_version: Some("unknown".into()),
            ..CliOverrides::default()
        };
        assert_eq!(resolver.resolve(&overrides).ios_version, None);
    }
}
