//! # tibuild
//!
//! Interactive build wizard for Titanium mobile projects.
//!
//! ## Overview
//!
//! `tibuild` walks you through a short series of menus (project folder,
//! platform, target, simulator or signing identity) and then runs the matching
//! `titanium build` command. The last build is remembered for the rest of the
//! session loop and offered as "most recent configuration" so a rebuild is one
//! keystroke away.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a starter config next to your projects
//! tibuild init
//!
//! # Start the wizard in a Titanium project (or a folder of projects)
//! tibuild
//!
//! # See what would run without running it
//! tibuild --dry-run wizard path/to/MyApp --once
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `wizard` | Interactive build loop (default) |
//! | `init` | Write a starter `tibuild.toml` |
//! | `config` | Print the resolved configuration |
//! | `avds` | List Android virtual devices |
//! | `signing` | List iOS certificates and profiles for a target |
//!
//! ## Global Flags
//!
//! - `--dry-run` - Print build commands instead of running them
//! - `--verbose` / `-v` - Debug logging, including every tool invocation
//! - `--config <path>` - Use this config file instead of discovering one
//! - `--cli`, `--android-sdk`, `--log-level`, `--ios-version` - Override config values

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use tibuild_sdk::tools::{ProcessRunner, TitaniumCli, list_avds};
use tibuild_sdk::workspace::resolve_folders;
use tibuild_sdk::{
    Choice, DispatchKind, DryRunExecutor, Executor, Outcome, ProcessExecutor, SigningTarget, Wizard,
    WizardConfig, WizardError,
};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
mod prompt;

use config::{CONFIG_FILE_NAME, CliOverrides, ConfigResolver, TibuildConfig};
use prompt::TerminalPrompter;

/// Interactive build wizard for Titanium mobile projects.
#[derive(Parser, Debug)]
#[command(name = "tibuild", author, version, about = "Interactive build wizard for Titanium mobile projects", long_about = None)]
struct Cli {
    /// Print build commands instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print verbose output including all tool invocations
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Config file to use instead of discovering tibuild.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the Titanium CLI
    #[arg(long = "cli", global = true)]
    titanium_cli: Option<PathBuf>,

    /// Android SDK root directory
    #[arg(long, global = true)]
    android_sdk: Option<PathBuf>,

    /// Log level passed to `titanium build`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// iOS version to build against ("unknown" for none)
    #[arg(long, global = true)]
    ios_version: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            cli: self.titanium_cli.clone(),
            android_sdk: self.android_sdk.clone(),
            log_level: self.log_level.clone(),
            ios_version: self.ios_version.clone(),
        }
    }
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Run the interactive build wizard.
    Wizard {
        /// Project folders to choose from (default: current directory or its children)
        folders: Vec<PathBuf>,
        /// Run a single session instead of looping
        #[arg(long)]
        once: bool,
    },
    /// Write a starter config file.
    Init {
        #[arg(long, default_value = CONFIG_FILE_NAME)]
        output: PathBuf,
    },
    /// Print the resolved configuration as TOML.
    Config,
    /// List the Android virtual devices known to the SDK.
    Avds,
    /// List the certificates and provisioning profiles offered for an iOS target.
    Signing {
        #[arg(long, value_enum)]
        target: SigningTargetArg,
    },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum SigningTargetArg {
    /// Development build on a connected device
    Device,
    /// App Store distribution
    DistAppstore,
    /// Ad hoc distribution
    DistAdhoc,
}

impl From<SigningTargetArg> for SigningTarget {
    fn from(arg: SigningTargetArg) -> Self {
        match arg {
            SigningTargetArg::Device => SigningTarget::Device,
            SigningTargetArg::DistAppstore => SigningTarget::DistAppstore,
            SigningTargetArg::DistAdhoc => SigningTarget::DistAdhoc,
        }
    }
}

pub fn run() -> Result<()> {
    let mut cli = Cli::parse();
    init_logging(cli.verbose);

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let overrides = cli.overrides();
    let command = cli.command.take().unwrap_or(Command::Wizard {
        folders: Vec::new(),
        once: false,
    });

    match command {
        Command::Init { output } => write_starter_config(&output, cli.dry_run),
        Command::Wizard { folders, once } => {
            let config = resolve_config(cli.config.as_deref(), &cwd, &overrides)?;
            run_wizard(config, &folders, once, cli.dry_run, &cwd)
        }
        Command::Config => {
            let resolver = load_config(cli.config.as_deref(), &cwd)?;
            match &resolver.config_path {
                Some(path) => println!("# Loaded from {}", path.display()),
                None => println!("# No {CONFIG_FILE_NAME} found; showing defaults"),
            }
            print!("{}", resolver.merged(&overrides).to_toml()?);
            Ok(())
        }
        Command::Avds => {
            let config = resolve_config(cli.config.as_deref(), &cwd, &overrides)?;
            let avds = list_avds(&config, &ProcessRunner)
                .context("Failed to list Android virtual devices")?;
            if avds.is_empty() {
                println!("No Android virtual devices found under {:?}", config.android_sdk);
            }
            for avd in avds {
                println!("{avd}");
            }
            Ok(())
        }
        Command::Signing { target } => {
            let config = resolve_config(cli.config.as_deref(), &cwd, &overrides)?;
            print_signing(&config, target.into())
        }
    }
}

fn resolve_config(
    explicit: Option<&Path>,
    cwd: &Path,
    overrides: &CliOverrides,
) -> Result<WizardConfig> {
    let config = load_config(explicit, cwd)?.resolve(overrides);
    config.validate()?;
    Ok(config)
}

fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<ConfigResolver> {
    let resolver = ConfigResolver::load(explicit, cwd)?;
    match &resolver.config_path {
        Some(path) => debug!(path = %path.display(), "loaded config"),
        None => debug!("no {CONFIG_FILE_NAME} found, using defaults"),
    }
    Ok(resolver)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A subscriber may already be installed when embedded; keep the existing one.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn write_starter_config(path: &Path, dry_run: bool) -> Result<()> {
    if dry_run {
        println!("[dry-run] would write starter config to {:?}", path);
        return Ok(());
    }
    ensure_can_write(path)?;
    fs::write(path, TibuildConfig::generate_starter_toml())
        .with_context(|| format!("writing config {:?}", path))?;
    println!("Wrote starter config to {:?}", path);
    Ok(())
}

fn print_signing(config: &WizardConfig, target: SigningTarget) -> Result<()> {
    let info = TitaniumCli::new(config, &ProcessRunner)
        .ios_info()
        .context("Failed to read iOS signing information")?;
    let choices = info.choices_for(target);

    println!("Certificates for {}:", target.as_str());
    if choices.certificates.is_empty() {
        println!("  (none)");
    }
    for cert in &choices.certificates {
        println!("  {cert}");
    }

    println!("Provisioning profiles for {}:", target.as_str());
    if choices.profiles.is_empty() {
        println!("  (none)");
    }
    for profile in &choices.profiles {
        println!("  {} ({})", profile.name, profile.uuid);
    }
    Ok(())
}

/// Runs wizard sessions until the user stops. The same [`Wizard`] is reused so
/// the most recent build stays available between sessions.
fn run_wizard(
    config: WizardConfig,
    folders: &[PathBuf],
    once: bool,
    dry_run: bool,
    cwd: &Path,
) -> Result<()> {
    let mut wizard = Wizard::new(config, ProcessRunner);
    let mut prompter = TerminalPrompter::new();
    let mut executor: Box<dyn Executor> = if dry_run {
        Box::new(DryRunExecutor)
    } else {
        Box::new(ProcessExecutor)
    };

    loop {
        let candidates = match resolve_folders(folders, cwd) {
            Ok(candidates) => candidates,
            Err(WizardError::NoProject) => {
                eprintln!("ERROR: Must have a project open");
                return Err(WizardError::NoProject.into());
            }
            Err(e) => return Err(e.into()),
        };

        match wizard.run_session(candidates, &mut prompter, executor.as_mut()) {
            Ok(Outcome::Dispatched(dispatch)) => report(dispatch.kind, dry_run),
            Ok(Outcome::Aborted) => println!("Cancelled."),
            Err(e) => eprintln!("ERROR: {e}"),
        }

        if once || !prompter.another_build()? {
            break;
        }
    }
    Ok(())
}

fn report(kind: DispatchKind, dry_run: bool) {
    if dry_run {
        return;
    }
    match kind {
        DispatchKind::Build => println!("Build finished."),
        DispatchKind::Replay => println!("Rebuild finished."),
        DispatchKind::Clean => println!("Clean finished."),
    }
}

fn ensure_can_write(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("refusing to overwrite existing file: {:?}", path);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating parent directory {:?}", parent))?;
    }
    Ok(())
}
