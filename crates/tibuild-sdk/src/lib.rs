//! Build wizard core for Titanium mobile projects
//!
//! `tibuild-sdk` turns a short series of menu choices into one invocation of
//! the Titanium CLI. It knows the decision tree (platform, target, simulator
//! type, signing identity, provisioning profile), queries the toolchain for
//! the dynamic choices, and assembles the final `titanium build` or
//! `titanium clean` command line.
//!
//! The crate has no terminal or process dependencies of its own at the
//! seams: prompts go through [`Prompter`], tool queries through
//! [`ToolRunner`], and the final command through [`Executor`]. The `tibuild`
//! CLI provides terminal implementations; [`testing`] provides scripted ones.
//!
//! # Example
//!
//! ```
//! use tibuild_sdk::testing::{FakeRunner, RecordingExecutor, ScriptedPrompter};
//! use tibuild_sdk::tools::Captured;
//! use tibuild_sdk::{Outcome, Wizard, WizardConfig};
//! use std::path::PathBuf;
//!
//! let runner = FakeRunner::new().respond("project sdk-version", Captured::ok("3.2.3.GA\n"));
//! let mut wizard = Wizard::new(WizardConfig::default(), runner);
//! let mut prompter = ScriptedPrompter::new([Some("mobileweb"), Some("production")]);
//! let mut executor = RecordingExecutor::default();
//!
//! let outcome = wizard
//!     .run_session(vec![PathBuf::from("/proj")], &mut prompter, &mut executor)
//!     .unwrap();
//! assert!(matches!(outcome, Outcome::Dispatched(_)));
//! assert_eq!(wizard.most_recent(), Some(&executor.executed[0]));
//! ```
//!
//! # Modules
//!
//! - [`wizard`] - The state machine and session driver
//! - [`command`] - Command line assembly
//! - [`tools`] - Titanium CLI and Android SDK adapters, iOS info schema
//! - [`dispatch`] - Running (or printing) the final command
//! - [`workspace`] - Project folder discovery
//! - [`types`] - Choices, configuration and errors

pub mod command;
pub mod dispatch;
pub mod testing;
pub mod tools;
pub mod types;
pub mod wizard;
pub mod workspace;

pub use command::{BuildOptions, CommandLine};
pub use dispatch::{DryRunExecutor, Executor, ProcessExecutor};
pub use tools::{ProcessRunner, ProvisioningProfile, ToolRunner};
pub use types::{
    AndroidTarget, Choice, DeviceFamily, IosTarget, MobilewebTarget, Platform, SigningTarget,
    SimType, WizardConfig, WizardError,
};
pub use wizard::{Dispatch, DispatchKind, Outcome, Prompter, Session, State, Transition, Wizard};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
