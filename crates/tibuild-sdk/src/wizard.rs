//! The build wizard state machine.
//!
//! A session walks one path through this tree, prompting at every node:
//!
//! ```text
//! ChooseFolder (only with 2+ folders)
//!  └─ ChoosePlatform
//!      ├─ clean ─────────────────────────────────────────────► dispatch clean
//!      ├─ most recent configuration ─────────────────────────► replay cached build
//!      ├─ android ─ ChooseAndroidTarget
//!      │             ├─ emulator ─ (list AVDs) ─ ChooseAvd ───► build
//!      │             └─ device | dist-playstore ─────────────► build
//!      ├─ ios ───── ChooseIosTarget
//!      │             ├─ simulator ─ ChooseSimType ───────────► build
//!      │             └─ device | dist-* ─ ChooseDeviceFamily
//!      │                  └─ (fetch iOS info) ─ ChooseCertificate ─ ChooseProfile ─► build
//!      └─ mobileweb ─ ChooseMobilewebTarget ─────────────────► build
//! ```
//!
//! [`Wizard::advance`] is the transition function: it takes the current
//! [`State`] and the user's selection and returns the next state, a command
//! to dispatch, or an abort. Dismissing any prompt aborts the session without
//! touching the most-recent store.
//!
//! The most recent build command is kept on the [`Wizard`] value, so a front
//! end that runs several sessions with one `Wizard` can offer it for replay.
//! It is offered at the folder prompt when there are several folders, or at
//! the platform prompt when there is exactly one, never at both.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::command::{BuildOptions, CommandLine, build_command, clean_command};
use crate::dispatch::Executor;
use crate::tools::android::list_avds;
use crate::tools::common::ToolRunner;
use crate::tools::ios::{ProvisioningProfile, SigningChoices};
use crate::tools::titanium::TitaniumCli;
use crate::types::{
    AndroidTarget, Choice, DeviceFamily, IosTarget, MobilewebTarget, Platform, SigningTarget,
    SimType, WizardConfig, WizardError,
};
use crate::workspace::display_name;

/// Label of the replay option.
pub const MOST_RECENT: &str = "most recent configuration";

/// Label of the clean option on the platform prompt.
pub const CLEAN: &str = "clean";

/// Presents a list of options and returns the chosen index.
///
/// `Ok(None)` means the user dismissed the prompt.
pub trait Prompter {
    fn select(&mut self, prompt: &str, options: &[String]) -> Result<Option<usize>, WizardError>;
}

/// A decision point in the wizard. Each state knows the options it offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    ChooseFolder {
        folders: Vec<PathBuf>,
        offer_recent: bool,
    },
    ChoosePlatform {
        offer_recent: bool,
    },
    ChooseAndroidTarget,
    ChooseAvd {
        avds: Vec<String>,
    },
    ChooseIosTarget,
    ChooseSimType,
    ChooseDeviceFamily {
        target: SigningTarget,
    },
    ChooseCertificate {
        target: SigningTarget,
        family: DeviceFamily,
        choices: SigningChoices,
    },
    ChooseProfile {
        target: SigningTarget,
        family: DeviceFamily,
        certificate: String,
        profiles: Vec<ProvisioningProfile>,
    },
    ChooseMobilewebTarget,
}

impl State {
    /// Prompt text for this state.
    pub fn prompt(&self) -> &'static str {
        match self {
            State::ChooseFolder { .. } => "Project folder",
            State::ChoosePlatform { .. } => "Platform",
            State::ChooseAndroidTarget => "Android target",
            State::ChooseAvd { .. } => "Android virtual device",
            State::ChooseIosTarget => "iOS target",
            State::ChooseSimType => "Simulator type",
            State::ChooseDeviceFamily { .. } => "Device family",
            State::ChooseCertificate { .. } => "Signing certificate",
            State::ChooseProfile { .. } => "Provisioning profile",
            State::ChooseMobilewebTarget => "Deploy type",
        }
    }

    /// Option labels, in the order they are offered.
    pub fn options(&self) -> Vec<String> {
        match self {
            State::ChooseFolder {
                folders,
                offer_recent,
            } => with_recent(
                *offer_recent,
                folders.iter().map(|f| display_name(f)).collect(),
            ),
            State::ChoosePlatform { offer_recent } => {
                let mut options = Platform::labels();
                options.push(CLEAN.to_string());
                with_recent(*offer_recent, options)
            }
            State::ChooseAndroidTarget => AndroidTarget::labels(),
            State::ChooseAvd { avds } => avds.clone(),
            State::ChooseIosTarget => IosTarget::labels(),
            State::ChooseSimType => SimType::labels(),
            State::ChooseDeviceFamily { .. } => DeviceFamily::labels(),
            State::ChooseCertificate { choices, .. } => choices.certificates.clone(),
            State::ChooseProfile { profiles, .. } => profiles
                .iter()
                .map(|p| format!("{} ({})", p.name, p.uuid))
                .collect(),
            State::ChooseMobilewebTarget => MobilewebTarget::labels(),
        }
    }
}

fn with_recent(offer_recent: bool, mut options: Vec<String>) -> Vec<String> {
    if offer_recent {
        options.insert(0, MOST_RECENT.to_string());
    }
    options
}

/// Maps a selection on a prompt that may lead with the replay option to an
/// index into the underlying items. `None` means replay was chosen.
fn item_index(offer_recent: bool, index: usize) -> Option<usize> {
    match (offer_recent, index) {
        (true, 0) => None,
        (true, i) => Some(i - 1),
        (false, i) => Some(i),
    }
}

/// What a dispatched command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchKind {
    /// A freshly assembled `titanium build`; becomes the most recent command.
    Build,
    /// `titanium clean`; never cached.
    Clean,
    /// The cached most recent command, run again as-is.
    Replay,
}

/// A command ready to hand to an [`Executor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub kind: DispatchKind,
    pub command: CommandLine,
}

/// Result of one call to [`Wizard::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Next(State),
    Dispatch(Dispatch),
    Aborted,
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Dispatched(Dispatch),
    Aborted,
}

/// Choices accumulated during one session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    project_dir: Option<PathBuf>,
    sdk: Option<String>,
}

impl Session {
    /// The chosen project folder, once known.
    pub fn project_dir(&self) -> Option<&Path> {
        self.project_dir.as_deref()
    }

    /// The detected SDK version, once a build command has been assembled.
    pub fn sdk(&self) -> Option<&str> {
        self.sdk.as_deref()
    }

    fn require_project_dir(&self) -> Result<PathBuf, WizardError> {
        self.project_dir.clone().ok_or(WizardError::NoProject)
    }
}

/// Drives sessions and owns the most-recent command store.
pub struct Wizard {
    config: WizardConfig,
    runner: Box<dyn ToolRunner>,
    most_recent: Option<CommandLine>,
}

impl Wizard {
    /// Creates a wizard with an empty most-recent store.
    pub fn new(config: WizardConfig, runner: impl ToolRunner + 'static) -> Self {
        Self {
            config,
            runner: Box::new(runner),
            most_recent: None,
        }
    }

    /// Seeds the most-recent store.
    pub fn with_most_recent(mut self, command: CommandLine) -> Self {
        self.most_recent = Some(command);
        self
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    /// The last build command assembled by this wizard, if any.
    pub fn most_recent(&self) -> Option<&CommandLine> {
        self.most_recent.as_ref()
    }

    /// Starts a session over the given candidate folders.
    ///
    /// With one folder the folder prompt is skipped and the session starts at
    /// the platform prompt.
    pub fn begin(&self, folders: Vec<PathBuf>) -> Result<(Session, State), WizardError> {
        let offer_recent = self.most_recent.is_some();
        match folders.len() {
            0 => Err(WizardError::NoProject),
            1 => {
                let session = Session {
                    project_dir: folders.into_iter().next(),
                    sdk: None,
                };
                Ok((session, State::ChoosePlatform { offer_recent }))
            }
            _ => Ok((
                Session::default(),
                State::ChooseFolder {
                    folders,
                    offer_recent,
                },
            )),
        }
    }

    /// Applies one selection to the current state.
    ///
    /// `None` aborts the session. Tool queries (AVDs, iOS info, SDK version)
    /// run inside the transition that needs them.
    pub fn advance(
        &mut self,
        session: &mut Session,
        state: State,
        selection: Option<usize>,
    ) -> Result<Transition, WizardError> {
        let Some(index) = selection else {
            debug!(prompt = state.prompt(), "prompt dismissed, aborting session");
            return Ok(Transition::Aborted);
        };
        let len = state.options().len();
        if index >= len {
            return Err(WizardError::InvalidSelection { index, len });
        }

        match state {
            State::ChooseFolder {
                mut folders,
                offer_recent,
            } => match item_index(offer_recent, index) {
                None => self.replay(),
                Some(i) => {
                    let folder = folders.swap_remove(i);
                    debug!(folder = %folder.display(), "project folder chosen");
                    session.project_dir = Some(folder);
                    Ok(Transition::Next(State::ChoosePlatform {
                        offer_recent: false,
                    }))
                }
            },
            State::ChoosePlatform { offer_recent } => match item_index(offer_recent, index) {
                None => self.replay(),
                Some(i) => match Platform::ALL.get(i) {
                    Some(Platform::Android) => Ok(Transition::Next(State::ChooseAndroidTarget)),
                    Some(Platform::Ios) => Ok(Transition::Next(State::ChooseIosTarget)),
                    Some(Platform::Mobileweb) => {
                        Ok(Transition::Next(State::ChooseMobilewebTarget))
                    }
                    None => {
                        let command = clean_command(&self.config, &session.require_project_dir()?);
                        Ok(Transition::Dispatch(Dispatch {
                            kind: DispatchKind::Clean,
                            command,
                        }))
                    }
                },
            },
            State::ChooseAndroidTarget => match AndroidTarget::ALL[index] {
                AndroidTarget::Emulator => {
                    let avds = list_avds(&self.config, self.runner.as_ref())?;
                    if avds.is_empty() {
                        return Err(WizardError::NothingToChoose {
                            what: "Android virtual devices (create one with the AVD manager)"
                                .to_string(),
                        });
                    }
                    Ok(Transition::Next(State::ChooseAvd { avds }))
                }
                target => self.build(session, BuildOptions::Android(target)),
            },
            State::ChooseAvd { mut avds } => {
                let avd = avds.swap_remove(index);
                self.build(session, BuildOptions::AndroidEmulator { avd })
            }
            State::ChooseIosTarget => match IosTarget::ALL[index].signing() {
                None => Ok(Transition::Next(State::ChooseSimType)),
                Some(target) => Ok(Transition::Next(State::ChooseDeviceFamily { target })),
            },
            State::ChooseSimType => self.build(session, BuildOptions::IosSimulator(SimType::ALL[index])),
            State::ChooseDeviceFamily { target } => {
                let family = DeviceFamily::ALL[index];
                let info = TitaniumCli::new(&self.config, self.runner.as_ref()).ios_info()?;
                let choices = info.choices_for(target);
                if choices.certificates.is_empty() {
                    return Err(WizardError::NothingToChoose {
                        what: format!("signing certificates for {}", target.as_str()),
                    });
                }
                if choices.profiles.is_empty() {
                    return Err(WizardError::NothingToChoose {
                        what: format!("provisioning profiles for {}", target.as_str()),
                    });
                }
                Ok(Transition::Next(State::ChooseCertificate {
                    target,
                    family,
                    choices,
                }))
            }
            State::ChooseCertificate {
                target,
                family,
                mut choices,
            } => Ok(Transition::Next(State::ChooseProfile {
                target,
                family,
                certificate: choices.certificates.swap_remove(index),
                profiles: choices.profiles,
            })),
            State::ChooseProfile {
                target,
                family,
                certificate,
                mut profiles,
            } => {
                let profile = profiles.swap_remove(index);
                self.build(
                    session,
                    BuildOptions::IosSigned {
                        target,
                        family,
                        certificate,
                        profile_uuid: profile.uuid,
                    },
                )
            }
            State::ChooseMobilewebTarget => {
                self.build(session, BuildOptions::Mobileweb(MobilewebTarget::ALL[index]))
            }
        }
    }

    /// Runs one complete session: prompt until a command is dispatched or the
    /// user cancels.
    pub fn run_session(
        &mut self,
        folders: Vec<PathBuf>,
        prompter: &mut dyn Prompter,
        executor: &mut dyn Executor,
    ) -> Result<Outcome, WizardError> {
        let (mut session, mut state) = self.begin(folders)?;
        loop {
            let options = state.options();
            let selection = prompter.select(state.prompt(), &options)?;
            match self.advance(&mut session, state, selection)? {
                Transition::Next(next) => state = next,
                Transition::Aborted => return Ok(Outcome::Aborted),
                Transition::Dispatch(dispatch) => {
                    executor.execute(&dispatch.command)?;
                    return Ok(Outcome::Dispatched(dispatch));
                }
            }
        }
    }

    fn replay(&self) -> Result<Transition, WizardError> {
        let command = self
            .most_recent
            .clone()
            .ok_or_else(|| WizardError::NothingToChoose {
                what: "previous build".to_string(),
            })?;
        info!(command = %command, "replaying most recent build");
        Ok(Transition::Dispatch(Dispatch {
            kind: DispatchKind::Replay,
            command,
        }))
    }

    fn build(
        &mut self,
        session: &mut Session,
        options: BuildOptions,
    ) -> Result<Transition, WizardError> {
        let project_dir = session.require_project_dir()?;
        let sdk = match &session.sdk {
            Some(sdk) => sdk.clone(),
            None => {
                let sdk = TitaniumCli::new(&self.config, self.runner.as_ref())
                    .sdk_version(&project_dir)?;
                session.sdk = Some(sdk.clone());
                sdk
            }
        };
        let command = build_command(&self.config, &sdk, &project_dir, &options);
        self.most_recent = Some(command.clone());
        Ok(Transition::Dispatch(Dispatch {
            kind: DispatchKind::Build,
            command,
        }))
    }
}
