//! iOS signing information
//!
//! Typed view of `titanium info --types ios --output json`. Only two top-level
//! sections matter to the wizard:
//!
//! ```json
//! {
//!   "iosCerts": { "devNames": ["..."], "distNames": ["..."], "wwdr": true },
//!   "iOSProvisioningProfiles": {
//!     "development": [{ "name": "...", "uuid": "..." }],
//!     "distribution": [],
//!     "adhoc": [],
//!     "enterprise": []
//!   }
//! }
//! ```
//!
//! Everything else in the document is ignored. Unexpected keys inside the two
//! sections are kept so they can be reported, but never fail the parse.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::warn;

use crate::types::{SigningTarget, WizardError};

/// Certificate categories that are known but never offered. `wwdr` reports
/// the Apple WWDR intermediate certificate, not a signing identity.
const IGNORED_CERT_KEYS: &[&str] = &["wwdr"];

/// A provisioning profile as reported by the Titanium CLI.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProvisioningProfile {
    pub name: String,
    pub uuid: String,
}

impl ProvisioningProfile {
    pub fn new(name: impl Into<String>, uuid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uuid: uuid.into(),
        }
    }
}

/// Code signing certificates, by category.
#[derive(Debug, Default, Deserialize)]
pub struct IosCerts {
    #[serde(rename = "devNames", default)]
    pub dev_names: Vec<String>,
    #[serde(rename = "distNames", default)]
    pub dist_names: Vec<String>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_json::Value>,
}

/// Provisioning profiles, by category.
#[derive(Debug, Default, Deserialize)]
pub struct ProvisioningProfiles {
    #[serde(default)]
    pub development: Vec<ProvisioningProfile>,
    #[serde(default)]
    pub distribution: Vec<ProvisioningProfile>,
    #[serde(default)]
    pub adhoc: Vec<ProvisioningProfile>,
    /// Parsed for completeness; no build target uses enterprise profiles.
    #[serde(default)]
    pub enterprise: Vec<ProvisioningProfile>,
    #[serde(flatten)]
    unknown: BTreeMap<String, serde_json::Value>,
}

/// The parts of the iOS info document the wizard uses.
#[derive(Debug, Default, Deserialize)]
pub struct IosInfo {
    #[serde(rename = "iosCerts", default)]
    pub certs: IosCerts,
    #[serde(rename = "iOSProvisioningProfiles", default)]
    pub profiles: ProvisioningProfiles,
}

/// Certificates and profiles applicable to one signing target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigningChoices {
    pub certificates: Vec<String>,
    pub profiles: Vec<ProvisioningProfile>,
}

impl IosInfo {
    /// Parses the JSON document, warning about unexpected category keys.
    pub fn parse(json: &str) -> Result<Self, WizardError> {
        let info: IosInfo = serde_json::from_str(json)?;
        for key in info.unknown_keys() {
            warn!(key = %key, "ignoring unexpected key in iOS info");
        }
        Ok(info)
    }

    /// Unexpected keys found inside `iosCerts` and `iOSProvisioningProfiles`,
    /// qualified by section.
    pub fn unknown_keys(&self) -> Vec<String> {
        let certs = self
            .certs
            .unknown
            .keys()
            .filter(|k| !IGNORED_CERT_KEYS.contains(&k.as_str()))
            .map(|k| format!("iosCerts.{k}"));
        let profiles = self
            .profiles
            .unknown
            .keys()
            .map(|k| format!("iOSProvisioningProfiles.{k}"));
        certs.chain(profiles).collect()
    }

    /// Certificates offered for a signing target.
    pub fn certificates(&self, target: SigningTarget) -> &[String] {
        if target.is_development() {
            &self.certs.dev_names
        } else {
            &self.certs.dist_names
        }
    }

    /// Provisioning profiles offered for a signing target.
    pub fn profiles(&self, target: SigningTarget) -> &[ProvisioningProfile] {
        match target {
            SigningTarget::Device => &self.profiles.development,
            SigningTarget::DistAppstore => &self.profiles.distribution,
            SigningTarget::DistAdhoc => &self.profiles.adhoc,
        }
    }

    /// Certificates and profiles for a signing target, cloned out.
    pub fn choices_for(&self, target: SigningTarget) -> SigningChoices {
        SigningChoices {
            certificates: self.certificates(target).to_vec(),
            profiles: self.profiles(target).to_vec(),
        }
    }
}
