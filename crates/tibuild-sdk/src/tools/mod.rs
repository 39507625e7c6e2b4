//! Adapters for the external programs the wizard queries.
//!
//! | Module | Program | Used for |
//! |--------|---------|----------|
//! | [`titanium`] | Titanium CLI | SDK detection, iOS signing info |
//! | [`android`] | Android SDK `tools/android` | AVD listing |
//! | [`ios`] | - | Typed schema for the iOS info JSON |
//!
//! All process access goes through [`ToolRunner`], implemented for real by
//! [`ProcessRunner`].

pub mod android;
pub mod common;
pub mod ios;
pub mod titanium;

pub use android::list_avds;
pub use common::{Captured, ProcessRunner, ToolRunner};
pub use ios::{IosInfo, ProvisioningProfile, SigningChoices};
pub use titanium::TitaniumCli;
