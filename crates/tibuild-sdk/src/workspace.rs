//! Project folder discovery.
//!
//! A Titanium project is any directory containing `tiapp.xml`. Folders named
//! explicitly are trusted as given; otherwise the current directory is
//! checked first, then its immediate children.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::WizardError;

/// Marker file identifying a Titanium project.
pub const TIAPP_XML: &str = "tiapp.xml";

/// Returns `true` if `dir` contains a `tiapp.xml`.
pub fn is_titanium_project(dir: &Path) -> bool {
    dir.join(TIAPP_XML).is_file()
}

/// Resolves the candidate project folders for a session.
///
/// # Arguments
///
/// * `explicit` - Folders named on the command line, used in order when non-empty
/// * `cwd` - Directory to search when no folders were named
///
/// # Errors
///
/// [`WizardError::NoProject`] when nothing qualifies.
pub fn resolve_folders(explicit: &[PathBuf], cwd: &Path) -> Result<Vec<PathBuf>, WizardError> {
    if !explicit.is_empty() {
        return Ok(explicit.to_vec());
    }

    if is_titanium_project(cwd) {
        debug!(dir = %cwd.display(), "current directory is a Titanium project");
        return Ok(vec![cwd.to_path_buf()]);
    }

    let entries = match fs::read_dir(cwd) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(dir = %cwd.display(), error = %e, "cannot scan for projects");
            return Err(WizardError::NoProject);
        }
    };

    let mut folders: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && is_titanium_project(path))
        .collect();
    folders.sort();

    if folders.is_empty() {
        return Err(WizardError::NoProject);
    }
    debug!(count = folders.len(), "discovered Titanium projects");
    Ok(folders)
}

/// Short name shown for a folder in the folder prompt: its last path
/// component, or the whole path when there is none.
pub fn display_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| folder.display().to_string())
}
