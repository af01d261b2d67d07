//! ---
//! frx_section: "02-version-lifecycle"
//! frx_subsection: "module"
//! frx_type: "source"
//! frx_scope: "code"
//! frx_description: "Version lifecycle: semver validation, upgrade wipe decisions, build info."
//! frx_version: "v0.1.0-alpha"
//! frx_owner: "tbd"
//! ---
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use semver::Version;
use tracing::debug;

use crate::version::parse_version;
use crate::{Result, VersioningError};

/// Read the version marker at `path` and reparse its content.
///
/// An absent file maps to [`VersioningError::MissingMarker`], unparseable
/// content to [`VersioningError::MalformedMarker`].
pub fn read_marker(path: &Path) -> Result<Version> {
    let bytes = fs::read(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            VersioningError::MissingMarker {
                path: path.to_path_buf(),
            }
        } else {
            VersioningError::Io(err)
        }
    })?;
    serde_json::from_slice(&bytes).map_err(|source| VersioningError::MalformedMarker {
        path: path.to_path_buf(),
        source,
    })
}

/// Decide whether local storage must be wiped before `current_version` may
/// start against the state left behind by a previously run version.
///
/// The verdict and its cause are independent: any condition that prevents
/// establishing the stored version confidently yields `wipe = true`
/// together with the error for the caller to log. Once both versions are
/// known, any major or minor difference wipes: the common case is an
/// upgrade, but crossing a minor boundary downward also invalidates the
/// state. Patch, prerelease, and build differences keep the state. An
/// empty `marker_path` disables the check entirely.
pub fn should_wipe(marker_path: &Path, current_version: &str) -> (bool, Option<VersioningError>) {
    if marker_path.as_os_str().is_empty() {
        return (false, None);
    }

    let stored = match read_marker(marker_path) {
        Ok(version) => version,
        Err(err) => return (true, Some(err)),
    };
    let current = match parse_version(current_version, "") {
        Ok(version) => version,
        Err(err) => return (true, Some(err)),
    };

    let wipe = stored.major != current.major || stored.minor != current.minor;
    debug!(stored = %stored, current = %current, wipe, "upgrade wipe decision");
    (wipe, None)
}

/// Persist `version` (with `git_commit` as build metadata) to the marker at
/// `path`, creating missing parent directories and truncating any existing
/// file.
///
/// The version is validated and serialized before the file is touched, so a
/// malformed version writes nothing.
pub fn write_marker(path: &Path, git_commit: &str, version: &str) -> Result<()> {
    let parsed = parse_version(version, git_commit)?;
    let json = serde_json::to_vec(&parsed)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, json)?;
    debug!(path = %path.display(), version = %parsed, "version marker written");
    Ok(())
}
