//! ---
//! frx_section: "02-version-lifecycle"
//! frx_subsection: "module"
//! frx_type: "source"
//! frx_scope: "code"
//! frx_description: "Version lifecycle: semver validation, upgrade wipe decisions, build info."
//! frx_version: "v0.1.0-alpha"
//! frx_owner: "tbd"
//! ---
use semver::{BuildMetadata, Version};

use crate::{Result, VersioningError};

/// Version string compiled into the crate at build time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse `version` into a validated [`Version`], attaching `git_commit` as
/// build metadata.
///
/// A non-empty commit is trimmed of surrounding quote characters and becomes
/// the sole build-metadata entry, replacing any metadata embedded in the
/// version string. An empty commit leaves the embedded metadata untouched.
/// A commit that is not itself valid build metadata is dropped rather than
/// failing the parse.
pub fn parse_version(version: &str, git_commit: &str) -> Result<Version> {
    let mut parsed =
        Version::parse(version).map_err(|source| VersioningError::MalformedVersion {
            version: version.to_owned(),
            source,
        })?;

    let commit = git_commit.trim_matches('"');
    if !commit.is_empty() {
        if let Ok(build) = BuildMetadata::new(commit) {
            parsed.build = build;
        }
    }

    Ok(parsed)
}
