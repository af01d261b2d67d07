//! ---
//! frx_section: "02-version-lifecycle"
//! frx_subsection: "module"
//! frx_type: "source"
//! frx_scope: "code"
//! frx_description: "Version lifecycle: semver validation, upgrade wipe decisions, build info."
//! frx_version: "v0.1.0-alpha"
//! frx_owner: "tbd"
//! ---
#![warn(missing_docs)]

//! Version lifecycle utilities for the Ferrox daemon.
//!
//! This crate answers three questions at daemon startup: is the compiled-in
//! version well formed, did the version cross a minor or major boundary
//! since the last run (in which case local storage must be wiped), and what
//! exactly was this binary built from. The marker file read/write pair in
//! [`marker`] carries the answer to the second question across restarts.

use std::path::PathBuf;

/// Result alias used throughout the versioning crate.
pub type Result<T> = std::result::Result<T, VersioningError>;

/// Error type for the version lifecycle subsystem.
#[derive(Debug, thiserror::Error)]
pub enum VersioningError {
    /// A version string that does not satisfy semantic-version grammar.
    #[error("malformed version {version:?}: {source}")]
    MalformedVersion {
        /// The offending version string.
        version: String,
        /// Underlying grammar failure.
        source: semver::Error,
    },
    /// Marker file content that does not deserialize into a version.
    #[error("malformed version marker {}: {}", .path.display(), .source)]
    MalformedMarker {
        /// Path of the unparseable marker file.
        path: PathBuf,
        /// Underlying deserialization failure.
        source: serde_json::Error,
    },
    /// Marker file absent: first run, or state from a wiped installation.
    #[error("version marker {} not found", .path.display())]
    MissingMarker {
        /// Path that was probed.
        path: PathBuf,
    },
    /// Wrapper for IO errors encountered while reading/writing the marker.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Wrapper for JSON serialization issues.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub mod info;
pub mod marker;
pub mod version;

pub use info::Info;
pub use marker::{read_marker, should_wipe, write_marker};
pub use version::{parse_version, VERSION};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_marker_names_the_path() {
        let err = VersioningError::MissingMarker {
            path: PathBuf::from("/var/lib/ferrox/version"),
        };
        assert_eq!(
            format!("{err}"),
            "version marker /var/lib/ferrox/version not found"
        );
    }
}
