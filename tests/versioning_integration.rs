//! ---
//! frx_section: "09-testing-qa"
//! frx_subsection: "integration-tests"
//! frx_type: "source"
//! frx_scope: "code"
//! frx_description: "Integration tests for the version lifecycle across simulated restarts."
//! frx_version: "v0.1.0-alpha"
//! frx_owner: "tbd"
//! ---
use std::path::Path;
use std::str::FromStr;

use ferrox_common::config::AppConfig;
use ferrox_versioning::{parse_version, read_marker, should_wipe, write_marker, VersioningError};
use tempfile::tempdir;

/// One simulated daemon startup: decide, then persist the running version.
fn startup(marker: &Path, version: &str) -> (bool, Option<VersioningError>) {
    let verdict = should_wipe(marker, version);
    write_marker(marker, "", version).unwrap();
    verdict
}

#[test]
fn wipe_decisions_across_release_history() {
    let dir = tempdir().unwrap();
    let marker = dir.path().join("state").join("version");

    // First-ever run: no marker yet, fail safe toward a clean state.
    let (wipe, err) = startup(&marker, "1.13.1");
    assert!(wipe);
    assert!(matches!(err, Some(VersioningError::MissingMarker { .. })));

    // Plain restart.
    let (wipe, err) = startup(&marker, "1.13.1");
    assert!(!wipe);
    assert!(err.is_none());

    // Patch release: compatible by construction.
    let (wipe, err) = startup(&marker, "1.13.2");
    assert!(!wipe);
    assert!(err.is_none());

    // Minor upgrade: on-disk format may have changed.
    let (wipe, err) = startup(&marker, "1.14.1");
    assert!(wipe);
    assert!(err.is_none());

    // Major upgrade.
    let (wipe, err) = startup(&marker, "2.0.0");
    assert!(wipe);
    assert!(err.is_none());

    // Rollback across the major boundary invalidates the state too.
    let (wipe, err) = startup(&marker, "1.14.1");
    assert!(wipe);
    assert!(err.is_none());

    // Rollback within the same minor line keeps the state.
    let (wipe, err) = startup(&marker, "1.14.0");
    assert!(!wipe);
    assert!(err.is_none());
}

#[test]
fn disabled_marker_path_skips_the_check() {
    let (wipe, err) = should_wipe(Path::new(""), "1.1.1");
    assert!(!wipe);
    assert!(err.is_none());
}

#[test]
fn marker_written_with_commit_round_trips() {
    let dir = tempdir().unwrap();
    let marker = dir.path().join("version");

    write_marker(&marker, "\"abcdef123456\"", "1.14.1-rc1").unwrap();
    let stored = read_marker(&marker).unwrap();

    let expected = parse_version("1.14.1-rc1", "abcdef123456").unwrap();
    assert_eq!(stored, expected);
    assert_eq!(stored.build.as_str(), "abcdef123456");
}

#[test]
fn marker_file_is_a_canonical_json_version() {
    let dir = tempdir().unwrap();
    let marker = dir.path().join("version");

    write_marker(&marker, "abc123", "1.2.3").unwrap();
    let raw = std::fs::read_to_string(&marker).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value, serde_json::json!("1.2.3+abc123"));
}

#[test]
fn config_marker_path_feeds_the_decider() {
    let dir = tempdir().unwrap();
    let marker = dir.path().join("version");
    let config = AppConfig::from_str(&format!(
        "[storage]\nroot = {root:?}\nversion_file = {marker:?}\n",
        root = dir.path().join("storage"),
        marker = marker,
    ))
    .unwrap();

    let (wipe, err) = should_wipe(&config.storage.version_file, "1.1.1");
    assert!(wipe);
    assert!(matches!(err, Some(VersioningError::MissingMarker { .. })));

    write_marker(&config.storage.version_file, "", "1.1.1").unwrap();
    let (wipe, err) = should_wipe(&config.storage.version_file, "1.1.2");
    assert!(!wipe);
    assert!(err.is_none());
}
