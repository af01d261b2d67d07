//! ---
//! frx_section: "02-version-lifecycle"
//! frx_subsection: "module"
//! frx_type: "source"
//! frx_scope: "code"
//! frx_description: "Version lifecycle: semver validation, upgrade wipe decisions, build info."
//! frx_version: "v0.1.0-alpha"
//! frx_owner: "tbd"
//! ---
use std::fmt;

use serde::Serialize;

use crate::Result;

/// Immutable snapshot of build and runtime facts for the running daemon.
///
/// Field declaration order is the canonical rendering order for both the
/// plaintext table and the JSON document; consumers assert byte-stable
/// output, so reordering fields is a breaking change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    /// Semantic version of the running build.
    pub version: String,
    /// Git commit hash captured at build time.
    pub git_commit: String,
    /// Commit timestamp captured at build time.
    pub git_commit_date: String,
    /// Whether the working tree was clean or dirty at build time.
    pub git_tree_state: String,
    /// Build timestamp from the compilation environment.
    pub build_date: String,
    /// rustc toolchain version used for the build.
    pub rustc_version: String,
    /// Compiler name.
    pub compiler: String,
    /// Target triple used for the build.
    pub platform: String,
    /// How the C runtime is linked, `static` or `dynamic`.
    pub linkmode: String,
    /// Cargo features enabled for the build, in order.
    pub build_tags: Vec<String>,
    /// Linker flags injected by the build environment.
    pub ld_flags: String,
    /// Whether seccomp confinement is compiled in.
    pub seccomp_enabled: bool,
    /// Whether AppArmor confinement is compiled in.
    pub app_armor_enabled: bool,
    /// Dependency identifiers, in order.
    pub dependencies: Vec<String>,
}

impl Info {
    /// Construct the snapshot for this build from the `vergen`-injected
    /// environment.
    #[must_use]
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_owned(),
            git_commit: build_env(option_env!("VERGEN_GIT_SHA")),
            git_commit_date: build_env(option_env!("VERGEN_GIT_COMMIT_TIMESTAMP")),
            git_tree_state: match option_env!("VERGEN_GIT_DIRTY") {
                Some("false") => "clean".to_owned(),
                Some("true") => "dirty".to_owned(),
                _ => "UNKNOWN".to_owned(),
            },
            build_date: build_env(option_env!("VERGEN_BUILD_TIMESTAMP")),
            rustc_version: build_env(option_env!("VERGEN_RUSTC_SEMVER")),
            compiler: "rustc".to_owned(),
            platform: build_env(option_env!("VERGEN_CARGO_TARGET_TRIPLE")),
            linkmode: if cfg!(target_feature = "crt-static") {
                "static"
            } else {
                "dynamic"
            }
            .to_owned(),
            build_tags: option_env!("VERGEN_CARGO_FEATURES")
                .unwrap_or("")
                .split(',')
                .filter(|tag| !tag.is_empty() && *tag != VERGEN_SENTINEL)
                .map(str::to_owned)
                .collect(),
            ld_flags: option_env!("FERROX_LDFLAGS").unwrap_or("").to_owned(),
            seccomp_enabled: cfg!(feature = "seccomp"),
            app_armor_enabled: cfg!(feature = "apparmor"),
            dependencies: Vec::new(),
        }
    }

    /// Render the canonical JSON document: fixed lowerCamelCase keys in
    /// declaration order, 2-space indentation.
    pub fn json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Sentinel vergen emits when a metadata source is unavailable.
const VERGEN_SENTINEL: &str = "VERGEN_IDEMPOTENT_OUTPUT";

fn build_env(value: Option<&'static str>) -> String {
    match value {
        Some(v) if !v.is_empty() && v != VERGEN_SENTINEL => v.to_owned(),
        _ => "UNKNOWN".to_owned(),
    }
}

enum Row<'a> {
    Scalar(&'static str, String),
    Sequence(&'static str, &'a [String]),
}

/// Scalar rows in a contiguous run share one label column, sized to the
/// longest label in the run plus two spaces. A sequence row ends the run;
/// its elements render one per line, two-space indented, the label alone
/// when the sequence is empty.
fn render_rows(rows: &[Row<'_>]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < rows.len() {
        match &rows[i] {
            Row::Sequence(label, items) => {
                out.push_str(label);
                out.push_str(":\n");
                for item in *items {
                    out.push_str("  ");
                    out.push_str(item);
                    out.push('\n');
                }
                i += 1;
            }
            Row::Scalar(..) => {
                let run = rows[i..]
                    .iter()
                    .take_while(|row| matches!(row, Row::Scalar(..)))
                    .count();
                let width = rows[i..i + run]
                    .iter()
                    .map(|row| match row {
                        Row::Scalar(label, _) => label.len() + 1,
                        Row::Sequence(..) => 0,
                    })
                    .max()
                    .unwrap_or(0)
                    + 2;
                for row in &rows[i..i + run] {
                    if let Row::Scalar(label, value) = row {
                        out.push_str(&format!("{:<width$}{}\n", format!("{label}:"), value));
                    }
                }
                i += run;
            }
        }
    }
    out
}

impl fmt::Display for Info {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            Row::Scalar("Version", self.version.clone()),
            Row::Scalar("GitCommit", self.git_commit.clone()),
            Row::Scalar("GitCommitDate", self.git_commit_date.clone()),
            Row::Scalar("GitTreeState", self.git_tree_state.clone()),
            Row::Scalar("BuildDate", self.build_date.clone()),
            Row::Scalar("RustcVersion", self.rustc_version.clone()),
            Row::Scalar("Compiler", self.compiler.clone()),
            Row::Scalar("Platform", self.platform.clone()),
            Row::Scalar("Linkmode", self.linkmode.clone()),
            Row::Sequence("BuildTags", &self.build_tags),
            Row::Scalar("LDFlags", self.ld_flags.clone()),
            Row::Scalar("SeccompEnabled", self.seccomp_enabled.to_string()),
            Row::Scalar("AppArmorEnabled", self.app_armor_enabled.to_string()),
            Row::Sequence("Dependencies", &self.dependencies),
        ];
        f.write_str(render_rows(&rows).trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_version_is_well_formed() {
        let info = Info::current();
        crate::version::parse_version(&info.version, "").unwrap();
        assert_eq!(info.compiler, "rustc");
    }

    #[test]
    fn json_keys_follow_declaration_order() {
        let info = Info::current();
        let json = info.json_string().unwrap();
        let version_at = json.find("\"version\"").unwrap();
        let commit_at = json.find("\"gitCommit\"").unwrap();
        let deps_at = json.find("\"dependencies\"").unwrap();
        assert!(version_at < commit_at);
        assert!(commit_at < deps_at);
    }
}
