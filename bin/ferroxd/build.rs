//! ---
//! frx_section: "01-core-runtime"
//! frx_subsection: "binary"
//! frx_type: "source"
//! frx_scope: "code"
//! frx_description: "Build script emitting build environment metadata for the daemon binary."
//! frx_version: "v0.1.0-alpha"
//! frx_owner: "tbd"
//! ---
use vergen::EmitBuilder;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // No fail_on_error: source checkouts without git history still build,
    // vergen emits its sentinel value for the unavailable variables.
    EmitBuilder::builder()
        .all_build()
        .all_cargo()
        .all_git()
        .all_rustc()
        .emit()?;

    println!("cargo:rerun-if-changed=build.rs");
    Ok(())
}
