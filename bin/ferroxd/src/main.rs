//! ---
//! frx_section: "01-core-runtime"
//! frx_subsection: "binary"
//! frx_type: "source"
//! frx_scope: "code"
//! frx_description: "Binary entrypoint for the Ferrox daemon."
//! frx_version: "v0.1.0-alpha"
//! frx_owner: "tbd"
//! ---
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use ferrox_common::config::AppConfig;
use ferrox_common::logging::init_tracing;
use ferrox_versioning::{parse_version, should_wipe, write_marker, Info};
use tokio::signal;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(
    author,
    disable_version_flag = true,
    version = concat!("Ferrox ", env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")"),
    about = "Ferrox sandbox runtime daemon",
    long_about = None
)]
struct Cli {
    #[arg(long, value_name = "FILE", help = "Path to configuration file")]
    config: Option<PathBuf>,

    #[arg(
        short = 'V',
        long = "version",
        action = ArgAction::SetTrue,
        help = "Print build and runtime information and exit"
    )]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Run the daemon")]
    Run,
    #[command(about = "Print build and runtime information")]
    Version {
        #[arg(long, help = "Emit canonical JSON instead of the table")]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let build_info = Info::current();
    if cli.version {
        println!("{build_info}");
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Version { json } => {
            if json {
                println!("{}", build_info.json_string()?);
            } else {
                println!("{build_info}");
            }
            Ok(())
        }
        Commands::Run => run_daemon(cli.config, build_info).await,
    }
}

async fn run_daemon(config_override: Option<PathBuf>, build_info: Info) -> Result<()> {
    let mut candidates = Vec::new();
    if let Some(path) = config_override {
        candidates.push(path);
    }
    candidates.push(PathBuf::from("configs/ferrox.toml"));
    candidates.push(PathBuf::from("configs/ferrox.dev.toml"));

    let loaded = AppConfig::load_with_source(&candidates)?;
    let config = loaded.config;
    init_tracing("ferroxd", &config.logging)?;
    info!(
        config_path = %loaded.source.display(),
        version = %build_info.version,
        git_commit = %build_info.git_commit,
        "ferroxd starting"
    );

    // Self-check: the compiled-in constant must survive its own parser.
    parse_version(&build_info.version, &build_info.git_commit)
        .context("compiled-in version failed validation")?;

    let marker_path = config.storage.version_file.as_path();
    let (wipe, cause) = should_wipe(marker_path, &build_info.version);
    if let Some(err) = &cause {
        warn!(error = %err, "could not establish previously run version");
    }
    if wipe {
        if config.storage.wipe_on_upgrade {
            wipe_storage(&config.storage.root)?;
        } else {
            warn!(
                root = %config.storage.root.display(),
                "upgrade wipe required but disabled by configuration"
            );
        }
    }
    if !marker_path.as_os_str().is_empty() {
        write_marker(marker_path, &build_info.git_commit, &build_info.version)
            .context("failed to persist version marker")?;
    }

    info!("daemon running; waiting for termination signal");
    signal::ctrl_c().await?;
    info!("ctrl-c received; shutting down");
    Ok(())
}

/// The destructive half of the upgrade wipe: clear and recreate the
/// storage root once the decider has ruled the on-disk state stale.
fn wipe_storage(root: &Path) -> Result<()> {
    match std::fs::remove_dir_all(root) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to wipe storage root {}", root.display()))
        }
    }
    std::fs::create_dir_all(root)
        .with_context(|| format!("failed to recreate storage root {}", root.display()))?;
    warn!(root = %root.display(), "wiped local storage after version change");
    Ok(())
}
