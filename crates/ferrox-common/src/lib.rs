//! ---
//! frx_section: "01-core-runtime"
//! frx_subsection: "module"
//! frx_type: "source"
//! frx_scope: "code"
//! frx_description: "Shared configuration and logging setup for the daemon."
//! frx_version: "v0.1.0-alpha"
//! frx_owner: "tbd"
//! ---
//! Shared runtime support for the Ferrox daemon: configuration loading and
//! tracing initialisation.

pub mod config;
pub mod logging;

pub use config::{AppConfig, LoadedAppConfig, LoggingConfig, StorageConfig};
pub use logging::{init_tracing, LogFormat};
