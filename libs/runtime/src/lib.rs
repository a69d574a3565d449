//! Process-level plumbing shared by the storefront binaries: layered
//! configuration loading and tracing/log-file initialization.

pub mod config;
pub mod logging;

pub use config::{
    AppConfig, CliArgs, DatabaseConfig, LoggingConfig, MediaConfig, ServerConfig,
};
pub use logging::init_logging;
