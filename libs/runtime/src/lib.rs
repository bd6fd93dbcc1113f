//! Process bootstrap shared by the binaries: layered configuration and
//! logging setup.

pub mod config;
pub mod logging;
pub mod paths;

pub use config::{AppConfig, CliArgs, DatabaseConfig, HomeConfig, LoggingConfig, Section};
pub use logging::init_logging_from_config;
