//! Core application functionality
//!
//! This module contains the application shell around the patcher:
//! - CLI handling and the user config file
//! - Resolved settings for a run
//! - The error taxonomy
//! - Process entry and exit codes

pub mod cli;
pub mod config_file;
pub mod errors;
pub mod platform;
pub mod runner;
pub mod settings;

// Re-export commonly used items
pub use cli::CliArgs;
pub use errors::{BuildError, BuildResult};
pub use runner::run_app;
pub use settings::GroupingConfig;
