//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use flighttrace::config::ConfigFileError;
use flighttrace::dataset::{DatasetError, SourceError};
use flighttrace::replay::ReplayError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Config file could not be read or written
    ConfigFile(ConfigFileError),
    /// Dataset could not be loaded
    Dataset(DatasetError),
    /// Dataset source could not be reached
    Source(SourceError),
    /// Replay could not be prepared or driven
    Replay(ReplayError),
    /// Failed to render output
    Output(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(_) | CliError::Source(_) => {
                eprintln!();
                eprintln!("Point flighttrace at your flight data with one of:");
                eprintln!("  1. --data-dir <DIR> (directory with metadata.json)");
                eprintln!("  2. --base-url <URL> (server hosting the same files)");
                eprintln!("  3. [data] directory or base_url in ~/.flighttrace/config.ini");
            }
            CliError::Dataset(e) if e.is_invalid_input() => {
                eprintln!();
                eprintln!("Valid tiers: z0_4, z5_7, z8_10, z11_13, z14_plus");
                eprintln!("Valid years: all, 2000-2099");
            }
            CliError::Replay(ReplayError::NoSegments) => {
                eprintln!();
                eprintln!("The flight id was not found in the selected dataset.");
                eprintln!("Try a different --year or a finer --tier.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Dataset(e) => write!(f, "{}", e),
            CliError::Source(e) => write!(f, "Dataset source error: {}", e),
            CliError::Replay(e) => write!(f, "Replay error: {}", e),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Dataset(e) => Some(e),
            CliError::Source(e) => Some(e),
            CliError::Replay(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<DatasetError> for CliError {
    fn from(e: DatasetError) -> Self {
        CliError::Dataset(e)
    }
}

impl From<SourceError> for CliError {
    fn from(e: SourceError) -> Self {
        CliError::Source(e)
    }
}

impl From<ReplayError> for CliError {
    fn from(e: ReplayError) -> Self {
        CliError::Replay(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}
