//! CLI command implementations for Korovany.

pub(crate) mod probe;
pub(crate) mod run;
pub(crate) mod stats;

mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;

/// Output format shared by every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}

impl From<korovany::ConfigError> for CliError {
    fn from(e: korovany::ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<korovany::SnapshotError> for CliError {
    fn from(e: korovany::SnapshotError) -> Self {
        Self::new(e.to_string())
    }
}
