//! Top-level error types for the release pipeline.
//!
//! Stage failures live in [`crate::bundler::Error`]; this module wraps them
//! together with CLI and manifest errors and maps them to exit codes.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI-level operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all release operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Pipeline errors
    #[error("{0}")]
    Bundler(#[from] crate::bundler::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Project manifest could not be read
    #[error("Cannot read manifest {}: {reason}", path.display())]
    Manifest {
        /// Manifest path
        path: PathBuf,
        /// Reason for the error
        reason: String,
    },
}

impl BundlerError {
    /// Process exit status for this error.
    ///
    /// Every failure exits 1; clap handles usage errors itself (exit 2).
    pub fn exit_code(&self) -> i32 {
        1
    }

    /// Verbatim diagnostic output of the external tool that caused this
    /// error, if any.
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            BundlerError::Bundler(e) => e.tool_output(),
            _ => None,
        }
    }
}
