//! Error taxonomy for pipeline stages.
//!
//! Every stage failure maps to exactly one variant here. External tool
//! diagnostics are carried verbatim in `tool_output` and are never part of
//! the `Display` text, so callers can print them unmodified.

use super::Stage;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while building, bundling, packing or installing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The compiler (or `lipo` in universal mode) exited non-zero.
    #[error("build failed ({})", describe_exit(*exit_code))]
    BuildFailure {
        /// Exit code of the tool, `None` if it had none
        exit_code: Option<i32>,
        /// Verbatim diagnostics of the tool
        tool_output: String,
    },

    /// A stage input is missing.
    #[error("`{stage}` requires {} which does not exist", path.display())]
    MissingPrerequisite {
        /// Stage that needed the input
        stage: Stage,
        /// Path of the missing input
        path: PathBuf,
    },

    /// Copying into the application bundle failed.
    #[error("failed to assemble bundle {}: {cause}", path.display())]
    BundleAssemblyFailure {
        /// Bundle being assembled
        path: PathBuf,
        /// Underlying filesystem error
        #[source]
        cause: Box<Error>,
    },

    /// The disk-image utility exited non-zero.
    #[error("packaging failed ({})", describe_exit(*exit_code))]
    PackagingFailure {
        /// Exit code of the tool, `None` if it had none
        exit_code: Option<i32>,
        /// Verbatim diagnostics of the tool
        tool_output: String,
    },

    /// The open action exited non-zero.
    #[error("install failed ({})", describe_exit(*exit_code))]
    InstallFailure {
        /// Exit code of the tool, `None` if it had none
        exit_code: Option<i32>,
        /// Verbatim diagnostics of the tool
        tool_output: String,
    },

    /// A prerequisite of the requested stage failed.
    #[error("`{requested}` aborted: prerequisite `{failed}` failed: {source}")]
    DependencyFailure {
        /// Stage the caller asked for
        requested: Stage,
        /// Prerequisite stage that failed
        failed: Stage,
        /// Failure of the prerequisite
        source: Box<Error>,
    },

    /// An external program could not be run to completion.
    #[error("`{program}` failed during `{stage}` ({}): {reason}", describe_exit(*exit_code))]
    ExternalToolFailure {
        /// Stage that invoked the program
        stage: Stage,
        /// Program name
        program: String,
        /// Exit code, if the process produced one
        exit_code: Option<i32>,
        /// What went wrong
        reason: String,
    },

    /// A tool reported success but its output file is absent.
    #[error("`{stage}` reported success but {} was not produced", path.display())]
    ArtifactNotProduced {
        /// Stage that ran the tool
        stage: Stage,
        /// Expected artifact
        path: PathBuf,
    },

    /// The feature set is empty or malformed.
    #[error("invalid feature set {0:?}: expected at least one feature name")]
    InvalidFeatureSet(String),

    /// Filesystem error with the operation and path that caused it.
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// Operation being performed
        context: &'static str,
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        error: std::io::Error,
    },

    /// IO errors.
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// State file (de)serialization errors.
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Directory traversal errors.
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix errors while mirroring a directory tree.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl Error {
    /// Verbatim diagnostics of the external tool behind this error.
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            Error::BuildFailure { tool_output, .. }
            | Error::PackagingFailure { tool_output, .. }
            | Error::InstallFailure { tool_output, .. } => Some(tool_output),
            Error::DependencyFailure { source, .. } => source.tool_output(),
            _ => None,
        }
    }

    /// Exit code of the external tool behind this error.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Error::BuildFailure { exit_code, .. }
            | Error::PackagingFailure { exit_code, .. }
            | Error::InstallFailure { exit_code, .. }
            | Error::ExternalToolFailure { exit_code, .. } => *exit_code,
            Error::DependencyFailure { source, .. } => source.exit_code(),
            _ => None,
        }
    }

    /// The innermost error, looking through `DependencyFailure` wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::DependencyFailure { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Attaches the failing operation and path to IO errors.
pub trait ErrorExt<T> {
    /// Wrap an IO error as [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Converts missing values into [`Error::GenericError`].
pub trait Context<T> {
    /// Attach a message.
    fn context<C: Display>(self, context: C) -> Result<T>;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

/// Return early with an [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
