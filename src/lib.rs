//! Release packaging pipeline for a native desktop application.
//!
//! This library turns a compiled executable into a distributable artifact:
//! - a release binary built with `cargo`
//! - a macOS `.app` bundle assembled from a template tree
//! - a `.dmg` disk image packed with `hdiutil`
//! - an optional local install through `open`
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
