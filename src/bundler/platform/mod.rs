//! Stage implementations.
//!
//! - [`cargo`] builds the executable
//! - [`macos::app`] assembles the `.app` bundle
//! - [`macos::dmg`] packs the disk image
//! - [`macos::install`] opens it
//!
//! The stages only shell out to external tools through a
//! [`CommandRunner`](super::CommandRunner), so they compile and can be
//! exercised with fake tools on any host.

pub mod cargo;
pub mod macos;

use crate::bundler::{Error, Result, Stage};
use std::path::Path;

/// Fail with [`Error::MissingPrerequisite`] unless `path` exists.
pub(crate) fn require(stage: Stage, path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::MissingPrerequisite {
            stage,
            path: path.to_path_buf(),
        })
    }
}
