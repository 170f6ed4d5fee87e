//! macOS DMG disk image creator.
//!
//! Creates drag-to-install DMG files with the native hdiutil tool. The DMG
//! holds the .app bundle and an Applications symlink.

mod creation;

use crate::bundler::{CommandRunner, Result, Settings, utils::fs};
use std::path::PathBuf;

pub use creation::{create_dmg, find_app_bundle, hdiutil_invocation};

/// Bundle project as DMG disk image
///
/// # Process
/// 1. Find the finished .app bundle
/// 2. Prepare the output directory next to it
/// 3. Generate the DMG with hdiutil
///
/// # Errors
///
/// - [`Error::MissingPrerequisite`](crate::bundler::Error::MissingPrerequisite)
///   if the bundle is absent or incomplete
/// - [`Error::PackagingFailure`](crate::bundler::Error::PackagingFailure)
///   if hdiutil exits non-zero; whatever it left on disk is not usable
pub async fn bundle_project<R: CommandRunner>(settings: &Settings, runner: &R) -> Result<PathBuf> {
    log::info!("Creating DMG for {}", settings.product_name());

    let app_bundle_path = find_app_bundle(settings)?;

    fs::create_dir_all(&settings.app_directory()).await?;

    create_dmg(settings, &app_bundle_path, runner).await
}
