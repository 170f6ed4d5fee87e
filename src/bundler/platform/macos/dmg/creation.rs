//! Core DMG creation logic using hdiutil.
//!
//! Handles the DMG creation workflow:
//! - Locating the finished .app bundle
//! - Staging it in a temporary directory next to an Applications symlink
//! - Running hdiutil to generate the DMG

use crate::bundler::{
    CommandRunner, Error, Result, Settings, Stage, ToolInvocation,
    error::ErrorExt,
    process::path_arg,
    utils::fs,
};
use std::path::{Path, PathBuf};

/// Find the finished .app bundle.
///
/// A bundle counts as complete when the executable is in `Contents/MacOS`.
///
/// # Returns
/// PathBuf to the .app bundle, or [`Error::MissingPrerequisite`]
pub fn find_app_bundle(settings: &Settings) -> Result<PathBuf> {
    let bundle = settings.app_bundle_path();
    let executable = settings.bundled_binary_path();

    if !bundle.is_dir() {
        return Err(Error::MissingPrerequisite {
            stage: Stage::Package,
            path: bundle,
        });
    }
    if !executable.is_file() {
        return Err(Error::MissingPrerequisite {
            stage: Stage::Package,
            path: executable,
        });
    }

    log::debug!("Using .app bundle: {}", bundle.display());
    Ok(bundle)
}

/// `hdiutil create` invocation for `staging` → `dmg_path`.
///
/// `-ov` lets hdiutil replace an image left at the same path.
pub fn hdiutil_invocation(settings: &Settings, staging: &Path, dmg_path: &Path) -> Result<ToolInvocation> {
    let dmg = settings.dmg_settings();

    Ok(
        ToolInvocation::new(Stage::Package, "hdiutil", settings.project_directory())
            .arg("create")
            .args(["-volname", settings.volume_name()])
            .args(["-fs", dmg.filesystem.as_str()])
            .arg("-srcfolder")
            .arg(path_arg(staging)?)
            .arg("-ov") // Overwrite if exists
            .args(["-format", dmg.format.as_str()])
            .arg(path_arg(dmg_path)?),
    )
}

/// Create DMG from .app bundle using hdiutil
///
/// # DMG Creation Steps
/// 1. Remove any previous image so a failed attempt cannot leave it behind
/// 2. Create temporary staging directory using tempfile crate
/// 3. Copy .app bundle to staging directory
/// 4. Create Applications symlink: `staging/Applications -> /Applications`
/// 5. Run hdiutil create
/// 6. Verify hdiutil succeeded and the image exists
/// 7. Automatic cleanup (tempfile handles it)
///
/// # Returns
/// PathBuf to created DMG file
pub async fn create_dmg<R: CommandRunner>(
    settings: &Settings,
    app_bundle: &Path,
    runner: &R,
) -> Result<PathBuf> {
    let dmg_path = settings.dmg_path();

    // Remove old DMG if exists
    match tokio::fs::remove_file(&dmg_path).await {
        Ok(()) => log::debug!("Removed previous {}", dmg_path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e).fs_context("removing previous disk image", &dmg_path),
    }

    let temp_dir = tempfile::tempdir().map_err(|e| {
        Error::GenericError(format!(
            "Failed to create temporary directory for DMG contents: {}",
            e
        ))
    })?;
    let staging_path = temp_dir.path();

    let app_name = app_bundle
        .file_name()
        .ok_or_else(|| Error::GenericError("Invalid app bundle path".into()))?;
    let staged_app = staging_path.join(app_name);

    log::debug!("Copying .app to staging: {}", staged_app.display());
    fs::copy_dir(app_bundle, &staged_app).await?;

    // Create Applications symlink for drag-to-install UX
    #[cfg(unix)]
    {
        let applications_link = staging_path.join("Applications");
        std::os::unix::fs::symlink("/Applications", &applications_link)
            .fs_context("creating Applications symlink", &applications_link)?;
    }

    log::info!("Packing disk image...");
    let output = runner
        .run(&hdiutil_invocation(settings, staging_path, &dmg_path)?)
        .await?;

    if !output.success() {
        return Err(Error::PackagingFailure {
            exit_code: output.exit_code,
            tool_output: output.diagnostics(),
        });
    }

    if !dmg_path.is_file() {
        return Err(Error::ArtifactNotProduced {
            stage: Stage::Package,
            path: dmg_path,
        });
    }

    log::info!("✓ Packed {}", dmg_path.display());

    // tempfile automatically cleans up staging directory
    drop(temp_dir);

    Ok(dmg_path)
}
