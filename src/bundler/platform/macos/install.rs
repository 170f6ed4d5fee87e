//! Local install by opening the disk image.

use std::path::PathBuf;

use crate::bundler::{
    CommandRunner, Error, Result, Settings, Stage, ToolInvocation, platform::require,
    process::path_arg,
};

/// Open the disk image so the OS mounts and reveals it.
///
/// Fire-and-forget: only the exit status of `open` itself is checked, not
/// whether the volume actually mounted.
///
/// # Errors
///
/// - [`Error::MissingPrerequisite`] if the disk image is absent
/// - [`Error::InstallFailure`] if `open` exits non-zero
pub async fn open_disk_image<R: CommandRunner>(settings: &Settings, runner: &R) -> Result<PathBuf> {
    let dmg_path = settings.dmg_path();
    require(Stage::Install, &dmg_path)?;

    let invocation = ToolInvocation::new(Stage::Install, "open", settings.project_directory())
        .arg(path_arg(&dmg_path)?);
    let output = runner.run(&invocation).await?;

    if !output.success() {
        return Err(Error::InstallFailure {
            exit_code: output.exit_code,
            tool_output: output.diagnostics(),
        });
    }

    log::info!("✓ Opened {}", dmg_path.display());
    Ok(dmg_path)
}
