//! Executable build via cargo.
//!
//! Default features are always disabled and only the configured feature set
//! is enabled. In universal mode one slice is built per architecture and the
//! slices are merged with `lipo`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::bundler::{
    Arch, BuildMode, CommandRunner, Error, Result, Settings, Stage, ToolInvocation,
    builder::staleness::newest_modification, error::ErrorExt, process::path_arg, utils::fs,
};

/// Build the executable and return its path.
///
/// # Errors
///
/// - [`Error::BuildFailure`] if cargo or lipo exits non-zero
/// - [`Error::ArtifactNotProduced`] if they succeed without leaving the
///   executable at [`Settings::binary_path`]
pub async fn build_binary<R: CommandRunner>(settings: &Settings, runner: &R) -> Result<PathBuf> {
    let build = settings.build_config();
    log::info!(
        "Building {} ({}, features: {})",
        settings.binary_name(),
        build.mode,
        build.features
    );

    if build.universal {
        build_universal(settings, runner).await?;
    } else {
        run_build_tool(runner, &cargo_invocation(settings, None)?).await?;
    }

    let binary = settings.binary_path();
    if !binary.is_file() {
        return Err(Error::ArtifactNotProduced {
            stage: Stage::Build,
            path: binary,
        });
    }

    log::info!("✓ Built {}", binary.display());
    Ok(binary)
}

/// `cargo build` for the configured mode and features, optionally for one
/// universal slice.
pub fn cargo_invocation(settings: &Settings, arch: Option<Arch>) -> Result<ToolInvocation> {
    let build = settings.build_config();

    let mut invocation = ToolInvocation::new(Stage::Build, "cargo", settings.project_directory())
        .arg("build");
    if build.mode == BuildMode::Release {
        invocation = invocation.arg("--release");
    }
    invocation = invocation
        .args(["--no-default-features", "--features"])
        .arg(build.features.joined())
        .arg("--target-dir")
        .arg(path_arg(settings.target_directory())?);
    if let Some(arch) = arch {
        invocation = invocation.args(["--target", arch.apple_target_triple()]);
    }

    Ok(invocation.env(
        "MACOSX_DEPLOYMENT_TARGET",
        settings.macos_settings().minimum_system_version.as_str(),
    ))
}

async fn build_universal<R: CommandRunner>(settings: &Settings, runner: &R) -> Result<()> {
    let mut lipo = ToolInvocation::new(Stage::Build, "lipo", settings.project_directory());
    let mut slices = Vec::with_capacity(Arch::UNIVERSAL.len());

    for arch in Arch::UNIVERSAL {
        run_build_tool(runner, &cargo_invocation(settings, Some(arch))?).await?;
        let slice = settings.arch_binary_path(arch);
        lipo = lipo.arg(path_arg(&slice)?);
        slices.push(slice);
    }

    // Unchanged slices keep the merged executable and its mtime.
    if is_newer_than_all(&settings.binary_path(), &slices)? {
        log::info!("Universal executable is up to date");
        return Ok(());
    }

    fs::create_dir_all(&settings.release_directory()).await?;
    let lipo = lipo
        .args(["-create", "-output"])
        .arg(path_arg(&settings.binary_path())?);
    run_build_tool(runner, &lipo).await
}

/// Whether `output` exists and is at least as new as every one of `inputs`.
fn is_newer_than_all(output: &Path, inputs: &[PathBuf]) -> Result<bool> {
    let Ok(metadata) = std::fs::metadata(output) else {
        return Ok(false);
    };
    let modified: DateTime<Utc> = metadata
        .modified()
        .fs_context("reading modification time", output)?
        .into();

    Ok(match newest_modification(inputs)? {
        Some((_, newest)) => modified >= newest,
        None => false,
    })
}

async fn run_build_tool<R: CommandRunner>(runner: &R, invocation: &ToolInvocation) -> Result<()> {
    let output = runner.run(invocation).await?;
    if !output.success() {
        return Err(Error::BuildFailure {
            exit_code: output.exit_code,
            tool_output: output.diagnostics(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::{BuildConfig, PackageSettings, SettingsBuilder};

    fn settings(mode: BuildMode, features: &str) -> Settings {
        SettingsBuilder::new()
            .manifest_path("/p/Cargo.toml")
            .package_settings(PackageSettings {
                product_name: "App".into(),
                binary_name: "app".into(),
                version: "0.1.0".into(),
            })
            .build_config(BuildConfig {
                mode,
                features: features.parse().unwrap(),
                universal: false,
            })
            .build()
            .unwrap()
    }

    #[test]
    fn release_invocation_disables_default_features() {
        let inv = cargo_invocation(&settings(BuildMode::Release, "default"), None).unwrap();
        assert_eq!(inv.program, "cargo");
        assert_eq!(inv.cwd, PathBuf::from("/p"));
        assert_eq!(
            inv.args,
            [
                "build",
                "--release",
                "--no-default-features",
                "--features",
                "default",
                "--target-dir",
                "/p/target"
            ]
        );
        assert_eq!(
            inv.envs,
            [("MACOSX_DEPLOYMENT_TARGET".to_string(), "10.11".to_string())]
        );
    }

    #[test]
    fn debug_invocation_omits_release_and_adds_target() {
        let inv = cargo_invocation(&settings(BuildMode::Debug, "x11 wayland"), Some(Arch::X86_64))
            .unwrap();
        assert!(!inv.args.iter().any(|a| a == "--release"));
        assert!(inv.args.windows(2).any(|w| w == ["--features", "wayland,x11"]));
        assert!(inv.args.windows(2).any(|w| w == ["--target", "x86_64-apple-darwin"]));
    }

    #[test]
    fn merged_binary_is_current_only_when_newer_than_slices() {
        let tmp = tempfile::tempdir().unwrap();
        let slice = tmp.path().join("x86_64/app");
        let merged = tmp.path().join("app");
        std::fs::create_dir_all(slice.parent().unwrap()).unwrap();
        std::fs::write(&slice, "slice").unwrap();

        assert!(!is_newer_than_all(&merged, std::slice::from_ref(&slice)).unwrap());

        std::thread::sleep(std::time::Duration::from_millis(20));
        std::fs::write(&merged, "fat").unwrap();
        assert!(is_newer_than_all(&merged, std::slice::from_ref(&slice)).unwrap());

        std::thread::sleep(std::time::Duration::from_millis(20));
        std::fs::write(&slice, "rebuilt").unwrap();
        assert!(!is_newer_than_all(&merged, std::slice::from_ref(&slice)).unwrap());
    }
}
