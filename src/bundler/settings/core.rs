//! Core Settings struct and artifact layout.

use super::{Arch, BuildConfig, DmgSettings, MacOsSettings, PackageSettings};
use crate::bundler::Stage;
use std::path::{Path, PathBuf};

/// Name of the per-release-directory stage state file.
pub const STATE_FILE_NAME: &str = ".release-state.json";

/// Main settings for one pipeline invocation.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder) and never
/// mutated afterwards. Every artifact path is derived from here:
///
/// ```text
/// {target}/{debug|release}/                 ReleaseDirectory
/// {target}/{debug|release}/{binary}         Executable
/// {target}/{debug|release}/osx/{App}.app    Bundle
/// {target}/{debug|release}/osx/{App}.dmg    DiskImage
/// ```
///
/// # Examples
///
/// ```
/// use release_bundler::bundler::{PackageSettings, SettingsBuilder};
///
/// # fn example() -> release_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .manifest_path("/src/alacritty/Cargo.toml")
///     .package_settings(PackageSettings {
///         product_name: "Alacritty".into(),
///         binary_name: "alacritty".into(),
///         version: "0.4.0".into(),
///     })
///     .build()?;
///
/// assert!(settings.dmg_path().ends_with("target/release/osx/Alacritty.dmg"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    /// Package metadata.
    package: PackageSettings,

    /// Build mode and features.
    build: BuildConfig,

    /// Bundle configuration.
    macos: MacOsSettings,

    /// Disk image configuration.
    dmg: DmgSettings,

    /// Project manifest (`Cargo.toml`).
    manifest_path: PathBuf,

    /// Directory containing the manifest; working directory for all tools.
    project_directory: PathBuf,

    /// Cargo target directory, absolute or joined onto the project directory.
    target_directory: PathBuf,
}

impl Settings {
    /// Returns the product name.
    pub fn product_name(&self) -> &str {
        &self.package.product_name
    }

    /// Returns the executable name.
    pub fn binary_name(&self) -> &str {
        &self.package.binary_name
    }

    /// Returns the version string.
    pub fn version_string(&self) -> &str {
        &self.package.version
    }

    /// Returns the build configuration.
    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }

    /// Returns the macOS bundle settings.
    pub fn macos_settings(&self) -> &MacOsSettings {
        &self.macos
    }

    /// Returns the disk image settings.
    pub fn dmg_settings(&self) -> &DmgSettings {
        &self.dmg
    }

    /// Returns the project manifest path.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Returns the project directory.
    pub fn project_directory(&self) -> &Path {
        &self.project_directory
    }

    /// Returns the cargo target directory.
    pub fn target_directory(&self) -> &Path {
        &self.target_directory
    }

    /// Root of all artifacts for the configured build mode.
    pub fn release_directory(&self) -> PathBuf {
        self.build.mode.release_directory(&self.target_directory)
    }

    /// Path of the executable produced by the Builder.
    pub fn binary_path(&self) -> PathBuf {
        self.release_directory().join(self.binary_name())
    }

    /// Path where cargo leaves the executable for one universal slice.
    pub fn arch_binary_path(&self, arch: Arch) -> PathBuf {
        self.target_directory
            .join(arch.apple_target_triple())
            .join(self.build.mode.profile_dir())
            .join(self.binary_name())
    }

    /// Returns the bundle directory name (`{ProductName}.app`).
    pub fn app_name(&self) -> String {
        self.package.app_name()
    }

    /// Directory holding the bundle and the disk image.
    pub fn app_directory(&self) -> PathBuf {
        self.release_directory().join("osx")
    }

    /// Path of the assembled `.app` bundle.
    pub fn app_bundle_path(&self) -> PathBuf {
        self.app_directory().join(self.app_name())
    }

    /// Directory inside the bundle that holds the executable.
    pub fn app_binary_directory(&self) -> PathBuf {
        self.app_bundle_path().join("Contents").join("MacOS")
    }

    /// Path of the executable inside the bundle.
    pub fn bundled_binary_path(&self) -> PathBuf {
        self.app_binary_directory().join(self.binary_name())
    }

    /// Bundle template directory.
    pub fn template_path(&self) -> PathBuf {
        match &self.macos.template {
            Some(template) => self.project_directory.join(template),
            None => self
                .project_directory
                .join("extra")
                .join("osx")
                .join(self.app_name()),
        }
    }

    /// Returns the disk image file name (`{ProductName}.dmg`).
    pub fn dmg_name(&self) -> String {
        self.package.dmg_name()
    }

    /// Path of the packed disk image.
    pub fn dmg_path(&self) -> PathBuf {
        self.app_directory().join(self.dmg_name())
    }

    /// Volume name of the disk image.
    pub fn volume_name(&self) -> &str {
        self.dmg
            .volume_name
            .as_deref()
            .unwrap_or(&self.package.product_name)
    }

    /// Location of the persisted stage state.
    pub fn state_file(&self) -> PathBuf {
        self.release_directory().join(STATE_FILE_NAME)
    }

    /// Artifact produced by `stage`, if it has one.
    pub fn stage_artifact(&self, stage: Stage) -> Option<PathBuf> {
        match stage {
            Stage::Build => Some(self.binary_path()),
            Stage::Bundle => Some(self.app_bundle_path()),
            Stage::Package => Some(self.dmg_path()),
            Stage::Install => None,
        }
    }

    /// Files and trees whose modification makes `stage` stale.
    ///
    /// Inputs that do not exist are ignored by the staleness check. `Build`
    /// has none here; cargo tracks its own.
    pub fn stage_inputs(&self, stage: Stage) -> Vec<PathBuf> {
        match stage {
            Stage::Build => Vec::new(),
            Stage::Bundle => vec![self.binary_path(), self.template_path()],
            Stage::Package => vec![self.app_bundle_path()],
            Stage::Install => vec![self.dmg_path()],
        }
    }

    /// Configuration that shaped `stage`'s artifact.
    ///
    /// A recorded fingerprint that differs from this one marks the stage stale.
    pub fn stage_fingerprint(&self, stage: Stage) -> String {
        match stage {
            Stage::Build => format!(
                "mode={};features={};universal={};macos={}",
                self.build.mode,
                self.build.features,
                self.build.universal,
                self.macos.minimum_system_version
            ),
            Stage::Bundle => format!(
                "app={};template={}",
                self.app_name(),
                self.template_path().display()
            ),
            Stage::Package => format!(
                "dmg={};volume={};fs={};format={}",
                self.dmg_name(),
                self.volume_name(),
                self.dmg.filesystem,
                self.dmg.format
            ),
            Stage::Install => format!("dmg={}", self.dmg_name()),
        }
    }

    /// Creates a new Settings instance (used by SettingsBuilder).
    pub(super) fn new(
        package: PackageSettings,
        build: BuildConfig,
        macos: MacOsSettings,
        dmg: DmgSettings,
        manifest_path: PathBuf,
        target_directory: PathBuf,
    ) -> Self {
        let project_directory = project_directory_of(&manifest_path);
        let target_directory = project_directory.join(target_directory);

        Self {
            package,
            build,
            macos,
            dmg,
            manifest_path,
            project_directory,
            target_directory,
        }
    }
}

/// Directory containing `manifest_path`, or `.` for a bare file name.
pub fn project_directory_of(manifest_path: &Path) -> PathBuf {
    manifest_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
