//! Builder for constructing Settings.

use super::{BuildConfig, DmgSettings, MacOsSettings, PackageSettings, Settings};
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// # Examples
///
/// ```
/// use release_bundler::bundler::{BuildConfig, BuildMode, PackageSettings, SettingsBuilder};
///
/// # fn example() -> release_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .manifest_path("Cargo.toml")
///     .package_settings(PackageSettings {
///         product_name: "Alacritty".into(),
///         binary_name: "alacritty".into(),
///         version: "0.4.0".into(),
///     })
///     .build_config(BuildConfig {
///         mode: BuildMode::Debug,
///         features: "default".parse()?,
///         universal: false,
///     })
///     .build()?;
/// assert!(settings.binary_path().ends_with("target/debug/alacritty"));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    manifest_path: Option<PathBuf>,
    package_settings: Option<PackageSettings>,
    build_config: BuildConfig,
    macos_settings: MacOsSettings,
    dmg_settings: DmgSettings,
    target_directory: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the project manifest path.
    ///
    /// # Required
    ///
    /// Its directory becomes the working directory of every tool.
    pub fn manifest_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.manifest_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets package metadata.
    ///
    /// # Required
    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package_settings = Some(settings);
        self
    }

    /// Sets build mode and features.
    ///
    /// Default: release build with the `default` feature
    pub fn build_config(mut self, config: BuildConfig) -> Self {
        self.build_config = config;
        self
    }

    /// Sets bundle configuration.
    pub fn macos_settings(mut self, settings: MacOsSettings) -> Self {
        self.macos_settings = settings;
        self
    }

    /// Sets disk image configuration.
    pub fn dmg_settings(mut self, settings: DmgSettings) -> Self {
        self.dmg_settings = settings;
        self
    }

    /// Sets the cargo target directory.
    ///
    /// Relative paths are resolved against the project directory.
    ///
    /// Default: `target`
    pub fn target_directory<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.target_directory = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `manifest_path` or `package_settings` is missing,
    /// or if the binary name is empty.
    pub fn build(self) -> crate::bundler::Result<Settings> {
        use crate::bundler::error::Context;

        let package = self
            .package_settings
            .context("package_settings is required")?;
        if package.binary_name.is_empty() {
            crate::bail!("binary name must not be empty");
        }

        Ok(Settings::new(
            package,
            self.build_config,
            self.macos_settings,
            self.dmg_settings,
            self.manifest_path.context("manifest_path is required")?,
            self.target_directory
                .unwrap_or_else(|| PathBuf::from("target")),
        ))
    }
}
