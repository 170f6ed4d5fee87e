//! macOS platform-specific settings.

use std::path::PathBuf;

/// Deployment target used when none is configured.
pub const DEFAULT_MINIMUM_SYSTEM_VERSION: &str = "10.11";

/// macOS application bundle (.app) configuration.
///
/// # Configuration
///
/// Add to `Cargo.toml`:
///
/// ```toml
/// [package.metadata.bundle.macos]
/// minimum_system_version = "10.11"
/// template = "extra/osx/Alacritty.app"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct MacOsSettings {
    /// Minimum macOS version, exported as `MACOSX_DEPLOYMENT_TARGET` to the compiler.
    pub minimum_system_version: String,

    /// Bundle template directory, relative to the project directory.
    ///
    /// Default: None (`extra/osx/{ProductName}.app`)
    pub template: Option<PathBuf>,
}

impl Default for MacOsSettings {
    fn default() -> Self {
        Self {
            minimum_system_version: DEFAULT_MINIMUM_SYSTEM_VERSION.to_string(),
            template: None,
        }
    }
}

/// macOS DMG disk image configuration.
///
/// ```toml
/// [package.metadata.bundle.dmg]
/// volume_name = "Alacritty"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct DmgSettings {
    /// Volume name shown when the image is mounted.
    ///
    /// Default: None (product name)
    pub volume_name: Option<String>,

    /// Filesystem passed to `hdiutil -fs`.
    pub filesystem: String,

    /// Image format passed to `hdiutil -format`.
    pub format: String,
}

impl Default for DmgSettings {
    fn default() -> Self {
        Self {
            volume_name: None,
            filesystem: "HFS+".to_string(),
            format: "UDZO".to_string(),
        }
    }
}
