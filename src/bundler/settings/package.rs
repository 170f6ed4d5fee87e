//! Package metadata.

/// Package metadata read from the project's `Cargo.toml`.
///
/// # Examples
///
/// ```
/// use release_bundler::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     product_name: "Alacritty".into(),
///     binary_name: "alacritty".into(),
///     version: "0.4.0".into(),
/// };
/// assert_eq!(settings.app_name(), "Alacritty.app");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSettings {
    /// Product name shown to users; names the `.app` and `.dmg`.
    pub product_name: String,

    /// Name of the executable produced by the compiler.
    pub binary_name: String,

    /// Version string from `[package]`.
    pub version: String,
}

impl PackageSettings {
    /// Bundle directory name, e.g. `Alacritty.app`.
    pub fn app_name(&self) -> String {
        format!("{}.app", self.product_name)
    }

    /// Disk image file name, e.g. `Alacritty.dmg`.
    pub fn dmg_name(&self) -> String {
        format!("{}.dmg", self.product_name)
    }
}
