//! Build mode and feature selection.

use crate::bundler::Error;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Compiler profile; also namespaces the release directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Unoptimized build under `target/debug`.
    Debug,
    /// Optimized build under `target/release`.
    #[default]
    Release,
}

impl BuildMode {
    /// Mode selected by the `DEBUG` switch.
    pub fn from_debug_flag(debug: bool) -> Self {
        if debug { BuildMode::Debug } else { BuildMode::Release }
    }

    /// Profile directory name under the target directory.
    pub fn profile_dir(&self) -> &'static str {
        match self {
            BuildMode::Debug => "debug",
            BuildMode::Release => "release",
        }
    }

    /// Release directory for this mode under `target_dir`.
    pub fn release_directory(&self, target_dir: &Path) -> PathBuf {
        target_dir.join(self.profile_dir())
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile_dir())
    }
}

/// Non-empty set of cargo features.
///
/// Parsed from a comma and/or whitespace separated token list. Default
/// platform features are always disabled, so the literal `default` must be
/// listed to get them back.
///
/// ```
/// use release_bundler::bundler::FeatureSet;
///
/// let features: FeatureSet = "wayland, x11".parse().unwrap();
/// assert_eq!(features.joined(), "wayland,x11");
/// assert!("  ".parse::<FeatureSet>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet(BTreeSet<String>);

impl FeatureSet {
    /// Features joined with commas, as cargo expects them.
    pub fn joined(&self) -> String {
        self.0.iter().map(String::as_str).collect::<Vec<_>>().join(",")
    }

    /// Iterate over feature names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for FeatureSet {
    fn default() -> Self {
        Self(BTreeSet::from(["default".to_string()]))
    }
}

impl FromStr for FeatureSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let features: BTreeSet<String> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .map(str::to_owned)
            .collect();

        if features.is_empty() {
            return Err(Error::InvalidFeatureSet(s.to_string()));
        }
        Ok(Self(features))
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Immutable build configuration for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildConfig {
    /// Debug or release.
    pub mode: BuildMode,
    /// Features enabled on top of `--no-default-features`.
    pub features: FeatureSet,
    /// Build x86_64 and aarch64 slices and merge them with `lipo`.
    pub universal: bool,
}
