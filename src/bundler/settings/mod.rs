//! Configuration structures for the release pipeline.
//!
//! Settings are assembled once per invocation from CLI flags, environment
//! and the project manifest, then threaded through every stage unchanged.

mod arch;
mod build;
mod builder;
mod core;
mod macos;
mod package;

// Re-export all public types
pub use arch::Arch;
pub use build::{BuildConfig, BuildMode, FeatureSet};
pub use builder::SettingsBuilder;
pub use self::core::{STATE_FILE_NAME, Settings, project_directory_of};
pub use macos::{DEFAULT_MINIMUM_SYSTEM_VERSION, DmgSettings, MacOsSettings};
pub use package::PackageSettings;
