//! Release pipeline: build → bundle → package → install.
//!
//! - [`builder`] orchestrates stages over a dependency graph
//! - [`platform`] holds the stage implementations (cargo, .app, .dmg, open)
//! - [`process`] is the seam to external tools
//! - [`settings`] is the immutable per-invocation configuration
//!
//! Concurrent invocations against the same release directory are not
//! synchronised; callers must not run two pipelines on one target at once.

pub mod builder;
pub mod error;
pub mod platform;
pub mod process;
pub mod settings;
mod stage;
pub mod utils;

pub use builder::{Pipeline, PipelineReport, StageGraph, StageOutcome, clean_release_directory};
pub use error::{Error, Result};
pub use process::{CommandRunner, SystemRunner, ToolInvocation, ToolOutput};
pub use settings::{
    Arch, BuildConfig, BuildMode, DEFAULT_MINIMUM_SYSTEM_VERSION, DmgSettings, FeatureSet,
    MacOsSettings, PackageSettings, Settings, SettingsBuilder, project_directory_of,
};
pub use stage::Stage;
