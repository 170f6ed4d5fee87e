//! macOS application bundle, disk image and install stages.

pub mod app;
pub mod dmg;
pub mod install;
