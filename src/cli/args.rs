//! Command line argument parsing and validation.
//!
//! Stage commands and configuration parameters. `DEBUG` and `FEATURES` are
//! read from the environment when the matching flag is absent.

use clap::{Parser, Subcommand, builder::FalseyValueParser};
use std::path::PathBuf;

use crate::bundler::{
    BuildConfig, BuildMode, FeatureSet, Stage, project_directory_of,
};

/// Release packaging pipeline for a desktop binary
#[derive(Parser, Debug)]
#[command(
    name = "release_bundler",
    version,
    about = "Release packaging pipeline for a desktop binary",
    long_about = "Builds the executable, wraps it in a macOS .app bundle, packs the bundle into a .dmg disk image and opens the image.

Each command runs its prerequisites first and skips any whose artifacts are up to date.

Usage:
  release_bundler              list stages and configuration
  release_bundler app          build + bundle
  DEBUG=1 release_bundler dmg  debug build, bundle and disk image
  release_bundler clean        remove the release directory",
    disable_help_subcommand = true
)]
pub struct Args {
    /// Command to run (default: help)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Build in debug mode (artifacts under target/debug)
    #[arg(
        long,
        env = "DEBUG",
        global = true,
        value_parser = FalseyValueParser::new()
    )]
    pub debug: bool,

    /// Cargo features to enable; default features are always disabled
    #[arg(
        long,
        env = "FEATURES",
        default_value = "default",
        global = true,
        value_name = "FEATURES",
        value_parser = parse_features
    )]
    pub features: FeatureSet,

    /// Build x86_64 and aarch64 slices and merge them with lipo
    #[arg(long, global = true)]
    pub universal: bool,

    /// Re-run every stage even when its artifacts are up to date
    #[arg(long, global = true)]
    pub force: bool,

    /// Path to the project's Cargo.toml
    #[arg(long, global = true, value_name = "PATH", default_value = "Cargo.toml")]
    pub manifest_path: PathBuf,

    /// Print only errors and external tool output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Cargo target directory, relative to the project directory
    #[arg(long, global = true, value_name = "DIR", default_value = "target")]
    pub target_dir: PathBuf,
}

/// Pipeline commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// List stages and configuration parameters
    Help,
    /// Build the executable
    Binary,
    /// Build and assemble the .app bundle
    App,
    /// Build, bundle and pack the .dmg disk image
    Dmg,
    /// Build, bundle, pack and open the disk image
    Install,
    /// Remove the release directory
    Clean,
}

impl Command {
    /// Pipeline stage this command targets, if it runs one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Command::Binary => Some(Stage::Build),
            Command::App => Some(Stage::Bundle),
            Command::Dmg => Some(Stage::Package),
            Command::Install => Some(Stage::Install),
            Command::Help | Command::Clean => None,
        }
    }
}

fn parse_features(s: &str) -> Result<FeatureSet, String> {
    s.parse().map_err(|e: crate::bundler::Error| e.to_string())
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Command to run; `help` when none is given.
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Help)
    }

    /// Build configuration selected by the flags.
    pub fn build_config(&self) -> BuildConfig {
        BuildConfig {
            mode: BuildMode::from_debug_flag(self.debug),
            features: self.features.clone(),
            universal: self.universal,
        }
    }

    /// Release directory for the selected build mode.
    ///
    /// Computed without reading the manifest, so `clean` works on a broken
    /// project.
    pub fn release_directory(&self) -> PathBuf {
        let target_dir = project_directory_of(&self.manifest_path).join(&self.target_dir);
        BuildMode::from_debug_flag(self.debug).release_directory(&target_dir)
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        Self {
            output: super::OutputManager::new(args.quiet),
        }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print success message if not in quiet mode
    pub fn success(&self, message: &str) -> std::io::Result<()> {
        self.output.success(message)
    }

    /// Print error message
    pub fn error(&self, message: &str) -> std::io::Result<()> {
        self.output.error(message)
    }

    /// Print progress message
    pub fn progress(&self, message: &str) -> std::io::Result<()> {
        self.output.progress(message)
    }

    /// Print indented text
    pub fn indent(&self, message: &str) -> std::io::Result<()> {
        self.output.indent(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("release_bundler").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn no_command_means_help() {
        assert_eq!(parse(&[]).command(), Command::Help);
    }

    #[test]
    fn commands_map_to_stages() {
        assert_eq!(parse(&["binary"]).command().stage(), Some(Stage::Build));
        assert_eq!(parse(&["app"]).command().stage(), Some(Stage::Bundle));
        assert_eq!(parse(&["dmg"]).command().stage(), Some(Stage::Package));
        assert_eq!(parse(&["install"]).command().stage(), Some(Stage::Install));
        assert_eq!(parse(&["clean"]).command().stage(), None);
    }

    #[test]
    fn flags_select_build_config() {
        let args = parse(&["dmg", "--debug", "--features", "wayland x11", "--universal"]);
        let config = args.build_config();
        assert_eq!(config.mode, BuildMode::Debug);
        assert_eq!(config.features.joined(), "wayland,x11");
        assert!(config.universal);
    }

    #[test]
    fn empty_features_are_rejected() {
        assert!(
            Args::try_parse_from(["release_bundler", "binary", "--features", " "]).is_err()
        );
    }

    #[test]
    fn release_directory_follows_manifest_and_mode() {
        let args = parse(&["clean", "--manifest-path", "/p/Cargo.toml"]);
        assert_eq!(args.release_directory(), PathBuf::from("/p/target/release"));

        let args = parse(&["clean", "--debug", "--target-dir", "out"]);
        assert_eq!(args.release_directory(), PathBuf::from("./out/debug"));
    }
}
