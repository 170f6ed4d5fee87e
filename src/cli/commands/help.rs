//! Stage and configuration listing.

use std::fmt::Write;

use crate::bundler::{BuildMode, DEFAULT_MINIMUM_SYSTEM_VERSION, StageGraph};
use crate::cli::RuntimeConfig;
use crate::error::Result;

/// Configuration parameters: (name, default, description).
const PARAMETERS: &[(&str, &str, &str)] = &[
    ("DEBUG / --debug", "false", "Build in debug mode; artifacts go under target/debug"),
    (
        "FEATURES / --features",
        "default",
        "Cargo features to enable; default features are always disabled",
    ),
    ("--universal", "false", "Build x86_64 and aarch64 slices and merge them with lipo"),
    ("--force", "false", "Re-run every stage even when up to date"),
    ("--manifest-path", "Cargo.toml", "Project manifest"),
    ("--target-dir", "target", "Cargo target directory"),
    ("-q / --quiet", "false", "Print only errors and external tool output"),
];

/// Render the stage and configuration listing.
///
/// Pure introspection; reads neither the manifest nor the filesystem.
pub fn render_help() -> crate::bundler::Result<String> {
    let graph = StageGraph::new();
    let mut out = String::new();

    // Writing to a String cannot fail.
    let _ = writeln!(out, "Stages (each runs its prerequisites first):");
    for stage in graph.stages()? {
        let _ = writeln!(out, "  {:<10}{}", stage.command(), stage.description());

        let requires = graph
            .prerequisites(stage)?
            .iter()
            .map(|s| s.command())
            .collect::<Vec<_>>();
        if !requires.is_empty() {
            let _ = writeln!(out, "  {:<10}  requires: {}", "", requires.join(", "));
        }
        match stage.artifact_pattern() {
            Some(pattern) => {
                let _ = writeln!(out, "  {:<10}  output:   {}", "", pattern);
            }
            None => {
                let _ = writeln!(out, "  {:<10}  output:   none (always runs)", "");
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Other commands:");
    let _ = writeln!(out, "  {:<10}{}", "clean", "Remove the release directory of the selected build mode");
    let _ = writeln!(out, "  {:<10}{}", "help", "Show this listing (default)");

    let _ = writeln!(out);
    let _ = writeln!(out, "Configuration:");
    for (name, default, description) in PARAMETERS {
        let _ = writeln!(out, "  {:<24}{} (default: {})", name, description, default);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "ReleaseDirectory is {{target}}/{}|{}; macOS deployment target defaults to {}.",
        BuildMode::Debug,
        BuildMode::Release,
        DEFAULT_MINIMUM_SYSTEM_VERSION
    );

    Ok(out)
}

/// Print the listing. Always succeeds with exit code 0.
pub fn execute_help(config: &RuntimeConfig) -> Result<i32> {
    config.output().raw(&render_help()?)?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_names_every_stage_in_order() {
        let help = render_help().unwrap();
        let positions: Vec<usize> = ["binary", "app", "dmg", "install"]
            .iter()
            .map(|cmd| help.find(&format!("  {cmd} ")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn listing_names_configuration_parameters() {
        let help = render_help().unwrap();
        assert!(help.contains("DEBUG"));
        assert!(help.contains("FEATURES"));
        assert!(help.contains("clean"));
    }
}
