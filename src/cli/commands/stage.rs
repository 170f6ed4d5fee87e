//! Stage commands: binary, app, dmg, install.

use crate::bundler::{Error, Pipeline, SettingsBuilder, Stage, StageOutcome};
use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;
use crate::metadata::load_manifest;

/// Run `stage` and its prerequisites.
///
/// On a stage failure prints the failing stage, then the external tool's
/// output verbatim, and returns exit code 1.
pub async fn execute_stage(args: &Args, stage: Stage, config: &RuntimeConfig) -> Result<i32> {
    let manifest = load_manifest(&args.manifest_path)?;

    let settings = SettingsBuilder::new()
        .manifest_path(&args.manifest_path)
        .package_settings(manifest.package)
        .build_config(args.build_config())
        .macos_settings(manifest.macos)
        .dmg_settings(manifest.dmg)
        .target_directory(&args.target_dir)
        .build()?;

    config.progress(&format!(
        "{} {} v{} ({}, features: {})",
        stage.command(),
        settings.product_name(),
        settings.version_string(),
        settings.build_config().mode,
        settings.build_config().features
    ))?;

    let pipeline = Pipeline::new(settings).force(args.force);

    match pipeline.run(stage).await {
        Ok(report) => {
            for outcome in report.outcomes() {
                match outcome {
                    StageOutcome::Executed { summary, .. } => config.success(summary)?,
                    StageOutcome::Skipped { stage, .. } => {
                        config.indent(&format!("`{}` is up to date", stage))?
                    }
                }
            }
            Ok(0)
        }
        Err(e) => {
            config.error(&format!("stage `{}` failed: {}", failed_stage(&e, stage), e))?;
            if let Some(output) = e.tool_output() {
                config.output().tool_output(output)?;
            }
            Ok(1)
        }
    }
}

fn failed_stage(error: &Error, requested: Stage) -> Stage {
    match error {
        Error::DependencyFailure { failed, .. } => *failed,
        _ => requested,
    }
}
