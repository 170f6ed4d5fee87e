//! Main pipeline orchestration.
//!
//! This module provides the [`Pipeline`] orchestrator that runs a requested
//! stage together with every prerequisite whose output is missing or stale.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::bundler::{
    CommandRunner, Error, Result, Settings, Stage, SystemRunner,
    platform::{cargo, macos},
    utils::fs,
};

use super::{
    checksum::calculate_sha256,
    graph::StageGraph,
    staleness::{self, Freshness, StaleReason},
    state::{PipelineState, StageState},
};

/// What happened to one planned stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage ran and succeeded.
    Executed {
        /// Stage that ran
        stage: Stage,
        /// Artifact it produced, if it has one
        artifact: Option<PathBuf>,
        /// SHA-256 of the artifact
        checksum: Option<String>,
        /// One-line confirmation for the user
        summary: String,
    },
    /// The stage's output was already up to date.
    Skipped {
        /// Stage that was skipped
        stage: Stage,
        /// Its existing artifact
        artifact: Option<PathBuf>,
    },
}

impl StageOutcome {
    /// The stage this outcome is about.
    pub fn stage(&self) -> Stage {
        match self {
            StageOutcome::Executed { stage, .. } | StageOutcome::Skipped { stage, .. } => *stage,
        }
    }

    /// Whether the stage actually ran.
    pub fn was_executed(&self) -> bool {
        matches!(self, StageOutcome::Executed { .. })
    }
}

/// Result of a successful [`Pipeline::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    requested: Stage,
    outcomes: Vec<StageOutcome>,
}

impl PipelineReport {
    /// Stage the caller asked for.
    pub fn requested(&self) -> Stage {
        self.requested
    }

    /// Outcomes in execution order.
    pub fn outcomes(&self) -> &[StageOutcome] {
        &self.outcomes
    }

    /// Stages that ran, in order.
    pub fn executed(&self) -> Vec<Stage> {
        self.outcomes
            .iter()
            .filter(|o| o.was_executed())
            .map(StageOutcome::stage)
            .collect()
    }

    /// Stages that were skipped as up to date, in order.
    pub fn skipped(&self) -> Vec<Stage> {
        self.outcomes
            .iter()
            .filter(|o| !o.was_executed())
            .map(StageOutcome::stage)
            .collect()
    }
}

/// Output of one stage execution.
struct Executed {
    artifact: Option<PathBuf>,
    summary: String,
}

/// Main pipeline orchestrator.
///
/// Stages run strictly one after another: a stage starts only after its
/// prerequisite returned success, and every external tool is awaited to
/// completion. There is no locking; two pipelines must not share a release
/// directory at the same time.
///
/// # Examples
///
/// ```no_run
/// use release_bundler::bundler::{Pipeline, Settings, Stage};
///
/// # async fn example(settings: Settings) -> release_bundler::bundler::Result<()> {
/// let report = Pipeline::new(settings).run(Stage::Package).await?;
/// for stage in report.executed() {
///     println!("ran {stage}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<R: CommandRunner = SystemRunner> {
    settings: Settings,
    runner: R,
    graph: StageGraph,
    force: bool,
}

impl<R: CommandRunner> std::fmt::Debug for Pipeline<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("settings", &self.settings)
            .field("graph", &self.graph)
            .field("force", &self.force)
            .finish_non_exhaustive()
    }
}

impl Pipeline<SystemRunner> {
    /// Creates a pipeline that spawns real tools.
    pub fn new(settings: Settings) -> Self {
        Self::with_runner(settings, SystemRunner)
    }
}

impl<R: CommandRunner> Pipeline<R> {
    /// Creates a pipeline that runs external tools through `runner`.
    pub fn with_runner(settings: Settings, runner: R) -> Self {
        Self {
            settings,
            runner,
            graph: StageGraph::new(),
            force: false,
        }
    }

    /// Ignore staleness and re-run every planned stage.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Returns the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the stage graph.
    pub fn graph(&self) -> &StageGraph {
        &self.graph
    }

    /// Returns the command runner.
    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run `target` and every prerequisite that is missing or stale.
    ///
    /// Each planned stage runs at most once, in dependency order. The first
    /// failure aborts the run: the failing stage is recorded as `Failed`, and
    /// if it was a prerequisite the error is wrapped in
    /// [`Error::DependencyFailure`].
    pub async fn run(&self, target: Stage) -> Result<PipelineReport> {
        let plan = self.graph.plan(target)?;
        log::info!(
            "Plan for `{}`: {}",
            target,
            plan.iter()
                .map(Stage::command)
                .collect::<Vec<_>>()
                .join(" → ")
        );

        let state_path = self.settings.state_file();
        let mut state = PipelineState::load(&state_path).await?;
        let mut outcomes = Vec::with_capacity(plan.len());

        for stage in plan {
            let artifact = self.settings.stage_artifact(stage);

            match self.freshness(stage, &state)? {
                Freshness::UpToDate => {
                    log::info!("`{}` is up to date", stage);
                    outcomes.push(StageOutcome::Skipped { stage, artifact });
                    continue;
                }
                Freshness::Stale(reason) => log::info!("Running `{}` ({})", stage, reason),
            }

            let fingerprint = self.settings.stage_fingerprint(stage);
            let started = Utc::now();
            state.transition(stage, StageState::Building, &fingerprint, None, started);
            state.save(&state_path).await?;

            let (executed, checksum) = match self.execute_and_checksum(stage).await {
                Ok(done) => done,
                Err(e) => {
                    let e = record_failure(&mut state, &state_path, stage, target, &fingerprint, e);
                    return Err(e.await);
                }
            };

            state.transition(
                stage,
                StageState::Present,
                &fingerprint,
                checksum.clone(),
                started,
            );
            state.save(&state_path).await?;

            outcomes.push(StageOutcome::Executed {
                stage,
                artifact: executed.artifact,
                checksum,
                summary: executed.summary,
            });
        }

        Ok(PipelineReport {
            requested: target,
            outcomes,
        })
    }

    /// Remove the release directory of the configured build mode.
    ///
    /// Idempotent; succeeds when nothing exists.
    pub async fn clean(&self) -> Result<PathBuf> {
        let release_dir = self.settings.release_directory();
        clean_release_directory(&release_dir).await?;
        Ok(release_dir)
    }

    fn freshness(&self, stage: Stage, state: &PipelineState) -> Result<Freshness> {
        if self.force {
            return Ok(Freshness::Stale(StaleReason::Forced));
        }
        if stage.delegates_staleness() {
            return Ok(Freshness::Stale(StaleReason::Delegated));
        }

        staleness::check(
            state.record(stage),
            self.settings.stage_artifact(stage).as_deref(),
            &self.settings.stage_fingerprint(stage),
            &self.settings.stage_inputs(stage),
        )
    }

    /// Execute `stage` and hash its artifact; either failing fails the stage.
    async fn execute_and_checksum(&self, stage: Stage) -> Result<(Executed, Option<String>)> {
        let executed = self.execute(stage).await?;
        let checksum = match &executed.artifact {
            Some(path) => Some(calculate_sha256(path).await?),
            None => None,
        };
        Ok((executed, checksum))
    }

    async fn execute(&self, stage: Stage) -> Result<Executed> {
        let settings = &self.settings;

        match stage {
            Stage::Build => {
                let binary = cargo::build_binary(settings, &self.runner).await?;
                Ok(Executed {
                    summary: format!(
                        "Built '{}' in '{}'",
                        settings.binary_name(),
                        settings.release_directory().display()
                    ),
                    artifact: Some(binary),
                })
            }
            Stage::Bundle => {
                let bundle = macos::app::bundle_project(settings).await?;
                Ok(Executed {
                    summary: format!(
                        "Created '{}' in '{}'",
                        settings.app_name(),
                        settings.app_directory().display()
                    ),
                    artifact: Some(bundle),
                })
            }
            Stage::Package => {
                let dmg = macos::dmg::bundle_project(settings, &self.runner).await?;
                Ok(Executed {
                    summary: format!(
                        "Packed '{}' in '{}'",
                        settings.dmg_name(),
                        settings.app_directory().display()
                    ),
                    artifact: Some(dmg),
                })
            }
            Stage::Install => {
                let dmg = macos::install::open_disk_image(settings, &self.runner).await?;
                Ok(Executed {
                    summary: format!("Opened '{}'", dmg.display()),
                    artifact: None,
                })
            }
        }
    }
}

/// Record `stage` as `Failed` and shape the error returned for `target`.
///
/// A failing prerequisite is wrapped in [`Error::DependencyFailure`]. The
/// original error is returned even if the state file cannot be written.
async fn record_failure(
    state: &mut PipelineState,
    state_path: &Path,
    stage: Stage,
    target: Stage,
    fingerprint: &str,
    error: Error,
) -> Error {
    log::error!("`{}` failed: {}", stage, error);
    state.transition(stage, StageState::Failed, fingerprint, None, Utc::now());
    if let Err(save_err) = state.save(state_path).await {
        log::warn!("Could not record failure of `{}`: {}", stage, save_err);
    }

    if stage == target {
        error
    } else {
        Error::DependencyFailure {
            requested: target,
            failed: stage,
            source: Box::new(error),
        }
    }
}

/// Remove `release_dir` and everything under it.
///
/// Unconditional and idempotent.
pub async fn clean_release_directory(release_dir: &Path) -> Result<()> {
    log::info!("Removing {}", release_dir.display());
    fs::remove_dir_all(release_dir).await
}
