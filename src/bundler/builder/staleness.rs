//! Timestamp-based staleness checks.
//!
//! A stage is up to date when its record says `Present`, its artifact still
//! exists, its configuration fingerprint is unchanged, and no input was
//! modified after the stage last started. Comparing inputs against the
//! record time rather than the artifact's own mtime sidesteps directory
//! mtimes and copies that keep old timestamps.
//!
//! Filesystems with coarse timestamp resolution can miss an edit made in the
//! same tick a stage started; `--force` exists for that case.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::state::{StageRecord, StageState};
use crate::bundler::{Result, error::ErrorExt};

/// Why a stage has to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    /// Staleness checks are disabled for this run.
    Forced,
    /// The stage has no artifact to check.
    AlwaysRuns,
    /// The stage's tool decides for itself what to rebuild.
    Delegated,
    /// No record exists.
    NeverBuilt,
    /// The last run never finished.
    Interrupted,
    /// The last run failed.
    PreviouslyFailed,
    /// The recorded artifact is gone.
    ArtifactMissing(PathBuf),
    /// The stage ran with different configuration.
    ConfigChanged,
    /// An input was modified after the stage last ran.
    InputChanged {
        /// Newest input
        path: PathBuf,
        /// Its modification time
        modified: DateTime<Utc>,
    },
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaleReason::Forced => f.write_str("forced"),
            StaleReason::AlwaysRuns => f.write_str("always runs"),
            StaleReason::Delegated => f.write_str("tool checks its own inputs"),
            StaleReason::NeverBuilt => f.write_str("never built"),
            StaleReason::Interrupted => f.write_str("previous run was interrupted"),
            StaleReason::PreviouslyFailed => f.write_str("previous run failed"),
            StaleReason::ArtifactMissing(path) => write!(f, "{} is missing", path.display()),
            StaleReason::ConfigChanged => f.write_str("configuration changed"),
            StaleReason::InputChanged { path, modified } => write!(
                f,
                "{} modified {}",
                path.display(),
                modified.format("%Y-%m-%d %H:%M:%S UTC")
            ),
        }
    }
}

/// Outcome of a staleness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Freshness {
    /// Output is current; skip the stage.
    UpToDate,
    /// Stage must run.
    Stale(StaleReason),
}

/// Newest modification time among `inputs`, walking directories.
///
/// Missing inputs are skipped; `None` when nothing exists.
pub fn newest_modification(inputs: &[PathBuf]) -> Result<Option<(PathBuf, DateTime<Utc>)>> {
    let mut newest: Option<(PathBuf, DateTime<Utc>)> = None;

    for input in inputs {
        if std::fs::symlink_metadata(input).is_err() {
            continue;
        }

        for entry in walkdir::WalkDir::new(input).follow_links(false) {
            let entry = entry?;
            let modified: DateTime<Utc> = entry
                .metadata()?
                .modified()
                .fs_context("reading modification time", entry.path())?
                .into();

            if newest.as_ref().is_none_or(|(_, time)| modified > *time) {
                newest = Some((entry.path().to_path_buf(), modified));
            }
        }
    }

    Ok(newest)
}

/// Decide whether a stage with `record` must run.
///
/// `artifact` is `None` for stages without output, which always run.
pub fn check(
    record: Option<&StageRecord>,
    artifact: Option<&Path>,
    fingerprint: &str,
    inputs: &[PathBuf],
) -> Result<Freshness> {
    let Some(artifact) = artifact else {
        return Ok(Freshness::Stale(StaleReason::AlwaysRuns));
    };
    let Some(record) = record else {
        return Ok(Freshness::Stale(StaleReason::NeverBuilt));
    };

    match record.state {
        StageState::Building => return Ok(Freshness::Stale(StaleReason::Interrupted)),
        StageState::Failed => return Ok(Freshness::Stale(StaleReason::PreviouslyFailed)),
        StageState::Present => {}
    }

    if !artifact.exists() {
        return Ok(Freshness::Stale(StaleReason::ArtifactMissing(
            artifact.to_path_buf(),
        )));
    }

    if record.fingerprint != fingerprint {
        return Ok(Freshness::Stale(StaleReason::ConfigChanged));
    }

    if let Some((path, modified)) = newest_modification(inputs)?
        && modified > record.updated_at
    {
        return Ok(Freshness::Stale(StaleReason::InputChanged { path, modified }));
    }

    Ok(Freshness::UpToDate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(state: StageState, updated_at: DateTime<Utc>) -> StageRecord {
        StageRecord {
            state,
            updated_at,
            fingerprint: "fp".into(),
            checksum: None,
        }
    }

    fn fixture() -> (tempfile::TempDir, PathBuf, Vec<PathBuf>) {
        let tmp = tempfile::tempdir().unwrap();
        let artifact = tmp.path().join("artifact");
        std::fs::write(&artifact, "out").unwrap();
        let input_dir = tmp.path().join("inputs");
        std::fs::create_dir_all(input_dir.join("nested")).unwrap();
        std::fs::write(input_dir.join("nested/file"), "in").unwrap();
        (tmp, artifact, vec![input_dir])
    }

    #[test]
    fn present_and_newer_than_inputs_is_up_to_date() {
        let (_tmp, artifact, inputs) = fixture();
        let rec = record(StageState::Present, Utc::now() + Duration::hours(1));
        assert_eq!(
            check(Some(&rec), Some(&artifact), "fp", &inputs).unwrap(),
            Freshness::UpToDate
        );
    }

    #[test]
    fn input_modified_after_record_is_stale() {
        let (_tmp, artifact, inputs) = fixture();
        let rec = record(StageState::Present, Utc::now() - Duration::hours(1));
        match check(Some(&rec), Some(&artifact), "fp", &inputs).unwrap() {
            Freshness::Stale(StaleReason::InputChanged { path, .. }) => {
                assert!(path.starts_with(&inputs[0]));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn failed_and_interrupted_records_never_satisfy() {
        let (_tmp, artifact, inputs) = fixture();
        let future = Utc::now() + Duration::hours(1);
        assert_eq!(
            check(Some(&record(StageState::Failed, future)), Some(&artifact), "fp", &inputs)
                .unwrap(),
            Freshness::Stale(StaleReason::PreviouslyFailed)
        );
        assert_eq!(
            check(Some(&record(StageState::Building, future)), Some(&artifact), "fp", &inputs)
                .unwrap(),
            Freshness::Stale(StaleReason::Interrupted)
        );
    }

    #[test]
    fn missing_artifact_or_changed_config_is_stale() {
        let (tmp, artifact, inputs) = fixture();
        let rec = record(StageState::Present, Utc::now() + Duration::hours(1));
        assert_eq!(
            check(Some(&rec), Some(&artifact), "other", &inputs).unwrap(),
            Freshness::Stale(StaleReason::ConfigChanged)
        );
        let gone = tmp.path().join("gone");
        assert_eq!(
            check(Some(&rec), Some(&gone), "fp", &inputs).unwrap(),
            Freshness::Stale(StaleReason::ArtifactMissing(gone.clone()))
        );
    }

    #[test]
    fn stages_without_artifacts_always_run() {
        assert_eq!(
            check(None, None, "fp", &[]).unwrap(),
            Freshness::Stale(StaleReason::AlwaysRuns)
        );
    }

    #[test]
    fn missing_inputs_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        assert_eq!(newest_modification(&[tmp.path().join("absent")]).unwrap(), None);
    }
}
