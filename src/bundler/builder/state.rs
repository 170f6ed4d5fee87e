//! Persisted per-stage state.
//!
//! One JSON file per release directory records, for every stage that has
//! started at least once, whether it is still building, present or failed.
//! A missing record means the stage is absent.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::bundler::{Result, Stage, error::ErrorExt};

/// Lifecycle of a stage: `Absent → Building → (Present | Failed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageState {
    /// Started and not yet finished; left behind by an interrupted run.
    Building,
    /// Finished successfully.
    Present,
    /// Finished with an error; never treated as satisfied.
    Failed,
}

/// Last known state of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    /// Current state
    pub state: StageState,
    /// When the state was last changed
    pub updated_at: DateTime<Utc>,
    /// Configuration the stage ran with
    pub fingerprint: String,
    /// SHA-256 of the artifact, once present
    #[serde(default)]
    pub checksum: Option<String>,
}

/// All stage records of one release directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    #[serde(default)]
    stages: BTreeMap<String, StageRecord>,
}

impl PipelineState {
    /// Load state from `path`.
    ///
    /// A missing file is an empty state. An unreadable or corrupt file is
    /// discarded with a warning, which makes every stage run again.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).fs_context("reading pipeline state", path),
        };

        match serde_json::from_str(&content) {
            Ok(state) => Ok(state),
            Err(e) => {
                log::warn!(
                    "Ignoring corrupt pipeline state {}: {}",
                    path.display(),
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Write state to `path`, creating its directory.
    ///
    /// Written to a sibling file and renamed into place.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating state directory", parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .fs_context("writing pipeline state", &tmp)?;
        tokio::fs::rename(&tmp, path)
            .await
            .fs_context("replacing pipeline state", path)?;
        Ok(())
    }

    /// Record for `stage`, `None` while absent.
    pub fn record(&self, stage: Stage) -> Option<&StageRecord> {
        self.stages.get(stage.state_key())
    }

    /// Move `stage` to `state`, stamped with `at`.
    ///
    /// A `Present` record must carry the time the stage started, so inputs
    /// edited while its tool ran still count as newer than the output.
    pub fn transition(
        &mut self,
        stage: Stage,
        state: StageState,
        fingerprint: &str,
        checksum: Option<String>,
        at: DateTime<Utc>,
    ) {
        self.stages.insert(
            stage.state_key().to_string(),
            StageRecord {
                state,
                updated_at: at,
                fingerprint: fingerprint.to_string(),
                checksum,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_empty_state() {
        let tmp = tempfile::tempdir().unwrap();
        let state = PipelineState::load(&tmp.path().join("state.json")).await.unwrap();
        assert_eq!(state, PipelineState::default());
    }

    #[tokio::test]
    async fn records_survive_a_save_load_cycle() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("release/.release-state.json");

        let mut state = PipelineState::default();
        state.transition(
            Stage::Build,
            StageState::Present,
            "mode=release",
            Some("ab".into()),
            Utc::now(),
        );
        state.transition(Stage::Bundle, StageState::Failed, "app=X.app", None, Utc::now());
        state.save(&path).await.unwrap();

        let loaded = PipelineState::load(&path).await.unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.record(Stage::Bundle).unwrap().state, StageState::Failed);
        assert!(loaded.record(Stage::Package).is_none());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"present\""));
    }

    #[tokio::test]
    async fn corrupt_state_is_discarded() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        let state = PipelineState::load(&path).await.unwrap();
        assert!(state.record(Stage::Build).is_none());
    }
}
