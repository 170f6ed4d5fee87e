//! Stage orchestration.
//!
//! This module provides the [`Pipeline`] orchestrator that resolves which
//! stages must run for a requested target and executes them in order.
//!
//! # Overview
//!
//! The pipeline:
//! 1. Plans the target and its prerequisites from the [`StageGraph`]
//! 2. Skips stages whose artifacts are up to date
//! 3. Runs the rest one at a time, stopping at the first failure
//! 4. Records each stage's state and artifact checksum
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 checksum calculation for artifacts
//! - [`graph`] - Stage dependency graph
//! - [`orchestrator`] - Main [`Pipeline`] struct
//! - [`staleness`] - Timestamp-based freshness checks
//! - [`state`] - Persisted per-stage state

pub mod checksum;
pub mod graph;
mod orchestrator;
pub mod staleness;
pub mod state;

pub use graph::StageGraph;
pub use orchestrator::{Pipeline, PipelineReport, StageOutcome, clean_release_directory};
