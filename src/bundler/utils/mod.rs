//! Shared helpers for stage implementations.

pub mod fs;
