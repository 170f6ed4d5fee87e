//! Command execution functions for pipeline operations.

mod clean;
mod help;
mod stage;

pub use clean::execute_clean;
pub use help::{execute_help, render_help};
pub use stage::execute_stage;
