//! Release Bundler - build, bundle, pack and install a desktop application.
//!
//! This binary drives the release pipeline (binary → .app → .dmg → install)
//! with timestamp-based staleness checks and stage-level error reporting.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match release_bundler::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(output) = e.tool_output() {
                eprintln!("{}", output.trim_end());
            }
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
