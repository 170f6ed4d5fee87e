//! Release directory removal.

use crate::bundler::clean_release_directory;
use crate::cli::{Args, RuntimeConfig};
use crate::error::Result;

/// Remove the release directory of the selected build mode.
///
/// Always exits 0; a removal error is still printed, even in quiet mode.
pub async fn execute_clean(args: &Args, config: &RuntimeConfig) -> Result<i32> {
    let release_dir = args.release_directory();

    match clean_release_directory(&release_dir).await {
        Ok(()) => config.success(&format!("Removed {}", release_dir.display()))?,
        Err(e) => config.error(&format!("could not remove {}: {}", release_dir.display(), e))?,
    }

    Ok(0)
}
