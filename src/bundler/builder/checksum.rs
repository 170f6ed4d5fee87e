//! Artifact checksums.
//!
//! SHA-256 over a single file, or over a whole tree (the `.app` bundle) by
//! hashing each file's relative path and content in sorted order.

use std::io::Read;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::bundler::{Error, Result, error::ErrorExt};

/// Hex-encoded SHA-256 of a file or directory tree.
pub async fn calculate_sha256(path: &Path) -> Result<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || hash_path(&path))
        .await
        .map_err(|e| Error::GenericError(format!("Checksum task panicked: {}", e)))?
}

fn hash_path(path: &Path) -> Result<String> {
    let metadata = std::fs::metadata(path).fs_context("reading artifact metadata", path)?;
    let mut hasher = Sha256::new();

    if metadata.is_dir() {
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(path)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .collect();
        files.sort();

        for file in files {
            if let Ok(rel_path) = file.strip_prefix(path) {
                hasher.update(rel_path.to_string_lossy().as_bytes());
            }
            hash_file_into(&file, &mut hasher)?;
        }
    } else {
        hash_file_into(path, &mut hasher)?;
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn hash_file_into(path: &Path, hasher: &mut Sha256) -> Result<()> {
    let mut file = std::fs::File::open(path).fs_context("opening file for hashing", path)?;
    let mut buffer = [0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .fs_context("reading file for hash calculation", path)?;
        if n == 0 {
            return Ok(());
        }
        hasher.update(&buffer[..n]);
    }
}
