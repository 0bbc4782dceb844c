//! Build readiness and scratch-copy preparation.
//!
//! A cache root is *usable* when it exists and *fresh* when it holds the
//! build marker written at the end of a full build. Deploy targets with a
//! read-only filesystem copy the durable cache into a writable scratch root
//! before first use.

use crate::error::{StoreError, StoreResult};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use walkdir::WalkDir;

/// File name of the build-complete marker inside a cache root.
pub const BUILD_MARKER: &str = "build.log";

/// Informational contents of the build marker.
pub const BUILD_MARKER_CONTENTS: &str = "BUILT";

/// Whether a local mirror can be used at all.
#[must_use]
pub fn is_mirror_usable(cache_root: &Path) -> bool {
    cache_root.exists()
}

/// Whether a full build has completed into this cache root.
#[must_use]
pub fn is_mirror_fresh(cache_root: &Path) -> bool {
    cache_root.join(BUILD_MARKER).exists()
}

/// Writes the build marker, replacing any previous one.
pub async fn mark_built(cache_root: &Path) -> StoreResult<()> {
    fs::create_dir_all(cache_root).await?;
    clear_built(cache_root).await?;
    fs::write(cache_root.join(BUILD_MARKER), BUILD_MARKER_CONTENTS).await?;
    info!("Marked build complete in {}", cache_root.display());
    Ok(())
}

/// Removes the build marker. A missing marker is not an error.
pub async fn clear_built(cache_root: &Path) -> StoreResult<()> {
    match fs::remove_file(cache_root.join(BUILD_MARKER)).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// What [`prepare_scratch_mirror`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareOutcome {
    /// The scratch root already had its own build marker.
    AlreadyPrepared,
    /// The durable cache was copied.
    Copied { files: usize },
}

/// Copies the durable cache into the scratch root unless the scratch root
/// already carries a build marker.
///
/// Safe to call on every cold start. Not safe against concurrent callers
/// populating the same scratch root.
pub async fn prepare_scratch_mirror(
    durable_root: &Path,
    scratch_root: &Path,
) -> StoreResult<PrepareOutcome> {
    if is_mirror_fresh(scratch_root) {
        debug!("Scratch mirror is up to date: {}", scratch_root.display());
        return Ok(PrepareOutcome::AlreadyPrepared);
    }

    if !durable_root.exists() {
        return Err(StoreError::Unavailable(format!(
            "durable mirror not found at {}",
            durable_root.display()
        )));
    }

    info!(
        "Copying content cache from {} to scratch folder {}",
        durable_root.display(),
        scratch_root.display()
    );

    let from = durable_root.to_path_buf();
    let to = scratch_root.to_path_buf();
    let files = tokio::task::spawn_blocking(move || copy_tree(&from, &to))
        .await
        .map_err(|e| StoreError::Task(e.to_string()))??;

    Ok(PrepareOutcome::Copied { files })
}

/// Recursively copies `from` into `to`, returning the number of files copied.
///
/// The build marker is copied last, so a copy that fails partway leaves the
/// scratch root unmarked and the next cold start copies again.
fn copy_tree(from: &Path, to: &Path) -> StoreResult<usize> {
    std::fs::create_dir_all(to)?;
    let mut files = 0;

    for entry in WalkDir::new(from).min_depth(1) {
        let entry = entry.map_err(|e| StoreError::Io(e.into()))?;
        let relative = entry.path().strip_prefix(from).map_err(io::Error::other)?;
        if relative == Path::new(BUILD_MARKER) {
            continue;
        }
        let target: PathBuf = to.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
            files += 1;
        }
    }

    let marker = from.join(BUILD_MARKER);
    if marker.is_file() {
        std::fs::copy(&marker, to.join(BUILD_MARKER))?;
        files += 1;
    }

    Ok(files)
}
