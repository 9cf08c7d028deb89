// Exclusive lock around the load/mutate/save cycle

use crate::persist::sibling;
use eyre::{Context, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Exclusive advisory lock on `<data file>.lock`
///
/// Held for as long as the value lives; the lock is released when the
/// file handle is dropped.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Block until the lock for `data_path` is acquired
    pub fn acquire(data_path: &Path) -> Result<Self> {
        let (file, path) = open_lock_file(data_path)?;

        file.lock_exclusive().context("Failed to acquire file lock")?;
        debug!(lock = ?path, "Acquired store lock");

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn open_lock_file(data_path: &Path) -> Result<(File, PathBuf)> {
    let path = sibling(data_path, "lock");
    let file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&path)
        .wrap_err_with(|| format!("Failed to open lock file {}", path.display()))?;
    Ok((file, path))
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
        debug!(lock = ?self.path, "Released store lock");
    }
}
