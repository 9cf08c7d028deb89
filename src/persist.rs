// JSON file operations

use eyre::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Read the whole collection from a JSON array file
///
/// A missing file is the first-run case and yields an empty collection.
/// A file that exists but cannot be read or decoded is an error.
pub fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(file = ?path, "No data file yet, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e).wrap_err_with(|| format!("Failed to read {}", path.display())),
    };

    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<T> =
        serde_json::from_str(&content).wrap_err_with(|| format!("Malformed task file {}", path.display()))?;

    info!(file = ?path, count = records.len(), "Loaded records");
    Ok(records)
}

/// Overwrite `path` with the whole collection as indented JSON
///
/// The data goes to a sibling temp file first and is renamed into place,
/// so readers never observe a half-written file.
pub fn write_collection<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let tmp_path = sibling(path, "tmp");

    let mut json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;
    json.push('\n');

    let mut file =
        File::create(&tmp_path).wrap_err_with(|| format!("Failed to create {}", tmp_path.display()))?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    drop(file);

    fs::rename(&tmp_path, path).wrap_err_with(|| format!("Failed to replace {}", path.display()))?;

    debug!(file = ?path, count = records.len(), "Saved records");
    Ok(())
}

/// `tasks.json` -> `tasks.json.<ext>`
pub(crate) fn sibling(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(ext);
    path.with_file_name(name)
}
