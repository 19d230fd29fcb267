//! File helpers shared by the JSON stores.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Path of the sidecar written by [`backup`].
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".bak");
    PathBuf::from(name)
}

/// Copy the current content of `path` to `<path>.bak`. Missing files are skipped.
pub fn backup(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let dest = backup_path(path);
    std::fs::copy(path, &dest)
        .with_context(|| format!("Failed to back up {} to {}", path.display(), dest.display()))?;
    Ok(())
}

/// Write `contents` to a temp file next to `path`, fsync it, and rename it
/// over the target so readers never observe a partial file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let file_name = path
        .file_name()
        .with_context(|| format!("Invalid store path: {}", path.display()))?;
    let tmp_path = dir.join(format!(".{}.tmp", file_name.to_string_lossy()));

    let result = (|| -> Result<()> {
        let mut file = std::fs::File::create(&tmp_path)
            .with_context(|| format!("Failed to create temp file {}", tmp_path.display()))?;
        file.write_all(contents)
            .with_context(|| format!("Failed to write temp file {}", tmp_path.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to sync temp file {}", tmp_path.display()))?;
        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to move temp file over {}", path.display()))?;
        Ok(())
    })();

    if result.is_err() {
        let _ = std::fs::remove_file(&tmp_path);
    }
    result
}

/// Read a JSON array store. A missing file is an empty store.
pub fn read_json_list<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read {}", path.display()));
        }
    };
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn write_json_list<T: serde::Serialize>(path: &Path, items: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(items)
        .with_context(|| format!("Failed to serialize {}", path.display()))?;
    write_atomic(path, json.as_bytes())
}
