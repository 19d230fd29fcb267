//! Versioned archive of command output.
//!
//! Files live flat in one directory as `<base>.txt` (version 1) and
//! `<base>_vN.txt`. `index.json` maps a command string to the base it was
//! last saved under, so re-saving the same command adds a version to the
//! same group.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

pub const INDEX_FILE: &str = "index.json";
const EXTENSION: &str = ".txt";

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("name must not be empty")]
    InvalidName,
    #[error("saved output '{0}' not found")]
    NotFound(String),
    #[error("'{0}' already exists")]
    AlreadyExists(String),
    #[error("no version numbers left for '{0}'")]
    VersionOverflow(String),
    #[error("{0:#}")]
    Store(anyhow::Error),
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

fn io_err(context: impl Into<String>) -> impl FnOnce(io::Error) -> ArchiveError {
    let context = context.into();
    move |source| ArchiveError::Io { context, source }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedVersion {
    pub base: String,
    pub version: u32,
    pub file_name: String,
    pub path: PathBuf,
}

impl ArchivedVersion {
    pub fn label(&self) -> String {
        format!("v{} ({})", self.version, self.file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputGroup {
    pub base: String,
    /// Ascending by version.
    pub versions: Vec<ArchivedVersion>,
}

/// Split `name_vN` into `("name", N)`. Anything else is version 1 of itself.
pub fn split_version(stem: &str) -> (&str, u32) {
    if let Some(pos) = stem.rfind("_v") {
        let (base, digits) = (&stem[..pos], &stem[pos + 2..]);
        if !base.is_empty() && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = digits.parse::<u32>() {
                return (base, n);
            }
        }
    }
    (stem, 1)
}

/// Trim whitespace and a trailing `.txt`.
pub fn sanitize_name(name: &str) -> String {
    let trimmed = name.trim();
    trimmed
        .strip_suffix(EXTENSION)
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Default base offered when saving the output of `command`.
pub fn suggest_base(command: &str) -> String {
    let body = command.trim();
    let body = body.strip_prefix("kubectl ").unwrap_or(body);
    let mut out = String::new();
    for c in body.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    let out = out.trim_matches('-').to_string();
    if out.is_empty() {
        "output".to_string()
    } else {
        out
    }
}

/// Sanitized base of a user-supplied name, rejecting empty and path-like input.
fn base_of(name: &str) -> ArchiveResult<String> {
    let name = sanitize_name(name);
    let (base, _) = split_version(&name);
    let base = base.trim();
    if base.is_empty() || base.contains('/') || base.contains('\\') || base == "." || base == ".." {
        return Err(ArchiveError::InvalidName);
    }
    Ok(base.to_string())
}

#[derive(Debug, Clone)]
pub struct SavedOutputs {
    dir: PathBuf,
}

impl SavedOutputs {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> ArchiveResult<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(io_err(format!("Failed to create {}", self.dir.display())))
    }

    fn index_path(&self) -> PathBuf {
        self.dir.join(INDEX_FILE)
    }

    /// Load the command index. Missing or malformed files read as empty.
    pub fn load_index(&self) -> BTreeMap<String, String> {
        let path = self.index_path();
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return BTreeMap::new(),
        };
        match serde_json::from_str(&contents) {
            Ok(index) => index,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse saved output index, ignoring");
                BTreeMap::new()
            }
        }
    }

    fn save_index(&self, index: &BTreeMap<String, String>) -> ArchiveResult<()> {
        self.ensure_dir()?;
        let path = self.index_path();
        let json = serde_json::to_string_pretty(index)
            .map_err(|e| io_err("Failed to serialize saved output index")(e.into()))?;
        crate::storage::write_atomic(&path, json.as_bytes()).map_err(ArchiveError::Store)
    }

    /// Drop every index entry pointing at `base`.
    fn purge_index(&self, base: &str) -> ArchiveResult<()> {
        let mut index = self.load_index();
        let before = index.len();
        index.retain(|_, v| v != base);
        if index.len() != before {
            tracing::debug!(base, removed = before - index.len(), "purged index entries");
            self.save_index(&index)?;
        }
        Ok(())
    }

    /// Every archived file, unordered.
    fn scan(&self) -> ArchiveResult<Vec<ArchivedVersion>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(format!("Failed to read {}", self.dir.display()))(e)),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_err(format!("Failed to read {}", self.dir.display())))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy().to_string();
            let Some(stem) = file_name.strip_suffix(EXTENSION) else {
                continue;
            };
            let (base, version) = split_version(stem);
            versions.push(ArchivedVersion {
                base: base.to_string(),
                version,
                file_name: file_name.clone(),
                path,
            });
        }
        Ok(versions)
    }

    /// Versions stored under `base`, ascending.
    pub fn versions(&self, base: &str) -> ArchiveResult<Vec<ArchivedVersion>> {
        let mut versions: Vec<_> = self.scan()?.into_iter().filter(|v| v.base == base).collect();
        versions.sort_by(|a, b| a.version.cmp(&b.version).then_with(|| a.file_name.cmp(&b.file_name)));
        Ok(versions)
    }

    /// All groups sorted by base.
    pub fn groups(&self) -> ArchiveResult<Vec<OutputGroup>> {
        let mut by_base: BTreeMap<String, Vec<ArchivedVersion>> = BTreeMap::new();
        for v in self.scan()? {
            by_base.entry(v.base.clone()).or_default().push(v);
        }
        Ok(by_base
            .into_iter()
            .map(|(base, mut versions)| {
                versions.sort_by(|a, b| {
                    a.version.cmp(&b.version).then_with(|| a.file_name.cmp(&b.file_name))
                });
                OutputGroup { base, versions }
            })
            .collect())
    }

    /// Save `content` under `name`, adding a version if the base already has
    /// files, and point `command` at the base in the index.
    pub fn save(&self, name: &str, content: &str, command: &str) -> ArchiveResult<ArchivedVersion> {
        let base = base_of(name)?;
        self.ensure_dir()?;

        let max_version = self
            .scan()?
            .iter()
            .filter(|v| v.base == base)
            .map(|v| v.version)
            .max()
            .unwrap_or(0);

        let (file_name, version) = if max_version == 0 {
            (format!("{}{}", base, EXTENSION), 1)
        } else {
            let next = max_version
                .checked_add(1)
                .ok_or_else(|| ArchiveError::VersionOverflow(base.clone()))?;
            (format!("{}_v{}{}", base, next, EXTENSION), next)
        };

        let path = self.dir.join(&file_name);
        std::fs::write(&path, content).map_err(io_err(format!("Failed to write {}", path.display())))?;

        let command = command.trim();
        if !command.is_empty() {
            let mut index = self.load_index();
            index.insert(command.to_string(), base.clone());
            self.save_index(&index)?;
        }

        tracing::info!(base = %base, version, file = %file_name, "saved output");
        Ok(ArchivedVersion {
            base,
            version,
            file_name,
            path,
        })
    }

    pub fn read(&self, file_name: &str) -> ArchiveResult<String> {
        let path = self.dir.join(file_name);
        match std::fs::read_to_string(&path) {
            Ok(c) => Ok(c),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ArchiveError::NotFound(file_name.to_string()))
            }
            Err(e) => Err(io_err(format!("Failed to read {}", path.display()))(e)),
        }
    }

    /// Rename every version of `old` to `new`, keeping each file's suffix.
    ///
    /// Nothing is touched if any destination file exists.
    pub fn rename(&self, old: &str, new: &str) -> ArchiveResult<()> {
        let old = sanitize_name(old);
        let new = base_of(new)?;
        if old == new {
            return Ok(());
        }

        let matched = self.versions(&old)?;
        if matched.is_empty() {
            return Err(ArchiveError::NotFound(old));
        }

        let mut plan = Vec::with_capacity(matched.len());
        for v in &matched {
            let suffix = &v.file_name[old.len()..];
            let target = format!("{}{}", new, suffix);
            let target_path = self.dir.join(&target);
            if target_path.exists() {
                return Err(ArchiveError::AlreadyExists(target));
            }
            plan.push((v.path.clone(), target_path));
        }

        let mut done: Vec<(PathBuf, PathBuf)> = Vec::new();
        for (from, to) in plan {
            if let Err(e) = std::fs::rename(&from, &to) {
                for (orig, moved) in done.iter().rev() {
                    let _ = std::fs::rename(moved, orig);
                }
                return Err(io_err(format!("Failed to rename {}", from.display()))(e));
            }
            done.push((from, to));
        }

        let mut index = self.load_index();
        let mut changed = false;
        for value in index.values_mut() {
            if *value == old {
                *value = new.clone();
                changed = true;
            }
        }
        if changed {
            self.save_index(&index)?;
        }

        tracing::info!(old = %old, new = %new, files = done.len(), "renamed saved output group");
        Ok(())
    }

    /// Delete a single version file, purging the index if its group is now empty.
    pub fn delete_version(&self, file_name: &str) -> ArchiveResult<()> {
        let stem = file_name.strip_suffix(EXTENSION).unwrap_or(file_name);
        let (base, _) = split_version(stem);
        let path = self.dir.join(file_name);
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ArchiveError::NotFound(file_name.to_string()));
            }
            Err(e) => return Err(io_err(format!("Failed to delete {}", path.display()))(e)),
        }
        tracing::info!(file = %file_name, "deleted saved output version");

        if self.versions(base)?.is_empty() {
            self.purge_index(base)?;
        }
        Ok(())
    }

    /// Delete every version of `base` and its index entries.
    pub fn delete(&self, base: &str) -> ArchiveResult<()> {
        let versions = self.versions(base)?;
        if versions.is_empty() {
            return Err(ArchiveError::NotFound(base.to_string()));
        }
        for v in &versions {
            std::fs::remove_file(&v.path)
                .map_err(io_err(format!("Failed to delete {}", v.path.display())))?;
        }
        tracing::info!(base, files = versions.len(), "deleted saved output group");

        if self.versions(base)?.is_empty() {
            self.purge_index(base)?;
        }
        Ok(())
    }

    /// Base that `command` was last saved under, if its group still exists.
    /// Stale entries are removed.
    pub fn resolve_for_command(&self, command: &str) -> ArchiveResult<Option<String>> {
        let command = command.trim();
        let mut index = self.load_index();
        let Some(base) = index.get(command).cloned() else {
            return Ok(None);
        };
        if !self.versions(&base)?.is_empty() {
            return Ok(Some(base));
        }

        tracing::debug!(command, base = %base, "dropping stale index entry");
        index.remove(command);
        self.save_index(&index)?;
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_version_requires_base_and_digits() {
        assert_eq!(split_version("pods_v3"), ("pods", 3));
        assert_eq!(split_version("pods"), ("pods", 1));
        assert_eq!(split_version("_v2"), ("_v2", 1));
        assert_eq!(split_version("pods_v"), ("pods_v", 1));
        assert_eq!(split_version("my_vault"), ("my_vault", 1));
        assert_eq!(split_version("a_v2_v5"), ("a_v2", 5));
    }

    #[test]
    fn sanitize_strips_extension_and_whitespace() {
        assert_eq!(sanitize_name("  report.txt "), "report");
        assert_eq!(sanitize_name("report"), "report");
    }

    #[test]
    fn suggested_base_is_filesystem_friendly() {
        assert_eq!(suggest_base("kubectl get pods -n default"), "get-pods-n-default");
        assert_eq!(suggest_base("kubectl"), "kubectl");
        assert_eq!(suggest_base("   "), "output");
    }
}
