use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::storage;

/// Oldest entries beyond this are dropped.
pub const MAX_ENTRIES: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub command: String,
    pub executed_at: DateTime<Utc>,
}

/// Executed commands, newest first. Every write backs up the previous file
/// and replaces it atomically.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = storage::read_json_list(&path)?;
        Ok(Self { path, entries })
    }

    pub fn add(&mut self, command: &str) -> Result<()> {
        self.add_at(command, Utc::now())
    }

    pub fn add_at(&mut self, command: &str, executed_at: DateTime<Utc>) -> Result<()> {
        let command = command.trim();
        if command.is_empty() {
            return Ok(());
        }
        self.entries.insert(
            0,
            HistoryEntry {
                command: command.to_string(),
                executed_at,
            },
        );
        self.entries.truncate(MAX_ENTRIES);
        self.save()
    }

    /// Entries sorted newest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn save(&self) -> Result<()> {
        storage::backup(&self.path)?;
        storage::write_json_list(&self.path, &self.entries)
    }
}
