use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::storage;

/// Function keys available for binding.
pub const KEYS: [&str; 12] = [
    "F1", "F2", "F3", "F4", "F5", "F6", "F7", "F8", "F9", "F10", "F11", "F12",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotkey {
    pub key: String,
    pub name: String,
    pub command: String,
}

/// Upper-case a key name and check it is one of `F1`..`F12`.
pub fn normalize_key(key: &str) -> Option<String> {
    let key = key.trim().to_uppercase();
    KEYS.contains(&key.as_str()).then_some(key)
}

pub fn key_for_function(n: u8) -> Option<&'static str> {
    KEYS.get(usize::from(n).checked_sub(1)?).copied()
}

fn key_order(key: &str) -> usize {
    KEYS.iter().position(|k| *k == key).unwrap_or(KEYS.len())
}

/// Function-key bindings persisted as a JSON array.
#[derive(Debug)]
pub struct HotkeysStore {
    path: PathBuf,
    bindings: Vec<Hotkey>,
}

impl HotkeysStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let mut bindings: Vec<Hotkey> = storage::read_json_list(&path)?;
        for b in &mut bindings {
            b.key = b.key.to_uppercase();
        }
        bindings.sort_by_key(|b| key_order(&b.key));
        Ok(Self { path, bindings })
    }

    /// Bindings in key order.
    pub fn list(&self) -> &[Hotkey] {
        &self.bindings
    }

    pub fn get(&self, key: &str) -> Option<&Hotkey> {
        let key = key.to_uppercase();
        self.bindings.iter().find(|b| b.key == key)
    }

    /// Bind `key`, replacing any existing binding for it.
    pub fn bind(&mut self, key: &str, name: &str, command: &str) -> Result<()> {
        let key = normalize_key(key).with_context(|| format!("Unsupported hotkey: {}", key))?;
        self.bindings.retain(|b| b.key != key);
        self.bindings.push(Hotkey {
            key,
            name: name.trim().to_string(),
            command: command.trim().to_string(),
        });
        self.bindings.sort_by_key(|b| key_order(&b.key));
        self.save()
    }

    /// Remove the binding for `key`. Returns whether one existed.
    pub fn unbind(&mut self, key: &str) -> Result<bool> {
        let key = key.to_uppercase();
        let before = self.bindings.len();
        self.bindings.retain(|b| b.key != key);
        if self.bindings.len() == before {
            return Ok(false);
        }
        self.save()?;
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        storage::write_json_list(&self.path, &self.bindings)
    }
}
