use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::storage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favourite {
    pub name: String,
    pub command: String,
}

/// Named commands persisted as a JSON array.
#[derive(Debug)]
pub struct FavouritesStore {
    path: PathBuf,
    favourites: Vec<Favourite>,
}

impl FavouritesStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let favourites = storage::read_json_list(&path)?;
        Ok(Self { path, favourites })
    }

    pub fn list(&self) -> &[Favourite] {
        &self.favourites
    }

    pub fn get(&self, index: usize) -> Option<&Favourite> {
        self.favourites.get(index)
    }

    pub fn add(&mut self, name: &str, command: &str) -> Result<()> {
        let name = name.trim();
        let command = command.trim();
        if name.is_empty() {
            bail!("Favourite name must not be empty");
        }
        if command.is_empty() {
            bail!("Cannot save an empty command");
        }
        self.favourites.push(Favourite {
            name: name.to_string(),
            command: command.to_string(),
        });
        self.save()
    }

    pub fn delete(&mut self, index: usize) -> Result<Favourite> {
        if index >= self.favourites.len() {
            bail!("No favourite at position {}", index + 1);
        }
        let removed = self.favourites.remove(index);
        self.save()?;
        Ok(removed)
    }

    pub fn rename(&mut self, index: usize, new_name: &str) -> Result<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            bail!("Favourite name must not be empty");
        }
        let Some(fav) = self.favourites.get_mut(index) else {
            bail!("No favourite at position {}", index + 1);
        };
        fav.name = new_name.to_string();
        self.save()
    }

    fn save(&self) -> Result<()> {
        storage::write_json_list(&self.path, &self.favourites)
    }
}
