use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::command::TOOL;

#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub saved_outputs_dir: PathBuf,
    pub kubectl: String,
    pub default_namespace: Option<String>,
}

/// On-disk config file (~/.kube-wizard/config.toml).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub default_namespace: Option<String>,
    pub saved_outputs_dir: Option<String>,
    pub kubectl: Option<String>,
}

/// Read `<base_dir>/config.toml`, returning defaults if missing or unparseable.
pub fn load_config_file(base_dir: &Path) -> ConfigFile {
    let path = base_dir.join("config.toml");
    match std::fs::read_to_string(&path) {
        Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
            Ok(cf) => cf,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse config.toml, using defaults");
                ConfigFile::default()
            }
        },
        Err(_) => ConfigFile::default(),
    }
}

/// Write a `ConfigFile` to `<base_dir>/config.toml`.
pub fn save_config_file(base_dir: &Path, config_file: &ConfigFile) -> Result<()> {
    let path = base_dir.join("config.toml");
    let contents = toml::to_string_pretty(config_file)
        .context("failed to serialize config.toml")?;
    std::fs::write(&path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

impl Config {
    pub fn new(base_dir: PathBuf) -> Self {
        let saved_outputs_dir = base_dir.join("saved_cmd");
        Self {
            base_dir,
            saved_outputs_dir,
            kubectl: TOOL.to_string(),
            default_namespace: None,
        }
    }

    /// Load from `~/.kube-wizard`, or from `base_dir` when given.
    pub fn load(base_dir: Option<PathBuf>) -> Result<Self> {
        let base_dir = match base_dir {
            Some(dir) => dir,
            None => {
                let home_dir = dirs::home_dir().context("Could not find home directory")?;
                home_dir.join(".kube-wizard")
            }
        };
        Ok(Self::from_file(base_dir))
    }

    /// Apply `<base_dir>/config.toml` on top of the defaults.
    pub fn from_file(base_dir: PathBuf) -> Self {
        let config_file = load_config_file(&base_dir);
        let mut config = Self::new(base_dir);
        if let Some(dir) = config_file.saved_outputs_dir {
            config.saved_outputs_dir = PathBuf::from(dir);
        }
        if let Some(bin) = config_file.kubectl.filter(|b| !b.trim().is_empty()) {
            config.kubectl = bin;
        }
        config.default_namespace = config_file
            .default_namespace
            .filter(|ns| !ns.trim().is_empty());

        tracing::debug!(
            base_dir = %config.base_dir.display(),
            saved_outputs_dir = %config.saved_outputs_dir.display(),
            kubectl = %config.kubectl,
            "config loaded"
        );
        config
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.base_dir).context("Failed to create base directory")?;
        std::fs::create_dir_all(&self.saved_outputs_dir)
            .context("Failed to create saved outputs directory")?;
        Ok(())
    }

    /// Create the directories and write a config.toml reflecting the current
    /// settings. An existing file is kept unless `force` is set. Returns
    /// whether the file was written.
    pub fn init_default_files(&self, force: bool) -> Result<bool> {
        self.ensure_dirs()?;
        if self.config_path().exists() && !force {
            return Ok(false);
        }
        let config_file = ConfigFile {
            default_namespace: self.default_namespace.clone(),
            saved_outputs_dir: Some(self.saved_outputs_dir.display().to_string()),
            kubectl: Some(self.kubectl.clone()),
        };
        save_config_file(&self.base_dir, &config_file)?;
        Ok(true)
    }

    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join("config.toml")
    }

    pub fn log_path(&self) -> PathBuf {
        self.base_dir.join("kube-wizard.log")
    }

    pub fn favourites_path(&self) -> PathBuf {
        self.base_dir.join("favourites.json")
    }

    pub fn history_path(&self) -> PathBuf {
        self.base_dir.join("history.json")
    }

    pub fn hotkeys_path(&self) -> PathBuf {
        self.base_dir.join("hotkeys.json")
    }
}
