use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use kube_wizard::config::Config;

const MAX_LINES: usize = 1000;
const KEEP_LINES: usize = 750;

/// Trim the log file to its most recent lines once it grows too long.
pub fn rotate_log(config: &Config) {
    let log_path = config.log_path();
    let Ok(content) = std::fs::read_to_string(&log_path) else {
        return;
    };

    let lines: Vec<&str> = content.lines().collect();
    if lines.len() <= MAX_LINES {
        return;
    }

    let trimmed = lines[lines.len() - KEEP_LINES..].join("\n");
    let _ = std::fs::write(&log_path, format!("{}\n", trimmed));
}

/// File-based logging. Nothing goes to stderr so the TUI stays intact.
///
/// `RUST_LOG` overrides the default of DEBUG for this crate and WARN for
/// dependencies.
pub fn setup_logging(config: &Config) -> Result<()> {
    std::fs::create_dir_all(&config.base_dir)
        .context("Failed to create kube-wizard base directory for logging")?;

    let log_path = config.log_path();
    let log_file = open_log_file(&log_path)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kube_wizard=debug,warn"));

    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::debug!("Logging initialized, writing to {}", log_path.display());

    Ok(())
}

fn open_log_file(path: &Path) -> Result<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}
