mod cli;
mod logging;
mod tui;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use kube_wizard::config::Config;
use kube_wizard::kubectl::{Kubectl, MIN_VERSION};
use tui::run_tui;

fn main() -> Result<()> {
    better_panic::install();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config)?;
    if let Some(namespace) = cli.namespace.filter(|ns| !ns.trim().is_empty()) {
        config.default_namespace = Some(namespace);
    }

    // Keep the log under 1000 lines before the subscriber opens it
    logging::rotate_log(&config);
    logging::setup_logging(&config)?;

    tracing::debug!(command = ?cli.command, "dispatching command");

    match cli.command {
        Some(Commands::Init { force }) => {
            if config.init_default_files(force)? {
                println!("kube-wizard initialized at {}", config.base_dir.display());
            } else {
                println!(
                    "{} already exists (use --force to overwrite)",
                    config.config_path().display()
                );
            }
            Ok(())
        }

        None => {
            config.ensure_dirs()?;

            let kubectl = Kubectl::new(config.kubectl.clone());
            if !kubectl.is_installed() {
                eprintln!("Error: {} is not installed or not on $PATH.\n", kubectl.binary());
                eprintln!("  Install it from https://kubernetes.io/docs/tasks/tools/");
                eprintln!("  or set `kubectl` in {}", config.config_path().display());
                std::process::exit(1);
            }
            match kubectl.client_version() {
                Ok(version) if version < MIN_VERSION => {
                    eprintln!(
                        "Warning: kubectl {}.{} is older than {}.{}; some commands may not work.",
                        version.0, version.1, MIN_VERSION.0, MIN_VERSION.1
                    );
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "could not determine kubectl version"),
            }

            run_tui(config, kubectl)
        }
    }
}
