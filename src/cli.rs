use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kube-wizard")]
#[command(about = "Kube Wizard - Build, run and archive kubectl commands from a terminal menu")]
#[command(version)]
pub struct Cli {
    /// Directory holding config.toml, favourites, history and saved outputs
    #[arg(long, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// Default namespace for this session (overrides config.toml)
    #[arg(short, long, value_name = "NS")]
    pub namespace: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the config directory and a default config.toml
    Init {
        /// Overwrite an existing config.toml
        #[arg(short, long)]
        force: bool,
    },
}
