//! Config command implementation

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::cli::ConfigCommand;
use crate::config::AppConfig;

fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(AppConfig::default_path)
        .context("No configuration directory available; pass --config")
}

pub fn run(command: ConfigCommand, config: &AppConfig, explicit: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigCommand::Init { force } => {
            let path = resolve_path(explicit)?;
            if path.exists() && !force {
                bail!(
                    "Config file {} already exists (use --force to replace it)",
                    path.display()
                );
            }
            AppConfig::default().save(&path)?;
            println!("Wrote default configuration to {}", path.display());
        }
        ConfigCommand::Path => {
            println!("{}", resolve_path(explicit)?.display());
        }
    }

    Ok(())
}
