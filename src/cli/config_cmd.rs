//! Configuration commands

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use super::output::Output;
use crate::storage::{Config, ConfigLayer};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration for a directory
    Show {
        /// Directory (defaults to current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,
    },

    /// Write a .vsave.toml with the defaults
    Init {
        /// Directory (defaults to current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

pub fn run(cmd: ConfigCommands, output: &Output, overrides: ConfigLayer) -> Result<()> {
    match cmd {
        ConfigCommands::Show { dir } => show(output, &dir, overrides),
        ConfigCommands::Init { dir } => init(output, &dir),
    }
}

fn show(output: &Output, dir: &std::path::Path, overrides: ConfigLayer) -> Result<()> {
    let config = Config::load_for(dir, overrides)?;
    let suffix = config.suffix()?;
    let sources: Vec<_> = config
        .sources
        .iter()
        .map(|p| p.display().to_string())
        .collect();

    if output.is_json() {
        output.data(&serde_json::json!({
            "version_suffix": config.version_suffix,
            "publish_suffix": config.publish_suffix,
            "extension": config.extension,
            "branch_separator": suffix.separator(),
            "digit_width": suffix.width(),
            "sources": sources,
        }));
        return Ok(());
    }

    println!("version_suffix   = {}", config.version_suffix);
    println!("publish_suffix   = {}", config.publish_suffix);
    println!("extension        = {}", config.extension);
    println!("branch_separator = {}", suffix.separator());
    println!("digit_width      = {}", suffix.width());
    output.blank();
    if sources.is_empty() {
        println!("Sources: built-in defaults");
    } else {
        println!("Sources:");
        for source in &sources {
            println!("  {}", source);
        }
    }

    Ok(())
}

fn init(output: &Output, dir: &std::path::Path) -> Result<()> {
    let (path, created) = Config::init_local(dir)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "path": path.display().to_string(),
            "created": created,
        }));
    } else if created {
        output.success(&format!("Wrote {}", path.display()));
    } else {
        println!("{} already exists", path.display());
    }

    Ok(())
}
