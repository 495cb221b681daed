//! Main CLI application structure

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use super::output::{Output, OutputFormat};
use super::{config_cmd, list_cmd, logging, version_cmd};
use crate::storage::{ConfigLayer, VersionedFile};

#[derive(Parser)]
#[command(name = "vsave")]
#[command(author, version, about = "Versioned saves for project files")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Version suffix template (e.g. _v001)
    #[arg(long, global = true, env = "VSAVE_SUFFIX", allow_hyphen_values = true)]
    pub suffix: Option<String>,

    /// Suffix for published copies (e.g. _published)
    #[arg(long, global = true, env = "VSAVE_PUBLISH_SUFFIX", allow_hyphen_values = true)]
    pub publish_suffix: Option<String>,

    /// Project file extension (e.g. blend)
    #[arg(long, global = true, env = "VSAVE_EXTENSION")]
    pub extension: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the name the next version would get
    Next {
        /// Project file
        file: PathBuf,
    },

    /// Save a copy of the file as its next version
    Increment {
        /// Project file
        file: PathBuf,

        /// Show the target without writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Copy the file to its published name
    Publish {
        /// Project file
        file: PathBuf,

        /// Show the targets without writing them
        #[arg(long)]
        dry_run: bool,
    },

    /// List the project's files grouped by version lineage
    List {
        /// Project file
        file: PathBuf,
    },

    /// Print the path of a listed file
    Resolve {
        /// Project file
        file: PathBuf,

        /// File name from `vsave list`
        name: String,
    },

    /// Open the directory containing the file
    OpenDir {
        /// Project file
        file: PathBuf,
    },

    /// Show or create configuration
    #[command(subcommand)]
    Config(config_cmd::ConfigCommands),
}

impl Cli {
    /// Settings given on the command line, overriding config files
    fn overrides(&self) -> ConfigLayer {
        ConfigLayer {
            version_suffix: self.suffix.clone(),
            publish_suffix: self.publish_suffix.clone(),
            extension: self.extension.clone(),
            branch_separator: None,
        }
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let output = Output::new(cli.format);
    let overrides = cli.overrides();

    match cli.command {
        Commands::Next { file } => version_cmd::next(&output, &open(&file, &overrides)?)?,
        Commands::Increment { file, dry_run } => {
            version_cmd::increment(&output, &open(&file, &overrides)?, dry_run)?
        }
        Commands::Publish { file, dry_run } => {
            version_cmd::publish(&output, &open(&file, &overrides)?, dry_run)?
        }
        Commands::List { file } => list_cmd::list(&output, &open(&file, &overrides)?)?,
        Commands::Resolve { file, name } => {
            list_cmd::resolve(&output, &open(&file, &overrides)?, &name)?
        }
        Commands::OpenDir { file } => {
            let file = open(&file, &overrides)?;
            open_directory(file.dir())?;
            output.success(&format!("Opened {}", file.dir().display()));
        }
        Commands::Config(cmd) => config_cmd::run(cmd, &output, overrides)?,
    }

    debug!("command completed");
    Ok(())
}

fn open(file: &Path, overrides: &ConfigLayer) -> Result<VersionedFile> {
    VersionedFile::open_with(file, overrides.clone())
}

/// Opens a directory with the platform file manager
fn open_directory(dir: &Path) -> Result<()> {
    let opener = if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    };

    debug!(opener, dir = %dir.display(), "opening directory");
    Command::new(opener)
        .arg(dir)
        .spawn()
        .with_context(|| format!("Failed to run '{}' for {}", opener, dir.display()))?;

    Ok(())
}
