use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::organizer::ConflictAction;

/// Rusty Organizer - sort files into category folders by extension
#[derive(Parser, Debug)]
#[command(name = "rusty-organizer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (JSON, or TOML with a .toml extension)
    #[arg(short, long, global = true, value_name = "PATH", env = "RUSTY_ORGANIZER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Move files into category folders
    Organize(OrganizeArgs),

    /// List the entries of a directory tree with their metadata
    Scan(ScanArgs),

    /// Show which category file names map to
    Classify(ClassifyArgs),

    /// Inspect or create the configuration file
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct OrganizeArgs {
    /// Directory to organize (defaults to sourcePath from the config, then ".")
    pub path: Option<PathBuf>,

    /// Show what would be moved without doing it
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// What to do when a file of the same name exists: rename, skip, overwrite
    #[arg(long, value_name = "ACTION")]
    pub conflict: Option<ConflictAction>,

    /// Root for category folders instead of the source directory
    #[arg(short, long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Also organize files in subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Add a date folder below each category
    #[arg(long)]
    pub date_folders: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Maximum depth (1 = immediate children)
    #[arg(short = 'd', long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Leave out hidden files and directories
    #[arg(long)]
    pub skip_hidden: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// File names to classify
    #[arg(required = true)]
    pub files: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as JSON
    Show,

    /// Write the default configuration file
    Init {
        /// Replace an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}
