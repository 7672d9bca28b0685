use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use rusty_organizer::cli::{Cli, Command};
use rusty_organizer::commands;
use rusty_organizer::config::AppConfig;

/// Exit status when a run finished but some files could not be organized.
const EXIT_PARTIAL_FAILURE: u8 = 3;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Configuration comes first: it names the optional log file
    let config = AppConfig::load(cli.config.as_deref())?;

    init_logging(cli.verbose, cli.quiet, config.log_file().as_deref());

    tracing::debug!(?config, "Loaded configuration");

    let mut success = true;

    // Dispatch to subcommand
    match cli.command {
        Command::Organize(args) => {
            tracing::info!(?args, "Starting organize");
            success = commands::organize::run(args, &config, cli.quiet)?;
        }
        Command::Scan(args) => {
            tracing::info!(?args, "Starting scan");
            commands::scan::run(args)?;
        }
        Command::Classify(args) => {
            commands::classify::run(args, &config);
        }
        Command::Config(cmd) => {
            commands::config::run(cmd, &config, cli.config.as_deref())?;
        }
        Command::Completions(args) => {
            clap_complete::generate(
                args.shell,
                &mut Cli::command(),
                "rusty-organizer",
                &mut io::stdout(),
            );
        }
    }

    if success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_PARTIAL_FAILURE))
    }
}

fn init_logging(verbosity: u8, quiet: bool, log_file: Option<&Path>) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = if quiet {
        "warn"
    } else {
        match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rusty_organizer={}", level)));

    let mut open_error = None;
    let file_layer = log_file.and_then(|path| match open_log(path) {
        Ok(file) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        ),
        Err(e) => {
            open_error = Some((path.to_path_buf(), e));
            None
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    if let Some((path, e)) = open_error {
        tracing::warn!(path = %path.display(), error = %e, "Cannot open log file");
    }
}

fn open_log(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}
