//! Organize command implementation.

use anyhow::Result;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::OrganizeArgs;
use crate::config::AppConfig;
use crate::organizer::{DateFormat, FileAction, OrganizeReport, Organizer};

/// Run the organize command.
///
/// Returns `Ok(false)` when the run finished but some files failed.
pub fn run(args: OrganizeArgs, config: &AppConfig, quiet: bool) -> Result<bool> {
    let source = args
        .path
        .clone()
        .or_else(|| config.source_dir())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut options = config.organize_options()?;
    if args.dry_run {
        options = options.with_dry_run(true);
    }
    if let Some(action) = args.conflict {
        options = options.with_conflict_action(action);
    }
    if let Some(dest) = args.dest {
        options = options.with_destination(dest);
    }
    if args.recursive {
        options = options.with_recursive(true);
    }
    if args.date_folders && options.date_folders.is_none() {
        options = options.with_date_folders(DateFormat::new(&config.organizing.date_format));
    }

    let organizer = Organizer::new(config.classifier(), options);

    let progress = if quiet || args.json {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template("{spinner} {pos} files  {msg}")?);
        bar.enable_steady_tick(Duration::from_millis(100));
        bar
    };

    tracing::info!(path = %source.display(), "Starting file organization");

    let report = organizer.organize_with(&source, |outcome| {
        progress.inc(1);
        if let Some(name) = outcome.source.file_name() {
            progress.set_message(name.to_string_lossy().into_owned());
        }
    })?;
    progress.finish_and_clear();

    tracing::info!(result = %report.message(), "File organization completed");

    if args.json {
        let output = serde_json::json!({
            "report": &report,
            "summary": report.summary(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_report(&report, quiet);
    }

    Ok(report.success())
}

fn print_report(report: &OrganizeReport, quiet: bool) {
    let prefix = if report.dry_run { "[DRY RUN] " } else { "" };

    if !quiet {
        for outcome in &report.outcomes {
            if outcome.success() {
                println!("{}{}", prefix, outcome.message());
            }
        }
    }

    for outcome in report.failures() {
        eprintln!("Error: {}", outcome.message());
    }

    let summary = report.summary();

    if report.is_empty() {
        println!("{}Nothing to organize in {}", prefix, report.source.display());
        return;
    }

    println!();
    println!("{}{}", prefix, report.message());
    println!("  Moved:       {}", summary.moved);
    if summary.renamed > 0 {
        println!("  Renamed:     {}", summary.renamed);
    }
    if summary.overwritten > 0 {
        println!("  Overwritten: {}", summary.overwritten);
    }
    if summary.skipped > 0 {
        println!("  Skipped:     {}", summary.skipped);
        if !quiet {
            for outcome in &report.outcomes {
                if let FileAction::Skipped { reason } = &outcome.action {
                    println!("    {}: {}", outcome.source.display(), reason);
                }
            }
        }
    }
    if summary.failed > 0 {
        println!("  Failed:      {}", summary.failed);
    }
    println!("  Size:        {}", format_size(summary.bytes, BINARY));

    if let Some(dir) = &report.backup_dir {
        println!("  Backup:      {}", dir.display());
    }
    if report.unreadable > 0 {
        println!("  Unreadable:  {}", report.unreadable);
    }
}
