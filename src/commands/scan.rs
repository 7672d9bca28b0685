//! Scan command implementation

use anyhow::Result;

use crate::cli::ScanArgs;
use crate::scanner::{format_json, format_table, ScanOptions, ScanTotals, Scanner};

/// Run the scan command
pub fn run(args: ScanArgs) -> Result<()> {
    let mut options = ScanOptions::new().with_skip_hidden(args.skip_hidden);
    if let Some(depth) = args.max_depth {
        options = options.with_max_depth(depth);
    }

    tracing::info!(path = %args.path.display(), "Scanning directory");

    let mut scanner = Scanner::new(&args.path, &options)?;
    let entries: Vec<_> = scanner.by_ref().collect();

    if args.json {
        println!("{}", format_json(&args.path, &entries, true)?);
        return Ok(());
    }

    print!("{}", format_table(&args.path, &entries));

    let totals = ScanTotals::from_entries(&entries);
    println!();
    println!(
        "Total: {} in {} files, {} directories",
        humansize::format_size(totals.bytes, humansize::BINARY),
        totals.files,
        totals.dirs
    );
    if scanner.skipped() > 0 {
        eprintln!("Skipped {} unreadable entries", scanner.skipped());
    }

    Ok(())
}
