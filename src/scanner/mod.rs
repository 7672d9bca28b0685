mod entry;
mod formatter;
mod options;
mod walker;

pub use entry::ScanEntry;
pub use formatter::{format_json, format_table, ScanTotals};
pub use options::ScanOptions;
pub use walker::{scan_directory, Scanner};
