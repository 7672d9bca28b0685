//! Classify command implementation

use crate::cli::ClassifyArgs;
use crate::config::AppConfig;

/// Print the category of each given file name.
pub fn run(args: ClassifyArgs, config: &AppConfig) {
    let classifier = config.classifier();
    let width = args.files.iter().map(|f| f.len()).max().unwrap_or(0);

    for file in &args.files {
        let category = classifier.classify(file);
        let note = if classifier.is_supported(file) {
            ""
        } else {
            "  (no matching rule)"
        };
        println!("{:<width$}  -> {}{}", file, category, note, width = width);
    }
}
