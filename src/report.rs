//! End-of-run reporting.

use crate::cleaner::{CleanupOutcome, Removal};

use colored::Colorize;
use humansize::{format_size, BINARY};
use std::path::Path;

/// Sink for the single end-of-run report. A successful outcome must be
/// distinguishable from a failed or partially-failed one; everything else
/// about presentation is up to the implementation.
pub trait Notifier {
    /// The walk completed and produced an outcome (possibly with skips).
    fn cleaned(&self, root: &Path, outcome: &CleanupOutcome);

    /// Invocation-level failure; no outcome was produced.
    fn failed(&self, message: &str);
}

/// Terminal presentation of the report.
pub struct ConsoleNotifier {
    verbose: bool,
}

impl ConsoleNotifier {
    pub fn new(verbose: bool) -> Self {
        ConsoleNotifier { verbose }
    }
}

impl Notifier for ConsoleNotifier {
    fn cleaned(&self, root: &Path, outcome: &CleanupOutcome) {
        if outcome.removals.is_empty() {
            println!("No bin or obj directories found under {}.", root.display());
            return;
        }

        if self.verbose {
            for removal in &outcome.removals {
                if let Removal::Deleted { path, bytes } = removal {
                    println!("Removed {} ({})", path.display(), format_size(*bytes, BINARY));
                }
            }
        }

        for removal in &outcome.removals {
            if let Removal::Skipped { path, kind, reason } = removal {
                eprintln!(
                    "{}",
                    format!("Skipped {} ({}): {}", path.display(), kind.label(), reason).yellow()
                );
            }
        }

        let deleted = outcome.deleted_count();
        let summary = format!(
            "Removed {} {} ({} reclaimed)",
            deleted,
            if deleted == 1 { "directory" } else { "directories" },
            format_size(outcome.bytes_reclaimed(), BINARY)
        );

        if outcome.is_clean() {
            println!("{}", summary.green().bold());
        } else {
            println!(
                "{}",
                format!("{}, {} skipped", summary, outcome.skipped_count())
                    .yellow()
                    .bold()
            );
        }
    }

    fn failed(&self, message: &str) {
        eprintln!("{}", format!("Error: {}", message).red());
    }
}
