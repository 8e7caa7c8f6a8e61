//! Diagnostics printed to stderr. Stdout is reserved for the JSON output.

use colored::Colorize;

use super::run::RunSummary;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

pub fn print(summary: &RunSummary, verbose: bool) {
    if verbose {
        for warning in &summary.warnings {
            eprintln!(
                "{} {}: {}",
                "warning:".bold().yellow(),
                warning.path.display(),
                warning.message
            );
        }
    }

    if let Some(path) = &summary.output {
        eprintln!(
            "{} Documented {} {} in {}",
            SUCCESS_MARK.green(),
            summary.component_count,
            plural(summary.component_count, "component", "components"),
            path.display()
        );
    }

    if !verbose && !summary.warnings.is_empty() {
        eprintln!(
            "{} {} {} skipped (use --verbose for details)",
            "warning:".bold().yellow(),
            summary.warnings.len(),
            plural(summary.warnings.len(), "file", "files"),
        );
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
