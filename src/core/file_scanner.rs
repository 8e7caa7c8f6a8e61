use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::Pattern;
use walkdir::WalkDir;

use crate::core::extract::naming::relative_path;

/// Result of scanning files.
pub struct ScanResult {
    /// Matching files, sorted.
    pub files: Vec<PathBuf>,
    /// Entries that could not be read, as messages.
    pub skipped: Vec<String>,
}

/// Walk `root` and collect the files whose root-relative path matches `pattern`
/// and none of `ignore_patterns`.
///
/// JavaScript files are only returned when `allow_js` is set.
pub fn scan_files(
    root: &Path,
    pattern: &str,
    ignore_patterns: &[String],
    allow_js: bool,
) -> Result<ScanResult> {
    let include = Pattern::new(pattern)
        .with_context(|| format!("Invalid glob pattern in 'pattern': \"{}\"", pattern))?;
    let ignores = ignore_patterns
        .iter()
        .map(|p| {
            Pattern::new(p).with_context(|| format!("Invalid glob pattern in 'ignore': \"{}\"", p))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut files = BTreeSet::new();
    let mut skipped = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                skipped.push(format!("Cannot access path: {}", e));
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || !is_scannable_file(path, allow_js) {
            continue;
        }

        let relative = relative_path(root, path);
        if ignores.iter().any(|p| p.matches(&relative)) {
            continue;
        }
        if include.matches(&relative) {
            files.insert(path.to_path_buf());
        }
    }

    Ok(ScanResult {
        files: files.into_iter().collect(),
        skipped,
    })
}

fn is_scannable_file(path: &Path, allow_js: bool) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ts" | "tsx" | "mts" | "cts") => true,
        Some("js" | "jsx" | "mjs" | "cjs") => allow_js,
        _ => false,
    }
}
