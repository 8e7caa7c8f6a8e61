use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};

use super::args::Arguments;
use crate::core::pipeline::{ParseWarning, parse};

/// What a run produced, for reporting.
pub struct RunSummary {
    pub component_count: usize,
    pub warnings: Vec<ParseWarning>,
    /// Output file, `None` when written to stdout.
    pub output: Option<PathBuf>,
}

/// Document the requested sources and write the JSON output.
pub fn run(args: &Arguments) -> Result<RunSummary> {
    let sources = args.sources()?;
    let result = parse(&sources)?;

    let json = if args.compact {
        serde_json::to_string(&result.components)
    } else {
        serde_json::to_string_pretty(&result.components)
    }
    .context("Failed to serialize documentation")?;

    match &args.output {
        Some(path) => fs::write(path, format!("{}\n", json))
            .with_context(|| format!("Failed to write output file: {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write to stdout")?;
        }
    }

    Ok(RunSummary {
        component_count: result.components.len(),
        warnings: result.warnings,
        output: args.output.clone(),
    })
}
