//! CLI argument definitions using clap.
//!
//! One invocation documents one or more source groups. Without `--config` the
//! group is built from `--root`, `--pattern`, `--ignore`, `--tsconfig` and
//! `--allow-js`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::config::{CompilerOptions, DEFAULT_PATTERN, Source, SourceOptions, load_sources};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Source root directory
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Glob of files to document, relative to the root
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Glob of files to skip (repeatable)
    #[arg(long)]
    pub ignore: Vec<String>,

    /// tsconfig.json to read compiler options from
    #[arg(long, env = "GLINT_DOCGEN_TSCONFIG")]
    pub tsconfig: Option<PathBuf>,

    /// Include JavaScript files
    #[arg(long)]
    pub allow_js: bool,

    /// JSON file with an array of sources (overrides the single-source flags)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write the JSON output to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print compact JSON
    #[arg(long)]
    pub compact: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Arguments {
    /// Source groups requested on the command line.
    pub fn sources(&self) -> Result<Vec<Source>> {
        if let Some(config) = &self.config {
            return load_sources(config);
        }

        let source = Source {
            root: self.root.clone(),
            pattern: self.pattern.clone(),
            ignore: self.ignore.clone(),
            options: SourceOptions {
                tsconfig_path: self.tsconfig.clone(),
                compiler_options: Some(CompilerOptions {
                    allow_js: self.allow_js,
                    ..Default::default()
                }),
            },
        };
        source.validate()?;
        Ok(vec![source])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::cli::args::*;

    #[test]
    fn test_defaults() {
        let args = Arguments::try_parse_from(["glint-docgen"]).unwrap();
        let sources = args.sources().unwrap();

        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].root, PathBuf::from("."));
        assert_eq!(sources[0].pattern, "**/*.ts");
        assert!(sources[0].ignore.is_empty());
        assert!(!args.compact);
    }

    #[test]
    fn test_single_source_flags() {
        let args = Arguments::try_parse_from([
            "glint-docgen",
            "--root",
            "packages/ui",
            "--pattern",
            "**/*.js",
            "--ignore",
            "**/legacy/**",
            "--ignore",
            "**/*.test.js",
            "--allow-js",
        ])
        .unwrap();
        let source = args.sources().unwrap().remove(0);

        assert_eq!(source.root, PathBuf::from("packages/ui"));
        assert_eq!(source.ignore, vec!["**/legacy/**", "**/*.test.js"]);
        assert!(source.compiler_options().unwrap().allow_js);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let args = Arguments::try_parse_from(["glint-docgen", "--pattern", "**/[invalid"]).unwrap();
        assert!(args.sources().is_err());
    }
}
