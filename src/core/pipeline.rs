//! Source groups in, component documentation out.
//!
//! Each [`Source`] is scanned, parsed, lowered into its own [`TypeGraph`] and
//! documented independently. Groups run in parallel and their results are
//! concatenated in group order.

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use serde::Serialize;
use swc_common::SourceMap;

use crate::{
    config::Source,
    core::{
        data::ComponentDoc,
        extract::{build_component_doc, classify_declaration, naming::relative_path},
        file_scanner::scan_files,
        parsers::ts::{ParsedSource, parse_source},
        program::{DeclId, TypeGraph, TypeProvider, lower_program},
    },
};

/// A file that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseWarning {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ParseResult {
    pub components: Vec<ComponentDoc>,
    pub warnings: Vec<ParseWarning>,
}

impl ParseResult {
    fn append(&mut self, other: ParseResult) {
        self.components.extend(other.components);
        self.warnings.extend(other.warnings);
    }
}

/// Document every source group.
///
/// Fails on the first group whose configuration cannot be loaded.
pub fn parse(sources: &[Source]) -> Result<ParseResult> {
    let results: Vec<Result<ParseResult>> = sources.par_iter().map(parse_source_group).collect();

    let mut merged = ParseResult::default();
    for result in results {
        merged.append(result?);
    }
    Ok(merged)
}

/// Document one source group.
pub fn parse_source_group(source: &Source) -> Result<ParseResult> {
    source.validate()?;
    let root = source
        .root
        .canonicalize()
        .with_context(|| format!("Cannot access source root: {}", source.root.display()))?;
    let options = source.compiler_options()?;

    let scan = scan_files(
        &root,
        &source.pattern,
        &source.ignore_patterns(),
        options.allow_js,
    )?;
    let mut warnings: Vec<ParseWarning> = scan
        .skipped
        .into_iter()
        .map(|message| ParseWarning {
            path: root.clone(),
            message,
        })
        .collect();

    let (parsed, parse_warnings) = parse_files(&scan.files);
    warnings.extend(parse_warnings);

    let graph = lower_program(&parsed);
    Ok(ParseResult {
        components: document_graph(&graph, graph.roots(), &root),
        warnings,
    })
}

/// Read and parse files in parallel. Failures become warnings.
fn parse_files(files: &[PathBuf]) -> (Vec<ParsedSource>, Vec<ParseWarning>) {
    let source_map = Arc::new(SourceMap::default());

    let results: Vec<_> = files
        .par_iter()
        .map(|path| {
            let parsed = fs::read_to_string(path)
                .map_err(|e| anyhow!("Failed to read file: {}", e))
                .and_then(|code| parse_source(code, path, source_map.clone()));
            (path, parsed)
        })
        .collect();

    // Sequential split keeps discovery order
    let mut parsed = Vec::with_capacity(results.len());
    let mut warnings = Vec::new();
    for (path, result) in results {
        match result {
            Ok(p) => parsed.push(p),
            Err(e) => warnings.push(ParseWarning {
                path: path.clone(),
                message: e.to_string(),
            }),
        }
    }
    (parsed, warnings)
}

/// Document the component declarations among `candidates`, in order.
///
/// Args are sorted case-insensitively and file names made relative to `root`.
pub fn document_graph<P: TypeProvider + ?Sized>(
    provider: &P,
    candidates: &[DeclId],
    root: &Path,
) -> Vec<ComponentDoc> {
    candidates
        .iter()
        .filter_map(|decl| {
            let kind = classify_declaration(provider, *decl)?;
            let mut doc = build_component_doc(provider, *decl, kind, root);
            doc.args
                .sort_by_key(|arg| arg.identifier.to_uppercase());
            doc.file_name = relative_path(root, Path::new(&doc.file_name));
            Some(doc)
        })
        .collect()
}

/// Document a type graph loaded from a JSON dump.
pub fn document_graph_json(json: &str, root: &Path) -> Result<Vec<ComponentDoc>> {
    let graph = TypeGraph::from_json(json)?;
    Ok(document_graph(&graph, graph.roots(), root))
}
