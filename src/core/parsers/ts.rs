use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use swc_common::{
    BytePos, FileName, Globals, SourceMap,
    comments::{Comment, CommentKind, SingleThreadedComments},
};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// Map of byte positions to comments.
pub type CommentMap = HashMap<BytePos, Vec<Comment>>;

/// Thread-safe extracted comments from SingleThreadedComments.
/// Extracted during parsing and stored independently of swc types.
#[derive(Debug, Clone)]
pub struct ExtractedComments {
    pub leading: CommentMap,
}

impl ExtractedComments {
    /// Extract comments from SingleThreadedComments.
    /// This must be called before SingleThreadedComments is dropped.
    pub fn from_swc(comments: &SingleThreadedComments) -> Self {
        let (leading, _) = comments.borrow_all();
        Self {
            leading: leading.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }

    /// Text of the JSDoc block (`/** ... */`) closest to the given position, if any.
    ///
    /// The returned text excludes the `/*` and `*/` delimiters but keeps the leading
    /// `*` of the opening `/**`.
    pub fn jsdoc_at(&self, pos: BytePos) -> Option<&str> {
        self.leading
            .get(&pos)?
            .iter()
            .rev()
            .find(|cmt| cmt.kind == CommentKind::Block && cmt.text.starts_with('*'))
            .map(|cmt| &*cmt.text)
    }
}

/// Language a source file is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    TypeScript,
    Declaration,
    JavaScript,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if name.ends_with(".d.ts") || name.ends_with(".d.mts") || name.ends_with(".d.cts") {
            return Some(SourceKind::Declaration);
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts" | "mts" | "cts" | "tsx") => Some(SourceKind::TypeScript),
            Some("js" | "mjs" | "cjs" | "jsx") => Some(SourceKind::JavaScript),
            _ => None,
        }
    }

    fn syntax(self, path: &Path) -> Syntax {
        let jsx = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("tsx" | "jsx")
        );
        match self {
            SourceKind::TypeScript => Syntax::Typescript(TsSyntax {
                tsx: jsx,
                decorators: true,
                ..Default::default()
            }),
            SourceKind::Declaration => Syntax::Typescript(TsSyntax {
                dts: true,
                ..Default::default()
            }),
            SourceKind::JavaScript => Syntax::Es(EsSyntax {
                jsx,
                decorators: true,
                ..Default::default()
            }),
        }
    }
}

pub struct ParsedSource {
    pub path: PathBuf,
    pub module: Module,
    pub source_map: Arc<SourceMap>,
    pub comments: ExtractedComments,
}

/// Parse a TypeScript or JavaScript source string into an AST.
///
/// Accepts a shared SourceMap for thread-safe parallel parsing.
pub fn parse_source(code: String, path: &Path, source_map: Arc<SourceMap>) -> Result<ParsedSource> {
    use swc_common::GLOBALS;

    let kind = SourceKind::from_path(path)
        .ok_or_else(|| anyhow!("Unsupported source file: {}", path.display()))?;

    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(path.to_path_buf()).into(), code);

        let comments = SingleThreadedComments::default();
        let mut parser = Parser::new(
            kind.syntax(path),
            StringInput::from(&*source_file),
            Some(&comments),
        );

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", path.display(), e))?;

        // Extract comments immediately (before SingleThreadedComments drops)
        let extracted_comments = ExtractedComments::from_swc(&comments);

        Ok(ParsedSource {
            path: path.to_path_buf(),
            module,
            source_map,
            comments: extracted_comments,
        })
    })
}
