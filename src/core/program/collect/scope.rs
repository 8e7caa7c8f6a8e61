//! Per-file name tables.
//!
//! Collects the top-level declarations, imports and exports of one parsed file
//! without lowering anything. Lowering looks names up here lazily.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use swc_common::Spanned;
use swc_ecma_ast::{
    Class, Decl, DefaultDecl, ExportSpecifier, Expr, ImportSpecifier, ModuleDecl,
    ModuleExportName, ModuleItem, Pat, Stmt, TsEnumDecl, TsInterfaceDecl, TsTypeAliasDecl,
    VarDeclarator,
};

use crate::core::parsers::ts::ParsedSource;

/// Binding key of an anonymous `export default class`.
pub const DEFAULT_EXPORT: &str = "default";

const MODULE_EXTENSIONS: &[&str] = &["ts", "tsx", "d.ts", "mts", "js", "jsx", "mjs"];

/// A declaration node together with its JSDoc comment.
pub struct Site<'a, T> {
    pub node: &'a T,
    pub doc: Option<&'a str>,
}

impl<T> Clone for Site<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Site<'_, T> {}

#[derive(Clone, Copy)]
pub struct ClassSite<'a> {
    pub name: Option<&'a str>,
    pub class: &'a Class,
    pub doc: Option<&'a str>,
}

/// What a top-level name refers to in the type namespace.
#[derive(Clone)]
pub enum Binding<'a> {
    /// All declarations of a (possibly merged) interface.
    Interface(Vec<Site<'a, TsInterfaceDecl>>),
    Alias(Site<'a, TsTypeAliasDecl>),
    Class(ClassSite<'a>),
    Enum(Site<'a, TsEnumDecl>),
    Import { module: &'a str, imported: String },
}

/// Top-level declarations that may turn out to be components.
pub enum Candidate<'a> {
    /// Key of a class binding.
    Class(&'a str),
    Variable {
        name: &'a str,
        site: Site<'a, VarDeclarator>,
    },
}

#[derive(Default)]
pub struct FileScope<'a> {
    pub bindings: HashMap<&'a str, Binding<'a>>,
    /// Exported name to local binding key.
    pub exports: HashMap<String, String>,
    pub candidates: Vec<Candidate<'a>>,
}

impl<'a> FileScope<'a> {
    pub fn collect(source: &'a ParsedSource) -> Self {
        let mut scope = FileScope::default();

        for item in &source.module.body {
            let doc = source.comments.jsdoc_at(item.span().lo);
            match item {
                ModuleItem::Stmt(Stmt::Decl(decl)) => scope.declare(source, decl, doc, false),
                ModuleItem::Stmt(_) => {}
                ModuleItem::ModuleDecl(module_decl) => scope.module_decl(source, module_decl, doc),
            }
        }

        scope
    }

    fn declare(
        &mut self,
        source: &'a ParsedSource,
        decl: &'a Decl,
        item_doc: Option<&'a str>,
        exported: bool,
    ) {
        let doc = item_doc.or_else(|| source.comments.jsdoc_at(decl.span().lo));

        let name: &'a str = match decl {
            Decl::Class(class_decl) => {
                let name = &*class_decl.ident.sym;
                self.add_class(
                    name,
                    ClassSite {
                        name: Some(name),
                        class: &class_decl.class,
                        doc,
                    },
                );
                name
            }
            Decl::TsInterface(interface) => {
                self.add_interface(Site {
                    node: interface,
                    doc,
                });
                &*interface.id.sym
            }
            Decl::TsTypeAlias(alias) => {
                let name = &*alias.id.sym;
                self.bindings
                    .entry(name)
                    .or_insert(Binding::Alias(Site { node: alias, doc }));
                name
            }
            Decl::TsEnum(ts_enum) => {
                let name = &*ts_enum.id.sym;
                self.bindings.entry(name).or_insert(Binding::Enum(Site {
                    node: ts_enum,
                    doc,
                }));
                name
            }
            Decl::Var(var) => {
                for declarator in &var.decls {
                    let Pat::Ident(binding) = &declarator.name else {
                        continue;
                    };
                    let name = &*binding.id.sym;
                    self.candidates.push(Candidate::Variable {
                        name,
                        site: Site {
                            node: declarator,
                            doc,
                        },
                    });
                    if exported {
                        self.exports.insert(name.to_string(), name.to_string());
                    }
                }
                return;
            }
            _ => return,
        };

        if exported {
            self.exports.insert(name.to_string(), name.to_string());
        }
    }

    fn module_decl(
        &mut self,
        source: &'a ParsedSource,
        module_decl: &'a ModuleDecl,
        doc: Option<&'a str>,
    ) {
        match module_decl {
            ModuleDecl::Import(import) => {
                let Some(module) = import.src.value.as_str() else {
                    return;
                };
                for specifier in &import.specifiers {
                    let (local, imported) = match specifier {
                        ImportSpecifier::Named(named) => {
                            let local = &*named.local.sym;
                            let imported = named
                                .imported
                                .as_ref()
                                .map(export_name)
                                .unwrap_or_else(|| local.to_string());
                            (local, imported)
                        }
                        ImportSpecifier::Default(default) => {
                            (&*default.local.sym, DEFAULT_EXPORT.to_string())
                        }
                        ImportSpecifier::Namespace(ns) => (&*ns.local.sym, "*".to_string()),
                    };
                    self.bindings
                        .entry(local)
                        .or_insert(Binding::Import { module, imported });
                }
            }
            ModuleDecl::ExportDecl(export) => self.declare(source, &export.decl, doc, true),
            ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                DefaultDecl::Class(class_expr) => {
                    let name = class_expr.ident.as_ref().map(|ident| &*ident.sym);
                    let key = name.unwrap_or(DEFAULT_EXPORT);
                    self.add_class(
                        key,
                        ClassSite {
                            name,
                            class: &class_expr.class,
                            doc,
                        },
                    );
                    self.exports
                        .insert(DEFAULT_EXPORT.to_string(), key.to_string());
                }
                DefaultDecl::TsInterfaceDecl(interface) => {
                    self.add_interface(Site {
                        node: interface,
                        doc,
                    });
                    self.exports
                        .insert(DEFAULT_EXPORT.to_string(), interface.id.sym.to_string());
                }
                DefaultDecl::Fn(_) => {}
            },
            ModuleDecl::ExportDefaultExpr(export) => {
                if let Expr::Ident(ident) = &*export.expr {
                    self.exports
                        .insert(DEFAULT_EXPORT.to_string(), ident.sym.to_string());
                }
            }
            ModuleDecl::ExportNamed(named) => {
                let module = named.src.as_ref().and_then(|src| src.value.as_str());
                for specifier in &named.specifiers {
                    let ExportSpecifier::Named(spec) = specifier else {
                        continue;
                    };
                    let orig = export_name(&spec.orig);
                    let exported = spec
                        .exported
                        .as_ref()
                        .map(export_name)
                        .unwrap_or_else(|| orig.clone());

                    // `export { A } from './a'` re-exports through a synthetic import
                    if let (Some(module), ModuleExportName::Ident(ident)) = (module, &spec.orig) {
                        self.bindings.entry(&*ident.sym).or_insert(Binding::Import {
                            module,
                            imported: orig.clone(),
                        });
                    }
                    self.exports.insert(exported, orig);
                }
            }
            _ => {}
        }
    }

    fn add_class(&mut self, key: &'a str, site: ClassSite<'a>) {
        if self.bindings.contains_key(key) {
            return;
        }
        self.bindings.insert(key, Binding::Class(site));
        self.candidates.push(Candidate::Class(key));
    }

    fn add_interface(&mut self, site: Site<'a, TsInterfaceDecl>) {
        let name = &*site.node.id.sym;
        match self.bindings.get_mut(name) {
            Some(Binding::Interface(sites)) => sites.push(site),
            Some(_) => {}
            None => {
                self.bindings.insert(name, Binding::Interface(vec![site]));
            }
        }
    }
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string_lossy().to_string(),
    }
}

/// Lexically normalize a path, dropping `.` and folding `..`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve a relative module specifier to one of the program's files.
///
/// Package imports never resolve.
pub fn resolve_module(
    current_file: &Path,
    specifier: &str,
    files: &HashMap<PathBuf, usize>,
) -> Option<usize> {
    if !specifier.starts_with('.') {
        return None;
    }

    let resolved = normalize(&current_file.parent()?.join(specifier));
    if let Some(index) = files.get(&resolved) {
        return Some(*index);
    }

    let mut stems = vec![resolved.clone()];
    // ESM-style `./button.js` pointing at `button.ts`
    if matches!(
        resolved.extension().and_then(|e| e.to_str()),
        Some("js" | "mjs" | "cjs")
    ) {
        stems.push(resolved.with_extension(""));
    }

    for stem in &stems {
        for ext in MODULE_EXTENSIONS {
            let with_ext = PathBuf::from(format!("{}.{}", stem.display(), ext));
            if let Some(index) = files.get(&with_ext) {
                return Some(*index);
            }
        }
    }

    for ext in MODULE_EXTENSIONS {
        if let Some(index) = files.get(&resolved.join(format!("index.{}", ext))) {
            return Some(*index);
        }
    }

    None
}
