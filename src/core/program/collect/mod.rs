//! Lowering of parsed TypeScript sources into a [`TypeGraph`].
//!
//! Only declarations are lowered: interfaces, type aliases, enums, classes and
//! top-level variables. Names resolve inside a file and across relative imports
//! between the files of one program. Anything else (package imports, DOM types,
//! mapped or conditional types) stays unresolved and keeps its source text.
//!
//! ## Module Structure
//!
//! - `scope`: per-file name tables (bindings, exports, component candidates)
//! - `types`: lowering of `TsType` syntax and canonical type text
//! - `initializer`: type positions inside variable initializers

mod initializer;
mod scope;
mod types;

use std::collections::HashMap;
use std::path::PathBuf;

use swc_common::{BytePos, SourceMapper, Span, Spanned};
use swc_ecma_ast::{
    ClassMember, Expr, Lit, MethodKind, Pat, PropName, TsExprWithTypeArgs, TsTypeElement,
    TsTypeParamInstantiation,
};

use crate::core::parsers::jsdoc::JsDoc;
use crate::core::parsers::ts::ParsedSource;

use super::graph::{Declaration, ObjectShape, Primitive, Symbol, TypeGraph, TypeKind};
use super::{DeclId, DeclKind, HeritageRef, SymbolId, TypeId, TypeReference};
use initializer::{InitializerTypes, asserted_type};
use scope::{
    Binding, Candidate, ClassSite, DEFAULT_EXPORT, FileScope, Site, normalize, resolve_module,
};

/// Import chains longer than this are treated as unresolved.
const MAX_IMPORT_HOPS: usize = 16;

/// Alias chains are followed at most this far.
const MAX_ALIAS_HOPS: usize = 16;

/// Lower every file of one program into a single type graph.
///
/// Top-level classes and variables become the graph's roots, in file order and
/// then source order.
pub fn lower_program(files: &[ParsedSource]) -> TypeGraph {
    let scopes: Vec<FileScope> = files.iter().map(FileScope::collect).collect();
    let mut lowerer = Lowerer::new(files, &scopes);

    for (file, scope) in scopes.iter().enumerate() {
        for candidate in &scope.candidates {
            lowerer.lower_candidate(file, candidate);
        }
    }

    lowerer.graph
}

/// One member about to be added to an object shape.
struct Member {
    name: String,
    ty: TypeId,
    optional: bool,
    kind: DeclKind,
    pos: BytePos,
}

struct Lowerer<'a> {
    files: &'a [ParsedSource],
    scopes: &'a [FileScope<'a>],
    by_path: HashMap<PathBuf, usize>,
    graph: TypeGraph,
    /// Named declarations already lowered (or being lowered), by file and binding key.
    named: HashMap<(usize, &'a str), TypeId>,
    classes: HashMap<(usize, &'a str), DeclId>,
    primitives: HashMap<Primitive, TypeId>,
    boolean: Option<TypeId>,
    /// Type references seen in the syntax subtree of the declaration being lowered.
    references: Option<Vec<TypeReference>>,
}

impl<'a> Lowerer<'a> {
    fn new(files: &'a [ParsedSource], scopes: &'a [FileScope<'a>]) -> Self {
        Self {
            files,
            scopes,
            by_path: files
                .iter()
                .enumerate()
                .map(|(index, file)| (normalize(&file.path), index))
                .collect(),
            graph: TypeGraph::new(),
            named: HashMap::new(),
            classes: HashMap::new(),
            primitives: HashMap::new(),
            boolean: None,
            references: None,
        }
    }

    fn lower_candidate(&mut self, file: usize, candidate: &'a Candidate<'a>) {
        match candidate {
            Candidate::Class(name) => {
                let scopes = self.scopes;
                let Some((key, binding)) = scopes[file].bindings.get_key_value(name) else {
                    return;
                };
                self.lower_binding(file, key, binding);
                if let Some(decl) = self.classes.get(&(file, *key)) {
                    self.graph.push_root(*decl);
                }
            }
            Candidate::Variable { name, site } => {
                let decl = self.lower_variable(file, name, *site);
                self.graph.push_root(decl);
            }
        }
    }

    // ============================================================
    // Name resolution
    // ============================================================

    /// Follow imports until `name` lands on a local declaration.
    fn resolve_binding(
        &self,
        file: usize,
        name: &str,
    ) -> Option<(usize, &'a str, &'a Binding<'a>)> {
        let scopes = self.scopes;
        let mut file = file;
        let (mut key, mut binding) = scopes[file].bindings.get_key_value(name)?;

        for _ in 0..MAX_IMPORT_HOPS {
            let Binding::Import { module, imported } = binding else {
                return Some((file, *key, binding));
            };
            let target = resolve_module(&self.files[file].path, module, &self.by_path)?;
            let local = scopes[target].exports.get(imported.as_str())?;
            (key, binding) = scopes[target].bindings.get_key_value(local.as_str())?;
            file = target;
        }

        None
    }

    /// Resolve a type name visible in `file` to its lowered type.
    fn lookup_type(&mut self, file: usize, name: &str) -> Option<TypeId> {
        let (file, key, binding) = self.resolve_binding(file, name)?;
        self.lower_binding(file, key, binding)
    }

    /// Like [`Self::lookup_type`], restricted to classes.
    fn lookup_class(&mut self, file: usize, name: &str) -> Option<TypeId> {
        let (file, key, binding) = self.resolve_binding(file, name)?;
        match binding {
            Binding::Class(_) => self.lower_binding(file, key, binding),
            _ => None,
        }
    }

    fn lower_binding(
        &mut self,
        file: usize,
        key: &'a str,
        binding: &'a Binding<'a>,
    ) -> Option<TypeId> {
        if let Some(ty) = self.named.get(&(file, key)) {
            return Some(*ty);
        }
        if matches!(binding, Binding::Import { .. }) {
            return None;
        }

        // Registered before lowering the body so recursive references find it.
        let ty = self.graph.add_type(key, TypeKind::Unresolved);
        self.named.insert((file, key), ty);

        // The body of a named declaration is not part of the subtree being recorded.
        let recording = self.references.take();
        match binding {
            Binding::Interface(sites) => self.lower_interface(file, key, sites, ty),
            Binding::Alias(site) => self.lower_alias(file, key, *site, ty),
            Binding::Enum(site) => self.lower_enum(file, key, *site, ty),
            Binding::Class(site) => {
                let decl = self.lower_class(file, *site, ty);
                self.classes.insert((file, key), decl);
            }
            Binding::Import { .. } => {}
        }
        self.references = recording;

        Some(ty)
    }

    // ============================================================
    // Declarations
    // ============================================================

    fn lower_class(&mut self, file: usize, site: ClassSite<'a>, ty: TypeId) -> DeclId {
        let class = site.class;
        let sym = self.graph.add_symbol(Symbol::new(
            site.name.unwrap_or(DEFAULT_EXPORT),
            ty,
        ));
        self.graph.set_type_symbol(ty, sym);
        self.document(sym, site.doc);

        self.references = Some(Vec::new());

        let heritage = match class.super_class.as_deref() {
            Some(expr) => Some(self.lower_heritage(
                file,
                expr,
                class.super_type_params.as_deref(),
            )),
            None => None,
        };

        let mut shape = ObjectShape::default();
        if let Some(base) = heritage.as_ref().and_then(|heritage| heritage.base) {
            shape.bases.push(base);
        }
        let mut index = HashMap::new();
        for member in &class.body {
            self.lower_class_member(file, member, &mut shape, &mut index);
        }
        self.graph.set_type_kind(ty, TypeKind::Object(shape));

        let mut decl = Declaration::new(DeclKind::Class, ty);
        decl.name = site.name.map(str::to_string);
        decl.file = self.files[file].path.clone();
        decl.symbol = Some(sym);
        decl.heritage = heritage;
        decl.type_references = self.references.take().unwrap_or_default();
        self.graph.add_declaration(decl)
    }

    fn lower_heritage(
        &mut self,
        file: usize,
        expr: &'a Expr,
        type_args: Option<&'a TsTypeParamInstantiation>,
    ) -> HeritageRef {
        let mut type_arguments = Vec::new();
        for param in type_args.into_iter().flat_map(|args| args.params.iter()) {
            type_arguments.push(self.lower_type(file, param));
        }

        let base = match expr {
            Expr::Ident(ident) => self
                .lookup_class(file, &ident.sym)
                .unwrap_or_else(|| self.graph.unresolved(ident.sym.to_string())),
            other => {
                let text = self.snippet(file, other.span());
                self.graph.unresolved(text)
            }
        };

        HeritageRef {
            type_arguments,
            base: Some(base),
        }
    }

    fn lower_class_member(
        &mut self,
        file: usize,
        member: &'a ClassMember,
        shape: &mut ObjectShape,
        index: &mut HashMap<String, SymbolId>,
    ) {
        match member {
            ClassMember::ClassProp(prop) if !prop.is_static => {
                let Some(name) = prop_name(&prop.key) else {
                    return;
                };
                let ty = self.annotation(file, prop.type_ann.as_deref());
                self.add_member(
                    file,
                    Member {
                        name,
                        ty,
                        optional: prop.is_optional,
                        kind: DeclKind::PropertyDeclaration,
                        pos: prop.span.lo,
                    },
                    shape,
                    index,
                );
            }
            ClassMember::Method(method) if !method.is_static => {
                let Some(name) = prop_name(&method.key) else {
                    return;
                };
                let (ty, kind) = match method.kind {
                    MethodKind::Method => (
                        self.lower_function(file, &method.function),
                        DeclKind::Method,
                    ),
                    MethodKind::Getter => (
                        self.annotation(file, method.function.return_type.as_deref()),
                        DeclKind::Accessor,
                    ),
                    MethodKind::Setter => return,
                };
                self.add_member(
                    file,
                    Member {
                        name,
                        ty,
                        optional: method.is_optional,
                        kind,
                        pos: method.span.lo,
                    },
                    shape,
                    index,
                );
            }
            ClassMember::TsIndexSignature(signature) if !signature.is_static => {
                if types::is_number_index(signature) {
                    shape.number_index = true;
                }
            }
            _ => {}
        }
    }

    fn lower_interface(
        &mut self,
        file: usize,
        name: &'a str,
        sites: &'a [Site<'a, swc_ecma_ast::TsInterfaceDecl>],
        ty: TypeId,
    ) {
        let mut symbol = Symbol::new(name, ty);
        symbol.declared_type = Some(ty);
        let sym = self.graph.add_symbol(symbol);
        self.graph.set_type_symbol(ty, sym);

        let mut shape = ObjectShape::default();
        let mut index = HashMap::new();
        for site in sites {
            self.document(sym, site.doc);
            for heritage in &site.node.extends {
                if let Some(base) = self.lower_interface_base(file, heritage) {
                    shape.bases.push(base);
                }
            }
            self.lower_type_members(file, &site.node.body.body, &mut shape, &mut index);

            let mut decl = Declaration::new(DeclKind::Interface, ty);
            decl.name = Some(name.to_string());
            decl.file = self.files[file].path.clone();
            decl.symbol = Some(sym);
            decl.property_signatures = count_property_signatures(&site.node.body.body);
            self.graph.add_declaration(decl);
        }

        self.graph.set_type_kind(ty, TypeKind::Object(shape));
    }

    fn lower_interface_base(
        &mut self,
        file: usize,
        heritage: &'a TsExprWithTypeArgs,
    ) -> Option<TypeId> {
        match &*heritage.expr {
            Expr::Ident(ident) => self.lookup_type(file, &ident.sym),
            _ => None,
        }
    }

    fn lower_alias(
        &mut self,
        file: usize,
        name: &'a str,
        site: Site<'a, swc_ecma_ast::TsTypeAliasDecl>,
        ty: TypeId,
    ) {
        let sym = self.graph.add_symbol(Symbol::new(name, ty));
        self.graph.set_type_symbol(ty, sym);
        self.document(sym, site.doc);

        let target = self.lower_type(file, &site.node.type_ann);
        let node = self.graph.type_node(target);
        // Primitives and literals print as themselves, everything else by alias name.
        let text = match node.kind {
            TypeKind::Primitive { .. } | TypeKind::Literal { .. } => node.text.clone(),
            _ if node.text == "boolean" => node.text.clone(),
            _ => name.to_string(),
        };
        let kind = node.kind.clone();
        self.graph.set_type_kind(ty, kind);
        self.graph.set_type_text(ty, text);
        let declared = self.alias_target(target);
        self.graph.symbol_mut(sym).declared_type = Some(declared);

        let mut decl = Declaration::new(DeclKind::TypeAlias, ty);
        decl.name = Some(name.to_string());
        decl.file = self.files[file].path.clone();
        decl.symbol = Some(sym);
        self.graph.add_declaration(decl);
    }

    /// Follow alias symbols from `ty` to the type they finally stand for.
    fn alias_target(&self, ty: TypeId) -> TypeId {
        let mut current = ty;
        for _ in 0..MAX_ALIAS_HOPS {
            let next = self
                .graph
                .type_node(current)
                .symbol
                .and_then(|sym| self.graph.symbol(sym).declared_type);
            match next {
                Some(next) if next != current => current = next,
                _ => break,
            }
        }
        current
    }

    fn lower_enum(
        &mut self,
        file: usize,
        name: &'a str,
        site: Site<'a, swc_ecma_ast::TsEnumDecl>,
        ty: TypeId,
    ) {
        let mut symbol = Symbol::new(name, ty);
        symbol.declared_type = Some(ty);
        let sym = self.graph.add_symbol(symbol);
        self.graph.set_type_symbol(ty, sym);
        self.document(sym, site.doc);

        let mut members = Vec::new();
        let mut next = 0.0;
        for member in &site.node.members {
            let literal = match member.init.as_deref() {
                Some(Expr::Lit(Lit::Str(value))) => {
                    self.graph.string_literal(&value.value.to_string_lossy())
                }
                Some(Expr::Lit(Lit::Num(value))) => {
                    next = value.value + 1.0;
                    self.graph.number_literal(value.value)
                }
                Some(other) => {
                    let text = self.snippet(file, other.span());
                    self.graph.unresolved(text)
                }
                None => {
                    let value = next;
                    next += 1.0;
                    self.graph.number_literal(value)
                }
            };
            members.push(literal);
        }
        self.graph.set_type_kind(ty, TypeKind::Union { members });

        let mut decl = Declaration::new(DeclKind::Enum, ty);
        decl.name = Some(name.to_string());
        decl.file = self.files[file].path.clone();
        decl.symbol = Some(sym);
        self.graph.add_declaration(decl);
    }

    fn lower_variable(
        &mut self,
        file: usize,
        name: &'a str,
        site: Site<'a, swc_ecma_ast::VarDeclarator>,
    ) -> DeclId {
        self.references = Some(Vec::new());
        let annotated = match &site.node.name {
            Pat::Ident(binding) => binding
                .type_ann
                .as_deref()
                .map(|annotation| self.lower_type(file, &annotation.type_ann)),
            _ => None,
        };
        let init = site.node.init.as_deref();
        let lowered = match init {
            Some(init) => InitializerTypes::new(self, file).collect(init),
            None => Vec::new(),
        };
        // Without an annotation the variable has the type it is asserted to.
        let asserted = init.and_then(asserted_type).and_then(|asserted| {
            let span = asserted.span();
            lowered
                .iter()
                .find(|(lowered_span, _)| *lowered_span == span)
                .map(|(_, ty)| *ty)
        });
        let ty = match annotated.or(asserted) {
            Some(ty) => ty,
            None => self.primitive(Primitive::Any),
        };
        let type_references = self.references.take().unwrap_or_default();

        let sym = self.graph.add_symbol(Symbol::new(name, ty));
        self.document(sym, site.doc);

        let mut decl = Declaration::new(DeclKind::Variable, ty);
        decl.name = Some(name.to_string());
        decl.file = self.files[file].path.clone();
        decl.symbol = Some(sym);
        decl.type_references = type_references;
        self.graph.add_declaration(decl)
    }

    // ============================================================
    // Members
    // ============================================================

    /// Lower the members of an interface body or type literal into `shape`.
    ///
    /// Returns the rendered members (`name?: T;`) in source order.
    fn lower_type_members(
        &mut self,
        file: usize,
        elements: &[TsTypeElement],
        shape: &mut ObjectShape,
        index: &mut HashMap<String, SymbolId>,
    ) -> Vec<String> {
        let mut rendered = Vec::new();

        for element in elements {
            match element {
                TsTypeElement::TsPropertySignature(prop) => {
                    let Some(name) = key_name(&prop.key) else {
                        continue;
                    };
                    let ty = self.annotation(file, prop.type_ann.as_deref());
                    rendered.push(format!(
                        "{}{}: {};",
                        name,
                        optional_marker(prop.optional),
                        self.graph.type_node(ty).text
                    ));
                    self.add_member(
                        file,
                        Member {
                            name,
                            ty,
                            optional: prop.optional,
                            kind: DeclKind::PropertySignature,
                            pos: prop.span.lo,
                        },
                        shape,
                        index,
                    );
                }
                TsTypeElement::TsMethodSignature(method) => {
                    let Some(name) = key_name(&method.key) else {
                        continue;
                    };
                    let params = self.render_fn_params(file, &method.params);
                    let ret = self.annotation_text(file, method.type_ann.as_deref());
                    rendered.push(format!(
                        "{}{}({}): {};",
                        name,
                        optional_marker(method.optional),
                        params.join(", "),
                        ret
                    ));
                    let ty = self
                        .graph
                        .function(format!("({}) => {}", params.join(", "), ret));
                    self.add_member(
                        file,
                        Member {
                            name,
                            ty,
                            optional: method.optional,
                            kind: DeclKind::Method,
                            pos: method.span.lo,
                        },
                        shape,
                        index,
                    );
                }
                TsTypeElement::TsGetterSignature(getter) => {
                    let Some(name) = key_name(&getter.key) else {
                        continue;
                    };
                    let ty = self.annotation(file, getter.type_ann.as_deref());
                    rendered.push(format!(
                        "readonly {}: {};",
                        name,
                        self.graph.type_node(ty).text
                    ));
                    self.add_member(
                        file,
                        Member {
                            name,
                            ty,
                            optional: false,
                            kind: DeclKind::Accessor,
                            pos: getter.span.lo,
                        },
                        shape,
                        index,
                    );
                }
                TsTypeElement::TsCallSignatureDecl(call) => {
                    let params = self.render_fn_params(file, &call.params);
                    let ret = self.annotation_text(file, call.type_ann.as_deref());
                    rendered.push(format!("({}): {};", params.join(", "), ret));
                    shape.call_signatures += 1;
                }
                TsTypeElement::TsIndexSignature(signature) => {
                    let params = self.render_fn_params(file, &signature.params);
                    let value = self.annotation_text(file, signature.type_ann.as_deref());
                    rendered.push(format!("[{}]: {};", params.join(", "), value));
                    if types::is_number_index(signature) {
                        shape.number_index = true;
                    }
                }
                TsTypeElement::TsConstructSignatureDecl(_)
                | TsTypeElement::TsSetterSignature(_) => {}
            }
        }

        rendered
    }

    /// Add a member symbol to `shape`, or another declaring site to an existing one.
    fn add_member(
        &mut self,
        file: usize,
        member: Member,
        shape: &mut ObjectShape,
        index: &mut HashMap<String, SymbolId>,
    ) {
        let sym = match index.get(&member.name) {
            Some(sym) => *sym,
            None => {
                let mut symbol = Symbol::new(member.name.clone(), member.ty);
                symbol.optional = member.optional;
                let sym = self.graph.add_symbol(symbol);
                index.insert(member.name.clone(), sym);
                shape.members.push(sym);
                sym
            }
        };

        let files = self.files;
        self.document(sym, files[file].comments.jsdoc_at(member.pos));

        let mut decl = Declaration::new(member.kind, member.ty);
        decl.name = Some(member.name);
        decl.file = files[file].path.clone();
        decl.symbol = Some(sym);
        decl.question_token = member.optional;
        self.graph.add_declaration(decl);
    }

    // ============================================================
    // Helpers
    // ============================================================

    /// Attach a JSDoc block to a symbol. The first description wins; tags accumulate.
    fn document(&mut self, sym: SymbolId, comment: Option<&str>) {
        let Some(comment) = comment else {
            return;
        };
        let doc = JsDoc::parse(comment);
        if doc.is_empty() {
            return;
        }
        let symbol = self.graph.symbol_mut(sym);
        if symbol.documentation.is_empty() {
            symbol.documentation = doc.description;
        }
        symbol.tags.extend(doc.tags);
    }

    fn primitive(&mut self, primitive: Primitive) -> TypeId {
        if let Some(ty) = self.primitives.get(&primitive) {
            return *ty;
        }
        let ty = self.graph.primitive(primitive);
        self.primitives.insert(primitive, ty);
        ty
    }

    fn boolean(&mut self) -> TypeId {
        *self.boolean.get_or_insert_with(|| self.graph.boolean())
    }

    /// Source text of a span with whitespace runs collapsed.
    fn snippet(&self, file: usize, span: Span) -> String {
        self.files[file]
            .source_map
            .span_to_snippet(span)
            .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

fn optional_marker(optional: bool) -> &'static str {
    if optional { "?" } else { "" }
}

fn count_property_signatures(elements: &[TsTypeElement]) -> usize {
    elements
        .iter()
        .filter(|element| matches!(element, TsTypeElement::TsPropertySignature(_)))
        .count()
}

/// Name of an interface or type literal member key.
fn key_name(key: &Expr) -> Option<String> {
    match key {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::Lit(Lit::Str(s)) => Some(s.value.to_string_lossy().to_string()),
        Expr::Lit(Lit::Num(n)) => Some(n.value.to_string()),
        _ => None,
    }
}

/// Name of a class member key.
fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => Some(s.value.to_string_lossy().to_string()),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}
