//! In-memory type graph.
//!
//! `TypeGraph` is an arena of declarations, symbols and types addressed by the
//! `Copy` handles of [`super`]. It is filled either by the swc lowering in
//! [`super::collect`], by hand through the builder methods below, or by
//! deserializing a JSON dump produced by another tool.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use super::{
    DeclId, DeclKind, HeritageRef, Literal, RawTag, SymbolId, TupleElement, TypeId, TypeProvider,
    TypeReference,
};

/// Built-in, non-structural types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Primitive {
    String,
    Number,
    BigInt,
    Symbol,
    Object,
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
}

impl Primitive {
    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::BigInt => "bigint",
            Primitive::Symbol => "symbol",
            Primitive::Object => "object",
            Primitive::Any => "any",
            Primitive::Unknown => "unknown",
            Primitive::Never => "never",
            Primitive::Void => "void",
            Primitive::Undefined => "undefined",
            Primitive::Null => "null",
        }
    }
}

/// Members and structural features of an object type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectShape {
    /// Own properties, in declaration order.
    #[serde(default)]
    pub members: Vec<SymbolId>,
    /// Extended types whose properties are inherited.
    #[serde(default)]
    pub bases: Vec<TypeId>,
    #[serde(default)]
    pub call_signatures: usize,
    #[serde(default)]
    pub number_index: bool,
}

/// Structure of a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum TypeKind {
    Primitive { primitive: Primitive },
    Literal { value: Literal },
    Union { members: Vec<TypeId> },
    Intersection { members: Vec<TypeId> },
    Array { element: TypeId },
    Tuple { elements: Vec<TupleElement> },
    Function { signatures: usize },
    Object(ObjectShape),
    /// A reference the provider could not resolve; only its text is known.
    Unresolved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeNode {
    pub text: String,
    #[serde(default)]
    pub symbol: Option<SymbolId>,
    #[serde(flatten)]
    pub kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symbol {
    pub name: String,
    #[serde(default)]
    pub declarations: Vec<DeclId>,
    #[serde(default)]
    pub optional: bool,
    pub ty: TypeId,
    #[serde(default)]
    pub declared_type: Option<TypeId>,
    #[serde(default)]
    pub documentation: String,
    #[serde(default)]
    pub tags: Vec<RawTag>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            declarations: Vec::new(),
            optional: false,
            ty,
            declared_type: None,
            documentation: String::new(),
            tags: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub kind: DeclKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub file: PathBuf,
    #[serde(default)]
    pub symbol: Option<SymbolId>,
    pub ty: TypeId,
    #[serde(default)]
    pub heritage: Option<HeritageRef>,
    #[serde(default)]
    pub type_references: Vec<TypeReference>,
    #[serde(default)]
    pub question_token: bool,
    #[serde(default)]
    pub property_signatures: usize,
}

impl Declaration {
    pub fn new(kind: DeclKind, ty: TypeId) -> Self {
        Self {
            kind,
            name: None,
            file: PathBuf::new(),
            symbol: None,
            ty,
            heritage: None,
            type_references: Vec::new(),
            question_token: false,
            property_signatures: 0,
        }
    }
}

/// Arena-backed implementation of [`TypeProvider`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeGraph {
    #[serde(default)]
    declarations: Vec<Declaration>,
    #[serde(default)]
    symbols: Vec<Symbol>,
    #[serde(default)]
    types: Vec<TypeNode>,
    /// Top-level declarations that may be components, in discovery order.
    #[serde(default)]
    roots: Vec<DeclId>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a graph from its JSON form, rejecting dangling handles.
    pub fn from_json(json: &str) -> Result<Self> {
        let graph: TypeGraph =
            serde_json::from_str(json).context("Failed to parse type graph JSON")?;
        graph.validate()?;
        Ok(graph)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize type graph")
    }

    /// Check that every handle stored in the graph points inside the arena.
    pub fn validate(&self) -> Result<()> {
        let check_type = |ty: TypeId, what: &str| -> Result<()> {
            if ty.0 as usize >= self.types.len() {
                bail!("{} refers to unknown type #{}", what, ty.0);
            }
            Ok(())
        };
        let check_symbol = |sym: SymbolId, what: &str| -> Result<()> {
            if sym.0 as usize >= self.symbols.len() {
                bail!("{} refers to unknown symbol #{}", what, sym.0);
            }
            Ok(())
        };
        let check_decl = |decl: DeclId, what: &str| -> Result<()> {
            if decl.0 as usize >= self.declarations.len() {
                bail!("{} refers to unknown declaration #{}", what, decl.0);
            }
            Ok(())
        };

        for (i, decl) in self.declarations.iter().enumerate() {
            let what = format!("declaration #{}", i);
            check_type(decl.ty, &what)?;
            if let Some(sym) = decl.symbol {
                check_symbol(sym, &what)?;
            }
            if let Some(heritage) = &decl.heritage {
                for ty in heritage.type_arguments.iter().chain(heritage.base.iter()) {
                    check_type(*ty, &what)?;
                }
            }
            for reference in &decl.type_references {
                for ty in &reference.type_arguments {
                    check_type(*ty, &what)?;
                }
            }
        }

        for (i, sym) in self.symbols.iter().enumerate() {
            let what = format!("symbol #{} ({})", i, sym.name);
            check_type(sym.ty, &what)?;
            if let Some(ty) = sym.declared_type {
                check_type(ty, &what)?;
            }
            for decl in &sym.declarations {
                check_decl(*decl, &what)?;
            }
        }

        for (i, node) in self.types.iter().enumerate() {
            let what = format!("type #{} ({})", i, node.text);
            if let Some(sym) = node.symbol {
                check_symbol(sym, &what)?;
            }
            match &node.kind {
                TypeKind::Union { members } | TypeKind::Intersection { members } => {
                    for ty in members {
                        check_type(*ty, &what)?;
                    }
                }
                TypeKind::Array { element } => check_type(*element, &what)?,
                TypeKind::Tuple { elements } => {
                    for element in elements {
                        check_type(element.ty, &what)?;
                    }
                }
                TypeKind::Object(shape) => {
                    for sym in &shape.members {
                        check_symbol(*sym, &what)?;
                    }
                    for ty in &shape.bases {
                        check_type(*ty, &what)?;
                    }
                }
                TypeKind::Primitive { .. }
                | TypeKind::Literal { .. }
                | TypeKind::Function { .. }
                | TypeKind::Unresolved => {}
            }
        }

        for decl in &self.roots {
            check_decl(*decl, "root list")?;
        }

        Ok(())
    }

    // ============================================================
    // Arena access
    // ============================================================

    pub fn roots(&self) -> &[DeclId] {
        &self.roots
    }

    pub fn push_root(&mut self, decl: DeclId) {
        self.roots.push(decl);
    }

    pub fn type_node(&self, ty: TypeId) -> &TypeNode {
        &self.types[ty.0 as usize]
    }

    pub fn symbol(&self, sym: SymbolId) -> &Symbol {
        &self.symbols[sym.0 as usize]
    }

    pub fn symbol_mut(&mut self, sym: SymbolId) -> &mut Symbol {
        &mut self.symbols[sym.0 as usize]
    }

    pub fn declaration(&self, decl: DeclId) -> &Declaration {
        &self.declarations[decl.0 as usize]
    }

    pub fn declaration_mut(&mut self, decl: DeclId) -> &mut Declaration {
        &mut self.declarations[decl.0 as usize]
    }

    pub fn add_type(&mut self, text: impl Into<String>, kind: TypeKind) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeNode {
            text: text.into(),
            symbol: None,
            kind,
        });
        id
    }

    pub fn set_type_kind(&mut self, ty: TypeId, kind: TypeKind) {
        self.types[ty.0 as usize].kind = kind;
    }

    pub fn set_type_text(&mut self, ty: TypeId, text: impl Into<String>) {
        self.types[ty.0 as usize].text = text.into();
    }

    pub fn set_type_symbol(&mut self, ty: TypeId, sym: SymbolId) {
        self.types[ty.0 as usize].symbol = Some(sym);
    }

    pub fn add_symbol(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    /// Add a declaration and register it as a declaring site of its symbol.
    pub fn add_declaration(&mut self, declaration: Declaration) -> DeclId {
        let id = DeclId(self.declarations.len() as u32);
        if let Some(sym) = declaration.symbol {
            self.symbols[sym.0 as usize].declarations.push(id);
        }
        self.declarations.push(declaration);
        id
    }

    // ============================================================
    // Builder shortcuts
    // ============================================================

    pub fn primitive(&mut self, primitive: Primitive) -> TypeId {
        self.add_type(primitive.as_str(), TypeKind::Primitive { primitive })
    }

    pub fn string_literal(&mut self, value: &str) -> TypeId {
        self.add_type(
            format!("\"{}\"", value),
            TypeKind::Literal {
                value: Literal::String(value.to_string()),
            },
        )
    }

    pub fn number_literal(&mut self, value: f64) -> TypeId {
        self.add_type(
            value.to_string(),
            TypeKind::Literal {
                value: Literal::Number(value),
            },
        )
    }

    /// `boolean`, which is structurally the union `false | true`.
    pub fn boolean(&mut self) -> TypeId {
        let members = [false, true]
            .into_iter()
            .map(|value| {
                self.add_type(
                    value.to_string(),
                    TypeKind::Literal {
                        value: Literal::Boolean(value),
                    },
                )
            })
            .collect();
        self.add_type("boolean", TypeKind::Union { members })
    }

    /// Union whose text joins the member texts with ` | `.
    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        let text = members
            .iter()
            .map(|ty| self.type_node(*ty).text.as_str())
            .collect::<Vec<_>>()
            .join(" | ");
        self.add_type(text, TypeKind::Union { members })
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        let inner = &self.type_node(element);
        let text = match inner.kind {
            TypeKind::Union { .. } | TypeKind::Intersection { .. } | TypeKind::Function { .. } => {
                format!("({})[]", inner.text)
            }
            _ => format!("{}[]", inner.text),
        };
        self.add_type(text, TypeKind::Array { element })
    }

    pub fn tuple(&mut self, elements: Vec<TypeId>) -> TypeId {
        let text = format!(
            "[{}]",
            elements
                .iter()
                .map(|ty| self.type_node(*ty).text.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let elements = elements
            .into_iter()
            .map(|ty| TupleElement {
                ty,
                optional: false,
            })
            .collect();
        self.add_type(text, TypeKind::Tuple { elements })
    }

    pub fn function(&mut self, text: impl Into<String>) -> TypeId {
        self.add_type(text, TypeKind::Function { signatures: 1 })
    }

    pub fn unresolved(&mut self, text: impl Into<String>) -> TypeId {
        self.add_type(text, TypeKind::Unresolved)
    }

    /// Property signature `name: ty` (or `name?: ty`) with its own declaring site.
    pub fn add_property(&mut self, name: &str, ty: TypeId, optional: bool) -> SymbolId {
        let mut symbol = Symbol::new(name, ty);
        symbol.optional = optional;
        let sym = self.add_symbol(symbol);
        let mut decl = Declaration::new(DeclKind::PropertySignature, ty);
        decl.name = Some(name.to_string());
        decl.symbol = Some(sym);
        decl.question_token = optional;
        self.add_declaration(decl);
        sym
    }

    /// Named interface type with the given members.
    pub fn add_interface(&mut self, name: &str, members: Vec<SymbolId>) -> TypeId {
        self.add_structured(name, name, DeclKind::Interface, members)
    }

    /// Anonymous object type literal (`{ a: string; }`).
    pub fn add_type_literal(&mut self, members: Vec<SymbolId>) -> TypeId {
        let text = if members.is_empty() {
            "{}".to_string()
        } else {
            let fields = members
                .iter()
                .map(|sym| {
                    let symbol = self.symbol(*sym);
                    let marker = if symbol.optional { "?" } else { "" };
                    format!(
                        "{}{}: {};",
                        symbol.name,
                        marker,
                        self.type_node(symbol.ty).text
                    )
                })
                .collect::<Vec<_>>()
                .join(" ");
            format!("{{ {} }}", fields)
        };
        self.add_structured(&text, "__type", DeclKind::TypeLiteral, members)
    }

    fn add_structured(
        &mut self,
        text: &str,
        symbol_name: &str,
        kind: DeclKind,
        members: Vec<SymbolId>,
    ) -> TypeId {
        let property_signatures = members
            .iter()
            .filter(|sym| {
                self.symbol(**sym).declarations.iter().any(|decl| {
                    self.declaration(*decl).kind == DeclKind::PropertySignature
                })
            })
            .count();
        let ty = self.add_type(
            text,
            TypeKind::Object(ObjectShape {
                members,
                ..Default::default()
            }),
        );
        let mut symbol = Symbol::new(symbol_name, ty);
        symbol.declared_type = Some(ty);
        let sym = self.add_symbol(symbol);
        let mut decl = Declaration::new(kind, ty);
        decl.name = (kind != DeclKind::TypeLiteral).then(|| symbol_name.to_string());
        decl.symbol = Some(sym);
        decl.property_signatures = property_signatures;
        self.add_declaration(decl);
        self.set_type_symbol(ty, sym);
        ty
    }

    /// Class declaration whose first heritage clause is `heritage`.
    pub fn add_class(
        &mut self,
        name: &str,
        file: impl AsRef<Path>,
        heritage: Option<HeritageRef>,
    ) -> DeclId {
        let ty = self.add_type(name, TypeKind::Object(ObjectShape::default()));
        let sym = self.add_symbol(Symbol::new(name, ty));
        self.set_type_symbol(ty, sym);
        let mut decl = Declaration::new(DeclKind::Class, ty);
        decl.name = Some(name.to_string());
        decl.file = file.as_ref().to_path_buf();
        decl.symbol = Some(sym);
        decl.heritage = heritage;
        self.add_declaration(decl)
    }

    pub fn object_shape_mut(&mut self, ty: TypeId) -> Option<&mut ObjectShape> {
        match &mut self.types[ty.0 as usize].kind {
            TypeKind::Object(shape) => Some(shape),
            _ => None,
        }
    }

    fn collect_properties(
        &self,
        ty: TypeId,
        visited: &mut HashSet<TypeId>,
        seen_names: &mut HashSet<String>,
        out: &mut Vec<SymbolId>,
    ) {
        if !visited.insert(ty) {
            return;
        }
        match &self.type_node(ty).kind {
            TypeKind::Object(shape) => {
                for sym in &shape.members {
                    if seen_names.insert(self.symbol(*sym).name.clone()) {
                        out.push(*sym);
                    }
                }
                for base in &shape.bases {
                    self.collect_properties(*base, visited, seen_names, out);
                }
            }
            TypeKind::Intersection { members } => {
                for member in members {
                    self.collect_properties(*member, visited, seen_names, out);
                }
            }
            _ => {}
        }
    }
}

impl TypeProvider for TypeGraph {
    fn declaration_kind(&self, decl: DeclId) -> DeclKind {
        self.declaration(decl).kind
    }

    fn declaration_name(&self, decl: DeclId) -> Option<&str> {
        self.declaration(decl).name.as_deref()
    }

    fn declaration_file(&self, decl: DeclId) -> &Path {
        &self.declaration(decl).file
    }

    fn declaration_symbol(&self, decl: DeclId) -> Option<SymbolId> {
        self.declaration(decl).symbol
    }

    fn type_of_declaration(&self, decl: DeclId) -> TypeId {
        self.declaration(decl).ty
    }

    fn first_heritage(&self, decl: DeclId) -> Option<&HeritageRef> {
        self.declaration(decl).heritage.as_ref()
    }

    fn type_references(&self, decl: DeclId) -> &[TypeReference] {
        &self.declaration(decl).type_references
    }

    fn has_question_token(&self, decl: DeclId) -> bool {
        self.declaration(decl).question_token
    }

    fn property_signature_count(&self, decl: DeclId) -> usize {
        self.declaration(decl).property_signatures
    }

    fn type_text(&self, ty: TypeId) -> &str {
        &self.type_node(ty).text
    }

    fn type_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.type_node(ty).symbol
    }

    fn apparent_properties(&self, ty: TypeId) -> Vec<SymbolId> {
        let mut out = Vec::new();
        self.collect_properties(ty, &mut HashSet::new(), &mut HashSet::new(), &mut out);
        out
    }

    fn call_signature_count(&self, ty: TypeId) -> usize {
        match &self.type_node(ty).kind {
            TypeKind::Function { signatures } => *signatures,
            TypeKind::Object(shape) => shape.call_signatures,
            _ => 0,
        }
    }

    fn has_number_index(&self, ty: TypeId) -> bool {
        match &self.type_node(ty).kind {
            // `string` is indexable by position, like an array.
            TypeKind::Primitive {
                primitive: Primitive::String,
            } => true,
            TypeKind::Array { .. } | TypeKind::Tuple { .. } => true,
            TypeKind::Object(shape) => shape.number_index,
            _ => false,
        }
    }

    fn is_tuple(&self, ty: TypeId) -> bool {
        matches!(self.type_node(ty).kind, TypeKind::Tuple { .. })
    }

    fn tuple_elements(&self, ty: TypeId) -> &[TupleElement] {
        match &self.type_node(ty).kind {
            TypeKind::Tuple { elements } => elements,
            _ => &[],
        }
    }

    fn union_members(&self, ty: TypeId) -> Option<&[TypeId]> {
        match &self.type_node(ty).kind {
            TypeKind::Union { members } => Some(members),
            _ => None,
        }
    }

    fn literal_value(&self, ty: TypeId) -> Option<&Literal> {
        match &self.type_node(ty).kind {
            TypeKind::Literal { value } => Some(value),
            _ => None,
        }
    }

    fn symbol_name(&self, sym: SymbolId) -> &str {
        &self.symbol(sym).name
    }

    fn symbol_declarations(&self, sym: SymbolId) -> &[DeclId] {
        &self.symbol(sym).declarations
    }

    fn symbol_is_optional(&self, sym: SymbolId) -> bool {
        self.symbol(sym).optional
    }

    fn type_of_symbol(&self, sym: SymbolId) -> TypeId {
        self.symbol(sym).ty
    }

    fn declared_type_of_symbol(&self, sym: SymbolId) -> Option<TypeId> {
        self.symbol(sym).declared_type
    }

    fn documentation_comment(&self, sym: SymbolId) -> &str {
        &self.symbol(sym).documentation
    }

    fn documentation_tags(&self, sym: SymbolId) -> &[RawTag] {
        &self.symbol(sym).tags
    }
}
