//! Type-system access for the extraction engine.
//!
//! The extraction engine never looks at syntax directly. Everything it needs is asked
//! through the [`TypeProvider`] trait, which exposes declarations, symbols and types
//! as small `Copy` handles.
//!
//! ## Module Structure
//!
//! - `graph`: `TypeGraph`, an in-memory arena implementing `TypeProvider`
//! - `collect`: lowering of swc-parsed TypeScript files into a `TypeGraph`

pub mod collect;
pub mod graph;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use collect::lower_program;
pub use graph::TypeGraph;

/// Handle to a declaration site (a class, a variable, a property signature, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DeclId(pub u32);

/// Handle to a named symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SymbolId(pub u32);

/// Handle to a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(pub u32);

/// Syntactic kind of a declaration site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclKind {
    Class,
    Variable,
    Interface,
    TypeLiteral,
    TypeAlias,
    Enum,
    PropertySignature,
    PropertyDeclaration,
    Method,
    Accessor,
    Other,
}

impl DeclKind {
    /// Declarations that can sit in a heritage chain.
    pub fn is_class_like(self) -> bool {
        matches!(self, DeclKind::Class | DeclKind::Variable)
    }
}

/// The first base type listed in a declaration's first heritage clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeritageRef {
    /// Explicit type arguments, e.g. `Signature` in `extends Component<Signature>`.
    #[serde(default)]
    pub type_arguments: Vec<TypeId>,
    /// The resolved base type, when the provider can resolve it.
    #[serde(default)]
    pub base: Option<TypeId>,
}

/// A type reference found somewhere in a declaration's syntax subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReference {
    pub name: String,
    #[serde(default)]
    pub type_arguments: Vec<TypeId>,
}

/// Literal value carried by a literal type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum Literal {
    String(String),
    Number(f64),
    Boolean(bool),
}

/// One slot of a tuple type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TupleElement {
    pub ty: TypeId,
    #[serde(default)]
    pub optional: bool,
}

/// Text of a documentation tag.
///
/// Providers differ in how they hand out tag text: either as one string or as a
/// list of display parts that still need joining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagText {
    Text(String),
    Parts(Vec<String>),
}

/// A documentation tag as the provider reports it, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTag {
    pub name: String,
    #[serde(default)]
    pub text: Option<TagText>,
}

impl RawTag {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(TagText::Text(text.into())),
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
        }
    }
}

/// Read-only queries over a compiled type-information graph.
///
/// All queries are infallible: unknown information is reported as `None`, an empty
/// slice or `false`, never as an error.
pub trait TypeProvider {
    // ============================================================
    // Declarations
    // ============================================================

    fn declaration_kind(&self, decl: DeclId) -> DeclKind;

    /// Identifier of the declaration, `None` when anonymous.
    fn declaration_name(&self, decl: DeclId) -> Option<&str>;

    fn declaration_file(&self, decl: DeclId) -> &Path;

    fn declaration_symbol(&self, decl: DeclId) -> Option<SymbolId>;

    fn type_of_declaration(&self, decl: DeclId) -> TypeId;

    /// First base type of the first heritage clause.
    fn first_heritage(&self, decl: DeclId) -> Option<&HeritageRef>;

    /// Every type reference inside the declaration's syntax subtree, in source order.
    fn type_references(&self, decl: DeclId) -> &[TypeReference];

    /// Whether the declaration site is written with a `?` marker.
    fn has_question_token(&self, decl: DeclId) -> bool;

    /// Number of property signatures directly inside a type literal or interface.
    fn property_signature_count(&self, decl: DeclId) -> usize;

    // ============================================================
    // Types
    // ============================================================

    /// Canonical textual rendering of a type.
    fn type_text(&self, ty: TypeId) -> &str;

    fn type_symbol(&self, ty: TypeId) -> Option<SymbolId>;

    /// Properties visible on the type, inherited members included.
    fn apparent_properties(&self, ty: TypeId) -> Vec<SymbolId>;

    /// Named property lookup, apparent properties included.
    fn property_of_type(&self, ty: TypeId, name: &str) -> Option<SymbolId> {
        self.apparent_properties(ty)
            .into_iter()
            .find(|sym| self.symbol_name(*sym) == name)
    }

    fn call_signature_count(&self, ty: TypeId) -> usize;

    fn has_number_index(&self, ty: TypeId) -> bool;

    fn is_tuple(&self, ty: TypeId) -> bool;

    fn tuple_elements(&self, ty: TypeId) -> &[TupleElement];

    /// Constituents of a union type, `None` when the type is not a union.
    fn union_members(&self, ty: TypeId) -> Option<&[TypeId]>;

    fn literal_value(&self, ty: TypeId) -> Option<&Literal>;

    // ============================================================
    // Symbols
    // ============================================================

    fn symbol_name(&self, sym: SymbolId) -> &str;

    fn symbol_declarations(&self, sym: SymbolId) -> &[DeclId];

    /// The provider's optionality flag.
    fn symbol_is_optional(&self, sym: SymbolId) -> bool;

    fn type_of_symbol(&self, sym: SymbolId) -> TypeId;

    /// The type a symbol declares, for symbols that name a type (aliases, interfaces).
    fn declared_type_of_symbol(&self, sym: SymbolId) -> Option<TypeId>;

    fn documentation_comment(&self, sym: SymbolId) -> &str;

    fn documentation_tags(&self, sym: SymbolId) -> &[RawTag];
}
