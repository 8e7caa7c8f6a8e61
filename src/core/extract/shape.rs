//! Type shape classification.
//!
//! [`classify`] assigns every type one of the documentation shapes of
//! [`PropertyType`]. Rules are tried in a fixed order and the first match wins:
//!
//! 1. function: the type has a call signature
//! 2. tuple: numeric index and a fixed arity
//! 3. enum: a union other than `boolean`
//! 4. array: numeric index, except `string`
//! 5. object: declared by an interface or a non-empty type literal, at most one
//!    alias away, and not named `...Element`
//! 6. opaque: everything else
//!
//! Object and tuple expansion recurses into members. The [`ShapeContext`] tracks
//! which types are being expanded so a self-referential type is expanded once and
//! printed as opaque on its way back in.

use indexmap::IndexMap;

use crate::core::{
    data::{Property, PropertyType},
    program::{DeclKind, Literal, SymbolId, TypeId, TypeProvider},
};

use super::properties::extract_properties;

/// Names ending with this suffix are element types and stay opaque.
const ELEMENT_SUFFIX: &str = "Element";

/// Provider access plus the chain of object and tuple types currently being expanded.
pub struct ShapeContext<'p, P: TypeProvider + ?Sized> {
    provider: &'p P,
    expanding: Vec<TypeId>,
}

impl<'p, P: TypeProvider + ?Sized> ShapeContext<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            expanding: Vec::new(),
        }
    }

    pub fn provider(&self) -> &'p P {
        self.provider
    }

    /// Depth of the expansion chain.
    pub fn depth(&self) -> usize {
        self.expanding.len()
    }
}

/// Classify `ty` into its documentation shape.
pub fn classify<P: TypeProvider + ?Sized>(ty: TypeId, ctx: &mut ShapeContext<'_, P>) -> PropertyType {
    let provider = ctx.provider;
    let raw = provider.type_text(ty);

    if provider.call_signature_count(ty) > 0 {
        return PropertyType::Function {
            raw: raw.to_string(),
        };
    }

    let indexed = provider.has_number_index(ty);

    if indexed && provider.is_tuple(ty) {
        if ctx.expanding.contains(&ty) {
            return PropertyType::Opaque {
                raw: raw.to_string(),
            };
        }
        ctx.expanding.push(ty);
        let items = provider
            .tuple_elements(ty)
            .iter()
            .enumerate()
            .map(|(index, element)| Property {
                identifier: index.to_string(),
                ty: classify(element.ty, ctx),
                is_required: !element.optional,
                is_internal: false,
                description: String::new(),
                tags: IndexMap::new(),
                default_value: None,
            })
            .collect();
        ctx.expanding.pop();
        return PropertyType::Array {
            raw: raw.to_string(),
            items: Some(items),
        };
    }

    if let Some(members) = provider.union_members(ty)
        && raw != "boolean"
    {
        return PropertyType::Enum {
            raw: raw.to_string(),
            items: members
                .iter()
                .map(|member| enum_item(provider, *member))
                .collect(),
        };
    }

    if indexed && raw != "string" {
        return PropertyType::Array {
            raw: raw.to_string(),
            items: None,
        };
    }

    if is_structured_object(provider, ty) {
        if ctx.expanding.contains(&ty) {
            return PropertyType::Opaque {
                raw: raw.to_string(),
            };
        }
        ctx.expanding.push(ty);
        let items = extract_properties(&provider.apparent_properties(ty), ctx);
        ctx.expanding.pop();
        return PropertyType::Object { items };
    }

    PropertyType::Opaque {
        raw: raw.to_string(),
    }
}

/// One union constituent as it appears in an enum's `items`.
fn enum_item<P: TypeProvider + ?Sized>(provider: &P, ty: TypeId) -> String {
    match provider.literal_value(ty) {
        Some(Literal::String(value)) => format!("'{}'", value),
        Some(Literal::Number(value)) => value.to_string(),
        _ => provider.type_text(ty).to_string(),
    }
}

fn is_structured_object<P: TypeProvider + ?Sized>(provider: &P, ty: TypeId) -> bool {
    let Some(sym) = provider.type_symbol(ty) else {
        return false;
    };
    if provider.symbol_name(sym).ends_with(ELEMENT_SUFFIX) {
        return false;
    }
    if declares_object(provider, sym) {
        return true;
    }
    // One level of indirection only, e.g. an alias of a type literal.
    provider
        .declared_type_of_symbol(sym)
        .and_then(|declared| provider.type_symbol(declared))
        .is_some_and(|inner| inner != sym && declares_object(provider, inner))
}

fn declares_object<P: TypeProvider + ?Sized>(provider: &P, sym: SymbolId) -> bool {
    provider
        .symbol_declarations(sym)
        .iter()
        .any(|decl| match provider.declaration_kind(*decl) {
            DeclKind::Interface => true,
            DeclKind::TypeLiteral => provider.property_signature_count(*decl) > 0,
            _ => false,
        })
}
