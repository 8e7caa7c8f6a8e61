use std::collections::HashSet;

use crate::core::program::{DeclId, TypeId, TypeProvider};

/// Upper bound on heritage hops before giving up.
const MAX_HERITAGE_DEPTH: usize = 32;

/// Find the type argument that describes `decl`'s signature.
///
/// The first type argument of the first heritage clause wins. A base written
/// without type arguments is followed to its own declaration, so the signature
/// may be supplied any number of levels up. Cyclic or overly deep chains resolve
/// to `None`.
pub fn resolve_signature<P: TypeProvider + ?Sized>(provider: &P, decl: DeclId) -> Option<TypeId> {
    let mut visited = HashSet::new();
    let mut current = decl;

    while visited.len() < MAX_HERITAGE_DEPTH && visited.insert(current) {
        let heritage = provider.first_heritage(current)?;
        if let Some(argument) = heritage.type_arguments.first() {
            return Some(*argument);
        }
        current = base_declaration(provider, heritage.base?)?;
    }

    None
}

/// The class-like declaration behind a base type.
fn base_declaration<P: TypeProvider + ?Sized>(provider: &P, base: TypeId) -> Option<DeclId> {
    let sym = provider.type_symbol(base)?;
    provider
        .symbol_declarations(sym)
        .iter()
        .copied()
        .find(|decl| provider.declaration_kind(*decl).is_class_like())
}
