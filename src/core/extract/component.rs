use crate::core::program::{DeclId, TypeId, TypeProvider};

use super::signature::resolve_signature;

/// Type references marking a template-only component, e.g. `TOC<Signature>`.
pub const TEMPLATE_ONLY_MARKERS: &[&str] = &["TOC", "TemplateOnlyComponent"];

/// Member whose presence makes a type a component signature.
pub const ARGS_MEMBER: &str = "Args";

/// How a declaration qualified as a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    /// A class component. `Args` lives on the resolved signature, or on the
    /// class itself when there is none.
    Class { signature: Option<TypeId> },
    /// A declaration typed with a template-only marker; the signature is the
    /// marker's type argument.
    TemplateOnly { signature: TypeId },
}

impl ComponentKind {
    pub fn signature(&self) -> Option<TypeId> {
        match self {
            ComponentKind::Class { signature } => *signature,
            ComponentKind::TemplateOnly { signature } => Some(*signature),
        }
    }
}

/// Decide whether `decl` documents a component, and how.
pub fn classify_declaration<P: TypeProvider + ?Sized>(
    provider: &P,
    decl: DeclId,
) -> Option<ComponentKind> {
    if !provider.declaration_kind(decl).is_class_like() {
        return None;
    }

    if let Some(signature) = template_only_signature(provider, decl) {
        return has_args(provider, signature).then_some(ComponentKind::TemplateOnly { signature });
    }

    let signature = resolve_signature(provider, decl);
    let own = provider.type_of_declaration(decl);
    (has_args(provider, own) || signature.is_some_and(|ty| has_args(provider, ty)))
        .then_some(ComponentKind::Class { signature })
}

pub fn is_component<P: TypeProvider + ?Sized>(provider: &P, decl: DeclId) -> bool {
    classify_declaration(provider, decl).is_some()
}

/// First type argument of the first marker reference in the declaration.
fn template_only_signature<P: TypeProvider + ?Sized>(provider: &P, decl: DeclId) -> Option<TypeId> {
    provider
        .type_references(decl)
        .iter()
        .find(|reference| TEMPLATE_ONLY_MARKERS.contains(&reference.name.as_str()))
        .and_then(|reference| reference.type_arguments.first().copied())
}

fn has_args<P: TypeProvider + ?Sized>(provider: &P, ty: TypeId) -> bool {
    provider.property_of_type(ty, ARGS_MEMBER).is_some()
}
