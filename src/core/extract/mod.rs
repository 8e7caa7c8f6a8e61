//! Component documentation extraction.
//!
//! Everything in this module works on a [`TypeProvider`](crate::core::program::TypeProvider)
//! and never fails: missing or malformed type information degrades to an absent
//! signature, a flag-only required-ness or an opaque shape.
//!
//! Dependency order, leaves first:
//!
//! - `comment`: documentation aggregation
//! - `shape`: type shape classification
//! - `signature`: signature resolution along the heritage chain
//! - `component`: component and template-only detection
//! - `properties`: member sets to `Property` records
//! - `builder`: one `ComponentDoc` per accepted declaration
//! - `naming`: package and module names from file paths

pub mod builder;
pub mod comment;
pub mod component;
pub mod naming;
pub mod properties;
pub mod shape;
pub mod signature;

pub use builder::build_component_doc;
pub use comment::aggregate;
pub use component::{ComponentKind, classify_declaration, is_component};
pub use naming::{ModuleName, infer_module_name};
pub use properties::{extract_properties, is_required};
pub use shape::{ShapeContext, classify};
pub use signature::resolve_signature;

#[cfg(test)]
pub(crate) mod fixtures;
