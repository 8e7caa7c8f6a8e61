//! Documentation data model.
//!
//! Everything here is plain data produced by the extraction engine and handed to
//! the caller. Types serialize to the JSON layout consumed by documentation sites:
//! camelCase keys, except the capitalized `Args`, `Blocks` and `Element` of a
//! [`ComponentDoc`].
//!
//! ## Module Structure
//!
//! - `component`: ComponentDoc, Property, PropertyType, ElementProperty
//! - `documentation`: DocumentationComment and DocumentationTag

pub mod component;
pub mod documentation;

pub use component::{ComponentDoc, ElementProperty, Property, PropertyType};
pub use documentation::{DocumentationComment, DocumentationTag};
