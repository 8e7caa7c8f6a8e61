//! glint-docgen - component documentation for Glimmer/Glint signatures
//!
//! Extracts the Args, Blocks and Element of components from TypeScript
//! declarations and emits them as structured JSON documentation.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Source groups and tsconfig loading
//! - `core`: Parsing, type graph and extraction engine

pub mod cli;
pub mod config;
pub mod core;

pub use config::Source;
pub use core::data::{ComponentDoc, ElementProperty, Property, PropertyType};
pub use core::pipeline::{ParseResult, ParseWarning, parse};
