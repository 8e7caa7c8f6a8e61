//! Source file parsers.
//!
//! - `jsdoc`: JSDoc block parser (description + raw tags)
//! - `ts`: TypeScript/JavaScript source parser (uses swc for AST generation)

pub mod jsdoc;
pub mod ts;
