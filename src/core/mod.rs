//! Documentation engine.
//!
//! ## Pipeline
//!
//! 1. `file_scanner` finds the files of a source group
//! 2. `parsers` parses them with swc and reads their JSDoc blocks
//! 3. `program` lowers the parsed files into a `TypeGraph`
//! 4. `extract` classifies declarations and builds `ComponentDoc`s
//!
//! `pipeline` drives the steps for each source group.

pub mod data;
pub mod extract;
pub mod file_scanner;
pub mod parsers;
pub mod pipeline;
pub mod program;
