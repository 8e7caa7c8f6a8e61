//! Shared helpers for extraction tests.

use std::{path::Path, sync::Arc};

use swc_common::SourceMap;

use crate::core::{
    parsers::ts::parse_source,
    program::{DeclId, TypeGraph, TypeId, TypeProvider, lower_program},
};

/// Parse and lower `(path, code)` pairs as one program.
pub fn lower(files: &[(&str, &str)]) -> TypeGraph {
    let source_map = Arc::new(SourceMap::default());
    let parsed: Vec<_> = files
        .iter()
        .map(|(path, code)| {
            parse_source(code.to_string(), Path::new(path), source_map.clone()).unwrap()
        })
        .collect();
    lower_program(&parsed)
}

pub fn root(graph: &TypeGraph, name: &str) -> DeclId {
    *graph
        .roots()
        .iter()
        .find(|decl| graph.declaration_name(**decl) == Some(name))
        .unwrap_or_else(|| panic!("no root declaration named {name}"))
}

pub fn member_type(graph: &TypeGraph, ty: TypeId, name: &str) -> TypeId {
    let sym = graph
        .property_of_type(ty, name)
        .unwrap_or_else(|| panic!("no member named {name}"));
    graph.type_of_symbol(sym)
}

pub const BUTTON: &str = r#"
import Component from '@glimmer/component';

interface ButtonArgs {
  /**
   * The HTML type of the button
   *
   * @defaultValue 'button'
   */
  type?: 'button' | 'submit' | 'reset';
  /**
   * If the button is renderless
   */
  isRenderless?: boolean;
  size: string;
}

interface ButtonSignature {
  Args: ButtonArgs;
  Blocks: {
    default: [{ classNames: string }];
  };
  Element: HTMLButtonElement;
}

/**
 * A button that submits or resets forms
 *
 * @since 1.0.0
 */
export default class Button extends Component<ButtonSignature> {}
"#;
