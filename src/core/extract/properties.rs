use crate::core::{
    data::Property,
    program::{SymbolId, TypeProvider},
};

use super::{
    comment::aggregate,
    shape::{ShapeContext, classify},
};

const INTERNAL_TAG: &str = "internal";
const DEFAULT_VALUE_TAG: &str = "defaultValue";

/// One `Property` per member, in the order given.
pub fn extract_properties<P: TypeProvider + ?Sized>(
    members: &[SymbolId],
    ctx: &mut ShapeContext<'_, P>,
) -> Vec<Property> {
    let provider = ctx.provider();
    members
        .iter()
        .map(|member| {
            let docs = aggregate(provider, *member);
            let ty = classify(provider.type_of_symbol(*member), ctx);
            Property {
                identifier: provider.symbol_name(*member).to_string(),
                ty,
                is_required: is_required(provider, *member),
                is_internal: docs.has_tag(INTERNAL_TAG),
                default_value: docs.tag(DEFAULT_VALUE_TAG).map(|tag| tag.value.clone()),
                description: docs.description,
                tags: docs.tags,
            }
        })
        .collect()
}

/// A member is required unless the provider flags it optional or every one of its
/// declaring sites is written with `?`.
///
/// Members without declaring sites are decided by the optional flag alone.
pub fn is_required<P: TypeProvider + ?Sized>(provider: &P, member: SymbolId) -> bool {
    if provider.symbol_is_optional(member) {
        return false;
    }
    let sites = provider.symbol_declarations(member);
    sites.is_empty() || !sites.iter().all(|decl| provider.has_question_token(*decl))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::data::PropertyType;
    use crate::core::extract::fixtures::{lower, member_type, root};
    use crate::core::extract::properties::*;
    use crate::core::program::{
        DeclKind, RawTag, TypeGraph,
        graph::{Declaration, Primitive, Symbol},
    };

    #[test]
    fn test_required_flags() {
        let mut graph = TypeGraph::new();
        let string = graph.primitive(Primitive::String);
        let required = graph.add_property("label", string, false);
        let optional = graph.add_property("size", string, true);

        assert!(is_required(&graph, required));
        assert!(!is_required(&graph, optional));
    }

    #[test]
    fn test_question_token_on_every_site() {
        let mut graph = TypeGraph::new();
        let string = graph.primitive(Primitive::String);
        let sym = graph.add_symbol(Symbol::new("size", string));
        for question_token in [true, true] {
            let mut decl = Declaration::new(DeclKind::PropertySignature, string);
            decl.symbol = Some(sym);
            decl.question_token = question_token;
            graph.add_declaration(decl);
        }
        assert!(!is_required(&graph, sym));

        // A single unmarked site keeps the member required.
        let mut decl = Declaration::new(DeclKind::PropertySignature, string);
        decl.symbol = Some(sym);
        graph.add_declaration(decl);
        assert!(is_required(&graph, sym));
    }

    #[test]
    fn test_no_declaring_sites() {
        let mut graph = TypeGraph::new();
        let string = graph.primitive(Primitive::String);
        let plain = graph.add_symbol(Symbol::new("label", string));
        let mut flagged = Symbol::new("size", string);
        flagged.optional = true;
        let flagged = graph.add_symbol(flagged);

        assert!(is_required(&graph, plain));
        assert!(!is_required(&graph, flagged));
    }

    #[test]
    fn test_docs_default_value_and_internal() {
        let mut graph = TypeGraph::new();
        let string = graph.primitive(Primitive::String);
        let kind = graph.add_property("type", string, true);
        {
            let symbol = graph.symbol_mut(kind);
            symbol.documentation = "The HTML type of the button".to_string();
            symbol.tags = vec![RawTag::new("defaultValue", "'button'")];
        }
        let hidden = graph.add_property("registry", string, false);
        graph.symbol_mut(hidden).tags = vec![RawTag::bare("internal")];

        let properties = extract_properties(&[kind, hidden], &mut ShapeContext::new(&graph));

        assert_eq!(properties[0].identifier, "type");
        assert_eq!(properties[0].description, "The HTML type of the button");
        assert_eq!(properties[0].default_value.as_deref(), Some("'button'"));
        assert!(!properties[0].is_internal);
        assert!(properties[1].is_internal);
        assert_eq!(properties[1].default_value, None);
    }

    #[test]
    fn test_order_is_preserved() {
        let mut graph = TypeGraph::new();
        let string = graph.primitive(Primitive::String);
        let members: Vec<SymbolId> = ["zeta", "Alpha", "beta"]
            .into_iter()
            .map(|name| graph.add_property(name, string, false))
            .collect();

        let names: Vec<String> = extract_properties(&members, &mut ShapeContext::new(&graph))
            .into_iter()
            .map(|property| property.identifier)
            .collect();
        assert_eq!(names, vec!["zeta", "Alpha", "beta"]);
    }

    #[test]
    fn test_lowered_members() {
        let graph = lower(&[(
            "drawer.ts",
            r#"
export interface DrawerArgs {
  /**
   * If the Drawer is open
   */
  isOpen: boolean;
  /**
   * Called when the Drawer closes
   * @since 1.0.0
   * @since 1.1.0
   */
  onClose?: () => void;
}

export declare class Drawer {
  args: DrawerArgs;
}
"#,
        )]);
        let drawer = graph.type_of_declaration(root(&graph, "Drawer"));
        let args = member_type(&graph, drawer, "args");

        let properties =
            extract_properties(&graph.apparent_properties(args), &mut ShapeContext::new(&graph));

        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].description, "If the Drawer is open");
        assert!(properties[0].is_required);
        assert!(!properties[1].is_required);
        assert_eq!(
            properties[1].ty,
            PropertyType::Function {
                raw: "() => void".to_string()
            }
        );
        assert_eq!(properties[1].tags["since"].value, "1.0.0\n1.1.0");
    }
}
