use std::path::Path;

use crate::core::{
    data::{ComponentDoc, DocumentationComment, ElementProperty, Property},
    program::{DeclId, SymbolId, TypeId, TypeProvider},
};

use super::{
    comment::aggregate,
    component::{ARGS_MEMBER, ComponentKind},
    naming::infer_module_name,
    properties::extract_properties,
    shape::{ShapeContext, classify},
};

const BLOCKS_MEMBER: &str = "Blocks";
const ELEMENT_MEMBER: &str = "Element";
const DEFAULT_NAME: &str = "Component";
const ELEMENT_DOCS_URL: &str = "https://developer.mozilla.org/en-US/docs/Web/API/";

/// Build the documentation of one accepted component declaration.
///
/// `root` is the source root the declaration's file was discovered under; it only
/// feeds package and module naming.
pub fn build_component_doc<P: TypeProvider + ?Sized>(
    provider: &P,
    decl: DeclId,
    kind: ComponentKind,
    root: &Path,
) -> ComponentDoc {
    let file = provider.declaration_file(decl);
    let naming = infer_module_name(root, file);

    // Signature members win over members declared on the component itself.
    let mut sources = Vec::with_capacity(2);
    sources.extend(kind.signature());
    sources.push(provider.type_of_declaration(decl));

    let mut ctx = ShapeContext::new(provider);
    let args = member_set(&mut ctx, &sources, ARGS_MEMBER);
    let blocks = member_set(&mut ctx, &sources, BLOCKS_MEMBER);
    let element = find_member(provider, &sources, ELEMENT_MEMBER)
        .map(|sym| element_property(&mut ctx, sym));

    let DocumentationComment { description, tags } = provider
        .declaration_symbol(decl)
        .map(|sym| aggregate(provider, sym))
        .unwrap_or_default();

    ComponentDoc {
        package: naming.package,
        module: naming.module,
        name: provider
            .declaration_name(decl)
            .unwrap_or(DEFAULT_NAME)
            .to_string(),
        file_name: file.to_string_lossy().into_owned(),
        description,
        tags,
        args,
        blocks,
        element,
    }
}

fn find_member<P: TypeProvider + ?Sized>(
    provider: &P,
    sources: &[TypeId],
    name: &str,
) -> Option<SymbolId> {
    sources
        .iter()
        .find_map(|ty| provider.property_of_type(*ty, name))
}

/// Properties of the named member's type, empty when the member is missing.
fn member_set<P: TypeProvider + ?Sized>(
    ctx: &mut ShapeContext<'_, P>,
    sources: &[TypeId],
    name: &str,
) -> Vec<Property> {
    let provider = ctx.provider();
    match find_member(provider, sources, name) {
        Some(sym) => {
            let members = provider.apparent_properties(provider.type_of_symbol(sym));
            extract_properties(&members, ctx)
        }
        None => Vec::new(),
    }
}

fn element_property<P: TypeProvider + ?Sized>(
    ctx: &mut ShapeContext<'_, P>,
    sym: SymbolId,
) -> ElementProperty {
    let provider = ctx.provider();
    let ty = provider.type_of_symbol(sym);
    ElementProperty {
        identifier: ELEMENT_MEMBER.to_string(),
        ty: classify(ty, ctx),
        description: aggregate(provider, sym).description,
        url: format!("{}{}", ELEMENT_DOCS_URL, provider.type_text(ty)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::core::data::PropertyType;
    use crate::core::extract::builder::*;
    use crate::core::extract::classify_declaration;
    use crate::core::extract::fixtures::{BUTTON, lower, root};
    use crate::core::program::{HeritageRef, TypeGraph, graph::Primitive};

    fn build(graph: &TypeGraph, name: &str) -> ComponentDoc {
        let decl = root(graph, name);
        let kind = classify_declaration(graph, decl).unwrap();
        build_component_doc(graph, decl, kind, Path::new("/work/fixtures"))
    }

    fn opaque(raw: &str) -> PropertyType {
        PropertyType::Opaque {
            raw: raw.to_string(),
        }
    }

    #[test]
    fn test_signature_with_args_and_element() {
        let mut graph = TypeGraph::new();
        let string = graph.primitive(Primitive::String);
        let size = graph.add_property("size", string, false);
        let args = graph.add_type_literal(vec![size]);
        let args = graph.add_property("Args", args, false);
        let element = graph.unresolved("HTMLButtonElement");
        let element = graph.add_property("Element", element, false);
        let signature = graph.add_interface("ButtonSignature", vec![args, element]);
        let component = graph.unresolved("Component");

        let button = graph.add_class(
            "Button",
            "/work/fixtures/button.ts",
            Some(HeritageRef {
                type_arguments: vec![signature],
                base: Some(component),
            }),
        );
        graph.push_root(button);

        let doc = build(&graph, "Button");

        assert_eq!(doc.args.len(), 1);
        assert_eq!(doc.args[0].identifier, "size");
        assert!(doc.args[0].is_required);
        assert_eq!(doc.args[0].ty, opaque("string"));
        assert_eq!(doc.blocks, vec![]);
        assert_eq!(
            doc.element,
            Some(ElementProperty {
                identifier: "Element".to_string(),
                ty: opaque("HTMLButtonElement"),
                description: String::new(),
                url: "https://developer.mozilla.org/en-US/docs/Web/API/HTMLButtonElement"
                    .to_string(),
            })
        );
        assert_eq!(doc.package, "fixtures");
        assert_eq!(doc.module, "button");
        assert_eq!(doc.file_name, "/work/fixtures/button.ts");
    }

    #[test]
    fn test_button_fixture() {
        let graph = lower(&[("/work/fixtures/button.ts", BUTTON)]);
        let doc = build(&graph, "Button");

        assert_eq!(doc.name, "Button");
        assert_eq!(doc.description, "A button that submits or resets forms");
        assert_eq!(doc.tags["since"].value, "1.0.0");

        let names: Vec<&str> = doc.args.iter().map(|arg| arg.identifier.as_str()).collect();
        assert_eq!(names, vec!["type", "isRenderless", "size"]);

        let kind = &doc.args[0];
        assert!(!kind.is_required);
        assert_eq!(kind.description, "The HTML type of the button");
        assert_eq!(kind.default_value.as_deref(), Some("'button'"));
        assert_eq!(
            kind.ty,
            PropertyType::Enum {
                raw: "\"button\" | \"submit\" | \"reset\"".to_string(),
                items: vec![
                    "'button'".to_string(),
                    "'submit'".to_string(),
                    "'reset'".to_string()
                ],
            }
        );
        assert_eq!(doc.args[1].ty, opaque("boolean"));
        assert!(doc.args[2].is_required);

        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].identifier, "default");
        let PropertyType::Array {
            items: Some(items), ..
        } = &doc.blocks[0].ty
        else {
            panic!("expected a tuple");
        };
        assert_eq!(items.len(), 1);
        let PropertyType::Object { items: fields } = &items[0].ty else {
            panic!("expected an object");
        };
        assert_eq!(fields[0].identifier, "classNames");

        let element = doc.element.unwrap();
        assert_eq!(element.ty, opaque("HTMLButtonElement"));
    }

    #[test]
    fn test_template_only_fixture() {
        let graph = lower(&[(
            "/work/fixtures/spinner.d.ts",
            r#"
import type { TOC } from '@ember/component/template-only';

/**
 * My cool component
 * @default cool
 */
declare const Spinner: TOC<{
  Element: SVGElement;
  Args: {
    class?: string;
  };
}>;
export default Spinner;
"#,
        )]);
        let doc = build(&graph, "Spinner");

        assert_eq!(doc.name, "Spinner");
        assert_eq!(doc.module, "spinner");
        assert_eq!(doc.description, "My cool component");
        assert_eq!(doc.tags["default"].value, "cool");
        assert_eq!(doc.args.len(), 1);
        assert_eq!(doc.args[0].identifier, "class");
        assert!(!doc.args[0].is_required);
        assert_eq!(
            doc.element.unwrap().url,
            "https://developer.mozilla.org/en-US/docs/Web/API/SVGElement"
        );
    }

    #[test]
    fn test_anonymous_class_and_members_on_the_class() {
        let mut graph = TypeGraph::new();
        let string = graph.primitive(Primitive::String);
        let label = graph.add_property("label", string, false);
        let args = graph.add_interface("LegacyArgs", vec![label]);
        let args = graph.add_property("Args", args, false);

        let class = graph.add_class("Legacy", "/work/fixtures/legacy.ts", None);
        let class_ty = graph.type_of_declaration(class);
        graph.object_shape_mut(class_ty).unwrap().members.push(args);
        graph.declaration_mut(class).name = None;
        let sym = graph.declaration_symbol(class).unwrap();
        graph.symbol_mut(sym).documentation = "Old style".to_string();

        let kind = classify_declaration(&graph, class).unwrap();
        let doc = build_component_doc(&graph, class, kind, Path::new("/work/fixtures"));

        assert_eq!(doc.name, "Component");
        assert_eq!(doc.description, "Old style");
        assert_eq!(doc.args[0].identifier, "label");
        assert_eq!(doc.element, None);
    }
}
