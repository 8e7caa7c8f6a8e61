//! Lowering of `TsType` syntax.
//!
//! Canonical text follows the TypeScript printer closely enough for documentation:
//! `"a" | "b"`, `{ a: string; b?: number; }`, `(event: Event) => void`, `T[]`.

use std::collections::HashMap;

use swc_common::Spanned;
use swc_ecma_ast::{
    BindingIdent, Function, Pat, RestPat, TsEntityName, TsFnOrConstructorType, TsFnParam,
    TsIndexSignature, TsKeywordTypeKind, TsLit, TsLitType, TsTupleType, TsType, TsTypeAnn,
    TsTypeLit, TsTypeOperatorOp, TsTypeRef, TsUnionOrIntersectionType,
};

use super::Lowerer;
use super::count_property_signatures;
use crate::core::program::graph::{Declaration, ObjectShape, Primitive, Symbol, TypeKind};
use crate::core::program::{DeclKind, Literal, TupleElement, TypeId, TypeReference};

impl<'a> Lowerer<'a> {
    pub(super) fn lower_type(&mut self, file: usize, ty: &TsType) -> TypeId {
        match ty {
            TsType::TsKeywordType(keyword) => self.keyword(keyword.kind),
            TsType::TsTypeRef(reference) => self.lower_type_ref(file, reference),
            TsType::TsTypeLit(literal) => self.lower_type_literal(file, literal),
            TsType::TsArrayType(array) => {
                let element = self.lower_type(file, &array.elem_type);
                self.graph.array(element)
            }
            TsType::TsTupleType(tuple) => self.lower_tuple(file, tuple),
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
                self.lower_union(file, &union.types, " | ")
            }
            TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsIntersectionType(
                intersection,
            )) => self.lower_union(file, &intersection.types, " & "),
            TsType::TsFnOrConstructorType(TsFnOrConstructorType::TsFnType(function)) => {
                let params = self.render_fn_params(file, &function.params);
                let ret = self.lower_type(file, &function.type_ann.type_ann);
                let text = format!(
                    "({}) => {}",
                    params.join(", "),
                    self.graph.type_node(ret).text
                );
                self.graph.function(text)
            }
            TsType::TsLitType(literal) => self.lower_literal(file, literal),
            TsType::TsParenthesizedType(paren) => self.lower_type(file, &paren.type_ann),
            TsType::TsOptionalType(optional) => self.lower_type(file, &optional.type_ann),
            TsType::TsTypeOperator(op) if matches!(op.op, TsTypeOperatorOp::ReadOnly) => {
                self.lower_type(file, &op.type_ann)
            }
            other => {
                let text = self.snippet(file, other.span());
                self.graph.unresolved(text)
            }
        }
    }

    /// Lowered type of an optional annotation; a missing annotation is `any`.
    pub(super) fn annotation(&mut self, file: usize, annotation: Option<&TsTypeAnn>) -> TypeId {
        match annotation {
            Some(annotation) => self.lower_type(file, &annotation.type_ann),
            None => self.primitive(Primitive::Any),
        }
    }

    pub(super) fn annotation_text(
        &mut self,
        file: usize,
        annotation: Option<&TsTypeAnn>,
    ) -> String {
        let ty = self.annotation(file, annotation);
        self.graph.type_node(ty).text.clone()
    }

    fn keyword(&mut self, kind: TsKeywordTypeKind) -> TypeId {
        let primitive = match kind {
            TsKeywordTypeKind::TsBooleanKeyword => return self.boolean(),
            TsKeywordTypeKind::TsIntrinsicKeyword => return self.graph.unresolved("intrinsic"),
            TsKeywordTypeKind::TsStringKeyword => Primitive::String,
            TsKeywordTypeKind::TsNumberKeyword => Primitive::Number,
            TsKeywordTypeKind::TsBigIntKeyword => Primitive::BigInt,
            TsKeywordTypeKind::TsSymbolKeyword => Primitive::Symbol,
            TsKeywordTypeKind::TsObjectKeyword => Primitive::Object,
            TsKeywordTypeKind::TsAnyKeyword => Primitive::Any,
            TsKeywordTypeKind::TsUnknownKeyword => Primitive::Unknown,
            TsKeywordTypeKind::TsNeverKeyword => Primitive::Never,
            TsKeywordTypeKind::TsVoidKeyword => Primitive::Void,
            TsKeywordTypeKind::TsUndefinedKeyword => Primitive::Undefined,
            TsKeywordTypeKind::TsNullKeyword => Primitive::Null,
        };
        self.primitive(primitive)
    }

    fn lower_type_ref(&mut self, file: usize, reference: &TsTypeRef) -> TypeId {
        let name = entity_name(&reference.type_name);

        // Reserve the slot first so outer references precede inner ones.
        let slot = self.references.as_mut().map(|references| {
            references.push(TypeReference {
                name: name.clone(),
                type_arguments: Vec::new(),
            });
            references.len() - 1
        });

        let mut arguments = Vec::new();
        for param in reference.type_params.iter().flat_map(|params| params.params.iter()) {
            arguments.push(self.lower_type(file, param));
        }
        if let (Some(slot), Some(references)) = (slot, self.references.as_mut()) {
            references[slot].type_arguments = arguments.clone();
        }

        if let TsEntityName::Ident(ident) = &reference.type_name {
            if let Some(ty) = self.lookup_type(file, &ident.sym) {
                return ty;
            }
            if let [element] = arguments.as_slice()
                && matches!(&*ident.sym, "Array" | "ReadonlyArray")
            {
                return self.graph.array(*element);
            }
        }

        let text = if arguments.is_empty() {
            name
        } else {
            let arguments = arguments
                .iter()
                .map(|ty| self.graph.type_node(*ty).text.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}<{}>", name, arguments)
        };
        self.graph.unresolved(text)
    }

    pub(super) fn lower_type_literal(&mut self, file: usize, literal: &TsTypeLit) -> TypeId {
        let ty = self.graph.add_type("{}", TypeKind::Unresolved);
        let mut symbol = Symbol::new("__type", ty);
        symbol.declared_type = Some(ty);
        let sym = self.graph.add_symbol(symbol);
        self.graph.set_type_symbol(ty, sym);

        let mut shape = ObjectShape::default();
        let rendered =
            self.lower_type_members(file, &literal.members, &mut shape, &mut HashMap::new());
        if !rendered.is_empty() {
            self.graph
                .set_type_text(ty, format!("{{ {} }}", rendered.join(" ")));
        }
        self.graph.set_type_kind(ty, TypeKind::Object(shape));

        let mut decl = Declaration::new(DeclKind::TypeLiteral, ty);
        decl.file = self.files[file].path.clone();
        decl.symbol = Some(sym);
        decl.property_signatures = count_property_signatures(&literal.members);
        self.graph.add_declaration(decl);

        ty
    }

    fn lower_tuple(&mut self, file: usize, tuple: &TsTupleType) -> TypeId {
        let mut texts = Vec::new();
        let mut elements = Vec::new();

        for element in &tuple.elem_types {
            let (inner, mut optional) = match &*element.ty {
                TsType::TsOptionalType(opt) => (&*opt.type_ann, true),
                other => (other, false),
            };
            let label = match &element.label {
                Some(Pat::Ident(binding)) => {
                    optional |= binding.id.optional;
                    Some(binding.id.sym.to_string())
                }
                _ => None,
            };

            let ty = self.lower_type(file, inner);
            let text = &self.graph.type_node(ty).text;
            texts.push(match label {
                Some(label) => format!("{}{}: {}", label, if optional { "?" } else { "" }, text),
                None if optional => format!("{}?", text),
                None => text.clone(),
            });
            elements.push(TupleElement { ty, optional });
        }

        self.graph
            .add_type(format!("[{}]", texts.join(", ")), TypeKind::Tuple { elements })
    }

    /// Lower a union (`separator` ` | `) or an intersection (` & `).
    fn lower_union(&mut self, file: usize, types: &[Box<TsType>], separator: &str) -> TypeId {
        if let [single] = types {
            return self.lower_type(file, single);
        }

        let is_union = separator == " | ";
        let mut texts = Vec::new();
        let mut members = Vec::new();
        for ty in types {
            let member = self.lower_type(file, ty);
            let node = self.graph.type_node(member);
            texts.push(match node.kind {
                TypeKind::Function { .. } => format!("({})", node.text),
                _ => node.text.clone(),
            });
            match &node.kind {
                // `boolean | undefined` has the constituents `false`, `true`, `undefined`
                TypeKind::Union { members: inner } if is_union => members.extend(inner),
                _ => members.push(member),
            }
        }

        let text = texts.join(separator);
        let kind = if is_union {
            TypeKind::Union { members }
        } else {
            TypeKind::Intersection { members }
        };
        self.graph.add_type(text, kind)
    }

    fn lower_literal(&mut self, file: usize, literal: &TsLitType) -> TypeId {
        match &literal.lit {
            TsLit::Str(value) => self.graph.string_literal(&value.value.to_string_lossy()),
            TsLit::Number(value) => self.graph.number_literal(value.value),
            TsLit::Bool(value) => self.graph.add_type(
                value.value.to_string(),
                TypeKind::Literal {
                    value: Literal::Boolean(value.value),
                },
            ),
            TsLit::BigInt(_) | TsLit::Tpl(_) => {
                let text = self.snippet(file, literal.span);
                self.graph.unresolved(text)
            }
        }
    }

    // ============================================================
    // Functions
    // ============================================================

    /// Type of a class method, rendered as an arrow function type.
    pub(super) fn lower_function(&mut self, file: usize, function: &Function) -> TypeId {
        let mut params = Vec::new();
        for (position, param) in function.params.iter().enumerate() {
            params.push(self.render_pat(file, &param.pat, position));
        }
        let ret = self.annotation_text(file, function.return_type.as_deref());
        self.graph
            .function(format!("({}) => {}", params.join(", "), ret))
    }

    pub(super) fn render_fn_params(&mut self, file: usize, params: &[TsFnParam]) -> Vec<String> {
        let mut rendered = Vec::new();
        for (position, param) in params.iter().enumerate() {
            rendered.push(match param {
                TsFnParam::Ident(binding) => self.render_binding(file, binding),
                TsFnParam::Rest(rest) => self.render_rest(file, rest),
                TsFnParam::Array(array) => {
                    let text = self.annotation_text(file, array.type_ann.as_deref());
                    format!("__{}: {}", position, text)
                }
                TsFnParam::Object(object) => {
                    let text = self.annotation_text(file, object.type_ann.as_deref());
                    format!("__{}: {}", position, text)
                }
            });
        }
        rendered
    }

    fn render_pat(&mut self, file: usize, pat: &Pat, position: usize) -> String {
        match pat {
            Pat::Ident(binding) => self.render_binding(file, binding),
            Pat::Rest(rest) => self.render_rest(file, rest),
            Pat::Assign(assign) => self.render_pat(file, &assign.left, position),
            Pat::Array(array) => {
                let text = self.annotation_text(file, array.type_ann.as_deref());
                format!("__{}: {}", position, text)
            }
            Pat::Object(object) => {
                let text = self.annotation_text(file, object.type_ann.as_deref());
                format!("__{}: {}", position, text)
            }
            _ => format!("__{}: any", position),
        }
    }

    fn render_binding(&mut self, file: usize, binding: &BindingIdent) -> String {
        let text = self.annotation_text(file, binding.type_ann.as_deref());
        let marker = if binding.id.optional { "?" } else { "" };
        format!("{}{}: {}", binding.id.sym, marker, text)
    }

    fn render_rest(&mut self, file: usize, rest: &RestPat) -> String {
        let (name, inner_annotation) = match &*rest.arg {
            Pat::Ident(binding) => (binding.id.sym.to_string(), binding.type_ann.as_deref()),
            _ => ("args".to_string(), None),
        };
        let text = self.annotation_text(file, rest.type_ann.as_deref().or(inner_annotation));
        format!("...{}: {}", name, text)
    }
}

/// Whether an index signature is keyed by `number`.
pub(super) fn is_number_index(signature: &TsIndexSignature) -> bool {
    let Some(TsFnParam::Ident(binding)) = signature.params.first() else {
        return false;
    };
    binding.type_ann.as_deref().is_some_and(|annotation| {
        matches!(
            &*annotation.type_ann,
            TsType::TsKeywordType(keyword)
                if keyword.kind == TsKeywordTypeKind::TsNumberKeyword
        )
    })
}

/// `A` or `A.B.C`.
fn entity_name(name: &TsEntityName) -> String {
    match name {
        TsEntityName::Ident(ident) => ident.sym.to_string(),
        TsEntityName::TsQualifiedName(qualified) => {
            format!("{}.{}", entity_name(&qualified.left), qualified.right.sym)
        }
    }
}
