//! Types written inside variable initializers.
//!
//! `const Foo = templateOnly() as TOC<Signature>` carries its marker in the
//! expression, not in the binding's annotation. [`InitializerTypes`] lowers every
//! type position of such an expression (`as`, `satisfies`, `<T>expr`, call type
//! arguments, nested annotations) so the references are recorded on the declaration.

use swc_common::{Span, Spanned};
use swc_ecma_ast::{Expr, TsType};
use swc_ecma_visit::{Visit, VisitWith};

use super::Lowerer;
use crate::core::program::TypeId;

pub(super) struct InitializerTypes<'l, 'a> {
    lowerer: &'l mut Lowerer<'a>,
    file: usize,
    lowered: Vec<(Span, TypeId)>,
}

impl<'l, 'a> InitializerTypes<'l, 'a> {
    pub(super) fn new(lowerer: &'l mut Lowerer<'a>, file: usize) -> Self {
        Self {
            lowerer,
            file,
            lowered: Vec::new(),
        }
    }

    /// Lower the outermost types of `init` in source order, keyed by span.
    pub(super) fn collect(mut self, init: &Expr) -> Vec<(Span, TypeId)> {
        init.visit_with(&mut self);
        self.lowered
    }
}

impl Visit for InitializerTypes<'_, '_> {
    fn visit_ts_type(&mut self, node: &TsType) {
        // Lowering records the references nested in `node` itself.
        let ty = self.lowerer.lower_type(self.file, node);
        self.lowered.push((node.span(), ty));
    }
}

/// The type an initializer is asserted to, as in `value as T` or `<T>value`.
pub(super) fn asserted_type(init: &Expr) -> Option<&TsType> {
    match init {
        Expr::TsAs(expr) => Some(&*expr.type_ann),
        Expr::TsTypeAssertion(expr) => Some(&*expr.type_ann),
        Expr::Paren(paren) => asserted_type(&paren.expr),
        _ => None,
    }
}
