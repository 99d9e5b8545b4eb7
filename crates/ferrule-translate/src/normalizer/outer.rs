//! Enclosing-instance references in hoisted initializers
//!
//! Inside an inner class, a bare read of an enclosing instance's field or an
//! implicit-receiver call of its method reaches that instance through the
//! outer-reference field chain:
//!
//! ```text
//! outerVar        => this$0_->outerVar_
//! Test.this       => this$0_
//! helper()        => [this$0_ helper]
//! ```
//!
//! The preamble assigns `this$0` before any of these reads run.

use ferrule_tree::visitor::{walk_expression_mut, VisitorMut};
use ferrule_tree::{Binding, ClassDecl, Expression, FieldRef, Statement, TypeRef};
use tracing::trace;

/// Route enclosing-instance reads in `statements` through the outer-reference
/// fields of `class`.
pub fn rewrite_enclosing_reads(class: &ClassDecl, statements: &mut [Statement]) {
    if !class.is_inner() {
        return;
    }
    let mut rewriter = OuterRewriter { class, rewritten: 0 };
    for stmt in statements.iter_mut() {
        rewriter.visit_statement_mut(stmt);
    }
    if rewriter.rewritten > 0 {
        trace!(
            class = %class.name(),
            reads = rewriter.rewritten,
            "rewrote enclosing-instance reads"
        );
    }
}

struct OuterRewriter<'a> {
    class: &'a ClassDecl,
    rewritten: usize,
}

impl OuterRewriter<'_> {
    /// Depth of `ty` in the enclosing chain, innermost first.
    fn depth(&self, ty: &TypeRef) -> Option<usize> {
        self.class.outer.iter().position(|link| &link.enclosing == ty)
    }

    /// `this$0_`, then one `->this$N_` hop per further level.
    fn receiver(&mut self, depth: usize) -> Expression {
        self.rewritten += 1;
        let chain = &self.class.outer;
        let mut receiver =
            Expression::field(FieldRef::instance(&self.class.ty, chain[0].field.clone()));
        for level in 1..=depth {
            let hop = FieldRef::instance(&chain[level - 1].enclosing, chain[level].field.clone());
            receiver = Expression::field_access(receiver, hop);
        }
        receiver
    }
}

impl VisitorMut for OuterRewriter<'_> {
    fn visit_expression_mut(&mut self, expr: &mut Expression) {
        match expr {
            Expression::Name(name) => {
                let replacement = match &name.binding {
                    Some(Binding::Field(field)) if !field.is_static => {
                        self.depth(&field.owner).map(|depth| {
                            Expression::field_access(self.receiver(depth), field.clone())
                        })
                    }
                    Some(Binding::Enclosing(ty)) => {
                        self.depth(ty).map(|depth| self.receiver(depth))
                    }
                    _ => None,
                };
                if let Some(replacement) = replacement {
                    *expr = replacement;
                }
            }
            Expression::Call(call) if call.receiver.is_none() => {
                let depth = call
                    .method
                    .as_ref()
                    .filter(|method| !method.is_static)
                    .and_then(|method| self.depth(&method.owner));
                if let Some(depth) = depth {
                    call.receiver = Some(Box::new(self.receiver(depth)));
                }
                walk_expression_mut(self, expr);
            }
            _ => walk_expression_mut(self, expr),
        }
    }
}
