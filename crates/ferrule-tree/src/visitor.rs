//! Tree visitors
//!
//! [`Visitor`] walks the tree read-only; [`VisitorMut`] walks it with mutable
//! access so passes can rewrite nodes in place. Each visit method has a default
//! implementation that calls the corresponding walk function, so an
//! implementation only overrides the nodes it cares about.
//!
//! # Example
//!
//! ```rust,ignore
//! use ferrule_tree::*;
//!
//! struct CountStrings {
//!     count: usize,
//! }
//!
//! impl Visitor for CountStrings {
//!     fn visit_string_literal(&mut self, _lit: &StringLiteral) {
//!         self.count += 1;
//!     }
//! }
//! ```

use crate::decl::{ClassDecl, Member};
use crate::expression::*;
use crate::statement::*;

/// Read-only tree visitor
pub trait Visitor: Sized {
    /// Visit a class declaration
    fn visit_class_decl(&mut self, decl: &ClassDecl) {
        walk_class_decl(self, decl);
    }

    /// Visit one class member
    fn visit_member(&mut self, member: &Member) {
        walk_member(self, member);
    }

    // Statements
    /// Visit a statement
    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    /// Visit a block
    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    // Expressions
    /// Visit an expression
    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }

    /// Visit a simple name
    fn visit_name(&mut self, _name: &NameExpression) {}

    /// Visit a string literal
    fn visit_string_literal(&mut self, _lit: &StringLiteral) {}

    /// Visit a method call
    fn visit_call(&mut self, call: &CallExpression) {
        walk_call(self, call);
    }

    /// Visit a `super(..)` or `this(..)` invocation
    fn visit_constructor_invocation(&mut self, invocation: &ConstructorInvocation) {
        walk_constructor_invocation(self, invocation);
    }
}

/// Visit every member of `decl`
pub fn walk_class_decl<V: Visitor>(visitor: &mut V, decl: &ClassDecl) {
    for member in &decl.members {
        visitor.visit_member(member);
    }
}

/// Visit the statements and expressions of `member`
pub fn walk_member<V: Visitor>(visitor: &mut V, member: &Member) {
    match member {
        Member::Field(field) => {
            if let Some(init) = &field.initializer {
                visitor.visit_expression(init);
            }
        }
        Member::Initializer(block) => visitor.visit_block(&block.body),
        Member::Constructor(ctor) => visitor.visit_block(&ctor.body),
        Member::Method(method) => visitor.visit_block(&method.body),
    }
}

/// Visit every statement of `block`
pub fn walk_block<V: Visitor>(visitor: &mut V, block: &Block) {
    for stmt in &block.statements {
        visitor.visit_statement(stmt);
    }
}

/// Visit the children of `stmt`
pub fn walk_statement<V: Visitor>(visitor: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Expression(s) => visitor.visit_expression(&s.expression),
        Statement::Block(block) => visitor.visit_block(block),
        Statement::VariableDecl(decl) => {
            if let Some(init) = &decl.initializer {
                visitor.visit_expression(init);
            }
        }
        Statement::If(s) => {
            visitor.visit_expression(&s.condition);
            visitor.visit_statement(&s.then_branch);
            if let Some(else_branch) = &s.else_branch {
                visitor.visit_statement(else_branch);
            }
        }
        Statement::Return(s) => {
            if let Some(value) = &s.value {
                visitor.visit_expression(value);
            }
        }
        Statement::ConstructorInvocation(invocation) => {
            visitor.visit_constructor_invocation(invocation)
        }
        Statement::AllocationGuard(guard) => {
            visitor.visit_constructor_invocation(&guard.invocation);
            visitor.visit_block(&guard.body);
        }
        Statement::ClassGuard(guard) => visitor.visit_block(&guard.body),
    }
}

/// Visit the children of `expr`
pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &Expression) {
    match expr {
        Expression::IntLiteral(_)
        | Expression::FloatLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::CharLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::SelfRef(_)
        | Expression::StringFromUnits(_) => {}
        Expression::StringLiteral(lit) => visitor.visit_string_literal(lit),
        Expression::Name(name) => visitor.visit_name(name),
        Expression::FieldAccess(access) => visitor.visit_expression(&access.receiver),
        Expression::Assign(assign) => {
            visitor.visit_expression(&assign.target);
            visitor.visit_expression(&assign.value);
        }
        Expression::Binary(binary) => {
            visitor.visit_expression(&binary.left);
            visitor.visit_expression(&binary.right);
        }
        Expression::Call(call) => visitor.visit_call(call),
        Expression::New(new) => {
            if let Some(outer) = &new.outer {
                visitor.visit_expression(outer);
            }
            for arg in &new.args {
                visitor.visit_expression(arg);
            }
        }
        Expression::ArrayInit(array) => {
            for element in &array.elements {
                visitor.visit_expression(element);
            }
        }
        Expression::Initialize(invocation) => visitor.visit_constructor_invocation(invocation),
        Expression::HookCall(hook) => visitor.visit_expression(&hook.argument),
        Expression::StringFormat(format) => {
            for arg in &format.args {
                visitor.visit_expression(arg);
            }
        }
    }
}

/// Visit the receiver and arguments of `call`
pub fn walk_call<V: Visitor>(visitor: &mut V, call: &CallExpression) {
    if let Some(receiver) = &call.receiver {
        visitor.visit_expression(receiver);
    }
    for arg in &call.args {
        visitor.visit_expression(arg);
    }
}

/// Visit the arguments of `invocation`
pub fn walk_constructor_invocation<V: Visitor>(
    visitor: &mut V,
    invocation: &ConstructorInvocation,
) {
    for arg in &invocation.args {
        visitor.visit_expression(arg);
    }
}

/// Mutating tree visitor
///
/// `visit_expression_mut` sees every expression before its children, so an
/// implementation can replace a node wholesale and then decide whether to
/// keep walking into the replacement.
pub trait VisitorMut: Sized {
    /// Rewrite a statement
    fn visit_statement_mut(&mut self, stmt: &mut Statement) {
        walk_statement_mut(self, stmt);
    }

    /// Rewrite a block
    fn visit_block_mut(&mut self, block: &mut Block) {
        walk_block_mut(self, block);
    }

    /// Rewrite an expression
    fn visit_expression_mut(&mut self, expr: &mut Expression) {
        walk_expression_mut(self, expr);
    }
}

/// Rewrite every statement of `block`
pub fn walk_block_mut<V: VisitorMut>(visitor: &mut V, block: &mut Block) {
    for stmt in &mut block.statements {
        visitor.visit_statement_mut(stmt);
    }
}

/// Rewrite the children of `stmt`
pub fn walk_statement_mut<V: VisitorMut>(visitor: &mut V, stmt: &mut Statement) {
    match stmt {
        Statement::Expression(s) => visitor.visit_expression_mut(&mut s.expression),
        Statement::Block(block) => visitor.visit_block_mut(block),
        Statement::VariableDecl(decl) => {
            if let Some(init) = &mut decl.initializer {
                visitor.visit_expression_mut(init);
            }
        }
        Statement::If(s) => {
            visitor.visit_expression_mut(&mut s.condition);
            visitor.visit_statement_mut(&mut s.then_branch);
            if let Some(else_branch) = &mut s.else_branch {
                visitor.visit_statement_mut(else_branch);
            }
        }
        Statement::Return(s) => {
            if let Some(value) = &mut s.value {
                visitor.visit_expression_mut(value);
            }
        }
        Statement::ConstructorInvocation(invocation) => {
            for arg in &mut invocation.args {
                visitor.visit_expression_mut(arg);
            }
        }
        Statement::AllocationGuard(guard) => {
            for arg in &mut guard.invocation.args {
                visitor.visit_expression_mut(arg);
            }
            visitor.visit_block_mut(&mut guard.body);
        }
        Statement::ClassGuard(guard) => visitor.visit_block_mut(&mut guard.body),
    }
}

/// Rewrite the children of `expr`
pub fn walk_expression_mut<V: VisitorMut>(visitor: &mut V, expr: &mut Expression) {
    match expr {
        Expression::IntLiteral(_)
        | Expression::FloatLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::CharLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::StringLiteral(_)
        | Expression::Name(_)
        | Expression::SelfRef(_)
        | Expression::StringFromUnits(_) => {}
        Expression::FieldAccess(access) => visitor.visit_expression_mut(&mut access.receiver),
        Expression::Assign(assign) => {
            visitor.visit_expression_mut(&mut assign.target);
            visitor.visit_expression_mut(&mut assign.value);
        }
        Expression::Binary(binary) => {
            visitor.visit_expression_mut(&mut binary.left);
            visitor.visit_expression_mut(&mut binary.right);
        }
        Expression::Call(call) => {
            if let Some(receiver) = &mut call.receiver {
                visitor.visit_expression_mut(receiver);
            }
            for arg in &mut call.args {
                visitor.visit_expression_mut(arg);
            }
        }
        Expression::New(new) => {
            if let Some(outer) = &mut new.outer {
                visitor.visit_expression_mut(outer);
            }
            for arg in &mut new.args {
                visitor.visit_expression_mut(arg);
            }
        }
        Expression::ArrayInit(array) => {
            for element in &mut array.elements {
                visitor.visit_expression_mut(element);
            }
        }
        Expression::Initialize(invocation) => {
            for arg in &mut invocation.args {
                visitor.visit_expression_mut(arg);
            }
        }
        Expression::HookCall(hook) => visitor.visit_expression_mut(&mut hook.argument),
        Expression::StringFormat(format) => {
            for arg in &mut format.args {
                visitor.visit_expression_mut(arg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldDecl, InitializerBlock, TypeRef};

    struct CountStrings {
        count: usize,
    }

    impl Visitor for CountStrings {
        fn visit_string_literal(&mut self, _lit: &StringLiteral) {
            self.count += 1;
        }
    }

    struct ZeroInts;

    impl VisitorMut for ZeroInts {
        fn visit_expression_mut(&mut self, expr: &mut Expression) {
            if let Expression::IntLiteral(lit) = expr {
                lit.value = 0;
            }
            walk_expression_mut(self, expr);
        }
    }

    #[test]
    fn test_visitor_reaches_field_initializers_and_blocks() {
        let class = ClassDecl::class(TypeRef::new(1, "Test"))
            .with_member(
                FieldDecl::new("s", "NSString *").with_initializer(Expression::concat(
                    Expression::string("a"),
                    Expression::string("b"),
                )),
            )
            .with_member(InitializerBlock::instance(vec![Statement::expr(Expression::call(
                Expression::local("out"),
                "println:",
                vec![Expression::string("c")],
            ))]));

        let mut counter = CountStrings { count: 0 };
        counter.visit_class_decl(&class);
        assert_eq!(counter.count, 3);
    }

    #[test]
    fn test_visitor_mut_rewrites_nested_expressions() {
        let mut stmt = Statement::if_else(
            Expression::bool(true),
            Statement::block(vec![Statement::expr(Expression::assign(
                Expression::local("x"),
                Expression::binary(BinaryOperator::Add, Expression::int(1), Expression::int(2)),
            ))]),
            None,
        );
        ZeroInts.visit_statement_mut(&mut stmt);

        struct SumInts(i64);
        impl Visitor for SumInts {
            fn visit_expression(&mut self, expr: &Expression) {
                if let Expression::IntLiteral(lit) = expr {
                    self.0 += lit.value;
                }
                walk_expression(self, expr);
            }
        }
        let mut sum = SumInts(0);
        sum.visit_statement(&stmt);
        assert_eq!(sum.0, 0);
    }
}
