//! Statement nodes
//!
//! Besides ordinary statements this module defines the two guarded forms that
//! construction lowering produces:
//! - [`AllocationGuard`]: `if ((self = [super init])) { ... }`
//! - [`ClassGuard`]: `if (self == [Test class]) { ... }`

use crate::expression::{ConstructorInvocation, Expression, HookCall};
use crate::ids::TypeRef;
use crate::span::Span;

/// Statement inside a constructor, method or initializer body
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Expression statement (assignment, call)
    Expression(ExpressionStatement),

    /// Nested block
    Block(Block),

    /// Local variable declaration
    VariableDecl(VariableDecl),

    /// If statement
    If(IfStatement),

    /// Return statement
    Return(ReturnStatement),

    /// Source-level `this(..)` / `super(..)` as the first constructor statement
    ConstructorInvocation(ConstructorInvocation),

    /// Allocation guard (target only)
    AllocationGuard(AllocationGuard),

    /// Exact-class guard for class initialization (target only)
    ClassGuard(ClassGuard),
}

impl Statement {
    /// Get the span of this statement
    pub fn span(&self) -> &Span {
        match self {
            Statement::Expression(s) => &s.span,
            Statement::Block(s) => &s.span,
            Statement::VariableDecl(s) => &s.span,
            Statement::If(s) => &s.span,
            Statement::Return(s) => &s.span,
            Statement::ConstructorInvocation(s) => &s.span,
            Statement::AllocationGuard(s) => &s.span,
            Statement::ClassGuard(s) => &s.span,
        }
    }

    /// Expression statement
    pub fn expr(expression: Expression) -> Self {
        let span = *expression.span();
        Statement::Expression(ExpressionStatement { expression, span })
    }

    /// Block statement
    pub fn block(statements: Vec<Statement>) -> Self {
        Statement::Block(Block::new(statements))
    }

    /// `return value;`
    pub fn ret(value: Option<Expression>) -> Self {
        Statement::Return(ReturnStatement {
            value,
            span: Span::synthetic(),
        })
    }

    /// `super(args);` targeting `selector`
    pub fn super_call(selector: impl Into<String>, args: Vec<Expression>) -> Self {
        Statement::ConstructorInvocation(ConstructorInvocation::super_call(selector, args))
    }

    /// `this(args);` targeting `selector`
    pub fn this_call(selector: impl Into<String>, args: Vec<Expression>) -> Self {
        Statement::ConstructorInvocation(ConstructorInvocation::this_call(selector, args))
    }

    /// `if (condition) then_branch [else else_branch]`
    pub fn if_else(
        condition: Expression,
        then_branch: Statement,
        else_branch: Option<Statement>,
    ) -> Self {
        Statement::If(IfStatement {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
            span: Span::synthetic(),
        })
    }

    /// If this is `return hook(<allocation>)`, the wrapped allocation.
    pub fn returned_allocation(&self) -> Option<&ConstructorInvocation> {
        let Statement::Return(ReturnStatement {
            value: Some(Expression::HookCall(HookCall { argument, .. })),
            ..
        }) = self
        else {
            return None;
        };
        match argument.as_ref() {
            Expression::Initialize(invocation) => Some(invocation),
            _ => None,
        }
    }
}

/// Block of statements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    /// Statements, in order
    pub statements: Vec<Statement>,
    /// Source location
    pub span: Span,
}

impl Block {
    /// Create a block with a synthetic span.
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            statements,
            span: Span::synthetic(),
        }
    }

    /// Number of top-level statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    /// True if the block has no statements
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Expression statement
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionStatement {
    /// Evaluated expression
    pub expression: Expression,
    /// Source location
    pub span: Span,
}

/// Local variable declaration
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    /// Variable name
    pub name: String,
    /// Target-language type name
    pub ty: String,
    /// Initializer expression, if any
    pub initializer: Option<Expression>,
    /// Source location
    pub span: Span,
}

/// If statement
#[derive(Debug, Clone, PartialEq)]
pub struct IfStatement {
    /// Tested condition
    pub condition: Expression,
    /// Runs when the condition holds
    pub then_branch: Box<Statement>,
    /// Runs otherwise
    pub else_branch: Option<Box<Statement>>,
    /// Source location
    pub span: Span,
}

/// Return statement
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatement {
    /// Returned value, if any
    pub value: Option<Expression>,
    /// Source location
    pub span: Span,
}

/// `if ((self = <invocation>)) { body }`
///
/// The body only runs when allocation through the superclass (or sibling)
/// initializer produced an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationGuard {
    /// Allocation call whose result is assigned to `self`
    pub invocation: ConstructorInvocation,
    /// Runs when the allocation succeeded
    pub body: Block,
    /// Source location
    pub span: Span,
}

/// `if (self == [<class> class]) { body }`
///
/// Class initialization hooks are inherited, so a subclass's first use runs
/// the superclass hook again; the guard confines the body to the declaring class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassGuard {
    /// Class the running class object must equal
    pub class: TypeRef,
    /// Runs only for that class
    pub body: Block,
    /// Source location
    pub span: Span,
}
