//! Expression nodes
//!
//! Source expressions as bound by the front end, plus the target-only forms
//! that lowering passes introduce:
//! - [`Expression::Initialize`]: an allocation message (`[super init]`)
//! - [`Expression::HookCall`]: the memory-registration hook
//! - [`Expression::StringFromUnits`] / [`Expression::StringFormat`]: string
//!   construction for text the target source encoding cannot hold inline

use crate::ids::TypeRef;
use crate::span::Span;
use std::fmt;

/// Expression (produces a value)
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Integer literal: 42
    IntLiteral(IntLiteral),

    /// Floating point literal: 3.5
    FloatLiteral(FloatLiteral),

    /// Boolean literal: true, false
    BooleanLiteral(BooleanLiteral),

    /// Character literal, one UTF-16 code unit
    CharLiteral(CharLiteral),

    /// Null literal
    NullLiteral(Span),

    /// String literal
    StringLiteral(StringLiteral),

    /// Simple name, bound by the front end
    Name(NameExpression),

    /// The instance under construction / the receiver (`this`, `self`)
    SelfRef(Span),

    /// Qualified field access: `receiver.field`
    FieldAccess(FieldAccess),

    /// Assignment: `target = value`
    Assign(Assignment),

    /// Binary operation
    Binary(BinaryExpression),

    /// Method call
    Call(CallExpression),

    /// Instance creation: `new Date()`
    New(NewExpression),

    /// Array initializer: `{ a, b }`
    ArrayInit(ArrayInitializer),

    /// Allocation message sent to `super` or `self` (target only)
    Initialize(ConstructorInvocation),

    /// Memory-registration hook call (target only)
    HookCall(HookCall),

    /// String built from explicit UTF-16 code units (target only)
    StringFromUnits(StringFromUnits),

    /// String built from a format and arguments (target only)
    StringFormat(StringFormat),
}

impl Expression {
    /// Get the span of this expression
    pub fn span(&self) -> &Span {
        match self {
            Expression::IntLiteral(e) => &e.span,
            Expression::FloatLiteral(e) => &e.span,
            Expression::BooleanLiteral(e) => &e.span,
            Expression::CharLiteral(e) => &e.span,
            Expression::NullLiteral(span) => span,
            Expression::StringLiteral(e) => &e.span,
            Expression::Name(e) => &e.span,
            Expression::SelfRef(span) => span,
            Expression::FieldAccess(e) => &e.span,
            Expression::Assign(e) => &e.span,
            Expression::Binary(e) => &e.span,
            Expression::Call(e) => &e.span,
            Expression::New(e) => &e.span,
            Expression::ArrayInit(e) => &e.span,
            Expression::Initialize(e) => &e.span,
            Expression::HookCall(e) => &e.span,
            Expression::StringFromUnits(e) => &e.span,
            Expression::StringFormat(e) => &e.span,
        }
    }

    /// Check if this expression is a literal
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Expression::IntLiteral(_)
                | Expression::FloatLiteral(_)
                | Expression::BooleanLiteral(_)
                | Expression::CharLiteral(_)
                | Expression::NullLiteral(_)
                | Expression::StringLiteral(_)
        )
    }

    /// Check if this expression is a primitive compile-time constant
    /// (a literal other than a string or null)
    pub fn is_primitive_literal(&self) -> bool {
        matches!(
            self,
            Expression::IntLiteral(_)
                | Expression::FloatLiteral(_)
                | Expression::BooleanLiteral(_)
                | Expression::CharLiteral(_)
        )
    }

    // ------------------------------------------------------------------------
    // Constructors
    // ------------------------------------------------------------------------

    /// Integer literal
    pub fn int(value: i64) -> Self {
        Expression::IntLiteral(IntLiteral {
            value,
            span: Span::synthetic(),
        })
    }

    /// Floating point literal
    pub fn float(value: f64) -> Self {
        Expression::FloatLiteral(FloatLiteral {
            value,
            span: Span::synthetic(),
        })
    }

    /// Boolean literal
    pub fn bool(value: bool) -> Self {
        Expression::BooleanLiteral(BooleanLiteral {
            value,
            span: Span::synthetic(),
        })
    }

    /// Null literal
    pub fn null() -> Self {
        Expression::NullLiteral(Span::synthetic())
    }

    /// String literal from Rust text
    pub fn string(value: &str) -> Self {
        Expression::StringLiteral(StringLiteral::new(value))
    }

    /// String literal from raw UTF-16 code units (may hold lone surrogates)
    pub fn string_units(units: Vec<u16>) -> Self {
        Expression::StringLiteral(StringLiteral {
            units,
            span: Span::synthetic(),
        })
    }

    /// `self`
    pub fn self_ref() -> Self {
        Expression::SelfRef(Span::synthetic())
    }

    /// Name bound to a local variable or parameter
    pub fn local(name: impl Into<String>) -> Self {
        Expression::Name(NameExpression {
            name: name.into(),
            binding: Some(Binding::Local),
            span: Span::synthetic(),
        })
    }

    /// Simple name bound to a field (implicit receiver)
    pub fn field(field: FieldRef) -> Self {
        Expression::Name(NameExpression {
            name: field.name.clone(),
            binding: Some(Binding::Field(field)),
            span: Span::synthetic(),
        })
    }

    /// Name bound to a type (static call receivers, class literals)
    pub fn type_name(ty: TypeRef) -> Self {
        Expression::Name(NameExpression {
            name: ty.name.clone(),
            binding: Some(Binding::Type(ty)),
            span: Span::synthetic(),
        })
    }

    /// `Outer.this` for an enclosing type
    pub fn enclosing_instance(ty: TypeRef) -> Self {
        Expression::Name(NameExpression {
            name: format!("{}.this", ty.name),
            binding: Some(Binding::Enclosing(ty)),
            span: Span::synthetic(),
        })
    }

    /// Name the front end failed to bind
    pub fn unbound(name: impl Into<String>) -> Self {
        Expression::Name(NameExpression {
            name: name.into(),
            binding: None,
            span: Span::synthetic(),
        })
    }

    /// `receiver.field`
    pub fn field_access(receiver: Expression, field: FieldRef) -> Self {
        Expression::FieldAccess(FieldAccess {
            receiver: Box::new(receiver),
            field,
            span: Span::synthetic(),
        })
    }

    /// `target = value`
    pub fn assign(target: Expression, value: Expression) -> Self {
        let span = target.span().merge(value.span());
        Expression::Assign(Assignment {
            target: Box::new(target),
            value: Box::new(value),
            span,
        })
    }

    /// Binary operation
    pub fn binary(op: BinaryOperator, left: Expression, right: Expression) -> Self {
        let span = left.span().merge(right.span());
        Expression::Binary(BinaryExpression {
            op,
            left: Box::new(left),
            right: Box::new(right),
            span,
        })
    }

    /// String concatenation
    pub fn concat(left: Expression, right: Expression) -> Self {
        Self::binary(BinaryOperator::Concat, left, right)
    }

    /// Method call with an explicit receiver
    pub fn call(receiver: Expression, selector: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Call(CallExpression {
            receiver: Some(Box::new(receiver)),
            selector: selector.into(),
            args,
            method: None,
            span: Span::synthetic(),
        })
    }

    /// Method call with an implicit receiver, bound to `method`
    pub fn implicit_call(
        method: MethodRef,
        selector: impl Into<String>,
        args: Vec<Expression>,
    ) -> Self {
        Expression::Call(CallExpression {
            receiver: None,
            selector: selector.into(),
            args,
            method: Some(method),
            span: Span::synthetic(),
        })
    }

    /// `new Class(args)`
    pub fn new_instance(
        class: TypeRef,
        selector: impl Into<String>,
        args: Vec<Expression>,
    ) -> Self {
        Expression::New(NewExpression {
            class,
            selector: selector.into(),
            args,
            outer: None,
            span: Span::synthetic(),
        })
    }
}

/// Integer literal
#[derive(Debug, Clone, PartialEq)]
pub struct IntLiteral {
    /// Literal value
    pub value: i64,
    /// Source location
    pub span: Span,
}

/// Floating point literal
#[derive(Debug, Clone, PartialEq)]
pub struct FloatLiteral {
    /// Literal value
    pub value: f64,
    /// Source location
    pub span: Span,
}

/// Boolean literal
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanLiteral {
    /// Literal value
    pub value: bool,
    /// Source location
    pub span: Span,
}

/// Character literal
#[derive(Debug, Clone, PartialEq)]
pub struct CharLiteral {
    /// A single UTF-16 code unit
    pub value: u16,
    /// Source location
    pub span: Span,
}

/// String literal
///
/// Stored as UTF-16 code units because the source language allows unpaired
/// surrogates in string constants.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    /// UTF-16 code units
    pub units: Vec<u16>,
    /// Source location
    pub span: Span,
}

impl StringLiteral {
    /// Create a literal from Rust text.
    pub fn new(value: &str) -> Self {
        Self {
            units: value.encode_utf16().collect(),
            span: Span::synthetic(),
        }
    }

    /// Decode to Rust text, replacing unpaired surrogates.
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }
}

/// What a simple name resolves to
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Local variable or parameter
    Local,
    /// Field of the current class, a superclass, or an enclosing class
    Field(FieldRef),
    /// A type name
    Type(TypeRef),
    /// Qualified `Outer.this`: the enclosing instance of the given type
    Enclosing(TypeRef),
}

/// Resolved field binding
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRef {
    /// Declaring type
    pub owner: TypeRef,
    /// Field name
    pub name: String,
    /// Class field rather than instance field
    pub is_static: bool,
}

impl FieldRef {
    /// Instance field of `owner`
    pub fn instance(owner: &TypeRef, name: impl Into<String>) -> Self {
        Self {
            owner: owner.clone(),
            name: name.into(),
            is_static: false,
        }
    }

    /// Static field of `owner`
    pub fn of_class(owner: &TypeRef, name: impl Into<String>) -> Self {
        Self {
            owner: owner.clone(),
            name: name.into(),
            is_static: true,
        }
    }
}

/// Resolved method binding
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRef {
    /// Declaring type
    pub owner: TypeRef,
    /// Class method rather than instance method
    pub is_static: bool,
}

/// Simple name
#[derive(Debug, Clone, PartialEq)]
pub struct NameExpression {
    /// Name as written in source
    pub name: String,
    /// `None` when the front end could not bind the name
    pub binding: Option<Binding>,
    /// Source location
    pub span: Span,
}

/// Qualified field access
#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccess {
    /// Object the field is read from
    pub receiver: Box<Expression>,
    /// Field being read
    pub field: FieldRef,
    /// Source location
    pub span: Span,
}

/// Assignment expression
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Assigned location
    pub target: Box<Expression>,
    /// Assigned value
    pub value: Box<Expression>,
    /// Source location
    pub span: Span,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Numeric `+`
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Remainder,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `&&`
    And,
    /// `||`
    Or,
    /// String concatenation; the front end distinguishes it from numeric `+`
    Concat,
}

impl BinaryOperator {
    /// Operator text in the target language
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add | BinaryOperator::Concat => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Remainder => "%",
            BinaryOperator::Equal => "==",
            BinaryOperator::NotEqual => "!=",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEqual => "<=",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEqual => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Binary expression
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    /// Operator
    pub op: BinaryOperator,
    /// Left operand
    pub left: Box<Expression>,
    /// Right operand
    pub right: Box<Expression>,
    /// Source location
    pub span: Span,
}

/// Method call
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    /// `None` for an implicit receiver (`this` or an enclosing instance)
    pub receiver: Option<Box<Expression>>,
    /// Target-language selector, e.g. `addWithId:`
    pub selector: String,
    /// Arguments, one per selector keyword
    pub args: Vec<Expression>,
    /// Binding of the invoked method; required when `receiver` is `None`
    pub method: Option<MethodRef>,
    /// Source location
    pub span: Span,
}

/// Instance creation
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpression {
    /// Class being instantiated
    pub class: TypeRef,
    /// Selector of the invoked constructor
    pub selector: String,
    /// Arguments, one per selector keyword
    pub args: Vec<Expression>,
    /// Enclosing instance passed to an inner class constructor
    pub outer: Option<Box<Expression>>,
    /// Source location
    pub span: Span,
}

/// Array initializer
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayInitializer {
    /// Element type name
    pub element_type: String,
    /// Element expressions, in order
    pub elements: Vec<Expression>,
    /// Source location
    pub span: Span,
}

/// Which constructor an invocation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    /// Superclass constructor (`super(..)`)
    Super,
    /// Sibling constructor of the same class (`this(..)`)
    This,
}

/// Constructor invocation: a source `this(..)`/`super(..)` statement, or the
/// receiver-side allocation message in target form
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorInvocation {
    /// `super(..)` or `this(..)`
    pub kind: InvocationKind,
    /// Selector of the invoked constructor
    pub selector: String,
    /// Arguments, one per selector keyword
    pub args: Vec<Expression>,
    /// Source location
    pub span: Span,
}

impl ConstructorInvocation {
    /// `super(args)` targeting `selector`
    pub fn super_call(selector: impl Into<String>, args: Vec<Expression>) -> Self {
        Self {
            kind: InvocationKind::Super,
            selector: selector.into(),
            args,
            span: Span::synthetic(),
        }
    }

    /// `this(args)` targeting `selector`
    pub fn this_call(selector: impl Into<String>, args: Vec<Expression>) -> Self {
        Self {
            kind: InvocationKind::This,
            selector: selector.into(),
            args,
            span: Span::synthetic(),
        }
    }

    /// True if this invokes a sibling constructor
    pub fn is_delegation(&self) -> bool {
        self.kind == InvocationKind::This
    }
}

/// Call of the memory-registration hook
#[derive(Debug, Clone, PartialEq)]
pub struct HookCall {
    /// Name of the external procedure
    pub hook: String,
    /// Object being registered
    pub argument: Box<Expression>,
    /// Source location
    pub span: Span,
}

/// String construction from explicit UTF-16 code units
#[derive(Debug, Clone, PartialEq)]
pub struct StringFromUnits {
    /// UTF-16 code units
    pub units: Vec<u16>,
    /// Source location
    pub span: Span,
}

/// Formatted string construction; `%@` placeholders consume `args` in order
#[derive(Debug, Clone, PartialEq)]
pub struct StringFormat {
    /// Format string with `%@` placeholders
    pub format: String,
    /// One argument per placeholder
    pub args: Vec<Expression>,
    /// Source location
    pub span: Span,
}
