//! Declaration nodes
//!
//! A [`ClassDecl`] owns its members in declaration order. Passes address
//! members by [`MemberId`] and add synthesized members by inserting new
//! entries; after creation a synthesized member is indistinguishable from a
//! parsed one except for its `synthetic` flag.
//!
//! # Example
//! ```text
//! class Test {
//!     java.util.Date date = new java.util.Date();   // Member::Field
//!     { date.setTime(0); }                          // Member::Initializer
//!     Test() { this(2); }                           // Member::Constructor
//!     Test(int i) { }                               // Member::Constructor
//!     static { System.out.println("foo"); }        // Member::Initializer (static)
//! }
//! ```

use crate::expression::ConstructorInvocation;
use crate::ids::{MemberId, TypeRef};
use crate::span::Span;
use crate::statement::{Block, Statement};
use crate::Expression;

// ============================================================================
// Class Declaration
// ============================================================================

/// Kind of type declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// Concrete or abstract class
    Class,
    /// Interface: no instance state, fields are constants
    Interface,
}

/// One step of an inner class's enclosing-instance chain
#[derive(Debug, Clone, PartialEq)]
pub struct OuterLink {
    /// The enclosing type at this level
    pub enclosing: TypeRef,
    /// Outer-reference field holding the enclosing instance (`this$0`)
    pub field: String,
    /// Constructor parameter carrying the enclosing instance (`outer$`)
    pub param: String,
}

impl OuterLink {
    /// Link to `enclosing` through the conventional `this$0` / `outer$` names.
    pub fn new(enclosing: TypeRef) -> Self {
        Self {
            enclosing,
            field: "this$0".to_string(),
            param: "outer$".to_string(),
        }
    }
}

/// Class or interface declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    /// Resolved identity and target name
    pub ty: TypeRef,
    /// Class or interface
    pub kind: ClassKind,
    /// Direct superclass (`None` means the root object class)
    pub superclass: Option<TypeRef>,
    /// Enclosing-instance chain, innermost first; empty for top-level and
    /// static nested types
    pub outer: Vec<OuterLink>,
    /// Members in declaration order
    pub members: Vec<Member>,
    /// Source location
    pub span: Span,
}

impl ClassDecl {
    /// Create an empty class.
    pub fn class(ty: TypeRef) -> Self {
        Self {
            ty,
            kind: ClassKind::Class,
            superclass: None,
            outer: Vec::new(),
            members: Vec::new(),
            span: Span::synthetic(),
        }
    }

    /// Create an empty interface.
    pub fn interface(ty: TypeRef) -> Self {
        Self {
            kind: ClassKind::Interface,
            ..Self::class(ty)
        }
    }

    /// Set the superclass.
    pub fn with_superclass(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    /// Make this an inner class of `link.enclosing`. Call once per nesting
    /// level, innermost first.
    pub fn with_outer(mut self, link: OuterLink) -> Self {
        self.outer.push(link);
        self
    }

    /// Append a member.
    pub fn with_member(mut self, member: impl Into<Member>) -> Self {
        self.members.push(member.into());
        self
    }

    /// Target-language name
    pub fn name(&self) -> &str {
        &self.ty.name
    }

    /// True for interfaces
    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// True for non-static nested classes, which hold an enclosing instance
    pub fn is_inner(&self) -> bool {
        !self.outer.is_empty()
    }

    /// Append a member, returning its id.
    pub fn push_member(&mut self, member: impl Into<Member>) -> MemberId {
        self.members.push(member.into());
        MemberId::new(self.members.len() - 1)
    }

    /// Insert a member at `index`, shifting later members.
    pub fn insert_member(&mut self, index: usize, member: impl Into<Member>) -> MemberId {
        let index = index.min(self.members.len());
        self.members.insert(index, member.into());
        MemberId::new(index)
    }

    /// Look up a member by id
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(id.index())
    }

    /// Look up a member by id, mutably
    pub fn member_mut(&mut self, id: MemberId) -> Option<&mut Member> {
        self.members.get_mut(id.index())
    }

    /// Constructors with their ids, in declaration order
    pub fn constructors(&self) -> impl Iterator<Item = (MemberId, &ConstructorDecl)> {
        self.members.iter().enumerate().filter_map(|(i, m)| match m {
            Member::Constructor(ctor) => Some((MemberId::new(i), ctor)),
            _ => None,
        })
    }

    /// Constructor by id
    pub fn constructor(&self, id: MemberId) -> Option<&ConstructorDecl> {
        match self.member(id) {
            Some(Member::Constructor(ctor)) => Some(ctor),
            _ => None,
        }
    }

    /// Constructor by id, mutably
    pub fn constructor_mut(&mut self, id: MemberId) -> Option<&mut ConstructorDecl> {
        match self.member_mut(id) {
            Some(Member::Constructor(ctor)) => Some(ctor),
            _ => None,
        }
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }

    /// Field by name
    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields().find(|f| f.name == name)
    }

    /// Id of the class-initialize method, if one exists
    pub fn class_initializer_id(&self) -> Option<MemberId> {
        self.members.iter().position(|m| {
            matches!(m, Member::Method(method) if method.kind == MethodKind::ClassInitialize)
        })
        .map(MemberId::new)
    }

    /// The class-initialize method, if one exists
    pub fn class_initializer(&self) -> Option<&MethodDecl> {
        match self.member(self.class_initializer_id()?) {
            Some(Member::Method(method)) => Some(method),
            _ => None,
        }
    }
}

/// Class member
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    /// Field declaration
    Field(FieldDecl),
    /// Instance or static initializer block
    Initializer(InitializerBlock),
    /// Constructor
    Constructor(ConstructorDecl),
    /// Method, including the class-initialize hook
    Method(MethodDecl),
}

impl Member {
    /// Get the span of this member
    pub fn span(&self) -> &Span {
        match self {
            Member::Field(m) => &m.span,
            Member::Initializer(m) => &m.span,
            Member::Constructor(m) => &m.span,
            Member::Method(m) => &m.span,
        }
    }
}

impl From<FieldDecl> for Member {
    fn from(field: FieldDecl) -> Self {
        Member::Field(field)
    }
}

impl From<InitializerBlock> for Member {
    fn from(block: InitializerBlock) -> Self {
        Member::Initializer(block)
    }
}

impl From<ConstructorDecl> for Member {
    fn from(ctor: ConstructorDecl) -> Self {
        Member::Constructor(ctor)
    }
}

impl From<MethodDecl> for Member {
    fn from(method: MethodDecl) -> Self {
        Member::Method(method)
    }
}

// ============================================================================
// Fields and Initializer Blocks
// ============================================================================

/// Field modifiers relevant to initialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    /// `static`
    pub is_static: bool,
    /// `final`
    pub is_final: bool,
}

/// Field declaration
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Field name as written in source
    pub name: String,
    /// Target-language type name (`int`, `JavaUtilDate *`)
    pub ty: String,
    /// Declared modifiers
    pub modifiers: Modifiers,
    /// Initializer expression, if any
    pub initializer: Option<Expression>,
    /// Created by a pass rather than the front end
    pub synthetic: bool,
    /// Source location
    pub span: Span,
}

impl FieldDecl {
    /// Instance field without initializer.
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers: Modifiers::default(),
            initializer: None,
            synthetic: false,
            span: Span::synthetic(),
        }
    }

    /// Mark static.
    pub fn with_static(mut self) -> Self {
        self.modifiers.is_static = true;
        self
    }

    /// Mark final.
    pub fn with_final(mut self) -> Self {
        self.modifiers.is_final = true;
        self
    }

    /// Set the declaration initializer.
    pub fn with_initializer(mut self, initializer: Expression) -> Self {
        self.initializer = Some(initializer);
        self
    }

    /// True for class fields
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static
    }

    /// `static final` with a primitive literal initializer
    pub fn has_constant_initializer(&self) -> bool {
        self.modifiers.is_static
            && self.modifiers.is_final
            && self
                .initializer
                .as_ref()
                .is_some_and(Expression::is_primitive_literal)
    }
}

/// Instance (`{ .. }`) or static (`static { .. }`) initializer block
#[derive(Debug, Clone, PartialEq)]
pub struct InitializerBlock {
    /// `static { .. }` rather than `{ .. }`
    pub is_static: bool,
    /// Statements of the block
    pub body: Block,
    /// Source location
    pub span: Span,
}

impl InitializerBlock {
    /// Instance initializer block
    pub fn instance(statements: Vec<Statement>) -> Self {
        Self {
            is_static: false,
            body: Block::new(statements),
            span: Span::synthetic(),
        }
    }

    /// Static initializer block
    pub fn of_class(statements: Vec<Statement>) -> Self {
        Self {
            is_static: true,
            ..Self::instance(statements)
        }
    }
}

// ============================================================================
// Constructors and Methods
// ============================================================================

/// Parameter kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Written in source
    Declared,
    /// Implicit enclosing-instance parameter of an inner class constructor
    OuterInstance,
}

/// Method or constructor parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// Target-language type
    pub ty: String,
    /// Declared or added by a pass
    pub kind: ParamKind,
}

impl Param {
    /// Declared parameter
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            kind: ParamKind::Declared,
        }
    }

    /// Enclosing-instance parameter
    pub fn outer(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            kind: ParamKind::OuterInstance,
            ..Self::new(name, ty)
        }
    }
}

/// Constructor classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorRole {
    /// Runs full instance initialization
    Designated,
    /// Forwards to a sibling constructor
    Delegating,
}

/// Constructor declaration
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    /// Target-language selector (`init`, `initWithInt:`)
    pub selector: String,
    /// Parameters, in selector order
    pub params: Vec<Param>,
    /// Constructor body
    pub body: Block,
    /// Set by designated-constructor resolution
    pub role: Option<ConstructorRole>,
    /// Leading statements of the allocation guard that came from hoisted
    /// initializers, set when a designated constructor is lowered
    pub preamble_len: Option<usize>,
    /// Created by a pass rather than the front end
    pub synthetic: bool,
    /// Source location
    pub span: Span,
}

impl ConstructorDecl {
    /// Constructor with no parameters and an empty body.
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            params: Vec::new(),
            body: Block::default(),
            role: None,
            preamble_len: None,
            synthetic: false,
            span: Span::synthetic(),
        }
    }

    /// Append a parameter.
    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, statements: Vec<Statement>) -> Self {
        self.body = Block::new(statements);
        self
    }

    /// The constructor invocation this constructor starts with, in either
    /// source form (`this(..)`) or lowered form (allocation guard or
    /// `return hook([self init..])`).
    pub fn leading_invocation(&self) -> Option<&ConstructorInvocation> {
        match self.body.statements.first()? {
            Statement::ConstructorInvocation(invocation) => Some(invocation),
            Statement::AllocationGuard(guard) => Some(&guard.invocation),
            other => other.returned_allocation(),
        }
    }

    /// True once construction lowering has rewritten this constructor
    pub fn is_lowered(&self) -> bool {
        match self.body.statements.first() {
            Some(Statement::AllocationGuard(_)) => true,
            Some(stmt) => stmt.returned_allocation().is_some(),
            None => false,
        }
    }

    /// Statements inside the allocation guard, if lowered
    pub fn guarded_statements(&self) -> Option<&[Statement]> {
        match self.body.statements.first()? {
            Statement::AllocationGuard(guard) => Some(&guard.body.statements),
            _ => None,
        }
    }

    /// Position of the enclosing-instance parameter
    pub fn outer_param(&self) -> Option<&Param> {
        self.params.iter().find(|p| p.kind == ParamKind::OuterInstance)
    }
}

/// Method kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Regular method
    Ordinary,
    /// Lazily invoked once-per-class initialization hook
    ClassInitialize,
}

/// Method declaration
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    /// Selector
    pub name: String,
    /// Ordinary method or class-initialize hook
    pub kind: MethodKind,
    /// Class method (`+`)
    pub is_static: bool,
    /// Parameters, in selector order
    pub params: Vec<Param>,
    /// Target-language return type
    pub return_ty: String,
    /// Method body
    pub body: Block,
    /// Created by a pass rather than the front end
    pub synthetic: bool,
    /// Source location
    pub span: Span,
}

impl MethodDecl {
    /// Instance method with an empty body.
    pub fn new(name: impl Into<String>, return_ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MethodKind::Ordinary,
            is_static: false,
            params: Vec::new(),
            return_ty: return_ty.into(),
            body: Block::default(),
            synthetic: false,
            span: Span::synthetic(),
        }
    }

    /// Static `void` class-initialize method named `name`.
    pub fn class_initializer(name: impl Into<String>) -> Self {
        Self {
            kind: MethodKind::ClassInitialize,
            is_static: true,
            ..Self::new(name, "void")
        }
    }

    /// Append a parameter.
    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    /// Replace the body.
    pub fn with_body(mut self, statements: Vec<Statement>) -> Self {
        self.body = Block::new(statements);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_class() -> TypeRef {
        TypeRef::new(1, "Test")
    }

    #[test]
    fn test_constructors_report_member_ids() {
        let class = ClassDecl::class(test_class())
            .with_member(FieldDecl::new("b", "bool"))
            .with_member(ConstructorDecl::new("init"))
            .with_member(ConstructorDecl::new("initWithInt:").with_param(Param::new("i", "int")));

        let ids: Vec<_> = class.constructors().map(|(id, _)| id.index()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(class.constructor(MemberId::new(2)).unwrap().params.len(), 1);
        assert!(class.constructor(MemberId::new(0)).is_none());
    }

    #[test]
    fn test_leading_invocation_source_form() {
        let ctor = ConstructorDecl::new("init")
            .with_body(vec![Statement::this_call("initWithInt:", vec![Expression::int(42)])]);
        assert!(ctor.leading_invocation().unwrap().is_delegation());
        assert!(!ctor.is_lowered());

        let empty = ConstructorDecl::new("init");
        assert!(empty.leading_invocation().is_none());
    }

    #[test]
    fn test_constant_initializer_requires_static_final_primitive() {
        let constant = FieldDecl::new("I", "int")
            .with_static()
            .with_final()
            .with_initializer(Expression::int(1));
        assert!(constant.has_constant_initializer());

        let not_final = FieldDecl::new("I", "int")
            .with_static()
            .with_initializer(Expression::int(1));
        assert!(!not_final.has_constant_initializer());

        let string = FieldDecl::new("S", "NSString *")
            .with_static()
            .with_final()
            .with_initializer(Expression::string("foo"));
        assert!(!string.has_constant_initializer());
    }

    #[test]
    fn test_class_initializer_lookup() {
        let mut class = ClassDecl::class(test_class());
        assert!(class.class_initializer().is_none());
        let id = class.push_member(MethodDecl::class_initializer("initialize"));
        assert_eq!(class.class_initializer_id(), Some(id));
        assert!(class.class_initializer().unwrap().is_static);
    }

    #[test]
    fn test_inner_class_has_outer_chain() {
        let outer = TypeRef::new(0, "Test");
        let inner =
            ClassDecl::class(TypeRef::new(1, "Test_Inner")).with_outer(OuterLink::new(outer));
        assert!(inner.is_inner());
        assert_eq!(inner.outer[0].field, "this$0");
        assert!(!ClassDecl::class(test_class()).is_inner());
    }
}
