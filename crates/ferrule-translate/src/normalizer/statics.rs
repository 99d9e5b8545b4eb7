//! Static-initializer consolidation
//!
//! Static field initializers and static blocks run once, in declaration
//! order, from the class-initialize method:
//!
//! ```text
//! + (void)initialize {
//!   if (self == [Test class]) {
//!     <static preamble>
//!   }
//! }
//! ```
//!
//! The runtime sends `initialize` to a subclass that does not override it,
//! so the guard keeps the body from running again for subclasses.

use super::preamble::{self, Scope};
use super::NormalizeSummary;
use crate::options::NormalizerOptions;
use ferrule_tree::{Block, ClassDecl, ClassGuard, Member, MethodDecl, Span, Statement, TypeRef};
use tracing::trace;

/// Move the static preamble into the class-initialize method, creating it
/// if the class has none.
pub fn consolidate(
    class: &mut ClassDecl,
    options: &NormalizerOptions,
    summary: &mut NormalizeSummary,
) {
    let statements = preamble::gather(class, Scope::Static);
    if statements.is_empty() {
        return;
    }
    summary.static_statements = statements.len();

    let ty = class.ty.clone();
    let existing = class.class_initializer_id().and_then(|id| match class.member_mut(id) {
        Some(Member::Method(method)) => Some(method),
        _ => None,
    });
    match existing {
        Some(method) => {
            extend_guard(&mut method.body, &ty, statements);
            trace!(class = %ty.name, method = %method.name, "extended class initializer");
        }
        None => {
            let mut method = MethodDecl::class_initializer(options.class_initializer.clone())
                .with_body(vec![guard(&ty, statements)]);
            method.synthetic = true;
            class.push_member(method);
            trace!(
                class = %ty.name,
                method = %options.class_initializer,
                "synthesized class initializer"
            );
        }
    }
}

fn guard(class: &TypeRef, statements: Vec<Statement>) -> Statement {
    Statement::ClassGuard(ClassGuard {
        class: class.clone(),
        body: Block::new(statements),
        span: Span::synthetic(),
    })
}

/// Append into the last guard for `class`, or add a guard of our own.
fn extend_guard(body: &mut Block, class: &TypeRef, statements: Vec<Statement>) {
    let last_guard = body.statements.iter_mut().rev().find_map(|stmt| match stmt {
        Statement::ClassGuard(guard) if &guard.class == class => Some(guard),
        _ => None,
    });
    match last_guard {
        Some(existing) => existing.body.statements.extend(statements),
        None => body.statements.push(guard(class, statements)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrule_tree::{Expression, FieldDecl, FieldRef, InitializerBlock, MethodKind, PrettyPrint};

    fn test_type() -> TypeRef {
        TypeRef::new(1, "Test")
    }

    fn set_count(value: i64) -> Statement {
        Statement::expr(Expression::assign(
            Expression::field(FieldRef::of_class(&test_type(), "count")),
            Expression::int(value),
        ))
    }

    #[test]
    fn test_synthesizes_guarded_class_initializer() {
        let mut class = ClassDecl::class(test_type())
            .with_member(
                FieldDecl::new("count", "int")
                    .with_static()
                    .with_initializer(Expression::int(1)),
            )
            .with_member(InitializerBlock::of_class(vec![set_count(2)]));
        let mut summary = NormalizeSummary::default();
        consolidate(&mut class, &NormalizerOptions::default(), &mut summary);

        assert_eq!(summary.static_statements, 2);
        let method = class.class_initializer().unwrap();
        assert!(method.synthetic);
        assert_eq!(method.kind, MethodKind::ClassInitialize);
        let lines: Vec<String> =
            method.pretty_print().lines().map(|l| l.trim().to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "+ (void)initialize {",
                "if (self == [Test class]) {",
                "Test_count_ = 1;",
                "{",
                "Test_count_ = 2;",
                "}",
                "}",
                "}",
            ]
        );
    }

    #[test]
    fn test_existing_guard_is_extended() {
        let existing = MethodDecl::class_initializer("initialize")
            .with_body(vec![guard(&test_type(), vec![set_count(0)])]);
        let mut class = ClassDecl::class(test_type())
            .with_member(existing)
            .with_member(InitializerBlock::of_class(vec![set_count(5)]));
        let mut summary = NormalizeSummary::default();
        consolidate(&mut class, &NormalizerOptions::default(), &mut summary);

        let method = class.class_initializer().unwrap();
        assert!(!method.synthetic);
        assert_eq!(method.body.len(), 1);
        let Statement::ClassGuard(guard) = &method.body.statements[0] else {
            panic!("expected a class guard");
        };
        assert_eq!(guard.body.len(), 2);
    }

    #[test]
    fn test_unguarded_initializer_gets_new_guard() {
        let existing = MethodDecl::class_initializer("initialize").with_body(vec![set_count(0)]);
        let mut body = existing.body.clone();
        extend_guard(&mut body, &test_type(), vec![set_count(1)]);
        assert_eq!(body.len(), 2);
        assert!(matches!(body.statements[1], Statement::ClassGuard(_)));
    }

    #[test]
    fn test_nothing_to_consolidate() {
        let mut class = ClassDecl::class(test_type()).with_member(
            FieldDecl::new("K", "int")
                .with_static()
                .with_final()
                .with_initializer(Expression::int(3)),
        );
        let mut summary = NormalizeSummary::default();
        consolidate(&mut class, &NormalizerOptions::default(), &mut summary);

        assert!(class.class_initializer().is_none());
        assert_eq!(summary.static_statements, 0);
    }
}
