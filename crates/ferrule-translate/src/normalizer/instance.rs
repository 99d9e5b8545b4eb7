//! Instance-initializer hoisting
//!
//! The instance preamble is copied into every designated constructor right
//! after the allocation call, ahead of the constructor's own statements.
//! Designated constructors end by registering the new instance with the
//! memory hook; delegating constructors only route their result through it.
//!
//! Lowered designated constructor:
//! ```text
//! - (id)initWithInt:(int)i {
//!   if ((self = [super init])) {
//!     <preamble>
//!     <constructor statements>
//!     JreMemDebugAdd(self);
//!   }
//!   return self;
//! }
//! ```
//!
//! A class with several designated constructors gets one full copy of the
//! preamble per constructor. Side effects in initializer blocks therefore run
//! once per designated constructor actually entered, never twice per object,
//! because delegating constructors carry no copy.

use super::outer;
use super::preamble::{self, Scope};
use super::NormalizeSummary;
use crate::options::NormalizerOptions;
use ferrule_tree::{
    AllocationGuard, Block, ClassDecl, ConstructorDecl, ConstructorInvocation, ConstructorRole,
    Expression, FieldDecl, FieldRef, HookCall, MemberId, Param, ParamKind, Span, Statement,
};
use tracing::trace;

/// Gather the instance preamble and splice it into the constructors.
pub fn hoist(
    class: &mut ClassDecl,
    roles: &[(MemberId, ConstructorRole)],
    options: &NormalizerOptions,
    summary: &mut NormalizeSummary,
) {
    if class.is_interface() {
        return;
    }

    let mut hoisted = preamble::gather(class, Scope::Instance);
    outer::rewrite_enclosing_reads(class, &mut hoisted);
    let mut statements: Vec<Statement> = outer_reference_assignment(class).into_iter().collect();
    statements.extend(hoisted.iter().cloned());

    // Gathering removed initializer blocks; constructor ids shift with them.
    let ctor_ids: Vec<MemberId> = class.constructors().map(|(id, _)| id).collect();
    debug_assert_eq!(ctor_ids.len(), roles.len());

    let outer_param = class
        .outer
        .first()
        .map(|link| Param::outer(link.param.clone(), format!("{} *", link.enclosing.name)));
    let mut lowered = 0;
    let mut extended = false;
    for (id, &(_, role)) in ctor_ids.into_iter().zip(roles) {
        let Some(ctor) = class.constructor_mut(id) else {
            continue;
        };
        if ctor.is_lowered() {
            if role == ConstructorRole::Designated && !hoisted.is_empty() {
                extend_lowered(ctor, &hoisted);
                extended = true;
            }
            continue;
        }
        if let Some(param) = &outer_param {
            ensure_outer_param(ctor, param);
        }
        match role {
            ConstructorRole::Designated => lower_designated(ctor, &statements, options),
            ConstructorRole::Delegating => lower_delegating(ctor, outer_param.as_ref(), options),
        }
        lowered += 1;
    }

    if class.is_inner() {
        declare_outer_field(class);
    }
    summary.lowered_constructors = lowered;
    summary.instance_statements = if lowered > 0 {
        statements.len()
    } else if extended {
        hoisted.len()
    } else {
        0
    };
}

/// Where the hoisted preamble of a lowered designated constructor ends.
///
/// `None` if the constructor carries no usable record of it.
pub fn preamble_boundary(ctor: &ConstructorDecl) -> Option<usize> {
    let guarded = ctor.guarded_statements()?;
    ctor.preamble_len.filter(|&len| len <= guarded.len())
}

/// Initializers added after an earlier run go right after the preamble that
/// run hoisted, keeping declaration order.
fn extend_lowered(ctor: &mut ConstructorDecl, hoisted: &[Statement]) {
    // Checked by validation before anything was gathered.
    let Some(at) = preamble_boundary(ctor) else {
        return;
    };
    let Some(Statement::AllocationGuard(guard)) = ctor.body.statements.first_mut() else {
        return;
    };
    guard.body.statements.splice(at..at, hoisted.iter().cloned());
    ctor.preamble_len = Some(at + hoisted.len());
}

/// `self->this$0 = outer$`, first in the preamble of inner classes.
fn outer_reference_assignment(class: &ClassDecl) -> Option<Statement> {
    let link = class.outer.first()?;
    Some(Statement::expr(Expression::assign(
        Expression::field(FieldRef::instance(&class.ty, link.field.clone())),
        Expression::local(link.param.clone()),
    )))
}

fn declare_outer_field(class: &mut ClassDecl) {
    let Some(link) = class.outer.first() else {
        return;
    };
    if class.field(&link.field).is_some() {
        return;
    }
    let mut field = FieldDecl::new(link.field.clone(), format!("{} *", link.enclosing.name));
    field.synthetic = true;
    class.insert_member(0, field);
    trace!(class = %class.name(), "declared outer-reference field");
}

fn ensure_outer_param(ctor: &mut ConstructorDecl, param: &Param) {
    if ctor.params.iter().any(|p| p.kind == ParamKind::OuterInstance) {
        return;
    }
    ctor.params.insert(0, param.clone());
}

fn hook(options: &NormalizerOptions, argument: Expression) -> Expression {
    Expression::HookCall(HookCall {
        hook: options.memory_hook.clone(),
        argument: Box::new(argument),
        span: Span::synthetic(),
    })
}

/// Split off a leading constructor invocation.
fn take_invocation(body: &mut Block) -> (Option<ConstructorInvocation>, Vec<Statement>) {
    let mut statements = std::mem::take(&mut body.statements);
    if matches!(statements.first(), Some(Statement::ConstructorInvocation(_))) {
        if let Statement::ConstructorInvocation(invocation) = statements.remove(0) {
            return (Some(invocation), statements);
        }
    }
    (None, statements)
}

fn lower_designated(
    ctor: &mut ConstructorDecl,
    preamble: &[Statement],
    options: &NormalizerOptions,
) {
    let (invocation, rest) = take_invocation(&mut ctor.body);
    let invocation = invocation.unwrap_or_else(|| {
        ConstructorInvocation::super_call(options.default_selector.clone(), Vec::new())
    });

    let mut guarded = Vec::with_capacity(preamble.len() + rest.len() + 1);
    guarded.extend(preamble.iter().cloned());
    guarded.extend(rest);
    guarded.push(Statement::expr(hook(options, Expression::self_ref())));

    ctor.body.statements = vec![
        Statement::AllocationGuard(AllocationGuard {
            invocation,
            body: Block::new(guarded),
            span: ctor.span,
        }),
        Statement::ret(Some(Expression::self_ref())),
    ];
    ctor.preamble_len = Some(preamble.len());
    trace!(
        selector = %ctor.selector,
        statements = preamble.len(),
        "lowered designated constructor"
    );
}

fn lower_delegating(
    ctor: &mut ConstructorDecl,
    outer_param: Option<&Param>,
    options: &NormalizerOptions,
) {
    let (invocation, rest) = take_invocation(&mut ctor.body);
    let Some(mut invocation) = invocation else {
        // Classified as delegating, so the invocation is there.
        ctor.body.statements = rest;
        return;
    };
    if let Some(param) = outer_param {
        forward_outer_instance(&mut invocation, param);
    }

    ctor.body.statements = if rest.is_empty() {
        vec![Statement::ret(Some(hook(options, Expression::Initialize(invocation))))]
    } else {
        vec![
            Statement::AllocationGuard(AllocationGuard {
                invocation,
                body: Block::new(rest),
                span: ctor.span,
            }),
            Statement::ret(Some(hook(options, Expression::self_ref()))),
        ]
    };
    trace!(selector = %ctor.selector, "lowered delegating constructor");
}

/// The sibling constructor of an inner class expects the enclosing instance first.
fn forward_outer_instance(invocation: &mut ConstructorInvocation, param: &Param) {
    let forwards = matches!(
        invocation.args.first(),
        Some(Expression::Name(name)) if name.name == param.name
    );
    if !forwards {
        invocation.args.insert(0, Expression::local(param.name.clone()));
    }
}
