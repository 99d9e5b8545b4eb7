//! Designated-constructor resolution
//!
//! A constructor *delegates* if and only if its first statement invokes a
//! sibling constructor of the same class; every other constructor is
//! *designated* and owns full instance initialization. A class without
//! constructors gets an implicit designated one.

use super::NormalizeSummary;
use crate::error::{NormalizeError, NormalizeResult};
use crate::options::NormalizerOptions;
use ferrule_tree::{ClassDecl, ConstructorDecl, ConstructorRole, Member, MemberId, Statement};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

/// True unless `ctor` starts by invoking a sibling constructor.
pub fn is_designated_constructor(ctor: &ConstructorDecl) -> bool {
    !ctor
        .leading_invocation()
        .is_some_and(|invocation| invocation.is_delegation())
}

/// Classify every constructor, synthesizing the implicit one if needed.
///
/// Returns the ids of all constructors with their roles, in declaration order.
pub fn resolve(
    class: &mut ClassDecl,
    options: &NormalizerOptions,
    summary: &mut NormalizeSummary,
) -> Vec<(MemberId, ConstructorRole)> {
    if class.is_interface() {
        return Vec::new();
    }

    if class.constructors().next().is_none() {
        let mut ctor = ConstructorDecl::new(options.default_selector.clone())
            .with_body(vec![Statement::super_call(options.default_selector.clone(), Vec::new())]);
        ctor.synthetic = true;
        let id = class.insert_member(implicit_constructor_position(class), ctor);
        summary.synthesized_constructor = true;
        trace!(class = %class.name(), %id, "synthesized implicit constructor");
    }

    let ids: Vec<MemberId> = class.constructors().map(|(id, _)| id).collect();
    ids.into_iter()
        .filter_map(|id| {
            let ctor = class.constructor_mut(id)?;
            let role = if is_designated_constructor(ctor) {
                ConstructorRole::Designated
            } else {
                ConstructorRole::Delegating
            };
            ctor.role = Some(role);
            Some((id, role))
        })
        .collect()
}

/// Implicit constructors go after the leading run of fields and initializer
/// blocks, where the source language would have placed an explicit one.
fn implicit_constructor_position(class: &ClassDecl) -> usize {
    class
        .members
        .iter()
        .position(|m| matches!(m, Member::Constructor(_) | Member::Method(_)))
        .unwrap_or(class.members.len())
}

/// Every delegation chain must end at a designated constructor of this class.
pub fn check_delegations(class: &ClassDecl) -> NormalizeResult<()> {
    let by_selector: FxHashMap<&str, MemberId> = class
        .constructors()
        .map(|(id, ctor)| (ctor.selector.as_str(), id))
        .collect();

    for (start, ctor) in class.constructors() {
        let mut visited = FxHashSet::default();
        visited.insert(start);
        let mut current = ctor;

        while let Some(invocation) =
            current.leading_invocation().filter(|inv| inv.is_delegation())
        {
            let Some(&target) = by_selector.get(invocation.selector.as_str()) else {
                return Err(NormalizeError::UnresolvedDelegation {
                    class: class.name().to_string(),
                    selector: invocation.selector.clone(),
                });
            };
            if !visited.insert(target) {
                return Err(NormalizeError::DelegationCycle {
                    class: class.name().to_string(),
                    selector: ctor.selector.clone(),
                });
            }
            current = match class.constructor(target) {
                Some(next) => next,
                None => break,
            };
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ferrule_tree::{Expression, FieldDecl, MethodDecl, Param, TypeRef};

    fn test_class() -> ClassDecl {
        ClassDecl::class(TypeRef::new(1, "Test"))
    }

    fn delegating(selector: &str, target: &str) -> ConstructorDecl {
        ConstructorDecl::new(selector).with_body(vec![Statement::this_call(target, vec![])])
    }

    #[test]
    fn test_delegation_is_first_statement_only() {
        let delegating = ConstructorDecl::new("init")
            .with_body(vec![Statement::this_call("initWithInt:", vec![Expression::int(42)])]);
        let plain = ConstructorDecl::new("initWithInt:").with_param(Param::new("i", "int"));
        let super_first = ConstructorDecl::new("initWithInt:withByte:").with_body(vec![
            Statement::super_call("init", vec![]),
            Statement::expr(Expression::local("b")),
        ]);

        assert!(!is_designated_constructor(&delegating));
        assert!(is_designated_constructor(&plain));
        assert!(is_designated_constructor(&super_first));
    }

    #[test]
    fn test_implicit_constructor_placed_after_fields() {
        let mut class = test_class()
            .with_member(FieldDecl::new("a", "int"))
            .with_member(MethodDecl::new("run", "void"));
        let mut summary = NormalizeSummary::default();
        let roles = resolve(&mut class, &NormalizerOptions::default(), &mut summary);

        assert!(summary.synthesized_constructor);
        assert_eq!(roles, vec![(MemberId::new(1), ConstructorRole::Designated)]);
        let ctor = class.constructor(MemberId::new(1)).unwrap();
        assert!(ctor.synthetic);
        assert_eq!(ctor.selector, "init");
        assert_eq!(ctor.body.statements, vec![Statement::super_call("init", vec![])]);
    }

    #[test]
    fn test_interfaces_get_no_constructor() {
        let mut class = ClassDecl::interface(TypeRef::new(2, "Mouse"));
        let mut summary = NormalizeSummary::default();
        assert!(resolve(&mut class, &NormalizerOptions::default(), &mut summary).is_empty());
        assert!(class.constructors().next().is_none());
    }

    #[test]
    fn test_unknown_delegation_target_is_rejected() {
        let class = test_class().with_member(delegating("init", "initWithFoo:"));
        assert_eq!(
            check_delegations(&class),
            Err(NormalizeError::UnresolvedDelegation {
                class: "Test".to_string(),
                selector: "initWithFoo:".to_string(),
            })
        );
    }

    #[test]
    fn test_delegation_cycle_is_rejected() {
        let class = test_class()
            .with_member(delegating("init", "initWithInt:"))
            .with_member(delegating("initWithInt:", "init"));
        assert!(matches!(
            check_delegations(&class),
            Err(NormalizeError::DelegationCycle { .. })
        ));
    }

    #[test]
    fn test_delegation_chain_to_designated_is_accepted() {
        let class = test_class()
            .with_member(delegating("init", "initWithInt:"))
            .with_member(delegating("initWithInt:", "initWithInt:withByte:"))
            .with_member(ConstructorDecl::new("initWithInt:withByte:"));
        assert_eq!(check_delegations(&class), Ok(()));
    }
}
