//! Preamble gathering
//!
//! Walks a class's members top to bottom and turns every initializing
//! construct of one staticness into statements: a field initializer becomes
//! an assignment to the field, an initializer block is carried over verbatim
//! as a nested block. Fields and blocks interleave exactly as declared.
//!
//! Gathering consumes its sources: moved initializers are cleared from their
//! field declarations and consumed blocks are removed from the class.

use super::literals;
use ferrule_tree::{ClassDecl, Expression, FieldDecl, FieldRef, Member, Statement};

/// Which initializers to gather
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Instance,
    Static,
}

impl Scope {
    fn of_field(class: &ClassDecl, field: &FieldDecl) -> Self {
        // Interface fields are implicitly static
        if class.is_interface() || field.is_static() {
            Scope::Static
        } else {
            Scope::Instance
        }
    }

    fn of_block(is_static: bool) -> Self {
        if is_static {
            Scope::Static
        } else {
            Scope::Instance
        }
    }
}

/// True if a static field's initializer stays on its declaration, where the
/// printer emits it as a compile-time constant.
///
/// Interface fields are never moved, whatever their initializer.
pub fn stays_on_declaration(class: &ClassDecl, field: &FieldDecl) -> bool {
    if class.is_interface() {
        return true;
    }
    let Some(init) = &field.initializer else {
        return true;
    };
    if !(field.modifiers.is_static && field.modifiers.is_final) {
        return false;
    }
    match init {
        Expression::StringLiteral(lit) => literals::is_representable(&lit.units),
        other => other.is_primitive_literal(),
    }
}

/// Gather the preamble for `scope`, in declaration order.
pub fn gather(class: &mut ClassDecl, scope: Scope) -> Vec<Statement> {
    let owner = class.ty.clone();
    let mut statements = Vec::new();

    for index in 0..class.members.len() {
        let hoist = match &class.members[index] {
            Member::Field(field) => {
                Scope::of_field(class, field) == scope && !stays_on_declaration(class, field)
            }
            Member::Initializer(block) => Scope::of_block(block.is_static) == scope,
            Member::Constructor(_) | Member::Method(_) => false,
        };
        if !hoist {
            continue;
        }

        match &mut class.members[index] {
            Member::Field(field) => {
                let Some(init) = field.initializer.take() else {
                    continue;
                };
                let target = FieldRef {
                    owner: owner.clone(),
                    name: field.name.clone(),
                    is_static: scope == Scope::Static,
                };
                let span = field.span;
                let mut stmt = Statement::expr(Expression::assign(Expression::field(target), init));
                if let Statement::Expression(s) = &mut stmt {
                    s.span = span;
                }
                statements.push(stmt);
            }
            Member::Initializer(block) => {
                statements.push(Statement::Block(std::mem::take(&mut block.body)));
            }
            Member::Constructor(_) | Member::Method(_) => {}
        }
    }

    class.members.retain(|member| match member {
        Member::Initializer(block) => Scope::of_block(block.is_static) != scope,
        _ => true,
    });
    statements
}
