//! Initialization Normalization
//!
//! Rewrites the implicit, order-dependent initialization constructs of the
//! source language into explicit statements:
//!
//! - instance field initializers and instance initializer blocks move into
//!   every designated constructor, after the allocation call
//! - static field initializers and static blocks move into the class-initialize
//!   method, behind an exact-class guard
//!
//! Each class goes through four phases, in order:
//!
//! 1. designated-constructor resolution ([`designated`])
//! 2. instance-initializer hoisting ([`instance`])
//! 3. static-initializer consolidation ([`statics`])
//! 4. literal adjustment ([`literals`])
//!
//! Statements are gathered first and spliced afterwards, so the order of the
//! gathered preamble is exactly the member declaration order.

pub mod designated;
pub mod instance;
pub mod literals;
pub mod outer;
pub mod preamble;
pub mod statics;

pub use designated::is_designated_constructor;
pub use literals::is_inline_representable;

use crate::error::{NormalizeError, NormalizeResult};
use crate::options::NormalizerOptions;
use ferrule_tree::visitor::{walk_call, walk_expression, Visitor};
use ferrule_tree::{Binding, CallExpression, ClassDecl, Member, NameExpression};
use tracing::debug;

/// What normalizing one class changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    /// A default constructor was created
    pub synthesized_constructor: bool,
    /// Designated and delegating constructors rewritten to the allocation idiom
    pub lowered_constructors: usize,
    /// Statements in the instance preamble (including the outer-reference assignment)
    pub instance_statements: usize,
    /// Statements in the static preamble
    pub static_statements: usize,
    /// String literals rewritten into explicit constructions
    pub rewritten_literals: usize,
}

impl NormalizeSummary {
    /// True if the class was already normalized
    pub fn is_unchanged(&self) -> bool {
        *self == Self::default()
    }
}

/// The initialization-normalization pass
#[derive(Debug, Clone, Default)]
pub struct InitializationNormalizer {
    options: NormalizerOptions,
}

impl InitializationNormalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Normalize one class in place.
    ///
    /// The class is validated before anything is mutated: on error it is left
    /// exactly as it was.
    pub fn normalize(&self, class: &mut ClassDecl) -> NormalizeResult<NormalizeSummary> {
        validate(class)?;
        debug!(class = %class.name(), members = class.members.len(), "normalizing initialization");

        let mut summary = NormalizeSummary::default();
        let roles = designated::resolve(class, &self.options, &mut summary);
        instance::hoist(class, &roles, &self.options, &mut summary);
        statics::consolidate(class, &self.options, &mut summary);
        if self.options.rewrite_unrepresentable_literals {
            summary.rewritten_literals = literals::adjust_class(class);
        }

        debug!(
            class = %class.name(),
            instance = summary.instance_statements,
            statics = summary.static_statements,
            literals = summary.rewritten_literals,
            "normalized initialization"
        );
        Ok(summary)
    }

    /// Normalize every class of a compilation unit.
    ///
    /// Classes are independent; processing stops at the first class that
    /// fails, leaving that class untouched.
    pub fn normalize_unit(
        &self,
        classes: &mut [ClassDecl],
    ) -> NormalizeResult<Vec<NormalizeSummary>> {
        classes.iter_mut().map(|class| self.normalize(class)).collect()
    }
}

/// Normalize `class` with default options, returning the same class.
pub fn normalize(class: &mut ClassDecl) -> NormalizeResult<&mut ClassDecl> {
    InitializationNormalizer::default().normalize(class)?;
    Ok(class)
}

/// Check the front end's guarantees for everything the pass will move.
fn validate(class: &ClassDecl) -> NormalizeResult<()> {
    if class.is_interface() && class.constructors().next().is_some() {
        return Err(NormalizeError::InterfaceConstructor {
            class: class.name().to_string(),
        });
    }

    designated::check_delegations(class)?;
    check_preamble_boundaries(class)?;

    let mut checker = BindingChecker {
        class,
        error: None,
    };
    for member in &class.members {
        match member {
            Member::Field(field) => {
                if let Some(init) = &field.initializer {
                    checker.visit_expression(init);
                }
            }
            Member::Initializer(block) => checker.visit_block(&block.body),
            Member::Constructor(_) | Member::Method(_) => {}
        }
    }
    match checker.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Instance initializers found after an earlier run are spliced behind the
/// preamble that run hoisted, so every lowered designated constructor must
/// still know where it ends.
fn check_preamble_boundaries(class: &ClassDecl) -> NormalizeResult<()> {
    let pending = !class.is_interface()
        && class.members.iter().any(|member| match member {
            Member::Field(field) => !field.is_static() && field.initializer.is_some(),
            Member::Initializer(block) => !block.is_static,
            Member::Constructor(_) | Member::Method(_) => false,
        });
    if !pending {
        return Ok(());
    }

    let unknown = class.constructors().map(|(_, ctor)| ctor).find(|ctor| {
        ctor.is_lowered()
            && is_designated_constructor(ctor)
            && instance::preamble_boundary(ctor).is_none()
    });
    match unknown {
        Some(ctor) => Err(NormalizeError::UnknownPreambleBoundary {
            class: class.name().to_string(),
            selector: ctor.selector.clone(),
        }),
        None => Ok(()),
    }
}

/// Finds names in initializers that the front end left unbound, and
/// enclosing-instance references the class cannot satisfy.
struct BindingChecker<'a> {
    class: &'a ClassDecl,
    error: Option<NormalizeError>,
}

impl BindingChecker<'_> {
    fn fail(&mut self, err: NormalizeError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn reaches(&self, enclosing: &ferrule_tree::TypeRef) -> bool {
        self.class.outer.iter().any(|link| &link.enclosing == enclosing)
    }
}

impl Visitor for BindingChecker<'_> {
    fn visit_name(&mut self, name: &NameExpression) {
        match &name.binding {
            None => self.fail(NormalizeError::UnboundName {
                class: self.class.name().to_string(),
                name: name.name.clone(),
                span: name.span,
            }),
            Some(Binding::Enclosing(enclosing)) if !self.reaches(enclosing) => {
                self.fail(NormalizeError::MissingOuterInstance {
                    class: self.class.name().to_string(),
                    enclosing: enclosing.name.clone(),
                })
            }
            Some(_) => {}
        }
    }

    fn visit_call(&mut self, call: &CallExpression) {
        if call.receiver.is_none() && call.method.is_none() {
            self.fail(NormalizeError::UnboundName {
                class: self.class.name().to_string(),
                name: call.selector.clone(),
                span: call.span,
            });
        }
        walk_call(self, call);
    }

    fn visit_expression(&mut self, expr: &ferrule_tree::Expression) {
        if self.error.is_none() {
            walk_expression(self, expr);
        }
    }
}
