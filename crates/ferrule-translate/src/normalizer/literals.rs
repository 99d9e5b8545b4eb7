//! Literal adjustment
//!
//! Target source files can only hold a subset of UTF-16 inline. String
//! literals with other code units are rebuilt from their numeric units:
//!
//! ```text
//! "\uffff"
//!   => [NSString stringWithCharacters:(unichar[]) { (int) 0xffff } length:1]
//! "hello" + "\uffff"
//!   => [NSString stringWithFormat:@"hello%@", [NSString stringWithCharacters:...]]
//! ```

use ferrule_tree::visitor::{walk_expression_mut, VisitorMut};
use ferrule_tree::{
    BinaryExpression, BinaryOperator, ClassDecl, Expression, Member, MethodKind, StringFormat,
    StringFromUnits, StringLiteral,
};
use tracing::trace;

/// True if `unit` may appear inline in a target string literal.
pub fn is_inline_representable(unit: u16) -> bool {
    matches!(unit, 0x09 | 0x0a | 0x0d | 0x20..=0x7e | 0xa0..=0xd7ff | 0xe000..=0xfffd)
}

/// True if every code unit of a literal is inline representable.
pub fn is_representable(units: &[u16]) -> bool {
    units.iter().all(|&unit| is_inline_representable(unit))
}

/// Rewrite unrepresentable string literals in constructor bodies and the
/// class-initialize method. Returns the number of literals rewritten.
pub fn adjust_class(class: &mut ClassDecl) -> usize {
    let mut adjuster = LiteralAdjuster { rewritten: 0 };
    for member in &mut class.members {
        match member {
            Member::Constructor(ctor) => adjuster.visit_block_mut(&mut ctor.body),
            Member::Method(method) if method.kind == MethodKind::ClassInitialize => {
                adjuster.visit_block_mut(&mut method.body)
            }
            Member::Field(_) | Member::Initializer(_) | Member::Method(_) => {}
        }
    }
    adjuster.rewritten
}

struct LiteralAdjuster {
    rewritten: usize,
}

impl LiteralAdjuster {
    fn from_units(&mut self, lit: &StringLiteral) -> Expression {
        self.rewritten += 1;
        trace!(units = lit.units.len(), "rebuilt string literal from code units");
        Expression::StringFromUnits(StringFromUnits {
            units: lit.units.clone(),
            span: lit.span,
        })
    }

    /// A concatenation of string literals only, with at least one that
    /// cannot stay inline, folds into one formatted construction.
    fn fold_concat(&mut self, binary: &BinaryExpression) -> Option<Expression> {
        let mut parts = Vec::new();
        if !literal_chain(binary, &mut parts)
            || parts.iter().all(|lit| is_representable(&lit.units))
        {
            return None;
        }

        let mut format = String::new();
        let mut args = Vec::new();
        for lit in parts {
            if is_representable(&lit.units) {
                format.push_str(&lit.to_string_lossy().replace('%', "%%"));
            } else {
                format.push_str("%@");
                args.push(self.from_units(lit));
            }
        }
        Some(Expression::StringFormat(StringFormat {
            format,
            args,
            span: binary.span,
        }))
    }
}

/// Collect the leaves of a left- or right-nested `Concat` chain. False if any
/// leaf is not a string literal.
fn literal_chain<'a>(binary: &'a BinaryExpression, parts: &mut Vec<&'a StringLiteral>) -> bool {
    if binary.op != BinaryOperator::Concat {
        return false;
    }
    [binary.left.as_ref(), binary.right.as_ref()]
        .into_iter()
        .all(|operand| match operand {
            Expression::StringLiteral(lit) => {
                parts.push(lit);
                true
            }
            Expression::Binary(inner) => literal_chain(inner, parts),
            _ => false,
        })
}

impl VisitorMut for LiteralAdjuster {
    fn visit_expression_mut(&mut self, expr: &mut Expression) {
        let replacement = match expr {
            Expression::StringLiteral(lit) if !is_representable(&lit.units) => {
                Some(self.from_units(lit))
            }
            Expression::Binary(binary) => self.fold_concat(binary),
            _ => None,
        };
        match replacement {
            Some(folded) => *expr = folded,
            None => walk_expression_mut(self, expr),
        }
    }
}
