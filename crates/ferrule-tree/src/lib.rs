//! Ferrule Syntax Tree
//!
//! The typed, binding-resolved tree that flows between the translator passes.
//! The front end produces it with every name, field reference and constructor
//! invocation already bound; passes rewrite it in place; the printer consumes it.
//!
//! - **Declarations**: classes, fields, initializer blocks, constructors, methods
//! - **Statements** and **expressions**, including the target-only forms that
//!   lowering passes introduce (allocation guards, class guards, hook calls)
//! - **Visitors** for read-only and mutating traversal
//! - **Pretty-printing** of target-language-like text for debugging and tests

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Class, member and parameter declarations
pub mod decl;
/// Expressions and the references they bind to
pub mod expression;
/// Stable identifiers for members and types
pub mod ids;
/// Text rendering for debugging and tests
pub mod pretty;
/// Source locations
pub mod span;
/// Statements and the lowered construction forms
pub mod statement;
/// Tree traversal
pub mod visitor;

pub use decl::*;
pub use expression::*;
pub use ids::{MemberId, TypeId, TypeRef};
pub use pretty::PrettyPrint;
pub use span::Span;
pub use statement::*;
pub use visitor::{Visitor, VisitorMut};
