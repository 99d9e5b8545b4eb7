//! Normalization errors
//!
//! The pass runs on trees the front end has already validated, so every error
//! here is an internal fault: a tree that breaks the front end's guarantees.
//! Errors are reported per class and the class is left untouched.

use ferrule_tree::Span;
use thiserror::Error;

pub type NormalizeResult<T> = Result<T, NormalizeError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizeError {
    #[error("Internal error: constructor of {class} delegates to unknown constructor '{selector}'")]
    UnresolvedDelegation { class: String, selector: String },

    #[error("Internal error: constructor '{selector}' of {class} is part of a delegation cycle")]
    DelegationCycle { class: String, selector: String },

    #[error("Internal error: unbound name '{name}' in an initializer of {class}")]
    UnboundName {
        class: String,
        name: String,
        span: Span,
    },

    #[error("Internal error: {class} reads an enclosing {enclosing} instance it does not have")]
    MissingOuterInstance { class: String, enclosing: String },

    #[error("Internal error: interface {class} declares a constructor")]
    InterfaceConstructor { class: String },

    #[error("Internal error: lowered constructor '{selector}' of {class} has no preamble boundary")]
    UnknownPreambleBoundary { class: String, selector: String },
}

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("Invalid normalizer options: {0}")]
    Toml(#[from] toml::de::Error),
}
