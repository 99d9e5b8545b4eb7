//! Ferrule Translation Passes
//!
//! Tree-to-tree passes that move a type-resolved program from source-language
//! semantics toward the target object protocol (explicit initializer messages,
//! a lazily run class-initialize hook, manual reference counting).
//!
//! The first pass in the pipeline is [`InitializationNormalizer`], which turns
//! implicit field initializers and initializer blocks into explicit statements
//! inside constructors and the class-initialize method.
//!
//! # Example
//!
//! ```rust,ignore
//! use ferrule_translate::{InitializationNormalizer, NormalizerOptions};
//!
//! let normalizer = InitializationNormalizer::new(NormalizerOptions::default());
//! let summary = normalizer.normalize(&mut class)?;
//! ```

#![warn(rust_2018_idioms)]

pub mod error;
pub mod normalizer;
pub mod options;

pub use error::{NormalizeError, NormalizeResult, OptionsError};
pub use normalizer::{
    is_designated_constructor, is_inline_representable, normalize, InitializationNormalizer,
    NormalizeSummary,
};
pub use options::NormalizerOptions;
