//! Normalizer configuration

use crate::error::OptionsError;
use serde::Deserialize;

/// Names the pass writes into the tree, plus feature switches
///
/// Usually read from the `[normalizer]` table of the translator config:
///
/// ```toml
/// [normalizer]
/// memory_hook = "JreMemDebugAdd"
/// class_initializer = "initialize"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormalizerOptions {
    /// External procedure that registers a freshly constructed instance
    pub memory_hook: String,
    /// Name of the once-per-class initialization method
    pub class_initializer: String,
    /// Selector of synthesized constructors and implicit `super` calls
    pub default_selector: String,
    /// Rewrite string literals the target source encoding cannot hold inline
    pub rewrite_unrepresentable_literals: bool,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            memory_hook: "JreMemDebugAdd".to_string(),
            class_initializer: "initialize".to_string(),
            default_selector: "init".to_string(),
            rewrite_unrepresentable_literals: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    normalizer: NormalizerOptions,
}

impl NormalizerOptions {
    /// Read options from the `[normalizer]` table of a TOML document.
    /// Missing keys (or a missing table) keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, OptionsError> {
        let config: ConfigFile = toml::from_str(text)?;
        Ok(config.normalizer)
    }
}
