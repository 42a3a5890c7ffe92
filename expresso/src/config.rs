//! Evaluator configuration
//!
//! Loaded from defaults, a TOML document or environment variables:
//!
//! ```toml
//! max_depth = 128
//! strict_variables = false
//! ```

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default recursion bound for evaluation
///
/// Evaluating this many levels fits in the 2 MiB stack of a spawned thread,
/// debug builds included.
pub const DEFAULT_MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Deepest allowed nesting of evaluated nodes
    pub max_depth: usize,
    /// Fail on unbound variables; when false they read as null
    pub strict_variables: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strict_variables: true,
        }
    }
}

impl EvaluatorConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EvaluatorConfig = toml::from_str(source)?;
        config.validate()
    }

    /// Defaults overridden by `EXPRESSO_MAX_DEPTH` and `EXPRESSO_STRICT_VARIABLES`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup("EXPRESSO_MAX_DEPTH") {
            config.max_depth = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "EXPRESSO_MAX_DEPTH".to_string(),
                message: format!("expected a positive integer, got '{}'", raw),
            })?;
        }
        if let Some(raw) = lookup("EXPRESSO_STRICT_VARIABLES") {
            config.strict_variables = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "EXPRESSO_STRICT_VARIABLES".to_string(),
                        message: format!("expected a boolean, got '{}'", raw),
                    })
                }
            };
        }

        config.validate()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid {
                key: "max_depth".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(self)
    }
}
