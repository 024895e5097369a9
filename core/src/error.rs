//! Error types for scheme compilation and configuration loading.
//!
//! Compilation errors ([`SchemeError`]) are raised synchronously while a
//! descriptor is registered; validation itself never fails. Configuration
//! errors ([`ConfigError`]) cover reading, parsing and registering a
//! [`ValidatorConfig`](crate::ValidatorConfig) file.

use thiserror::Error;

/// Errors raised while compiling or registering an argument set.
///
/// Registration is all-or-nothing: when one of these is returned the
/// validator is left exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemeError {
    /// A descriptor (or one of its alias or value sub-expressions) does not
    /// follow the descriptor grammar.
    #[error("invalid argument scheme `{descriptor}`: {reason}")]
    Grammar { descriptor: String, reason: String },

    /// The descriptor string for a set is blank.
    #[error("invalid argument scheme: the argument schemes are empty")]
    EmptyScheme,

    /// The command of a new set reuses an alias of an already registered
    /// command.
    #[error("command already exists, every command may be registered once: {alias}")]
    DuplicateCommand { alias: String },
}

impl SchemeError {
    pub(crate) fn grammar(descriptor: &str, reason: impl Into<String>) -> Self {
        Self::Grammar {
            descriptor: descriptor.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias for results with [`SchemeError`].
pub type Result<T> = std::result::Result<T, SchemeError>;

/// Errors that can occur while loading a configuration file and building a
/// validator from it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configured set failed to compile or register.
    #[error("argument set `{name}`: {source}")]
    Scheme {
        name: String,
        #[source]
        source: SchemeError,
    },
}
