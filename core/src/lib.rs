//! Descriptor-driven command-line argument validation.
//!
//! Callers register argument sets written in a small descriptor grammar and
//! later check runtime argument lines against them:
//!
//! - [`tokenize`]: split a raw line into tokens, honoring double quotes.
//! - [`expand_identifier`] / [`expand_aliases`]: expand alias expressions
//!   such as `v[erbose]` or `[un]install` into concrete identifiers.
//! - [`SchemeCompiler`]: compile a descriptor into a
//!   [`CompiledArgumentSet`].
//! - [`Matcher`]: greedily match a token list against one compiled set.
//! - [`Validator`]: the registry, which enforces unique commands, validates lines
//!   against every registered set and runs the handlers of matched sets.
//! - [`ValidatorConfig`]: YAML/JSON configuration for building a validator.
//!
//! # Descriptor grammar
//!
//! A descriptor is a comma-separated list. The first entry is the command,
//! every other entry a parameter. Parentheses around an entry make it
//! optional; `:` or `=` introduces a value clause (`"list`/`"l` for one or
//! more values, `"single`/`"s` for exactly one, or `a|b|c` for one of a
//! fixed set), and parentheses around the clause make the value optional.
//!
//! # Example
//!
//! ```
//! use argscheme_core::{ValidationStatus, Validator};
//!
//! let mut validator = Validator::new(false);
//! validator
//!     .add_set(r#"cp, -files:"list, (-v[erbose])"#, |m| {
//!         assert_eq!(m.values("files"), ["a.txt", "b.txt"]);
//!     })
//!     .unwrap();
//!
//! // Value tokens stay in the working list, so they are reported as unknown
//! // and the handler is suppressed; the line is still valid.
//! let report = validator.validate_line("cp -files a.txt b.txt --verbose");
//! assert!(report.is_valid());
//! assert_eq!(report.status(), ValidationStatus::UnknownTokens);
//!
//! validator.set_ignore_unknown_parameters(true);
//! assert_eq!(
//!     validator.validate_line("cp -files a.txt b.txt").status(),
//!     ValidationStatus::Triggered,
//! );
//! ```

mod compile;
mod config;
mod error;
mod identifier;
mod matcher;
mod prefix;
mod tokenize;
mod types;
mod validator;

pub use compile::SchemeCompiler;
pub use config::{SetConfig, ValidatorConfig};
pub use error::{ConfigError, Result, SchemeError};
pub use identifier::{expand_aliases, expand_identifier};
pub use matcher::{Matcher, ValueConsumption};
pub use prefix::{DEFAULT_OPTION_PREFIXES, OptionPrefixes};
pub use tokenize::{Tokens, tokenize, tokenize_owned};
pub use types::*;
pub use validator::{
    Dispatch, OnMatch, SetReport, ValidationReport, ValidationStatus, Validator, ValidatorBuilder,
};
