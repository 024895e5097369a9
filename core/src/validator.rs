//! The argument-set registry.
//!
//! A [`Validator`] owns every registered argument set together with the
//! handler to run when that set matches. Command aliases are unique across
//! the registry; this is checked when a set is added, never at match time.
//!
//! Validation tries every set independently against the full token list.
//! A matching set runs its handler only when the validator ignores unknown
//! parameters or nothing was left over; the line still counts as valid
//! either way.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compile::SchemeCompiler;
use crate::error::{Result, SchemeError};
use crate::matcher::{Matcher, ValueConsumption};
use crate::prefix::OptionPrefixes;
use crate::tokenize::tokenize;
use crate::types::{CompiledArgumentSet, SetMatch};

/// Handler invoked when a registered set fully matches.
///
/// Implemented for every `FnMut(&SetMatch)` closure.
pub trait OnMatch {
    fn on_match(&mut self, matched: &SetMatch);
}

impl<F> OnMatch for F
where
    F: FnMut(&SetMatch),
{
    fn on_match(&mut self, matched: &SetMatch) {
        self(matched)
    }
}

struct RegisteredSet {
    set: CompiledArgumentSet,
    handler: Box<dyn OnMatch>,
}

/// Whether a matched set's handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dispatch {
    Triggered,
    /// Unknown tokens were left over and the validator does not ignore them.
    Suppressed,
}

/// Overall outcome of one validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    /// At least one set matched and ran its handler.
    Triggered,
    /// Sets matched, but every one of them had its handler suppressed.
    UnknownTokens,
    NoMatch,
}

/// One matched set within a [`ValidationReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetReport {
    /// Registration index of the set.
    pub index: usize,
    pub command: String,
    pub dispatch: Dispatch,
    pub matched: SetMatch,
}

/// Every set that matched during one validation, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    matches: Vec<SetReport>,
}

impl ValidationReport {
    /// Returns `true` if at least one set matched.
    pub fn is_valid(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn matches(&self) -> &[SetReport] {
        &self.matches
    }

    /// Matched sets whose handler ran.
    pub fn triggered(&self) -> impl Iterator<Item = &SetReport> {
        self.matches
            .iter()
            .filter(|report| report.dispatch == Dispatch::Triggered)
    }

    /// Folds the report into a single status.
    ///
    /// # Examples
    ///
    /// ```
    /// use argscheme_core::{ValidationStatus, Validator};
    ///
    /// let mut validator = Validator::new(false);
    /// validator.add_set("run", |_| {}).unwrap();
    ///
    /// assert_eq!(validator.validate(&["run"]).status(), ValidationStatus::Triggered);
    /// assert_eq!(validator.validate(&["run", "x"]).status(), ValidationStatus::UnknownTokens);
    /// assert_eq!(validator.validate(&["walk"]).status(), ValidationStatus::NoMatch);
    /// ```
    pub fn status(&self) -> ValidationStatus {
        if self.triggered().next().is_some() {
            ValidationStatus::Triggered
        } else if self.is_valid() {
            ValidationStatus::UnknownTokens
        } else {
            ValidationStatus::NoMatch
        }
    }
}

/// Registry of argument sets and entry point for validation.
///
/// # Examples
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use argscheme_core::Validator;
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let mut validator = Validator::new(true);
///
/// let sink = Rc::clone(&seen);
/// validator
///     .add_set(r#"[un]install, -p[ackage]:"s, (-f[orce])"#, move |m| {
///         sink.borrow_mut().push(m.value("package").map(str::to_string));
///     })
///     .unwrap();
///
/// assert!(validator.check_args("install --package foo -f"));
/// assert!(!validator.check_args("upgrade --package foo"));
/// assert_eq!(*seen.borrow(), [Some("foo".to_string())]);
/// ```
pub struct Validator {
    compiler: SchemeCompiler,
    ignore_unknown_parameters: bool,
    consumption: ValueConsumption,
    sets: Vec<RegisteredSet>,
}

impl Validator {
    /// Creates a validator with the default option prefixes (`-`, `--`, `/`).
    pub fn new(ignore_unknown_parameters: bool) -> Self {
        Self::builder()
            .ignore_unknown_parameters(ignore_unknown_parameters)
            .build()
    }

    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    pub fn ignore_unknown_parameters(&self) -> bool {
        self.ignore_unknown_parameters
    }

    pub fn set_ignore_unknown_parameters(&mut self, ignore: bool) {
        self.ignore_unknown_parameters = ignore;
    }

    pub fn option_prefixes(&self) -> &OptionPrefixes {
        self.compiler.prefixes()
    }

    pub fn value_consumption(&self) -> ValueConsumption {
        self.consumption
    }

    /// Compiles a descriptor with this validator's prefixes without
    /// registering it.
    pub fn compile(&self, descriptor: &str) -> Result<CompiledArgumentSet> {
        self.compiler.compile(descriptor)
    }

    /// Compiles and registers an argument set bound to a closure.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::Grammar`] or [`SchemeError::EmptyScheme`] for a
    /// malformed descriptor, and [`SchemeError::DuplicateCommand`] when one of
    /// the command aliases is already registered. Nothing is registered on
    /// error.
    pub fn add_set<F>(&mut self, descriptor: &str, on_match: F) -> Result<&CompiledArgumentSet>
    where
        F: FnMut(&SetMatch) + 'static,
    {
        self.add_handler(descriptor, on_match)
    }

    /// Compiles and registers an argument set bound to any [`OnMatch`]
    /// handler.
    pub fn add_handler<H>(&mut self, descriptor: &str, handler: H) -> Result<&CompiledArgumentSet>
    where
        H: OnMatch + 'static,
    {
        let set = self.compiler.compile(descriptor)?;

        for existing in &self.sets {
            if let Some(alias) = set.shared_command_alias(&existing.set) {
                return Err(SchemeError::DuplicateCommand {
                    alias: alias.to_string(),
                });
            }
        }

        debug!(
            command = set.command().name(),
            index = self.sets.len(),
            "registered argument set"
        );
        self.sets.push(RegisteredSet {
            set,
            handler: Box::new(handler),
        });
        let index = self.sets.len() - 1;
        Ok(&self.sets[index].set)
    }

    /// Registered sets in registration order.
    pub fn sets(&self) -> impl Iterator<Item = &CompiledArgumentSet> {
        self.sets.iter().map(|registered| &registered.set)
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Tokenizes `line` and validates it. See [`check_tokens`](Self::check_tokens).
    pub fn check_args(&mut self, line: &str) -> bool {
        self.validate_line(line).is_valid()
    }

    /// Validates a pre-tokenized line, running the handlers of matched sets.
    ///
    /// Returns `true` if at least one set matched, even when its handler was
    /// suppressed because of unknown tokens.
    pub fn check_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) -> bool {
        self.validate(tokens).is_valid()
    }

    /// Tokenizes `line` and validates it, returning the full report.
    pub fn validate_line(&mut self, line: &str) -> ValidationReport {
        let tokens: Vec<&str> = tokenize(line).collect();
        self.validate(&tokens)
    }

    /// Validates a pre-tokenized line, running the handlers of matched sets,
    /// and reports every match.
    pub fn validate<S: AsRef<str>>(&mut self, tokens: &[S]) -> ValidationReport {
        let matcher = Matcher::new(self.compiler.prefixes(), self.consumption);
        let mut matches = Vec::new();

        for (index, registered) in self.sets.iter_mut().enumerate() {
            let Some(matched) = matcher.match_set(&registered.set, tokens) else {
                continue;
            };

            let dispatch = if self.ignore_unknown_parameters || matched.unknown.is_empty() {
                registered.handler.on_match(&matched);
                Dispatch::Triggered
            } else {
                debug!(
                    command = matched.command(),
                    unknown = ?matched.unknown,
                    "handler suppressed by unknown tokens"
                );
                Dispatch::Suppressed
            };

            matches.push(SetReport {
                index,
                command: matched.command().to_string(),
                dispatch,
                matched,
            });
        }

        debug!(tokens = tokens.len(), matched = matches.len(), "validated arguments");
        ValidationReport { matches }
    }

    /// Matches the set registered at `index` without running its handler.
    pub fn match_set<S: AsRef<str>>(&self, index: usize, tokens: &[S]) -> Option<SetMatch> {
        let registered = self.sets.get(index)?;
        Matcher::new(self.compiler.prefixes(), self.consumption).match_set(&registered.set, tokens)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("prefixes", self.compiler.prefixes())
            .field("ignore_unknown_parameters", &self.ignore_unknown_parameters)
            .field("consumption", &self.consumption)
            .field("sets", &self.sets().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Builder for [`Validator`].
///
/// # Examples
///
/// ```
/// use argscheme_core::{Validator, ValueConsumption};
///
/// let validator = Validator::builder()
///     .ignore_unknown_parameters(true)
///     .option_prefixes(["+", "-"])
///     .value_consumption(ValueConsumption::Span)
///     .build();
///
/// assert!(validator.ignore_unknown_parameters());
/// assert_eq!(validator.option_prefixes().as_slice(), ["+", "-"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidatorBuilder {
    ignore_unknown_parameters: bool,
    prefixes: OptionPrefixes,
    consumption: ValueConsumption,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_unknown_parameters(mut self, ignore: bool) -> Self {
        self.ignore_unknown_parameters = ignore;
        self
    }

    /// Replaces the option prefixes; they are reordered longest-first.
    pub fn option_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = OptionPrefixes::new(prefixes);
        self
    }

    pub fn value_consumption(mut self, consumption: ValueConsumption) -> Self {
        self.consumption = consumption;
        self
    }

    pub fn build(self) -> Validator {
        Validator {
            compiler: SchemeCompiler::new(self.prefixes),
            ignore_unknown_parameters: self.ignore_unknown_parameters,
            consumption: self.consumption,
            sets: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Calls = Rc<RefCell<Vec<Vec<String>>>>;

    fn recorder() -> (Calls, impl FnMut(&SetMatch) + 'static) {
        let calls: Calls = Rc::default();
        let sink = Rc::clone(&calls);
        (calls, move |m: &SetMatch| {
            sink.borrow_mut().push(m.unknown_tokens().to_vec())
        })
    }

    #[test]
    fn test_flag_round_trip_triggers_handler() {
        let (calls, handler) = recorder();
        let mut validator = Validator::new(false);
        validator.add_set("run, -v", handler).unwrap();

        assert!(validator.check_tokens(&["run", "-v"]));
        assert_eq!(*calls.borrow(), vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_duplicate_command_is_rejected() {
        let mut validator = Validator::new(false);
        validator.add_set("r[un]", |_| {}).unwrap();

        let err = validator.add_set("run|go, -v", |_| {}).unwrap_err();
        assert_eq!(
            err,
            SchemeError::DuplicateCommand {
                alias: "run".to_string()
            }
        );
        assert_eq!(validator.len(), 1);
    }

    #[test]
    fn test_parameter_aliases_may_repeat_across_sets() {
        let mut validator = Validator::new(false);
        validator.add_set("a, -v", |_| {}).unwrap();
        assert!(validator.add_set("b, -v", |_| {}).is_ok());
    }

    #[test]
    fn test_grammar_error_registers_nothing() {
        let mut validator = Validator::new(false);
        assert!(validator.add_set("run, -bad!", |_| {}).is_err());
        assert!(validator.is_empty());
        assert!(validator.add_set("run", |_| {}).is_ok());
    }

    #[test]
    fn test_unknown_tokens_suppress_handler_but_line_is_valid() {
        let (calls, handler) = recorder();
        let mut validator = Validator::new(false);
        validator.add_set("run, -v", handler).unwrap();

        assert!(validator.check_tokens(&["run", "-v", "extra"]));
        assert!(calls.borrow().is_empty());

        let report = validator.validate(&["run", "-v", "extra"]);
        assert_eq!(report.status(), ValidationStatus::UnknownTokens);
        assert_eq!(report.matches()[0].dispatch, Dispatch::Suppressed);
    }

    #[test]
    fn test_ignoring_unknown_tokens_passes_them_to_handler() {
        let (calls, handler) = recorder();
        let mut validator = Validator::new(true);
        validator.add_set("run, -v", handler).unwrap();

        assert!(validator.check_tokens(&["run", "-v", "extra"]));
        assert_eq!(*calls.borrow(), vec![vec!["extra".to_string()]]);
    }

    #[test]
    fn test_toggling_ignore_unknown_after_construction() {
        let (calls, handler) = recorder();
        let mut validator = Validator::new(false);
        validator.add_set("run", handler).unwrap();

        validator.check_args("run extra");
        assert!(calls.borrow().is_empty());

        validator.set_ignore_unknown_parameters(true);
        validator.check_args("run extra");
        assert_eq!(calls.borrow().len(), 1);
    }

    #[test]
    fn test_every_matching_set_is_tried() {
        let (calls_a, a) = recorder();
        let (calls_b, b) = recorder();
        let mut validator = Validator::new(true);
        validator.add_set("build, (-r[elease])", a).unwrap();
        validator.add_set("test, (-r[elease])", b).unwrap();

        let report = validator.validate(&["build", "test", "--release"]);
        assert_eq!(report.matches().len(), 2);
        assert_eq!(*calls_a.borrow(), vec![vec!["test".to_string()]]);
        assert_eq!(*calls_b.borrow(), vec![vec!["build".to_string()]]);
    }

    #[test]
    fn test_revalidation_is_idempotent() {
        let mut validator = Validator::new(false);
        validator.add_set(r#"set, -mode:a|b"#, |_| {}).unwrap();

        let first = validator.validate_line("set -mode a");
        let second = validator.validate_line("set -mode a");
        assert_eq!(first, second);
        assert_eq!(first.matches()[0].matched.values("mode"), ["a"]);
    }

    #[test]
    fn test_no_sets_never_match() {
        let mut validator = Validator::default();
        assert!(!validator.check_args("anything"));
        assert_eq!(
            validator.validate_line("anything").status(),
            ValidationStatus::NoMatch
        );
    }

    #[test]
    fn test_struct_handler() {
        struct Counter(Rc<RefCell<usize>>);

        impl OnMatch for Counter {
            fn on_match(&mut self, _: &SetMatch) {
                *self.0.borrow_mut() += 1;
            }
        }

        let count = Rc::new(RefCell::new(0));
        let mut validator = Validator::new(false);
        validator
            .add_handler("ping", Counter(Rc::clone(&count)))
            .unwrap();

        validator.check_args("ping");
        validator.check_args("ping");
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn test_match_set_does_not_run_handler() {
        let (calls, handler) = recorder();
        let mut validator = Validator::new(false);
        validator.add_set("run", handler).unwrap();

        assert!(validator.match_set(0, &["run"]).is_some());
        assert!(validator.match_set(1, &["run"]).is_none());
        assert!(calls.borrow().is_empty());
    }
}
