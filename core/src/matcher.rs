//! Greedy matching of a token list against one compiled argument set.
//!
//! Schemes are resolved strictly in declaration order against a working
//! copy of the tokens. Each scheme takes the first token that names one of
//! its aliases (bare, or behind the longest matching option prefix) and, by
//! arity, the value token(s) following it. Whatever remains in the working
//! list after the last scheme is reported as unknown.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::prefix::OptionPrefixes;
use crate::types::{ArgumentMatch, CompiledArgumentSet, CompiledScheme, SetMatch, ValueArity};

/// Which tokens a matched scheme removes from the working list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueConsumption {
    /// Only the identifier token is removed. Value tokens stay available to
    /// later schemes and end up among the unknown tokens.
    #[default]
    IdentifierOnly,
    /// The identifier token and the value token(s) it captured are removed.
    Span,
}

/// Matches token lists against compiled sets.
///
/// Captured values only leave the unknown tokens under
/// [`ValueConsumption::Span`]. With the default
/// [`ValueConsumption::IdentifierOnly`], `cp -files x y` reports `x` and `y`
/// as unknown.
///
/// # Examples
///
/// ```
/// use argscheme_core::{Matcher, OptionPrefixes, SchemeCompiler, ValueConsumption};
///
/// let set = SchemeCompiler::default().compile(r#"cp, -files:"list, -v"#).unwrap();
/// let prefixes = OptionPrefixes::default();
///
/// let matcher = Matcher::new(&prefixes, ValueConsumption::Span);
/// let matched = matcher.match_set(&set, &["cp", "-files", "x", "y", "-v"]).unwrap();
/// assert_eq!(matched.values("files"), ["x", "y"]);
/// assert!(matched.is_present("v"));
/// assert!(matched.unknown_tokens().is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Matcher<'p> {
    prefixes: &'p OptionPrefixes,
    consumption: ValueConsumption,
}

impl<'p> Matcher<'p> {
    pub fn new(prefixes: &'p OptionPrefixes, consumption: ValueConsumption) -> Self {
        Self {
            prefixes,
            consumption,
        }
    }

    /// Matches `tokens` against `set`, returning `None` if a required scheme
    /// is missing or a found scheme cannot take its value.
    pub fn match_set<S: AsRef<str>>(
        &self,
        set: &CompiledArgumentSet,
        tokens: &[S],
    ) -> Option<SetMatch> {
        let mut working: Vec<String> = tokens.iter().map(|t| t.as_ref().to_string()).collect();
        let mut arguments = Vec::with_capacity(set.schemes().len());

        for scheme in set.schemes() {
            let Some(argument) = self.match_scheme(scheme, &mut working) else {
                trace!(scheme = scheme.name(), "scheme not satisfied");
                return None;
            };
            arguments.push(argument);
        }

        Some(SetMatch {
            arguments,
            unknown: working,
        })
    }

    fn match_scheme(
        &self,
        scheme: &CompiledScheme,
        working: &mut Vec<String>,
    ) -> Option<ArgumentMatch> {
        let Some(index) = self.find_identifier(scheme, working) else {
            return scheme.is_optional().then(|| ArgumentMatch::absent(scheme));
        };

        let (values, captured) = match scheme.arity() {
            ValueArity::None => (Vec::new(), 0),
            ValueArity::Single => match working.get(index + 1) {
                Some(next) if !self.prefixes.is_option(next) && scheme.accepts_value(next) => {
                    (vec![next.clone()], 1)
                }
                _ if scheme.has_optional_values() => (Vec::new(), 0),
                _ => return None,
            },
            ValueArity::List => {
                let values: Vec<String> = working[index + 1..]
                    .iter()
                    .take_while(|token| !self.prefixes.is_option(token))
                    .cloned()
                    .collect();
                if values.is_empty() && !scheme.has_optional_values() {
                    return None;
                }
                let captured = values.len();
                (values, captured)
            }
        };

        let removed = match self.consumption {
            ValueConsumption::IdentifierOnly => 1,
            ValueConsumption::Span => 1 + captured,
        };
        let token = working.drain(index..index + removed).next()?;
        trace!(scheme = scheme.name(), token = %token, values = ?values, "scheme matched");

        Some(ArgumentMatch::found(scheme, &token, values))
    }

    /// Position of the first token naming one of the scheme's aliases.
    fn find_identifier(&self, scheme: &CompiledScheme, working: &[String]) -> Option<usize> {
        working.iter().position(|token| match self.prefixes.strip(token) {
            Some(alias) => scheme.accepts(alias),
            None => scheme.accepts(token),
        })
    }
}
