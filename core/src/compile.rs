//! Descriptor compiler.
//!
//! Turns an argument-set descriptor into a [`CompiledArgumentSet`]. The
//! grammar, informally:
//!
//! ```text
//! set        := descriptor (',' descriptor)*
//! descriptor := '(' body ')' | body          outer parens: argument optional
//! body       := aliasExpr ((':' | '=') valueExpr)?
//! aliasExpr  := aliasPart ('|' aliasPart)*
//! aliasPart  := PREFIX? (WORD | WORD '[' WORD ']' WORD? | '[' WORD ']' WORD)
//! valueExpr  := '(' valueBody ')' | valueBody   outer parens: value optional
//! valueBody  := '"list' | '"l' | '"single' | '"s' | literal ('|' literal)*
//! ```
//!
//! `PREFIX` is any configured option prefix; it is dropped, so `-v` and
//! `v` describe the same alias. Keywords are case-insensitive. Literals are
//! runs of word characters, spaces and `"`, compared verbatim at match time.

use tracing::debug;

use crate::error::{Result, SchemeError};
use crate::identifier::{expand_alternatives, is_word_char};
use crate::prefix::OptionPrefixes;
use crate::types::{CompiledArgumentSet, CompiledScheme, ValueArity};

/// Compiles descriptors against a set of option prefixes.
///
/// # Examples
///
/// ```
/// use argscheme_core::{SchemeCompiler, ValueArity};
///
/// let compiler = SchemeCompiler::default();
/// let set = compiler.compile(r#"[un]install, -p[ackage]:"list, (-f[orce])"#).unwrap();
///
/// assert_eq!(set.command().aliases(), ["install", "uninstall"]);
/// assert_eq!(set.schemes()[1].arity(), ValueArity::List);
/// assert!(set.schemes()[2].is_optional());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemeCompiler {
    prefixes: OptionPrefixes,
}

impl SchemeCompiler {
    pub fn new(prefixes: OptionPrefixes) -> Self {
        Self { prefixes }
    }

    pub fn prefixes(&self) -> &OptionPrefixes {
        &self.prefixes
    }

    /// Compiles a full set descriptor. The first comma-separated part is the
    /// command; every other part is a parameter.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::EmptyScheme`] for a blank descriptor and
    /// [`SchemeError::Grammar`] naming the first part that does not follow
    /// the grammar.
    pub fn compile(&self, descriptor: &str) -> Result<CompiledArgumentSet> {
        let descriptor = descriptor.trim();
        if descriptor.is_empty() {
            return Err(SchemeError::EmptyScheme);
        }

        let schemes = descriptor
            .split(',')
            .enumerate()
            .map(|(index, part)| self.compile_scheme(part.trim(), index == 0))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            descriptor,
            command = schemes[0].name(),
            parameters = schemes.len() - 1,
            "compiled argument set"
        );
        Ok(CompiledArgumentSet::new(descriptor, schemes))
    }

    /// Compiles a single argument descriptor.
    ///
    /// # Examples
    ///
    /// ```
    /// use argscheme_core::{SchemeCompiler, ValueArity};
    ///
    /// let scheme = SchemeCompiler::default()
    ///     .compile_scheme("(--level=(low|high))", false)
    ///     .unwrap();
    /// assert_eq!(scheme.aliases(), ["level"]);
    /// assert_eq!(scheme.arity(), ValueArity::Single);
    /// assert_eq!(scheme.allowed_values(), ["low", "high"]);
    /// assert!(scheme.is_optional());
    /// assert!(scheme.has_optional_values());
    /// ```
    pub fn compile_scheme(&self, descriptor: &str, command: bool) -> Result<CompiledScheme> {
        let (optional, body) = unwrap_parens(descriptor);

        let (alias_expr, value_clause) = match body.find(':').or_else(|| body.find('=')) {
            Some(split) => (&body[..split], Some(&body[split + 1..])),
            None => (body, None),
        };

        let aliases = expand_alternatives(alias_expr, |part| {
            self.prefixes.strip(part).unwrap_or(part)
        })
        .map_err(|reason| SchemeError::grammar(descriptor, reason))?;

        let value = match value_clause {
            Some(clause) => parse_value_clause(clause)
                .map_err(|reason| SchemeError::grammar(descriptor, reason))?,
            None => ValueScheme::default(),
        };

        Ok(CompiledScheme::new(
            aliases,
            value.arity,
            value.allowed,
            value.optional,
            optional,
            command,
        ))
    }
}

#[derive(Debug, Default, PartialEq)]
struct ValueScheme {
    arity: ValueArity,
    allowed: Vec<String>,
    optional: bool,
}

/// Strips one pair of enclosing parentheses.
fn unwrap_parens(text: &str) -> (bool, &str) {
    if text.len() > 1 && text.starts_with('(') && text.ends_with(')') {
        (true, &text[1..text.len() - 1])
    } else {
        (false, text)
    }
}

fn is_literal_char(c: char) -> bool {
    is_word_char(c) || c == ' ' || c == '"'
}

fn parse_value_clause(clause: &str) -> std::result::Result<ValueScheme, String> {
    let (optional, body) = unwrap_parens(clause);
    if body.is_empty() {
        return Err("empty value clause".to_string());
    }

    let arity = match body.to_lowercase().as_str() {
        "\"list" | "\"l" => Some(ValueArity::List),
        "\"single" | "\"s" => Some(ValueArity::Single),
        _ => None,
    };
    if let Some(arity) = arity {
        return Ok(ValueScheme {
            arity,
            allowed: Vec::new(),
            optional,
        });
    }

    let mut allowed: Vec<String> = Vec::new();
    for literal in body.split('|') {
        if literal.is_empty() {
            return Err(format!("empty literal in value clause `{clause}`"));
        }
        if !literal.chars().all(is_literal_char) {
            return Err(format!("unexpected character in value literal `{literal}`"));
        }
        if !allowed.iter().any(|v| v == literal) {
            allowed.push(literal.to_string());
        }
    }

    Ok(ValueScheme {
        arity: ValueArity::Single,
        allowed,
        optional,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(descriptor: &str) -> Result<CompiledArgumentSet> {
        SchemeCompiler::default().compile(descriptor)
    }

    #[test]
    fn test_first_part_is_the_command() {
        let set = compile("run, -v").unwrap();
        assert!(set.command().is_command());
        assert_eq!(set.command().aliases(), ["run"]);
        assert!(!set.schemes()[1].is_command());
        assert_eq!(set.parameters().len(), 1);
    }

    #[test]
    fn test_flag_has_no_value() {
        let set = compile("run,-v").unwrap();
        let flag = &set.schemes()[1];
        assert_eq!(flag.aliases(), ["v"]);
        assert_eq!(flag.arity(), ValueArity::None);
        assert!(flag.allowed_values().is_empty());
        assert!(!flag.has_optional_values());
        assert!(!flag.is_optional());
    }

    #[test]
    fn test_value_keywords_are_case_insensitive() {
        let set = compile(r#"run, a:"LIST, b:"l, c:"Single, d:"s"#).unwrap();
        let arities: Vec<_> = set.parameters().iter().map(|s| s.arity()).collect();
        assert_eq!(
            arities,
            [
                ValueArity::List,
                ValueArity::List,
                ValueArity::Single,
                ValueArity::Single
            ]
        );
        assert!(set.parameters().iter().all(|s| s.allowed_values().is_empty()));
    }

    #[test]
    fn test_literal_values_keep_their_case() {
        let set = compile("run, -mode:Fast|slow").unwrap();
        assert_eq!(set.schemes()[1].allowed_values(), ["Fast", "slow"]);
    }

    #[test]
    fn test_equals_introduces_value_clause() {
        let set = compile("run, level=(\"s)").unwrap();
        let level = &set.schemes()[1];
        assert_eq!(level.arity(), ValueArity::Single);
        assert!(level.has_optional_values());
        assert!(!level.is_optional());
    }

    #[test]
    fn test_colon_takes_precedence_over_equals() {
        let err = compile("run, a=b:c").unwrap_err();
        assert!(matches!(err, SchemeError::Grammar { .. }));
    }

    #[test]
    fn test_prefixed_aliases_are_normalized() {
        let set = compile("run, -v|--verbose|/V").unwrap();
        assert_eq!(set.schemes()[1].aliases(), ["v", "verbose", "V"]);
    }

    #[test]
    fn test_custom_prefixes_are_stripped() {
        let compiler = SchemeCompiler::new(OptionPrefixes::new(["+"]));
        let set = compiler.compile("run, +x").unwrap();
        assert_eq!(set.schemes()[1].aliases(), ["x"]);
        assert!(compiler.compile("run, -x").is_err());
    }

    #[test]
    fn test_blank_descriptor_is_empty_scheme() {
        assert_eq!(compile("").unwrap_err(), SchemeError::EmptyScheme);
        assert_eq!(compile("   ").unwrap_err(), SchemeError::EmptyScheme);
    }

    #[test]
    fn test_grammar_error_names_the_offending_part() {
        match compile("run, -ok, bad!name").unwrap_err() {
            SchemeError::Grammar { descriptor, .. } => assert_eq!(descriptor, "bad!name"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_malformed_descriptors() {
        for descriptor in [
            "run,",
            "run,,x",
            "()",
            "run, x:",
            "run, x:()",
            "run, x:a||b",
            "run, x:a-b",
            "run, ((x))",
            "run, x:((a))",
            ":a",
        ] {
            assert!(
                matches!(compile(descriptor), Err(SchemeError::Grammar { .. })),
                "`{descriptor}` should be rejected"
            );
        }
    }

    #[test]
    fn test_literal_values_may_contain_spaces_and_quotes() {
        let set = compile(r#"say, -msg:hello world|"quoted""#).unwrap();
        assert_eq!(
            set.schemes()[1].allowed_values(),
            ["hello world", "\"quoted\""]
        );
    }

    #[test]
    fn test_parenthesized_command_is_optional() {
        let set = compile("(run), -v").unwrap();
        assert!(set.command().is_command());
        assert!(set.command().is_optional());
        assert_eq!(set.command().aliases(), ["run"]);
    }

    #[test]
    fn test_descriptor_text_is_kept() {
        let set = compile("  run, -v  ").unwrap();
        assert_eq!(set.descriptor(), "run, -v");
    }
}
