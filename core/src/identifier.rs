//! Identifier alias expansion.
//!
//! An alias expression names one option under several spellings. A
//! bracketed segment is optional, so `v[erbose]` stands for both `v` and
//! `verbose`, and `[un]install` for both `install` and `uninstall`.
//! Several expressions may be joined with `|`; the resulting alias set is
//! the union of each part's expansion, in order of first appearance.

use crate::error::{Result, SchemeError};

/// Returns `true` for characters allowed in an identifier word.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub(crate) fn is_word(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_word_char)
}

/// Expands a single alias expression (no `|`) into one or two identifiers.
///
/// Accepted forms are `A`, `A[B]`, `A[B]C` and `[B]A`, where every letter
/// is a word of alphanumeric or underscore characters.
///
/// # Examples
///
/// ```
/// use argscheme_core::expand_identifier;
///
/// assert_eq!(expand_identifier("v[erbose]").unwrap(), ["v", "verbose"]);
/// assert_eq!(expand_identifier("[un]install").unwrap(), ["install", "uninstall"]);
/// assert_eq!(expand_identifier("col[o]ur").unwrap(), ["colur", "colour"]);
/// assert!(expand_identifier("[un]").is_err());
/// ```
pub fn expand_identifier(expr: &str) -> Result<Vec<String>> {
    expand_part(expr).map_err(|reason| SchemeError::grammar(expr, reason))
}

/// Expands a `|`-joined alias expression into its deduplicated alias set.
///
/// # Examples
///
/// ```
/// use argscheme_core::expand_aliases;
///
/// assert_eq!(
///     expand_aliases("h[elp]|usage|help").unwrap(),
///     ["h", "help", "usage"],
/// );
/// assert!(expand_aliases("h[elp]|?").is_err());
/// ```
pub fn expand_aliases(expr: &str) -> Result<Vec<String>> {
    expand_alternatives(expr, |part| part)
        .map_err(|reason| SchemeError::grammar(expr, reason))
}

/// Expands every `|`-separated part after passing it through `normalize`.
pub(crate) fn expand_alternatives<'e>(
    expr: &'e str,
    normalize: impl Fn(&'e str) -> &'e str,
) -> std::result::Result<Vec<String>, String> {
    let mut aliases: Vec<String> = Vec::new();
    for part in expr.split('|') {
        for alias in expand_part(normalize(part))? {
            if !aliases.contains(&alias) {
                aliases.push(alias);
            }
        }
    }
    Ok(aliases)
}

fn expand_part(part: &str) -> std::result::Result<Vec<String>, String> {
    if part.is_empty() {
        return Err("empty identifier".to_string());
    }

    if let Some(bracketed) = part.strip_prefix('[') {
        let (optional, word) = split_bracket(bracketed, part)?;
        if !is_word(word) {
            return Err(format!(
                "identifier `{part}` needs a word after its optional prefix"
            ));
        }
        return Ok(vec![word.to_string(), format!("{optional}{word}")]);
    }

    let head_len = part.find(|c: char| !is_word_char(c)).unwrap_or(part.len());
    let (head, rest) = part.split_at(head_len);
    if rest.is_empty() {
        return Ok(vec![head.to_string()]);
    }

    let Some(bracketed) = rest.strip_prefix('[') else {
        return Err(format!("unexpected character in identifier `{part}`"));
    };
    let (optional, tail) = split_bracket(bracketed, part)?;
    if !tail.is_empty() && !is_word(tail) {
        return Err(format!("unexpected character in identifier `{part}`"));
    }
    Ok(vec![
        format!("{head}{tail}"),
        format!("{head}{optional}{tail}"),
    ])
}

/// Splits `B]rest` into `(B, rest)`, checking `B` is a word.
fn split_bracket<'p>(bracketed: &'p str, part: &str) -> std::result::Result<(&'p str, &'p str), String> {
    let Some(close) = bracketed.find(']') else {
        return Err(format!("unclosed `[` in identifier `{part}`"));
    };
    let optional = &bracketed[..close];
    if !is_word(optional) {
        return Err(format!(
            "optional segment of identifier `{part}` must be a non-empty word"
        ));
    }
    Ok((optional, &bracketed[close + 1..]))
}
