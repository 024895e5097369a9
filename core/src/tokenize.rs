//! Argument line tokenizer.
//!
//! Splits a raw line on whitespace and commas. A double-quoted run with at
//! least one character becomes a single token holding the unquoted text.
//! An unterminated or empty quote is not an error: the quote characters are
//! kept as ordinary characters of an unquoted token.

/// Lazy iterator over the tokens of an argument line.
///
/// The iterator is `Clone`, so a tokenization can be restarted from any
/// point; calling [`tokenize`] again restarts it from the beginning.
///
/// # Examples
///
/// ```
/// use argscheme_core::tokenize;
///
/// let tokens: Vec<&str> = tokenize(r#"install -p foo, "bar baz" -f"#).collect();
/// assert_eq!(tokens, ["install", "-p", "foo", "bar baz", "-f"]);
/// ```
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    line: &'a str,
    pos: usize,
}

/// Tokenizes `line`.
pub fn tokenize(line: &str) -> Tokens<'_> {
    Tokens { line, pos: 0 }
}

/// Tokenizes `line` into owned strings.
pub fn tokenize_owned(line: &str) -> Vec<String> {
    tokenize(line).map(str::to_string).collect()
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = &self.line[self.pos..];
        let start = rest.find(|c: char| !is_separator(c))?;
        let rest = &rest[start..];
        self.pos += start;

        if let Some(quoted) = rest.strip_prefix('"') {
            if let Some(end) = quoted.find('"') {
                if end > 0 {
                    self.pos += end + 2;
                    return Some(&quoted[..end]);
                }
            }
        }

        let len = rest.find(is_separator).unwrap_or(rest.len());
        self.pos += len;
        Some(&rest[..len])
    }
}
