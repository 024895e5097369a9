//! Option prefix handling.
//!
//! Prefixes are kept longest-first so that `--flag` resolves through `--`
//! rather than through `-` with a residual `-flag`.

use serde::{Deserialize, Serialize};

/// Prefixes used when no custom list is configured, in declaration order.
pub const DEFAULT_OPTION_PREFIXES: [&str; 3] = ["-", "--", "/"];

/// An ordered set of option prefixes, longest first.
///
/// # Examples
///
/// ```
/// use argscheme_core::OptionPrefixes;
///
/// let prefixes = OptionPrefixes::default();
/// assert_eq!(prefixes.as_slice(), ["--", "-", "/"]);
/// assert_eq!(prefixes.strip("--flag"), Some("flag"));
/// assert_eq!(prefixes.strip("-f"), Some("f"));
/// assert_eq!(prefixes.strip("flag"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct OptionPrefixes {
    prefixes: Vec<String>,
}

impl OptionPrefixes {
    /// Builds a prefix list, dropping empty and duplicate entries.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for prefix in prefixes {
            let prefix = prefix.into();
            if !prefix.is_empty() && !ordered.contains(&prefix) {
                ordered.push(prefix);
            }
        }
        // Stable: equal-length prefixes keep their declaration order.
        ordered.sort_by(|a, b| b.len().cmp(&a.len()));
        Self { prefixes: ordered }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.prefixes
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Returns the longest prefix `token` starts with.
    pub fn matching(&self, token: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|prefix| token.starts_with(prefix.as_str()))
            .map(String::as_str)
    }

    /// Returns `true` if `token` starts with any configured prefix.
    pub fn is_option(&self, token: &str) -> bool {
        self.matching(token).is_some()
    }

    /// Returns the remainder of `token` after its longest matching prefix.
    pub fn strip<'t>(&self, token: &'t str) -> Option<&'t str> {
        self.matching(token).map(|prefix| &token[prefix.len()..])
    }
}

impl Default for OptionPrefixes {
    fn default() -> Self {
        Self::new(DEFAULT_OPTION_PREFIXES)
    }
}

impl From<Vec<String>> for OptionPrefixes {
    fn from(prefixes: Vec<String>) -> Self {
        Self::new(prefixes)
    }
}

impl From<OptionPrefixes> for Vec<String> {
    fn from(prefixes: OptionPrefixes) -> Self {
        prefixes.prefixes
    }
}
