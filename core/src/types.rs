//! Compiled scheme types and match results.
//!
//! A descriptor such as `install, -p[ackage]:"list, (-f[orce])` compiles
//! into a [`CompiledArgumentSet`]: an ordered list of [`CompiledScheme`]s,
//! the first of which is always the command. Compiled sets are immutable;
//! every successful match produces a fresh [`SetMatch`] carrying the values
//! captured for each scheme and the tokens nothing recognized.

use serde::{Deserialize, Serialize};

/// How many value tokens follow a matched identifier.
///
/// # Examples
///
/// ```
/// use argscheme_core::ValueArity;
///
/// assert_eq!(ValueArity::default(), ValueArity::None);
/// assert!(ValueArity::List.takes_value());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueArity {
    /// Flag, takes no value.
    #[default]
    None,
    /// Exactly one following value token.
    Single,
    /// One or more following value tokens, up to the next option token.
    List,
}

impl ValueArity {
    /// Returns `true` for [`Single`](Self::Single) and [`List`](Self::List).
    pub fn takes_value(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Compiled description of one identifier group (command or parameter).
///
/// Aliases are insertion ordered and never empty; the first alias is the
/// scheme's display name. `allowed_values` is only ever non-empty for
/// [`ValueArity::Single`].
///
/// # Examples
///
/// ```
/// use argscheme_core::{SchemeCompiler, ValueArity};
///
/// let set = SchemeCompiler::default().compile("run, (-v[erbose])").unwrap();
/// let verbose = &set.schemes()[1];
/// assert_eq!(verbose.aliases(), ["v", "verbose"]);
/// assert_eq!(verbose.arity(), ValueArity::None);
/// assert!(verbose.is_optional());
/// assert!(!verbose.is_command());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SchemeFields")]
pub struct CompiledScheme {
    aliases: Vec<String>,
    arity: ValueArity,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    allowed_values: Vec<String>,
    optional_values: bool,
    optional: bool,
    command: bool,
}

impl CompiledScheme {
    pub(crate) fn new(
        aliases: Vec<String>,
        arity: ValueArity,
        allowed_values: Vec<String>,
        optional_values: bool,
        optional: bool,
        command: bool,
    ) -> Self {
        debug_assert!(!aliases.is_empty());
        debug_assert!(allowed_values.is_empty() || arity == ValueArity::Single);
        Self {
            aliases,
            arity,
            allowed_values,
            optional_values,
            optional,
            command,
        }
    }

    /// Returns the first alias.
    pub fn name(&self) -> &str {
        &self.aliases[0]
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn arity(&self) -> ValueArity {
        self.arity
    }

    /// Literal values accepted for a single value; empty means unrestricted.
    pub fn allowed_values(&self) -> &[String] {
        &self.allowed_values
    }

    /// Whether the scheme may match without a value even though its arity
    /// takes one.
    pub fn has_optional_values(&self) -> bool {
        self.optional_values
    }

    /// Whether the scheme may be absent from the argument line.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_command(&self) -> bool {
        self.command
    }

    /// Returns `true` if `alias` is one of this scheme's identifiers.
    pub fn accepts(&self, alias: &str) -> bool {
        self.aliases.iter().any(|a| a == alias)
    }

    /// Returns `true` if `value` satisfies the allowed-value restriction.
    ///
    /// # Examples
    ///
    /// ```
    /// use argscheme_core::SchemeCompiler;
    ///
    /// let set = SchemeCompiler::default().compile("build, -mode:debug|release").unwrap();
    /// let mode = &set.schemes()[1];
    /// assert!(mode.accepts_value("release"));
    /// assert!(!mode.accepts_value("profile"));
    /// ```
    pub fn accepts_value(&self, value: &str) -> bool {
        self.allowed_values.is_empty() || self.allowed_values.iter().any(|v| v == value)
    }
}

/// A compiled argument set: the command scheme followed by its parameter
/// schemes, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SetFields")]
pub struct CompiledArgumentSet {
    descriptor: String,
    schemes: Vec<CompiledScheme>,
}

/// Unchecked wire form of [`CompiledScheme`].
#[derive(Deserialize)]
struct SchemeFields {
    aliases: Vec<String>,
    arity: ValueArity,
    #[serde(default)]
    allowed_values: Vec<String>,
    #[serde(default)]
    optional_values: bool,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    command: bool,
}

impl TryFrom<SchemeFields> for CompiledScheme {
    type Error = String;

    fn try_from(fields: SchemeFields) -> Result<Self, Self::Error> {
        if fields.aliases.is_empty() {
            return Err("scheme has no aliases".to_string());
        }
        if !fields.allowed_values.is_empty() && fields.arity != ValueArity::Single {
            return Err(format!(
                "scheme `{}` lists allowed values but does not take a single value",
                fields.aliases[0]
            ));
        }
        Ok(Self::new(
            fields.aliases,
            fields.arity,
            fields.allowed_values,
            fields.optional_values,
            fields.optional,
            fields.command,
        ))
    }
}

/// Unchecked wire form of [`CompiledArgumentSet`].
#[derive(Deserialize)]
struct SetFields {
    descriptor: String,
    schemes: Vec<CompiledScheme>,
}

impl TryFrom<SetFields> for CompiledArgumentSet {
    type Error = String;

    fn try_from(fields: SetFields) -> Result<Self, Self::Error> {
        match fields.schemes.first() {
            None => Err(format!("argument set `{}` has no schemes", fields.descriptor)),
            Some(first) if !first.is_command() => Err(format!(
                "argument set `{}` does not start with its command",
                fields.descriptor
            )),
            Some(_) => Ok(Self::new(&fields.descriptor, fields.schemes)),
        }
    }
}

impl CompiledArgumentSet {
    pub(crate) fn new(descriptor: &str, schemes: Vec<CompiledScheme>) -> Self {
        debug_assert!(!schemes.is_empty());
        Self {
            descriptor: descriptor.to_string(),
            schemes,
        }
    }

    /// The descriptor text this set was compiled from.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    pub fn schemes(&self) -> &[CompiledScheme] {
        &self.schemes
    }

    /// The command scheme (always the first scheme).
    pub fn command(&self) -> &CompiledScheme {
        &self.schemes[0]
    }

    /// The parameter schemes following the command.
    pub fn parameters(&self) -> &[CompiledScheme] {
        &self.schemes[1..]
    }

    /// Returns the first command alias shared with `other`, if any.
    pub fn shared_command_alias<'a>(&'a self, other: &CompiledArgumentSet) -> Option<&'a str> {
        self.command()
            .aliases()
            .iter()
            .find(|alias| other.command().accepts(alias))
            .map(String::as_str)
    }
}

/// Outcome for a single scheme within a successful [`SetMatch`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentMatch {
    /// Aliases of the scheme this entry belongs to.
    pub aliases: Vec<String>,
    /// Identifier token as written on the line; `None` when an optional
    /// scheme was absent.
    pub token: Option<String>,
    /// Captured values (empty for flags and for optional values that were
    /// not supplied).
    pub values: Vec<String>,
}

impl ArgumentMatch {
    pub(crate) fn absent(scheme: &CompiledScheme) -> Self {
        Self {
            aliases: scheme.aliases().to_vec(),
            token: None,
            values: Vec::new(),
        }
    }

    pub(crate) fn found(scheme: &CompiledScheme, token: &str, values: Vec<String>) -> Self {
        Self {
            aliases: scheme.aliases().to_vec(),
            token: Some(token.to_string()),
            values,
        }
    }

    pub fn name(&self) -> &str {
        self.aliases.first().map(String::as_str).unwrap_or_default()
    }

    pub fn is_present(&self) -> bool {
        self.token.is_some()
    }
}

/// Result of matching one argument set against a token list.
///
/// # Examples
///
/// ```
/// use argscheme_core::Validator;
///
/// let mut validator = Validator::new(true);
/// validator.add_set("copy, -from:\"s, -to:\"s", |_| {}).unwrap();
///
/// let report = validator.validate(&["copy", "-from", "a.txt", "-to", "b.txt"]);
/// let matched = &report.matches()[0].matched;
/// assert_eq!(matched.value("from"), Some("a.txt"));
/// assert_eq!(matched.value("to"), Some("b.txt"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetMatch {
    /// One entry per scheme, command first.
    pub arguments: Vec<ArgumentMatch>,
    /// Tokens left over once every scheme was resolved.
    pub unknown: Vec<String>,
}

impl SetMatch {
    /// Display name of the matched command.
    pub fn command(&self) -> &str {
        self.arguments.first().map(ArgumentMatch::name).unwrap_or_default()
    }

    /// Looks up the entry for the scheme that owns `alias`.
    pub fn get(&self, alias: &str) -> Option<&ArgumentMatch> {
        self.arguments
            .iter()
            .find(|arg| arg.aliases.iter().any(|a| a == alias))
    }

    /// Returns `true` if the scheme owning `alias` appeared on the line.
    pub fn is_present(&self, alias: &str) -> bool {
        self.get(alias).is_some_and(ArgumentMatch::is_present)
    }

    /// First captured value of the scheme owning `alias`.
    pub fn value(&self, alias: &str) -> Option<&str> {
        self.get(alias)
            .and_then(|arg| arg.values.first())
            .map(String::as_str)
    }

    /// All captured values of the scheme owning `alias`.
    pub fn values(&self, alias: &str) -> &[String] {
        self.get(alias).map(|arg| arg.values.as_slice()).unwrap_or(&[])
    }

    pub fn unknown_tokens(&self) -> &[String] {
        &self.unknown
    }
}
