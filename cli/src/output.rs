//! Output formatting for validation reports, compiled sets and tokens.

use argscheme_core::{
    ArgumentMatch, CompiledArgumentSet, CompiledScheme, Dispatch, ValidationStatus, ValueArity,
};
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Result of a `check` run, as printed.
#[derive(Debug, Serialize)]
pub struct CheckOutput<'a> {
    pub valid: bool,
    pub status: ValidationStatus,
    pub tokens: &'a [String],
    /// Names of the sets whose handler ran, in the order they ran.
    pub triggered: Vec<String>,
    pub matches: Vec<MatchOutput<'a>>,
}

#[derive(Debug, Serialize)]
pub struct MatchOutput<'a> {
    pub set: &'a str,
    pub dispatch: Dispatch,
    pub arguments: &'a [ArgumentMatch],
    pub unknown: &'a [String],
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<Option<String>, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(Some)
            .map_err(|e| format!("JSON serialization failed: {e}")),
        OutputFormat::Yaml => serde_yaml::to_string(value)
            .map(Some)
            .map_err(|e| format!("YAML serialization failed: {e}")),
        OutputFormat::Text => Ok(None),
    }
}

/// Formats a check result in the requested output format.
pub fn format_check(output: &CheckOutput<'_>, format: OutputFormat) -> Result<String, String> {
    match serialize(output, format)? {
        Some(raw) => Ok(raw),
        None => Ok(check_to_text(output)),
    }
}

/// Formats compiled sets in the requested output format.
pub fn format_sets(sets: &[CompiledArgumentSet], format: OutputFormat) -> Result<String, String> {
    match serialize(&sets, format)? {
        Some(raw) => Ok(raw),
        None => Ok(sets.iter().map(set_to_text).collect::<Vec<_>>().join("\n")),
    }
}

/// Formats a token list in the requested output format.
pub fn format_tokens(tokens: &[String], format: OutputFormat) -> Result<String, String> {
    match serialize(&tokens, format)? {
        Some(raw) => Ok(raw),
        None => Ok(tokens.join("\n")),
    }
}

fn status_label(status: ValidationStatus) -> &'static str {
    match status {
        ValidationStatus::Triggered => "triggered",
        ValidationStatus::UnknownTokens => "unknown tokens",
        ValidationStatus::NoMatch => "no match",
    }
}

fn check_to_text(output: &CheckOutput<'_>) -> String {
    let mut out = format!("status: {}\n", status_label(output.status));

    for matched in &output.matches {
        let dispatch = match matched.dispatch {
            Dispatch::Triggered => "triggered",
            Dispatch::Suppressed => "suppressed",
        };
        out.push_str(&format!("set {} ({dispatch})\n", matched.set));

        for argument in matched.arguments {
            let detail = match (&argument.token, argument.values.is_empty()) {
                (None, _) => "absent".to_string(),
                (Some(token), true) => token.clone(),
                (Some(token), false) => format!("{token} {}", argument.values.join(", ")),
            };
            out.push_str(&format!("  {}: {detail}\n", argument.name()));
        }

        if !matched.unknown.is_empty() {
            out.push_str(&format!("  unknown: {}\n", matched.unknown.join(", ")));
        }
    }

    out
}

fn arity_label(arity: ValueArity) -> &'static str {
    match arity {
        ValueArity::None => "none",
        ValueArity::Single => "single",
        ValueArity::List => "list",
    }
}

fn scheme_to_text(scheme: &CompiledScheme) -> String {
    let role = if scheme.is_command() { "command" } else { "param" };
    let mut line = format!(
        "{role:<8} {:<24} {:<6}",
        scheme.aliases().join("|"),
        arity_label(scheme.arity())
    );
    if !scheme.allowed_values().is_empty() {
        line.push_str(&format!(" values={}", scheme.allowed_values().join("|")));
    }
    if scheme.has_optional_values() {
        line.push_str(" optional-value");
    }
    if scheme.is_optional() {
        line.push_str(" optional");
    }
    line.trim_end().to_string()
}

fn set_to_text(set: &CompiledArgumentSet) -> String {
    let mut out = format!("# {}\n", set.descriptor());
    for scheme in set.schemes() {
        out.push_str(&scheme_to_text(scheme));
        out.push('\n');
    }
    out
}
