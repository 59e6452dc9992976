//! Loosely-typed provisioner settings.
//!
//! Several settings accept more than one YAML shape (`extra_vars` may be a
//! mapping or a file path, `raw_arguments` may be a string or a list).
//! Each is modelled as a tagged union. Shapes that are not accepted are kept
//! verbatim in an `Invalid` variant so that loading never fails on them and
//! the validator can report the offending type and value.

use std::fmt::Write;

use camino::Utf8PathBuf;
use serde_yaml::{Mapping, Value};

use crate::serde_helpers::impl_loose_value_serde;

/// Returns the YAML type name of a value, as reported in diagnostics.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}

/// Renders a value on a single line using YAML flow syntax.
///
/// A top-level string is rendered verbatim; nested strings are quoted.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => {
            let mut out = String::new();
            write_flow(&mut out, other);
            out
        }
    }
}

fn write_flow(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => {
            let _ = write!(out, "{}", b);
        }
        Value::Number(n) => {
            let _ = write!(out, "{}", n);
        }
        Value::String(s) => {
            let _ = write!(out, "{:?}", s);
        }
        Value::Sequence(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_flow(out, item);
            }
            out.push(']');
        }
        Value::Mapping(map) => {
            out.push('{');
            for (index, (key, item)) in map.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_flow(out, key);
                out.push_str(": ");
                write_flow(out, item);
            }
            out.push('}');
        }
        Value::Tagged(tagged) => {
            let _ = write!(out, "{} ", tagged.tag);
            write_flow(out, &tagged.value);
        }
    }
}

/// Supplementary variables for the run.
///
/// - mapping → `Inline`
/// - string → `File` (path to a vars file)
/// - anything else → `Invalid`
#[derive(Debug, Clone, PartialEq)]
pub enum ExtraVars {
    /// Variables given inline.
    Inline(Mapping),
    /// Path to a file holding the variables.
    File(Utf8PathBuf),
    /// Unsupported shape, kept for diagnostics.
    Invalid(Value),
}

impl_loose_value_serde!(
    ExtraVars,
    expecting: "a mapping or a path to a vars file",
    classify(value) {
        match value {
            Value::Mapping(map) => ExtraVars::Inline(map),
            Value::String(path) => ExtraVars::File(Utf8PathBuf::from(path)),
            other => ExtraVars::Invalid(other),
        }
    },
    to_value(this) {
        match this {
            ExtraVars::Inline(map) => Value::Mapping(map.clone()),
            ExtraVars::File(path) => Value::String(path.to_string()),
            ExtraVars::Invalid(value) => value.clone(),
        }
    }
);


/// Extra command-line arguments passed verbatim to the external tool.
///
/// - string → `Line` (split into tokens when the config is finalized)
/// - sequence of strings → `List`
/// - anything else → `Invalid`
#[derive(Debug, Clone, PartialEq)]
pub enum RawArguments {
    /// A single whitespace-separated argument line.
    Line(String),
    /// Individual arguments.
    List(Vec<String>),
    /// Unsupported shape, kept for diagnostics.
    Invalid(Value),
}

impl_loose_value_serde!(
    RawArguments,
    expecting: "a string or a list of strings",
    classify(value) {
        match value {
            Value::String(line) => RawArguments::Line(line),
            Value::Sequence(items) if items.iter().all(Value::is_string) => RawArguments::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(arg) => Some(arg),
                        _ => None,
                    })
                    .collect(),
            ),
            other => RawArguments::Invalid(other),
        }
    },
    to_value(this) {
        match this {
            RawArguments::Line(line) => Value::String(line.clone()),
            RawArguments::List(args) => {
                Value::Sequence(args.iter().cloned().map(Value::String).collect())
            }
            RawArguments::Invalid(value) => value.clone(),
        }
    }
);

impl RawArguments {
    /// Splits an argument line into whitespace-delimited tokens.
    ///
    /// `List` and `Invalid` are returned unchanged.
    pub fn into_list(self) -> Self {
        match self {
            Self::Line(line) => Self::List(line.split_whitespace().map(str::to_string).collect()),
            other => other,
        }
    }

    /// Returns the arguments if they are in canonical list form.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(args) => Some(args),
            _ => None,
        }
    }
}

/// A boolean setting that only accepts the literals `true` and `false`.
///
/// Strings such as `"true"` or integers are kept as `Invalid`.
#[derive(Debug, Clone, PartialEq)]
pub enum StrictBool {
    /// A real boolean literal.
    Bool(bool),
    /// Any other literal, kept for diagnostics.
    Invalid(Value),
}

impl_loose_value_serde!(
    StrictBool,
    expecting: "true or false",
    classify(value) {
        match value {
            Value::Bool(b) => StrictBool::Bool(b),
            other => StrictBool::Invalid(other),
        }
    },
    to_value(this) {
        match this {
            StrictBool::Bool(b) => Value::Bool(*b),
            StrictBool::Invalid(value) => value.clone(),
        }
    }
);

impl StrictBool {
    /// Returns the boolean, or `None` for a non-boolean literal.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Invalid(_) => None,
        }
    }
}
