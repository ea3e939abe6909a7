//! Runtime value type for Gordian scripts.
//!
//! Every resolved expression is one of three variants.  Values never coerce
//! implicitly: asking a [`Value::Text`] for a number is a
//! [`GordianError::TypeMismatch`], and the caller decides what to do about it.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::error::{GordianError, Result};

static NUMBER_LITERAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
        .expect("number literal pattern is valid")
});

/// Parse `s` as a decimal numeric literal (`12`, `-0.5`, `.25`, `1e-3`).
///
/// Words `f64::from_str` would otherwise accept (`inf`, `NaN`) are rejected
/// so they remain available as variable names.
pub fn parse_number(s: &str) -> Option<f64> {
    if NUMBER_LITERAL.is_match(s) {
        s.parse().ok()
    } else {
        None
    }
}

/// A resolved Gordian value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(x) => {
                if x.fract() == 0.0 && x.abs() < 1e15 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{x}")
                }
            }
            Value::Text(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl Value {
    pub fn as_number(&self) -> Result<f64> {
        match self {
            Value::Number(x) => Ok(*x),
            other => Err(other.mismatch("number")),
        }
    }

    pub fn as_text(&self) -> Result<&str> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(other.mismatch("text")),
        }
    }

    pub fn as_boolean(&self) -> Result<bool> {
        match self {
            Value::Boolean(b) => Ok(*b),
            other => Err(other.mismatch("boolean")),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Boolean(_) => "boolean",
        }
    }

    /// Convert a raw setting string (e.g. a properties-file value).
    ///
    /// Numeric literals become numbers, `true`/`false` become booleans and
    /// anything else is kept as text.
    pub fn parse_setting(raw: &str) -> Value {
        let raw = raw.trim();
        if let Some(x) = parse_number(raw) {
            return Value::Number(x);
        }
        match raw {
            "true" => Value::Boolean(true),
            "false" => Value::Boolean(false),
            _ => Value::Text(raw.to_owned()),
        }
    }

    fn mismatch(&self, expected: &'static str) -> GordianError {
        GordianError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
