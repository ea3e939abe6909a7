//! Variable scope and expression resolution.
//!
//! A [`Scope`] is a stack of frames, innermost last.  The root frame lives as
//! long as the script run; `if` blocks push a child frame for their body.
//! Lookups walk from the innermost frame outward, so inner bindings shadow
//! outer ones.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::trace;

use super::{
    calc::Precedence,
    error::{GordianError, Result},
    scan::{is_identifier, is_wrapped},
    value::{parse_number, Value},
};

#[derive(Debug)]
pub struct Scope {
    frames: Vec<HashMap<String, Value>>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    /// A root scope with one empty frame.
    pub fn new() -> Self {
        Scope {
            frames: vec![HashMap::new()],
        }
    }

    /// Number of frames, including the root.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Enter a child scope.
    pub fn push_frame(&mut self) {
        self.frames.push(HashMap::new());
    }

    /// Leave the innermost child scope, dropping its bindings.
    ///
    /// The root frame is never popped; returns `false` if asked to.
    pub fn pop_frame(&mut self) -> bool {
        if self.frames.len() > 1 {
            self.frames.pop();
            true
        } else {
            false
        }
    }

    /// Bind `name` in the innermost frame, shadowing any outer binding.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name.into(), value);
        }
    }

    /// Rebind `name` where it already lives, or bind it in the innermost
    /// frame when it is new.  This is what a script's `name = expr` does.
    pub fn assign(&mut self, name: &str, value: Value) {
        if let Some(frame) = self
            .frames
            .iter_mut()
            .rev()
            .find(|frame| frame.contains_key(name))
        {
            frame.insert(name.to_owned(), value);
        } else {
            self.bind(name, value);
        }
    }

    /// Look up a variable, innermost frame first.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Resolve an expression substring to a [`Value`].
    ///
    /// Strategies, first match wins:
    /// 1. numeric literal
    /// 2. `"text"` or `true`/`false` literal
    /// 3. variable (an unbound identifier is [`GordianError::UndefinedVariable`])
    /// 4. parenthesized group
    /// 5. binary calculation, weakest precedence level first
    /// 6. prefix `-` (negate a number) or `!` (invert a boolean)
    ///
    /// When nothing matches but an operand named an unbound variable, that
    /// variable is reported instead of the whole expression.
    pub fn resolve(&self, expr: &str) -> Result<Value> {
        let resolver = Resolver::new(self);
        match resolver.resolve(expr) {
            Err(GordianError::Unresolvable(text)) => Err(match resolver.undefined.take() {
                Some(name) => GordianError::UndefinedVariable(name),
                None => GordianError::Unresolvable(text),
            }),
            other => other,
        }
    }
}

/// State for one top-level [`Scope::resolve`] call.
///
/// Operand substrings tried while searching for a split are resolved once
/// each; later attempts on the same text reuse the outcome.
pub(crate) struct Resolver<'s> {
    scope: &'s Scope,
    operands: RefCell<HashMap<String, Option<Value>>>,
    undefined: RefCell<Option<String>>,
}

impl<'s> Resolver<'s> {
    pub(crate) fn new(scope: &'s Scope) -> Self {
        Resolver {
            scope,
            operands: RefCell::new(HashMap::new()),
            undefined: RefCell::new(None),
        }
    }

    fn resolve(&self, expr: &str) -> Result<Value> {
        let expr = expr.trim();
        trace!(expr, "resolve");

        if expr.is_empty() {
            return Err(GordianError::Unresolvable(String::new()));
        }

        if let Some(x) = parse_number(expr) {
            return Ok(Value::Number(x));
        }
        if let Some(text) = text_literal(expr) {
            return Ok(Value::Text(text.to_owned()));
        }
        match expr {
            "true" => return Ok(Value::Boolean(true)),
            "false" => return Ok(Value::Boolean(false)),
            _ => {}
        }

        if is_identifier(expr) {
            return self
                .scope
                .lookup(expr)
                .cloned()
                .ok_or_else(|| GordianError::UndefinedVariable(expr.to_owned()));
        }

        if is_wrapped(expr) {
            return self.resolve(&expr[1..expr.len() - 1]);
        }

        for level in Precedence::LEVELS {
            if let Some((calc, split)) = level.find_split(self, expr) {
                return calc.apply(&split.left, &split.right);
            }
        }

        if let Some(v) = expr.strip_prefix('-').and_then(|operand| self.operand(operand)) {
            return Ok(Value::Number(-v.as_number()?));
        }
        if let Some(v) = expr.strip_prefix('!').and_then(|operand| self.operand(operand)) {
            return Ok(Value::Boolean(!v.as_boolean()?));
        }

        Err(GordianError::Unresolvable(expr.to_owned()))
    }

    /// Resolve a candidate operand, or `None` if it does not resolve.
    pub(crate) fn operand(&self, expr: &str) -> Option<Value> {
        let expr = expr.trim();
        if let Some(known) = self.operands.borrow().get(expr) {
            return known.clone();
        }
        let outcome = match self.resolve(expr) {
            Ok(value) => Some(value),
            Err(GordianError::UndefinedVariable(name)) => {
                self.undefined.borrow_mut().get_or_insert(name);
                None
            }
            Err(_) => None,
        };
        self.operands
            .borrow_mut()
            .insert(expr.to_owned(), outcome.clone());
        outcome
    }
}

/// The contents of `"…"` when `s` is a single quoted string.
fn text_literal(s: &str) -> Option<&str> {
    let inner = s.strip_prefix('"')?.strip_suffix('"')?;
    (!inner.contains('"')).then_some(inner)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
