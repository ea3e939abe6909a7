//! Command dispatch: how non-assignment statements reach the host.
//!
//! The runner hands every command statement, verbatim, to a
//! [`CommandDispatcher`] together with the live [`Scope`].  The two stock
//! dispatchers both read the statement as a keyword followed by arguments:
//!
//! ```text
//! drive 0.5, speed * 2
//! drive(0.5, speed * 2)
//! ```
//!
//! Each argument is an expression resolved through the scope.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info};

use super::{
    error::{GordianError, Result},
    scan::{is_identifier, is_wrapped, split_top_level},
    scope::Scope,
    value::Value,
};

/// The host-side capability that carries out command statements.
pub trait CommandDispatcher {
    fn dispatch(&mut self, statement: &str, scope: &Scope) -> Result<()>;
}

impl<F> CommandDispatcher for F
where
    F: FnMut(&str, &Scope) -> Result<()>,
{
    fn dispatch(&mut self, statement: &str, scope: &Scope) -> Result<()> {
        self(statement, scope)
    }
}

// ── Action ────────────────────────────────────────────────────────────────────

/// A command with its arguments resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    pub args: Vec<Value>,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

impl Action {
    /// Parse `keyword args…` and resolve the arguments through `scope`.
    pub fn parse(statement: &str, scope: &Scope) -> Result<Action> {
        let statement = statement.trim();
        let end = statement
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(statement.len());
        let name = &statement[..end];
        if !is_identifier(name) {
            return Err(GordianError::Unresolvable(statement.to_owned()));
        }

        let mut rest = statement[end..].trim();
        if is_wrapped(rest) {
            rest = &rest[1..rest.len() - 1];
        }
        let args = if rest.trim().is_empty() {
            Vec::new()
        } else {
            split_top_level(rest, ',')
                .into_iter()
                .map(|arg| scope.resolve(arg))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(Action {
            name: name.to_owned(),
            args,
        })
    }
}

// ── ActionQueue ───────────────────────────────────────────────────────────────

/// Records every command as an [`Action`] for the host to drain.
#[derive(Debug, Default)]
pub struct ActionQueue {
    actions: Vec<Action>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Actions queued since the last [`take_actions`](Self::take_actions).
    pub fn pending(&self) -> &[Action] {
        &self.actions
    }

    /// Drain and return all queued actions.
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }
}

impl CommandDispatcher for ActionQueue {
    fn dispatch(&mut self, statement: &str, scope: &Scope) -> Result<()> {
        let action = Action::parse(statement, scope)?;
        debug!(%action, "queued");
        self.actions.push(action);
        Ok(())
    }
}

// ── CommandTable ──────────────────────────────────────────────────────────────

pub type Handler = Box<dyn FnMut(&[Value]) -> Result<()>>;
pub type Fallback = Box<dyn FnMut(&Action) -> Result<()>>;

/// Keyword → handler dispatch.
///
/// Commands with no registered handler go to the fallback, or fail with
/// [`GordianError::UnknownCommand`] when there is none.
#[derive(Default)]
pub struct CommandTable {
    handlers: HashMap<String, Handler>,
    fallback: Option<Fallback>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with the built-in commands registered:
    ///
    /// | Command | Effect |
    /// |---------|--------|
    /// | `print args…` | log the arguments at `info` level |
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        table.register("print", |args| {
            let line: Vec<String> = args.iter().map(Value::to_string).collect();
            info!(target: "gordian::print", "{}", line.join(" "));
            Ok(())
        });
        table
    }

    /// Register (or replace) the handler for `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl FnMut(&[Value]) -> Result<()> + 'static,
    ) -> &mut Self {
        self.handlers.insert(name.into(), Box::new(handler));
        self
    }

    pub fn set_fallback(&mut self, fallback: impl FnMut(&Action) -> Result<()> + 'static) {
        self.fallback = Some(Box::new(fallback));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }
}

impl CommandDispatcher for CommandTable {
    fn dispatch(&mut self, statement: &str, scope: &Scope) -> Result<()> {
        let action = Action::parse(statement, scope)?;
        if let Some(handler) = self.handlers.get_mut(&action.name) {
            debug!(%action, "handler");
            return handler(&action.args);
        }
        match self.fallback.as_mut() {
            Some(fallback) => fallback(&action),
            None => Err(GordianError::UnknownCommand(action.name)),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
