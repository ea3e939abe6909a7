//! Error type shared by the resolver, the statement parser and the runner.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GordianError>;

#[derive(Debug, Error)]
pub enum GordianError {
    /// No literal, variable, group, calculation or prefix matched.
    #[error("cannot resolve `{0}`")]
    Unresolvable(String),

    /// A bare identifier with no binding anywhere in the scope chain.
    #[error("undefined variable `{0}`")]
    UndefinedVariable(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("command `{name}` failed: {message}")]
    Command { name: String, message: String },

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("cannot load `{identifier}`: {source}")]
    Load {
        identifier: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no script is running")]
    NoScript,
}

impl GordianError {
    /// Shorthand for handler closures that fail with a plain message.
    pub fn command(name: impl Into<String>, message: impl Into<String>) -> Self {
        GordianError::Command {
            name: name.into(),
            message: message.into(),
        }
    }
}
