//! Gordian statement AST and script-level parser.
//!
//! A script is a sequence of lines.  Each non-blank, non-comment line is one
//! statement:
//!
//! - `name = expr` binds a variable
//! - `if expr` … [`else` …] `end` runs one branch in a child scope
//! - anything else is a command, handed whole to the dispatcher
//!
//! Lines whose first non-blank character is `#` are comments.

use std::rc::Rc;

use super::{
    error::{GordianError, Result},
    scan::{is_identifier, operator_positions},
};

/// A parsed Gordian statement.  `line` is 1-based.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `name = expr`
    Assign { line: usize, name: String, expr: String },
    /// Any other statement, passed verbatim to the command dispatcher.
    Command { line: usize, text: String },
    /// `if cond` … `else` … `end`
    If {
        line: usize,
        cond: String,
        then_block: Rc<[Stmt]>,
        else_block: Rc<[Stmt]>,
    },
}

impl Stmt {
    pub fn line(&self) -> usize {
        match self {
            Stmt::Assign { line, .. } | Stmt::Command { line, .. } | Stmt::If { line, .. } => {
                *line
            }
        }
    }
}

// ── Parser ────────────────────────────────────────────────────────────────────

/// Parse a Gordian script into statements.
///
/// Line endings may be `\n`, `\r\n` or a bare `\r`.
pub fn parse_script(src: &str) -> Result<Vec<Stmt>> {
    let mut parser = StmtParser {
        lines: statement_lines(src),
        pos: 0,
    };
    let (stmts, end) = parser.parse_block()?;
    match end {
        Terminator::Eof => Ok(stmts),
        Terminator::Else(line) => Err(syntax(line, "`else` without `if`")),
        Terminator::End(line) => Err(syntax(line, "`end` without `if`")),
    }
}

/// Numbered statement lines: trimmed, with blanks and comments removed.
pub fn statement_lines(src: &str) -> Vec<(usize, String)> {
    src.replace("\r\n", "\n")
        .split(['\n', '\r'])
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| (n, line.to_owned()))
        .collect()
}

/// Split `name = expr` into its parts.
///
/// The `=` must be a lone assignment sign (not part of `==`, `!=`, `<=`,
/// `>=`) and the left-hand side must be an identifier.
pub fn parse_assignment(text: &str) -> Option<(&str, &str)> {
    let at = *operator_positions(text, "=").last()?;
    let name = text[..at].trim();
    let expr = text[at + 1..].trim();
    (is_identifier(name) && !expr.is_empty()).then_some((name, expr))
}

fn syntax(line: usize, message: impl Into<String>) -> GordianError {
    GordianError::Syntax {
        line,
        message: message.into(),
    }
}

/// How a block ended.
enum Terminator {
    Else(usize),
    End(usize),
    Eof,
}

struct StmtParser {
    lines: Vec<(usize, String)>,
    pos: usize,
}

impl StmtParser {
    fn advance(&mut self) -> Option<(usize, String)> {
        let next = self.lines.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    /// Parse statements until `else`, `end` or end of input.  The terminator
    /// is consumed and returned.
    fn parse_block(&mut self) -> Result<(Vec<Stmt>, Terminator)> {
        let mut stmts = Vec::new();
        while let Some((line, text)) = self.advance() {
            if let Some((name, expr)) = parse_assignment(&text) {
                if matches!(name, "true" | "false") {
                    return Err(syntax(line, format!("cannot assign to literal `{name}`")));
                }
                stmts.push(Stmt::Assign {
                    line,
                    name: name.to_owned(),
                    expr: expr.to_owned(),
                });
                continue;
            }
            match keyword(&text) {
                ("else", "") => return Ok((stmts, Terminator::Else(line))),
                ("end", "") => return Ok((stmts, Terminator::End(line))),
                ("if", cond) => stmts.push(self.parse_if(line, cond)?),
                _ => stmts.push(Stmt::Command { line, text: text.clone() }),
            }
        }
        Ok((stmts, Terminator::Eof))
    }

    fn parse_if(&mut self, line: usize, cond: &str) -> Result<Stmt> {
        if cond.is_empty() {
            return Err(syntax(line, "`if` requires a condition"));
        }
        let (then_block, end) = self.parse_block()?;
        let else_block = match end {
            Terminator::End(_) => Vec::new(),
            Terminator::Else(_) => match self.parse_block()? {
                (stmts, Terminator::End(_)) => stmts,
                (_, Terminator::Else(dup)) => {
                    return Err(syntax(dup, format!("second `else` for `if` on line {line}")))
                }
                (_, Terminator::Eof) => {
                    return Err(syntax(line, "`if` without matching `end`"))
                }
            },
            Terminator::Eof => return Err(syntax(line, "`if` without matching `end`")),
        };
        Ok(Stmt::If {
            line,
            cond: cond.to_owned(),
            then_block: Rc::from(then_block),
            else_block: Rc::from(else_block),
        })
    }
}

/// Split a statement into its leading word and the trimmed remainder.
///
/// `if(x > 1)` splits as `("if", "(x > 1)")`.
fn keyword(text: &str) -> (&str, &str) {
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    (&text[..end], text[end..].trim())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
