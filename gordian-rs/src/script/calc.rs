//! The calculation family: one detector/evaluator per binary operator.
//!
//! A calculation never builds a tree.  It scans the candidate text for its
//! operator, splits there, and resolves both halves through the [`Scope`];
//! the substring *is* the expression tree.  Splitting at the rightmost valid
//! occurrence makes every operator left-associative: `3-2-1` splits into
//! `3-2` and `1`, and the left half splits again.
//!
//! Precedence (lowest → highest):
//!   or  →  and  →  comparison  →  additive  →  multiplicative
//!
//! The scope tries the lowest level first, so the loosest-binding operator
//! becomes the outermost split.

use tracing::trace;

use super::{
    error::{GordianError, Result},
    scan::operator_positions,
    scope::{Resolver, Scope},
    value::Value,
};

/// Binding strength of a [`Calculation`], weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Or,
    And,
    Comparison,
    Additive,
    Multiplicative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculation {
    LogicalOr,
    LogicalAnd,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Addition,
    Concatenation,
    Subtraction,
    Multiplication,
    Division,
    Modulo,
}

/// A candidate split whose operands both resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    /// Byte offset of the operator in the trimmed candidate.
    pub at: usize,
    pub left: Value,
    pub right: Value,
}

impl Calculation {
    /// Every variant, grouped by precedence, weakest level first.
    pub const ALL: [Calculation; 14] = [
        Calculation::LogicalOr,
        Calculation::LogicalAnd,
        Calculation::Equal,
        Calculation::NotEqual,
        Calculation::Less,
        Calculation::LessEqual,
        Calculation::Greater,
        Calculation::GreaterEqual,
        Calculation::Addition,
        Calculation::Concatenation,
        Calculation::Subtraction,
        Calculation::Multiplication,
        Calculation::Division,
        Calculation::Modulo,
    ];

    pub fn operator(self) -> &'static str {
        match self {
            Calculation::LogicalOr => "||",
            Calculation::LogicalAnd => "&&",
            Calculation::Equal => "==",
            Calculation::NotEqual => "!=",
            Calculation::Less => "<",
            Calculation::LessEqual => "<=",
            Calculation::Greater => ">",
            Calculation::GreaterEqual => ">=",
            Calculation::Addition | Calculation::Concatenation => "+",
            Calculation::Subtraction => "-",
            Calculation::Multiplication => "*",
            Calculation::Division => "/",
            Calculation::Modulo => "%",
        }
    }

    pub fn precedence(self) -> Precedence {
        match self {
            Calculation::LogicalOr => Precedence::Or,
            Calculation::LogicalAnd => Precedence::And,
            Calculation::Equal
            | Calculation::NotEqual
            | Calculation::Less
            | Calculation::LessEqual
            | Calculation::Greater
            | Calculation::GreaterEqual => Precedence::Comparison,
            Calculation::Addition | Calculation::Concatenation | Calculation::Subtraction => {
                Precedence::Additive
            }
            Calculation::Multiplication | Calculation::Division | Calculation::Modulo => {
                Precedence::Multiplicative
            }
        }
    }

    /// Whether this variant handles operands of these types.
    fn accepts(self, left: &Value, right: &Value) -> bool {
        match self {
            Calculation::LogicalOr | Calculation::LogicalAnd => {
                matches!((left, right), (Value::Boolean(_), Value::Boolean(_)))
            }
            Calculation::Equal | Calculation::NotEqual => true,
            Calculation::Concatenation => {
                matches!(left, Value::Text(_)) || matches!(right, Value::Text(_))
            }
            _ => matches!((left, right), (Value::Number(_), Value::Number(_))),
        }
    }

    /// Apply the operator to already-resolved operands.
    pub fn apply(self, left: &Value, right: &Value) -> Result<Value> {
        Ok(match self {
            // Operands are already resolved; both must be booleans.
            Calculation::LogicalOr => {
                let (l, r) = (left.as_boolean()?, right.as_boolean()?);
                Value::Boolean(l || r)
            }
            Calculation::LogicalAnd => {
                let (l, r) = (left.as_boolean()?, right.as_boolean()?);
                Value::Boolean(l && r)
            }
            Calculation::Equal => Value::Boolean(left == right),
            Calculation::NotEqual => Value::Boolean(left != right),
            Calculation::Less => Value::Boolean(left.as_number()? < right.as_number()?),
            Calculation::LessEqual => Value::Boolean(left.as_number()? <= right.as_number()?),
            Calculation::Greater => Value::Boolean(left.as_number()? > right.as_number()?),
            Calculation::GreaterEqual => Value::Boolean(left.as_number()? >= right.as_number()?),
            Calculation::Addition => Value::Number(left.as_number()? + right.as_number()?),
            Calculation::Concatenation => {
                if !self.accepts(left, right) {
                    return Err(GordianError::TypeMismatch {
                        expected: "text",
                        found: left.type_name(),
                    });
                }
                Value::Text(format!("{left}{right}"))
            }
            Calculation::Subtraction => Value::Number(left.as_number()? - right.as_number()?),
            Calculation::Multiplication => Value::Number(left.as_number()? * right.as_number()?),
            // IEEE semantics: x/0 is ±inf, 0/0 and x%0 are NaN.
            Calculation::Division => Value::Number(left.as_number()? / right.as_number()?),
            Calculation::Modulo => Value::Number(left.as_number()? % right.as_number()?),
        })
    }

    /// Find the rightmost position of this operator whose two sides resolve
    /// to operands this variant accepts.
    pub fn locate(self, scope: &Scope, candidate: &str) -> Option<Split> {
        self.find_split(&Resolver::new(scope), candidate)
    }

    fn find_split(self, resolver: &Resolver<'_>, candidate: &str) -> Option<Split> {
        let candidate = candidate.trim();
        operator_positions(candidate, self.operator())
            .into_iter()
            .find_map(|at| {
                let (left, right) = resolve_sides(resolver, candidate, at, self.operator())?;
                self.accepts(&left, &right).then_some(Split { at, left, right })
            })
    }

    /// Does `candidate` split on this operator?  Never fails: resolution
    /// errors on either side just mean "no".
    pub fn detect(self, scope: &Scope, candidate: &str) -> bool {
        self.locate(scope, candidate).is_some()
    }

    /// Split `candidate` on this operator and compute the result.
    ///
    /// When the operands resolve but are of the wrong type, the accessor's
    /// [`GordianError::TypeMismatch`] is returned.
    pub fn evaluate(self, scope: &Scope, candidate: &str) -> Result<Value> {
        let resolver = Resolver::new(scope);
        if let Some(split) = self.find_split(&resolver, candidate) {
            return self.apply(&split.left, &split.right);
        }
        let trimmed = candidate.trim();
        operator_positions(trimmed, self.operator())
            .into_iter()
            .find_map(|at| resolve_sides(&resolver, trimmed, at, self.operator()))
            .map(|(left, right)| self.apply(&left, &right))
            .unwrap_or_else(|| Err(GordianError::Unresolvable(trimmed.to_owned())))
    }
}

impl Precedence {
    /// Variants at this level.
    pub fn members(self) -> impl Iterator<Item = Calculation> {
        Calculation::ALL.into_iter().filter(move |c| c.precedence() == self)
    }

    /// All levels, weakest first.
    pub const LEVELS: [Precedence; 5] = [
        Precedence::Or,
        Precedence::And,
        Precedence::Comparison,
        Precedence::Additive,
        Precedence::Multiplicative,
    ];

    /// Find the rightmost split among all operators of this level.
    ///
    /// Each position is resolved once and offered to every member sharing
    /// that operator, so `+` is not resolved twice for addition and
    /// concatenation.  Scanning the whole level together keeps mixed
    /// operators of equal strength left-associative (`7*3%4` is `(7*3)%4`).
    pub fn locate(self, scope: &Scope, candidate: &str) -> Option<(Calculation, Split)> {
        self.find_split(&Resolver::new(scope), candidate)
    }

    pub(crate) fn find_split(
        self,
        resolver: &Resolver<'_>,
        candidate: &str,
    ) -> Option<(Calculation, Split)> {
        let candidate = candidate.trim();
        let mut positions: Vec<(usize, &'static str)> = Vec::new();
        for calc in self.members() {
            let op = calc.operator();
            if positions.iter().any(|&(_, seen)| seen == op) {
                continue;
            }
            positions.extend(operator_positions(candidate, op).into_iter().map(|at| (at, op)));
        }
        positions.sort_by(|a, b| b.0.cmp(&a.0));

        for (at, op) in positions {
            let Some((left, right)) = resolve_sides(resolver, candidate, at, op) else {
                continue;
            };
            if let Some(calc) = self
                .members()
                .find(|c| c.operator() == op && c.accepts(&left, &right))
            {
                trace!(?calc, at, candidate, "split");
                return Some((calc, Split { at, left, right }));
            }
        }
        None
    }
}

fn resolve_sides(
    resolver: &Resolver<'_>,
    candidate: &str,
    at: usize,
    op: &str,
) -> Option<(Value, Value)> {
    let left = resolver.operand(&candidate[..at])?;
    let right = resolver.operand(&candidate[at + op.len()..])?;
    Some((left, right))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> Scope {
        let mut s = Scope::new();
        s.bind("a", Value::Number(5.0));
        s.bind("b", Value::Number(2.0));
        s.bind("name", Value::Text("bot".into()));
        s.bind("ready", Value::Boolean(true));
        s
    }

    #[test]
    fn subtraction_of_literals() {
        let s = Scope::new();
        assert!(Calculation::Subtraction.detect(&s, "3-2"));
        assert_eq!(Calculation::Subtraction.evaluate(&s, "3-2").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn subtraction_rejects_leading_sign() {
        let s = Scope::new();
        assert!(!Calculation::Subtraction.detect(&s, "-5"));
        assert!(!Calculation::Subtraction.detect(&s, "5-"));
    }

    #[test]
    fn subtraction_splits_rightmost() {
        let s = Scope::new();
        let split = Calculation::Subtraction.locate(&s, "3-2-1").unwrap();
        assert_eq!(split.at, 3);
        assert_eq!(split.left, Value::Number(1.0));
        assert_eq!(split.right, Value::Number(1.0));
    }

    #[test]
    fn subtraction_skips_unresolvable_positions() {
        let s = Scope::new();
        // The rightmost '-' leaves "3-" on the left, which cannot resolve.
        assert_eq!(Calculation::Subtraction.evaluate(&s, "3--2").unwrap(), Value::Number(5.0));
    }

    #[test]
    fn variables_as_operands() {
        let s = scope();
        assert_eq!(Calculation::Subtraction.evaluate(&s, "a-b").unwrap(), Value::Number(3.0));
        assert_eq!(Calculation::Multiplication.evaluate(&s, "a * b").unwrap(), Value::Number(10.0));
        assert_eq!(Calculation::Modulo.evaluate(&s, "a % b").unwrap(), Value::Number(1.0));
    }

    #[test]
    fn detection_swallows_resolution_errors() {
        let s = Scope::new();
        assert!(!Calculation::Addition.detect(&s, "x+1"));
        assert!(!Calculation::Addition.detect(&s, "1+"));
        assert!(!Calculation::Addition.detect(&s, ""));
    }

    #[test]
    fn detection_checks_operand_types() {
        let s = scope();
        assert!(!Calculation::Subtraction.detect(&s, "name-1"));
        assert!(!Calculation::Addition.detect(&s, "name+1"));
        assert!(Calculation::Concatenation.detect(&s, "name+1"));
    }

    #[test]
    fn evaluate_reports_type_mismatch() {
        let s = scope();
        let err = Calculation::Subtraction.evaluate(&s, "name-1").unwrap_err();
        assert!(matches!(err, GordianError::TypeMismatch { expected: "number", found: "text" }));
        let err = Calculation::LogicalAnd.evaluate(&s, "ready && 1").unwrap_err();
        assert!(matches!(err, GordianError::TypeMismatch { expected: "boolean", .. }));
    }

    #[test]
    fn evaluate_without_operator_is_unresolvable() {
        let s = Scope::new();
        let err = Calculation::Division.evaluate(&s, "4").unwrap_err();
        assert!(matches!(err, GordianError::Unresolvable(_)));
    }

    #[test]
    fn division_by_zero_is_ieee() {
        let s = Scope::new();
        assert_eq!(
            Calculation::Division.evaluate(&s, "1/0").unwrap(),
            Value::Number(f64::INFINITY)
        );
        let nan = Calculation::Modulo.evaluate(&s, "1%0").unwrap();
        assert!(nan.as_number().unwrap().is_nan());
    }

    #[test]
    fn comparisons() {
        let s = scope();
        assert_eq!(Calculation::Greater.evaluate(&s, "a > b").unwrap(), Value::Boolean(true));
        assert_eq!(Calculation::LessEqual.evaluate(&s, "a <= 5").unwrap(), Value::Boolean(true));
        assert_eq!(Calculation::Equal.evaluate(&s, "name == \"bot\"").unwrap(), Value::Boolean(true));
        assert_eq!(Calculation::NotEqual.evaluate(&s, "a != name").unwrap(), Value::Boolean(true));
        assert!(!Calculation::Less.detect(&s, "a <= b"));
    }

    #[test]
    fn logical_combination() {
        let s = scope();
        assert_eq!(
            Calculation::LogicalOr.evaluate(&s, "false || ready").unwrap(),
            Value::Boolean(true)
        );
        assert_eq!(
            Calculation::LogicalAnd.evaluate(&s, "ready && false").unwrap(),
            Value::Boolean(false)
        );
    }

    #[test]
    fn concatenation_formats_operands() {
        let s = scope();
        assert_eq!(
            Calculation::Concatenation.evaluate(&s, "name + \"-\" + 1").unwrap(),
            Value::Text("bot-1.0".into())
        );
    }

    #[test]
    fn level_picks_rightmost_member() {
        let s = Scope::new();
        let (calc, split) = Precedence::Multiplicative.locate(&s, "7*3%4").unwrap();
        assert_eq!(calc, Calculation::Modulo);
        assert_eq!(split.left, Value::Number(21.0));
    }

    #[test]
    fn precedence_members() {
        let additive: Vec<_> = Precedence::Additive.members().collect();
        assert_eq!(
            additive,
            [Calculation::Addition, Calculation::Concatenation, Calculation::Subtraction]
        );
        assert!(Precedence::Or < Precedence::Multiplicative);
    }
}
