//! Statement execution.
//!
//! A [`ScriptRun`] owns the parsed statements and the root [`Scope`] of one
//! script execution.  It advances one statement per [`ScriptRun::step`], so
//! a host can interleave a script with its own loop, or drive it to the end
//! with [`ScriptRun::run_to_end`].

use std::rc::Rc;

use tracing::{debug, warn};

use super::{
    dispatch::CommandDispatcher,
    error::{GordianError, Result},
    scope::Scope,
    stmt::{parse_script, Stmt},
};

/// What happens after a statement fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure and carry on with the next statement.
    #[default]
    Continue,
    /// Record the failure and stop the run.
    Abort,
}

#[derive(Debug)]
pub struct StatementFailure {
    pub line: usize,
    pub error: GordianError,
}

/// Summary of a script run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Statements that completed without error.
    pub executed: usize,
    pub failures: Vec<StatementFailure>,
    /// The run stopped early under [`FailurePolicy::Abort`].
    pub aborted: bool,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcome of a single [`ScriptRun::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Executed { line: usize },
    Failed { line: usize },
    Finished,
}

struct Cursor {
    block: Rc<[Stmt]>,
    next: usize,
}

/// One in-progress script execution.
pub struct ScriptRun {
    scope: Scope,
    /// Innermost block last; the root block is `stack[0]`.
    stack: Vec<Cursor>,
    policy: FailurePolicy,
    report: RunReport,
}

impl ScriptRun {
    pub fn new(stmts: Vec<Stmt>, scope: Scope) -> Self {
        ScriptRun {
            scope,
            stack: vec![Cursor {
                block: Rc::from(stmts),
                next: 0,
            }],
            policy: FailurePolicy::default(),
            report: RunReport::default(),
        }
    }

    /// Parse `src` and prepare to run it in `scope`.
    pub fn parse(src: &str, scope: Scope) -> Result<Self> {
        Ok(Self::new(parse_script(src)?, scope))
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    pub fn into_report(self) -> RunReport {
        self.report
    }

    pub fn is_finished(&self) -> bool {
        self.report.aborted || self.stack.iter().all(|c| c.next >= c.block.len())
    }

    /// Execute the next statement.
    ///
    /// An `if` counts as one step: its condition is evaluated and the chosen
    /// branch is entered.  Leaving a branch is free.
    pub fn step(&mut self, dispatcher: &mut dyn CommandDispatcher) -> Step {
        loop {
            if self.report.aborted {
                return Step::Finished;
            }
            let Some(cursor) = self.stack.last_mut() else {
                return Step::Finished;
            };
            if cursor.next >= cursor.block.len() {
                self.stack.pop();
                if !self.stack.is_empty() {
                    self.scope.pop_frame();
                }
                continue;
            }

            let block = Rc::clone(&cursor.block);
            let stmt = &block[cursor.next];
            cursor.next += 1;

            let line = stmt.line();
            return match self.execute(stmt, dispatcher) {
                Ok(()) => {
                    self.report.executed += 1;
                    Step::Executed { line }
                }
                Err(error) => {
                    warn!(line, %error, "statement failed");
                    self.report.failures.push(StatementFailure { line, error });
                    if self.policy == FailurePolicy::Abort {
                        self.report.aborted = true;
                    }
                    Step::Failed { line }
                }
            };
        }
    }

    /// Step until the script is exhausted or aborted.
    pub fn run_to_end(&mut self, dispatcher: &mut dyn CommandDispatcher) -> &RunReport {
        while self.step(dispatcher) != Step::Finished {}
        &self.report
    }

    fn execute(&mut self, stmt: &Stmt, dispatcher: &mut dyn CommandDispatcher) -> Result<()> {
        match stmt {
            Stmt::Assign { line, name, expr } => {
                let value = self.scope.resolve(expr)?;
                debug!(line, name = name.as_str(), %value, "assign");
                self.scope.assign(name, value);
            }
            Stmt::Command { line, text } => {
                debug!(line, command = text.as_str(), "dispatch");
                dispatcher.dispatch(text, &self.scope)?;
            }
            Stmt::If {
                line,
                cond,
                then_block,
                else_block,
            } => {
                let taken = self.scope.resolve(cond)?.as_boolean()?;
                debug!(line, taken, "if");
                let block = if taken { then_block } else { else_block };
                self.scope.push_frame();
                self.stack.push(Cursor {
                    block: Rc::clone(block),
                    next: 0,
                });
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::dispatch::{Action, ActionQueue};
    use crate::script::value::Value;

    fn run(src: &str) -> (ScriptRun, ActionQueue) {
        let mut queue = ActionQueue::new();
        let mut run = ScriptRun::parse(src, Scope::new()).expect("parse failed");
        run.run_to_end(&mut queue);
        (run, queue)
    }

    #[test]
    fn assignment_feeds_commands() {
        let (run, mut queue) = run("x = 3-2\ndrive x");
        assert!(run.report().is_clean());
        assert_eq!(run.report().executed, 2);
        assert_eq!(
            queue.take_actions(),
            vec![Action { name: "drive".into(), args: vec![Value::Number(1.0)] }]
        );
    }

    #[test]
    fn failures_continue_by_default() {
        let (run, mut queue) = run("drive nope\nx = 1 +\nshoot");
        let lines: Vec<usize> = run.report().failures.iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![1, 2]);
        assert!(!run.report().aborted);
        assert_eq!(queue.take_actions().len(), 1);
    }

    #[test]
    fn abort_policy_stops_at_first_failure() {
        let mut queue = ActionQueue::new();
        let mut run = ScriptRun::parse("wait 1\ndrive nope\nshoot", Scope::new())
            .unwrap()
            .with_policy(FailurePolicy::Abort);
        let report = run.run_to_end(&mut queue);
        assert!(report.aborted);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(queue.take_actions().len(), 1);
        assert!(run.is_finished());
    }

    #[test]
    fn failed_assignment_leaves_binding_untouched() {
        let (run, _) = run("x = 1\nx = x + nope");
        assert_eq!(run.scope().lookup("x"), Some(&Value::Number(1.0)));
    }

    #[test]
    fn if_branches() {
        let src = "n = 5\nif n > 3\n  big n\nelse\n  small n\nend";
        let (_, mut queue) = run(src);
        let names: Vec<String> = queue.take_actions().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["big"]);
    }

    #[test]
    fn branch_locals_are_dropped_outer_updates_survive() {
        let src = "n = 1\nif true\n  n = n + 1\n  tmp = 9\nend\nreport n";
        let (run, mut queue) = run(src);
        assert!(run.report().is_clean());
        assert!(!run.scope().is_bound("tmp"));
        assert_eq!(run.scope().depth(), 1);
        assert_eq!(queue.take_actions()[0].args, vec![Value::Number(2.0)]);
    }

    #[test]
    fn non_boolean_condition_fails_and_skips_block() {
        let (run, mut queue) = run("if 1\n  shoot\nend\nwait");
        assert_eq!(run.report().failures.len(), 1);
        assert!(matches!(
            run.report().failures[0].error,
            GordianError::TypeMismatch { expected: "boolean", .. }
        ));
        let names: Vec<String> = queue.take_actions().into_iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["wait"]);
    }

    #[test]
    fn stepping_one_statement_at_a_time() {
        let mut queue = ActionQueue::new();
        let mut run = ScriptRun::parse("a = 1\nif a == 1\nshoot\nend\nwait", Scope::new()).unwrap();
        assert_eq!(run.step(&mut queue), Step::Executed { line: 1 });
        assert_eq!(run.step(&mut queue), Step::Executed { line: 2 });
        assert_eq!(run.scope().depth(), 2);
        assert_eq!(run.step(&mut queue), Step::Executed { line: 3 });
        assert_eq!(queue.take_actions().len(), 1);
        assert_eq!(run.step(&mut queue), Step::Executed { line: 5 });
        assert_eq!(run.scope().depth(), 1);
        assert!(run.is_finished());
        assert_eq!(run.step(&mut queue), Step::Finished);
        assert_eq!(run.step(&mut queue), Step::Finished);
    }

    #[test]
    fn empty_script_finishes_immediately() {
        let mut queue = ActionQueue::new();
        let mut run = ScriptRun::parse("# nothing", Scope::new()).unwrap();
        assert!(run.is_finished());
        assert_eq!(run.step(&mut queue), Step::Finished);
    }
}
