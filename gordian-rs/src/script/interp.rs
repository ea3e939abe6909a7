//! The Gordian context: the host's handle on script execution.
//!
//! [`Gordian`] owns a [`TextLoader`] that turns script identifiers into
//! source text, a [`CommandDispatcher`] that carries out commands, and a set
//! of globals seeded into the root scope of every run.  At most one script
//! runs at a time; starting another replaces it.

use tracing::{debug, info};

use crate::loader::TextLoader;

use super::{
    dispatch::CommandDispatcher,
    error::{GordianError, Result},
    runner::{FailurePolicy, RunReport, ScriptRun, Step},
    scope::Scope,
    value::Value,
};

pub struct Gordian<L, D> {
    loader: L,
    dispatcher: D,
    globals: Vec<(String, Value)>,
    policy: FailurePolicy,
    current: Option<ScriptRun>,
}

impl<L: TextLoader, D: CommandDispatcher> Gordian<L, D> {
    pub fn new(loader: L, dispatcher: D) -> Self {
        Gordian {
            loader,
            dispatcher,
            globals: Vec::new(),
            policy: FailurePolicy::default(),
            current: None,
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn set_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
    }

    /// Define a variable visible to every script started afterwards.
    pub fn set_global(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        match self.globals.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.globals.push((name, value)),
        }
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Load the script named `identifier` and make it the current run.
    ///
    /// On a load or syntax error the previous run, if any, is left in place.
    pub fn start(&mut self, identifier: &str) -> Result<()> {
        let src = self.loader.load_text(identifier)?;
        debug!(identifier, bytes = src.len(), "loaded");
        self.start_source(&src)?;
        info!(identifier, "script started");
        Ok(())
    }

    /// Make `src` the current run.
    pub fn start_source(&mut self, src: &str) -> Result<()> {
        let mut scope = Scope::new();
        for (name, value) in &self.globals {
            scope.bind(name.as_str(), value.clone());
        }
        let run = ScriptRun::parse(src, scope)?.with_policy(self.policy);
        if self.current.replace(run).is_some() {
            debug!("replaced running script");
        }
        Ok(())
    }

    /// Advance the current run by one statement.
    pub fn step(&mut self) -> Result<Step> {
        let run = self.current.as_mut().ok_or(GordianError::NoScript)?;
        Ok(run.step(&mut self.dispatcher))
    }

    /// Load and run `identifier` to completion.
    pub fn run(&mut self, identifier: &str) -> Result<RunReport> {
        self.start(identifier)?;
        self.finish()
    }

    /// Run `src` to completion.
    pub fn run_source(&mut self, src: &str) -> Result<RunReport> {
        self.start_source(src)?;
        self.finish()
    }

    /// Drive the current run to its end and return its report.
    pub fn finish(&mut self) -> Result<RunReport> {
        let mut run = self.current.take().ok_or(GordianError::NoScript)?;
        run.run_to_end(&mut self.dispatcher);
        let report = run.into_report();
        info!(
            executed = report.executed,
            failures = report.failures.len(),
            aborted = report.aborted,
            "script finished"
        );
        Ok(report)
    }

    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|run| !run.is_finished())
    }

    pub fn current(&self) -> Option<&ScriptRun> {
        self.current.as_ref()
    }

    /// Drop the current run, returning it.
    pub fn clear(&mut self) -> Option<ScriptRun> {
        self.current.take()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut D {
        &mut self.dispatcher
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
