//! The Gordian scripting language.
//!
//! - [`value`]: the three value types and literal parsing
//! - [`scan`]: top-level operator and separator scanning
//! - [`calc`]: binary calculations and their precedence levels
//! - [`scope`]: variable frames and expression resolution
//! - [`stmt`]: line-oriented statement parsing
//! - [`runner`]: statement-at-a-time execution
//! - [`dispatch`]: how commands reach the host
//! - [`interp`]: the [`Gordian`] context tying it together

pub mod calc;
pub mod dispatch;
pub mod error;
pub mod interp;
pub mod runner;
pub mod scan;
pub mod scope;
pub mod stmt;
pub mod value;

pub use calc::{Calculation, Precedence};
pub use dispatch::{Action, ActionQueue, CommandDispatcher, CommandTable};
pub use error::{GordianError, Result};
pub use interp::Gordian;
pub use runner::{FailurePolicy, RunReport, ScriptRun, StatementFailure, Step};
pub use scope::Scope;
pub use value::Value;
