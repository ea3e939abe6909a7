//! Gordian: a small embedded scripting interpreter for autonomous routines.
//!
//! Scripts are plain text, one statement per line.  Assignments bind
//! variables in a scoped environment; every other statement is handed to a
//! host-supplied [`CommandDispatcher`](script::CommandDispatcher).
//!
//! ```rust
//! use gordian::script::{ActionQueue, Gordian, Value};
//!
//! let loader = |_: &str| -> std::io::Result<String> {
//!     Ok("speed = 3-2\ndrive speed, 0.5".to_owned())
//! };
//! let mut gordian = Gordian::new(loader, ActionQueue::new());
//! let report = gordian.run("auto.gor").unwrap();
//! assert!(report.failures.is_empty());
//!
//! let actions = gordian.dispatcher_mut().take_actions();
//! assert_eq!(actions[0].name, "drive");
//! assert_eq!(actions[0].args, vec![Value::Number(1.0), Value::Number(0.5)]);
//! ```

pub mod cli;
pub mod loader;
pub mod logging;
pub mod properties;
pub mod script;
