//! Diagnostic logging for the `gordian` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host's choice.  `RUST_LOG` overrides the default filter.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install a stderr subscriber.  Safe to call more than once.
///
/// Without `RUST_LOG` the filter is `gordian=info`, or `gordian=debug` when
/// `debug` is set.
pub fn init(debug: bool) {
    INIT.call_once(|| {
        let fallback = if debug { "gordian=debug" } else { "gordian=info" };
        let filter = if debug {
            EnvFilter::new(fallback)
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
        };
        // Another subscriber may already be installed by an embedding host.
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .try_init();
    });
}
