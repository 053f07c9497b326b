//! Diagnostic logging to stderr.
//!
//! Progress lines for the user go to stdout; these are for the operator.
//! The filter comes from `DOCPROBE_LOG` when set.

use std::io;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "DOCPROBE_LOG";

/// Install the global subscriber.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "docprobe=debug"
    } else {
        "docprobe=warn"
    }
}
