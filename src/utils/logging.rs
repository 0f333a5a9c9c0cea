//! Logging Setup
//!
//! Console logging via `tracing_subscriber::fmt`, written to stderr so stdout
//! carries only command output. `RUST_LOG` wins when set; otherwise `info`
//! (or `debug` with `--verbose`) for this workspace's crates.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Default filter directive for the given verbosity.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "relabel=debug,relabel_llm=debug,relabel_core=debug,warn"
    } else {
        "relabel=info,relabel_llm=info,relabel_core=info,warn"
    }
}

/// Initialize console logging. Safe to call more than once.
pub fn init_logging(verbose: bool) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        // try_init: a subscriber may already be installed (tests)
        if tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init()
            .is_err()
        {
            tracing::debug!("global tracing subscriber already initialized");
        }
    });
}
