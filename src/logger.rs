//! Diagnostic logging to stderr
//!
//! The report goes to stdout (or `--output-file`); everything emitted through
//! `tracing` goes to stderr so the two never mix.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither a flag nor `RUST_LOG` says otherwise
const DEFAULT_FILTER: &str = "orphans=warn";

/// Pick the filter directives for the given flags
///
/// `verbose` wins over `quiet`; `RUST_LOG` is honoured only when neither is set.
pub fn filter_directives(verbose: bool, quiet: bool) -> String {
    if verbose {
        "orphans=debug".to_string()
    } else if quiet {
        "orphans=error".to_string()
    } else {
        std::env::var(EnvFilter::DEFAULT_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FILTER.to_string())
    }
}

/// Install the global subscriber. Calling it twice is harmless.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = EnvFilter::try_new(filter_directives(verbose, quiet)).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    let _ = tracing_subscriber::registry().with(filter).with(fmt_layer).try_init();
}
