//! Diagnostic tracing
//!
//! Diagnostics go to stderr (the journal when run by udev), separate from the
//! invocation log. Filter from `ROKID_HOOK_LOG_LEVEL`, then `RUST_LOG`,
//! default `warn`. An unset, empty or unparseable variable falls through.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_LEVEL_ENV: &str = "ROKID_HOOK_LOG_LEVEL";

const DEFAULT_LEVEL: &str = "warn";

/// Install the global subscriber. Keep the guard alive until exit so
/// buffered lines are flushed.
pub fn init() -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(|key| std::env::var(key).ok()))
        .with_writer(writer)
        .with_target(false)
        .try_init();

    guard
}

fn env_filter<F>(lookup: F) -> EnvFilter
where
    F: Fn(&str) -> Option<String>,
{
    [LOG_LEVEL_ENV, EnvFilter::DEFAULT_ENV]
        .into_iter()
        .filter_map(|key| lookup(key))
        .filter(|directives| !directives.trim().is_empty())
        .find_map(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
}
