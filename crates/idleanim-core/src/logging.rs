//! Process-wide log subscriber.

use tracing_subscriber::EnvFilter;

use crate::storage::LoggingConfig;

/// Filter directives in effect: `RUST_LOG` when set, else the configured level.
pub fn filter_directives(config: &LoggingConfig) -> String {
    std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| config.level.clone())
}

/// Install the fmt subscriber. Returns `false` if one was already installed.
pub fn init(config: &LoggingConfig) -> bool {
    let directives = filter_directives(config);
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("invalid log filter '{directives}': {e}; falling back to info");
        EnvFilter::new("info")
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target)
        .try_init()
        .is_ok()
}
