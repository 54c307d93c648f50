//! `tracing` subscriber bootstrap for binaries.
//!
//! Library code only emits events; installing a subscriber is left to the
//! binary, once, at startup.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "MINIAPP_CHAT_LOG";

/// Directive used when [`LOG_ENV`] is unset or unparsable.
pub const DEFAULT_DIRECTIVE: &str = "warn";

/// Filter built from [`LOG_ENV`], falling back to [`DEFAULT_DIRECTIVE`].
pub fn filter_from_env() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Installs a stderr fmt subscriber. Returns `false` when one was already set.
pub fn init() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter_from_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_reports_existing_subscriber() {
        let _ = init();
        assert!(!init());
    }
}
