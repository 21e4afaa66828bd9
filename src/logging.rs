//! Tracing subscriber setup for the `piwait` binary.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Filter applied when neither an explicit directive nor `RUST_LOG` is set.
pub const DEFAULT_FILTER: &str = "info";

/// Resolves the active filter: `directive` first, then `RUST_LOG`, then
/// [`DEFAULT_FILTER`]. An unparsable directive falls back to the default.
#[must_use]
pub fn filter(directive: Option<&str>) -> EnvFilter {
    directive
        .map_or_else(
            || EnvFilter::try_from_default_env().ok(),
            |value| EnvFilter::try_new(value).ok(),
        )
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs a stderr fmt subscriber.
///
/// # Errors
///
/// Returns [`TryInitError`] when a global subscriber is already installed.
pub fn init(directive: Option<&str>) -> Result<(), TryInitError> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(directive))
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish()
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_directive_wins() {
        assert_eq!(filter(Some("debug")).to_string(), "debug");
    }

    #[test]
    fn invalid_directive_falls_back_to_default() {
        assert_eq!(filter(Some("piwait=loud")).to_string(), DEFAULT_FILTER);
    }

    #[test]
    fn second_init_reports_installed_subscriber() {
        init(Some("warn")).ok();
        assert!(init(Some("warn")).is_err());
    }
}
