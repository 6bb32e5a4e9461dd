//! Console logging setup
//!
//! Installs a `tracing` subscriber once per process. The filter comes from
//! `FOLIO_LOG` when set, otherwise from the verbosity flag.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "FOLIO_LOG";

/// Initialize logging to stderr
pub fn init(verbose: bool) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_level(true)
                .without_time()
                .with_filter(filter),
        );

        // Another subscriber may already be installed (tests, embedding)
        if subscriber.try_init().is_err() {
            tracing::debug!("global tracing subscriber already set");
        }
    });
}

fn default_level(verbose: bool) -> &'static str {
    if verbose {
        "folio=debug"
    } else {
        "folio=info"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(true), "folio=debug");
        assert_eq!(default_level(false), "folio=info");
    }

    #[test]
    fn test_init_is_idempotent() {
        init(false);
        init(true);
        assert!(LOGGER_INITIALIZED.get().is_some());
    }
}
