//! Process-wide logging setup.
//!
//! The harness installs a single `tracing` subscriber for the whole process.
//! Installation is guarded by a [`Once`] so concurrent first use (parallel
//! test execution) constructs exactly one subscriber; afterwards the
//! subscriber is read-only and safe to use from any thread.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

use crate::settings::LoggingSettings;

static INIT: Once = Once::new();

/// Installs the global log subscriber, once per process.
///
/// `RUST_LOG` takes precedence over the configured level so a single run can
/// be made more verbose without editing settings files. Calling this more
/// than once is a no-op, as is calling it when some other subscriber is
/// already installed (e.g. by an embedding test harness).
pub fn init(settings: &LoggingSettings) {
    let level = settings.level.clone();
    INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    });
}

/// [`init`] with default settings; convenient at the top of a test.
pub fn init_default() {
    init(&LoggingSettings::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init_default();
        init_default();
        init(&LoggingSettings {
            level: "debug".to_string(),
        });
    }
}
