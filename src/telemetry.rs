//! Log initialisation.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` wins over the configured filter. Calling this more than once
/// is harmless; only the first call installs anything. Returns whether this
/// call installed the subscriber.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let mut installed = false;
    INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        installed = if config.json {
            builder.json().try_init().is_ok()
        } else {
            builder.try_init().is_ok()
        };
    });
    installed
}
