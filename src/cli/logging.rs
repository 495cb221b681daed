//! Tracing setup for the CLI

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `versioned_save=trace`)
pub const LOG_ENV: &str = "VSAVE_LOG";

/// Installs a stderr subscriber
///
/// `--verbose` forces `debug`; otherwise `VSAVE_LOG` applies, defaulting to `warn`.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
