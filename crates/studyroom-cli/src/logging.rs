use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Env var that overrides the configured log filter.
const LOG_ENV: &str = "STUDYROOM_LOG";

/// Install the global `tracing` subscriber, writing to stderr so that
/// stdout stays machine-readable.
///
/// `STUDYROOM_LOG` wins over `level`; an unparsable directive falls back to `warn`.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    // A subscriber may already be set when embedded in tests.
    let _ = tracing_subscriber::registry().with(filter).with(layer).try_init();
}
