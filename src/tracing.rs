//! Tracing infrastructure for development diagnostics
//!
//! Configure via the RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=glyphgrid::font=trace` - module-level filtering
//!
//! Logs are also written to `~/.config/glyphgrid/logs/glyphgrid.log` with
//! daily rotation. File logging uses debug level for troubleshooting the
//! background inventory builds.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize tracing subscriber with console and file logging.
///
/// Returns the file appender guard; dropping it stops the background
/// writer, so the caller must keep it alive for the process lifetime.
pub fn init() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_filter(console_filter);

    let (file_layer, guard) = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "glyphgrid.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard))
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}
