//! Structured logging for the courier demo.
//!
//! Console output with uptime timestamps and module paths, plus an optional
//! JSON log file for post-mortem analysis. `RUST_LOG` wins over the
//! configured level.

use std::fs::File;
use std::path::Path;

use courier_config::Config;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config names a level.
pub const DEFAULT_FILTER: &str = "info";

/// Name of the JSON log file written under the log directory.
pub const LOG_FILE_NAME: &str = "courier.log";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - directory for the JSON log file
/// * `file_logging` - write the JSON file (debug builds, or `debug.log_to_file`)
/// * `config` - source of the `debug.log_level` filter
///
/// ```no_run
/// use courier_config::Config;
/// use courier_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, file_logging: bool, config: Option<&Config>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config_filter(config)));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    match open_log_file(log_dir, file_logging) {
        Some(log_file) => subscriber.with(json_file_layer(log_file)).init(),
        None => subscriber.init(),
    }
}

/// Create `log_dir` and open a fresh [`LOG_FILE_NAME`] in it.
///
/// `None` when file logging is off, no directory was given, or the file
/// cannot be created; logging then stays console-only.
pub fn open_log_file(log_dir: Option<&Path>, file_logging: bool) -> Option<File> {
    if !file_logging {
        return None;
    }
    let log_dir = log_dir?;
    std::fs::create_dir_all(log_dir).ok()?;
    File::create(log_dir.join(LOG_FILE_NAME)).ok()
}

/// One JSON object per event, no ANSI codes.
fn json_file_layer<S>(log_file: File) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_timer(fmt::time::uptime())
        .json()
}

/// Filter string from the config, falling back to [`DEFAULT_FILTER`].
pub fn config_filter(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.clone()
        }
        _ => DEFAULT_FILTER.to_string(),
    }
}
