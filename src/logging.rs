use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LogConfig;

/// Install the global subscriber. `RUST_LOG` wins over the `info` default.
///
/// When a log directory is configured the returned guard must stay alive
/// for the file writer to flush.
pub fn init(config: &LogConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match &config.dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "feedlite.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false).json();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_json = config.json.then(|| fmt::layer().with_writer(std::io::stderr).json());
    let stderr_plain = (!config.json).then(|| fmt::layer().with_writer(std::io::stderr));

    // A second init (tests, embedding) keeps the existing subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_json)
        .with(stderr_plain)
        .try_init();

    guard
}
