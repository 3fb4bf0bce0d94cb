use std::io;
use tracing::dispatcher::DefaultGuard;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;
use tracing_subscriber::{fmt, registry};

use crate::parking::config::{Config, Logging};

// This is a helper struct to store the logger guards. When they are dropped, logging can be reset.
#[allow(dead_code)]
pub struct LogGuards {
    log_guard: Option<WorkerGuard>,
    default: DefaultGuard,
}

/// Plain stdout logging for the window before the config is loaded, and for
/// tests.
pub fn init_std_out_logging() -> DefaultGuard {
    let collector = tracing_subscriber::registry().with(
        fmt::Layer::new()
            .with_writer(io::stdout)
            .with_filter(LevelFilter::INFO),
    );
    tracing::subscriber::set_default(collector)
}

pub fn init_logging(config: &Config) -> LogGuards {
    let (log_layer, log_guard) = match (&config.output.logging, &config.output.log_dir) {
        (Logging::Info, Some(dir)) => {
            let log_file_appender = rolling::never(dir, "parking_session.log");
            let (log_file, log_guard) = non_blocking(log_file_appender);
            let layer = fmt::Layer::new()
                .with_writer(log_file)
                .json()
                .with_ansi(false)
                .with_filter(LevelFilter::INFO);
            (Some(layer), Some(log_guard))
        }
        _ => (None, None),
    };

    let console_layer = (Logging::Info == config.output.logging).then(|| {
        fmt::layer()
            .with_writer(io::stdout)
            .with_filter(LevelFilter::INFO)
    });

    // Add `Optional`s. If None, then the corresponding layer is not added.
    let collector = registry().with(log_layer).with(console_layer);
    let default = tracing::subscriber::set_default(collector);

    LogGuards { log_guard, default }
}
