use anyhow::Result;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Log file prefix; rotated files are popcorn.log.YYYY-MM-DD
const LOG_FILE_PREFIX: &str = "popcorn.log";

/// Filter for a verbosity level: 0 = info, 1 = debug, 2+ = trace
pub fn level_filter(verbose_level: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose_level {
        0 => "info",
        1 => "debug,hyper=warn,reqwest=info",
        _ => "trace",
    }
}

/// Initialize tracing.
///
/// With `log_dir` logs go to a daily rolling file there (the TUI owns the
/// terminal); otherwise they go to stderr. `RUST_LOG` wins over the flags
/// unless `quiet` is set. The returned guard must be held until exit.
pub fn init_logging(verbose_level: u8, quiet: bool, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_filter = level_filter(verbose_level, quiet);
    let filter = if quiet {
        EnvFilter::new(default_filter)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
    };

    let registry = Registry::default().with(filter);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(file_appender);

            let fmt_layer = fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(writer);
            registry.with(fmt_layer).try_init()?;
            Ok(Some(guard))
        }
        None => {
            let fmt_layer = fmt::layer().with_target(false).with_writer(io::stderr);
            registry.with(fmt_layer).try_init()?;
            Ok(None)
        }
    }
}
