//! Logging configuration for AllyCat

use std::path::Path;

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::{
    self,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Registry;

use crate::config::LoggingConfig;
use crate::Result;

const DEFAULT_FILTER: &str = "info,allycat=info";

/// Initialize logging from configuration
///
/// `verbose` forces debug level. Without a configured level, `RUST_LOG` is
/// used, then `info`.
pub fn init_logging_with_config(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose {
        Some("debug")
    } else {
        config.level.as_deref()
    };
    init_logging_with_level(level, &config.dir)
}

/// Build the filter for an explicit level, falling back to `RUST_LOG`
fn build_env_filter(level: Option<&str>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::try_new(format!("{level},allycat={level}"))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Initialize console and daily file output
pub fn init_logging_with_level(level: Option<&str>, log_dir: &str) -> Result<()> {
    let logs_dir = Path::new(log_dir);
    if !logs_dir.exists() {
        std::fs::create_dir_all(logs_dir)?;
    }

    let env_filter = build_env_filter(level);
    let filter_text = env_filter.to_string();

    let file_appender = tracing_appender::rolling::daily(logs_dir, "allycat.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(non_blocking)
        .with_ansi(false);

    Registry::default()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| crate::AllycatError::Custom(format!("Failed to initialize logging: {e}")))?;

    tracing::info!("Logging initialized with filter: {}", filter_text);
    tracing::debug!("Log files will be saved to: {}/allycat.log.YYYY-MM-DD", log_dir);

    // The writer must outlive main
    std::mem::forget(guard);

    Ok(())
}

/// Initialize simple logging for tests
pub fn init_simple_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(build_env_filter(None))
        .with_test_writer()
        .try_init()
        .map_err(|e| crate::AllycatError::Custom(format!("Failed to initialize logging: {e}")))
}
