//! Tracing initialization and subscriber setup.

use super::file_writer::{FileWriter, LogHandle};
use crate::Config;
use std::sync::Arc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Level used when neither `RUST_LOG` nor the configuration names one.
const DEFAULT_LEVEL: &str = "info";

/// Installs the global tracing subscriber.
///
/// # Level Resolution
///
/// 1. `RUST_LOG` environment variable
/// 2. `config.trace_level`
/// 3. `"info"`
///
/// # Output
///
/// Events go to `config.log_file` through a size-rotated [`FileWriter`] when
/// one is configured, and to stderr otherwise. If the log directory cannot be
/// created, output falls back to stderr.
///
/// Idempotent: only the first call installs a subscriber.
///
/// # Example
///
/// ```rust
/// use applytrack::observability::init_tracing;
/// use applytrack::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let filter = resolve_filter(config);
    let registry = tracing_subscriber::registry().with(filter);

    let log_writer = config.log_file.as_ref().and_then(|path| {
        let parent_ok = path
            .parent()
            .map_or(true, |dir| dir.as_os_str().is_empty() || std::fs::create_dir_all(dir).is_ok());
        parent_ok.then(|| Arc::new(FileWriter::new(path.clone())))
    });

    let _ = match log_writer {
        Some(writer) => registry
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(move || LogHandle(Arc::clone(&writer))),
            )
            .try_init(),
        None => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
}

fn resolve_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
    })
}
