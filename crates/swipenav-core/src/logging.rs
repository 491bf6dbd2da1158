//! File logging for the recognizer
//!
//! stdout carries NDJSON events, so logs go to a daily file under the
//! platform data directory.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Name of the environment variable controlling the log filter
pub const LOG_ENV_VAR: &str = "SWIPENAV_LOG";

/// Filter used when `SWIPENAV_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "swipenav=info,swipenav_app=info,swipenav_core=info,warn";

const LOG_FILE_PREFIX: &str = "swipenav.log";

/// Initialize the logging subsystem
///
/// Per-event transitions log at debug, dispatched commands at info.
///
/// # Examples
/// ```bash
/// SWIPENAV_LOG=swipenav_app=debug swipenav gesture.toml
/// SWIPENAV_LOG=swipenav_app::handler=trace swipenav
/// ```
pub fn init() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    let raw_filter = std::env::var(LOG_ENV_VAR).ok();

    tracing_subscriber::registry()
        .with(env_filter(raw_filter.as_deref()))
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("swipenav logging to {}", log_dir.display());
    if let Some(raw) = raw_filter.filter(|raw| EnvFilter::try_new(raw).is_err()) {
        tracing::warn!("Invalid {}={:?}, using {}", LOG_ENV_VAR, raw, DEFAULT_FILTER);
    }

    Ok(())
}

/// Build the filter from a `SWIPENAV_LOG` value
fn env_filter(raw: Option<&str>) -> EnvFilter {
    raw.and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// `<data_local_dir>/swipenav/logs`, or `./swipenav/logs` without one
pub fn log_directory() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("swipenav")
        .join("logs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_directory_is_namespaced() {
        assert!(log_directory().ends_with("swipenav/logs"));
    }

    #[test]
    fn test_filter_uses_env_value() {
        let filter = env_filter(Some("swipenav_app=debug"));
        assert_eq!(filter.to_string(), "swipenav_app=debug");
    }

    #[test]
    fn test_filter_defaults_when_unset() {
        let filter = env_filter(None).to_string();
        assert!(filter.contains("swipenav_app=info"));
        assert!(filter.contains("warn"));
    }

    #[test]
    fn test_invalid_filter_falls_back_to_default() {
        let filter = env_filter(Some("swipenav_app=loudest"));
        assert_eq!(filter.to_string(), env_filter(None).to_string());
    }
}
