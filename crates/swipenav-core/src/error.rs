//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
///
/// Nothing on the gesture path returns these: pointer handling degrades to a
/// logged no-op. Errors surface only from configuration, script loading and
/// runner plumbing.
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    ConfigInvalid { message: String },

    // ─────────────────────────────────────────────────────────────
    // Gesture Script Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Gesture script not found: {path}")]
    ScriptNotFound { path: PathBuf },

    #[error("Invalid gesture script: {message}")]
    Script { message: String },

    // ─────────────────────────────────────────────────────────────
    // Runtime Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Signal handling error: {message}")]
    Signal { message: String },

    #[error("Runtime error: {message}")]
    Runtime { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            message: message.into(),
        }
    }

    pub fn script(message: impl Into<String>) -> Self {
        Self::Script {
            message: message.into(),
        }
    }

    pub fn signal(message: impl Into<String>) -> Self {
        Self::Signal {
            message: message.into(),
        }
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error
    ///
    /// Recoverable errors leave the previous configuration in place and the
    /// engine keeps running.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::Toml(_)
                | Error::Config { .. }
                | Error::ConfigNotFound { .. }
                | Error::ConfigInvalid { .. }
                | Error::Signal { .. }
        )
    }

    /// Check if this error should trigger application exit
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::ScriptNotFound { .. } | Error::Script { .. } | Error::Runtime { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::config_invalid("density must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: density must be positive"
        );

        let err = Error::ScriptNotFound {
            path: PathBuf::from("/tmp/swipe.toml"),
        };
        assert_eq!(err.to_string(), "Gesture script not found: /tmp/swipe.toml");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("not valid {{{{");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Toml(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::script("missing t_ms").is_fatal());
        assert!(Error::ScriptNotFound {
            path: PathBuf::from("/test/swipe.toml")
        }
        .is_fatal());
        assert!(Error::runtime("watcher already running").is_fatal());
        assert!(!Error::config("test").is_fatal());
        assert!(!Error::signal("no SIGHUP").is_fatal());
    }

    #[test]
    fn test_error_is_recoverable() {
        assert!(Error::config("test").is_recoverable());
        assert!(Error::config_invalid("bad density").is_recoverable());
        assert!(Error::ConfigNotFound {
            path: PathBuf::from("/gone/config.toml")
        }
        .is_recoverable());
        assert!(!Error::script("empty").is_recoverable());
    }

    #[test]
    fn test_error_constructors() {
        let _ = Error::config("test");
        let _ = Error::config_invalid("test");
        let _ = Error::script("test");
        let _ = Error::signal("test");
        let _ = Error::runtime("test");
    }

    #[test]
    fn test_context_preserves_error_kind() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = res.context("reading config").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
