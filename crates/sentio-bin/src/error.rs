// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the `sentio` binary.

use sentio_modbus::{ErrorKind, SentioError};
use thiserror::Error;

/// Result type alias for sentio-bin operations.
pub type BinResult<T> = Result<T, BinError>;

/// Errors that can occur in the `sentio` binary.
#[derive(Debug, Error)]
pub enum BinError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Initialization error.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// Runtime error.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Config loading error.
    #[error("Config error: {0}")]
    Config(#[from] sentio_config::ConfigError),

    /// Gateway error.
    #[error("{0}")]
    Gateway(#[from] SentioError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        /// The context description.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<BinError>,
    },
}

impl BinError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an initialization error.
    pub fn init(msg: impl Into<String>) -> Self {
        Self::Initialization(msg.into())
    }

    /// Creates a runtime error.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }

    /// Adds context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Returns the process exit code for this error.
    ///
    /// Gateway failures are split by kind so scripts can tell an unreachable
    /// controller from a rejected value.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) | Self::Config(_) => 1,
            Self::Initialization(_) => 2,
            Self::Runtime(_) => 3,
            Self::Io(_) => 4,
            Self::Gateway(e) => match e.kind() {
                ErrorKind::ConnectionFailure => 5,
                ErrorKind::UnsupportedDevice
                | ErrorKind::IdentityMismatch
                | ErrorKind::UnsupportedFirmware => 6,
                ErrorKind::RoomNotFound | ErrorKind::InvalidValue => 7,
                _ => 8,
            },
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }

    /// Returns a message suitable for printing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.user_message(),
            Self::Gateway(e) => e.user_message(),
            Self::WithContext { context, source } => {
                format!("{context}: {}", source.user_message())
            }
            other => other.to_string(),
        }
    }

    /// Returns recovery hints for gateway failures.
    pub fn hints(&self) -> Vec<&'static str> {
        match self {
            Self::Gateway(e) => e.recovery_hints(),
            Self::WithContext { source, .. } => source.hints(),
            _ => Vec::new(),
        }
    }
}

impl From<std::io::Error> for BinError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BinError {
    fn from(err: serde_json::Error) -> Self {
        Self::Runtime(format!("JSON output failed: {err}"))
    }
}

impl From<anyhow::Error> for BinError {
    fn from(err: anyhow::Error) -> Self {
        Self::Runtime(format!("{err:#}"))
    }
}

// =============================================================================
// Error Reporting
// =============================================================================

/// Reports an error with its cause chain on stderr.
pub fn report_error(error: &BinError) {
    eprintln!("Error: {}", error.user_message());

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        eprintln!("  Caused by: {cause}");
        source = cause.source();
    }

    for hint in error.hints() {
        eprintln!("  Hint: {hint}");
    }
}

/// Reports an error and exits with the appropriate code.
pub fn report_error_and_exit(error: BinError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sentio_modbus::ConfigurationError;

    #[test]
    fn test_error_creation() {
        let err = BinError::config("test error");
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_error_with_context() {
        let err = BinError::config("inner error").with_context("outer context");
        assert_eq!(err.to_string(), "outer context: Configuration error: inner error");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(BinError::config("test").exit_code(), 1);
        assert_eq!(BinError::init("test").exit_code(), 2);
        assert_eq!(BinError::runtime("test").exit_code(), 3);
        assert_eq!(BinError::Io("test".to_string()).exit_code(), 4);
        assert_eq!(BinError::from(SentioError::room_not_found(30)).exit_code(), 7);
    }

    #[test]
    fn test_hints_follow_context() {
        let err = BinError::from(SentioError::room_not_found(4)).with_context("reading room 4");
        assert!(err.hints().iter().any(|h| h.contains("discovery")));
        assert!(BinError::runtime("boom").hints().is_empty());
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: BinError = anyhow::anyhow!("socket closed").context("reading room 2").into();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("reading room 2"));
        assert!(err.to_string().contains("socket closed"));
    }

    #[test]
    fn test_config_error_conversion() {
        let err: BinError = sentio_config::ConfigError::from(SentioError::from(
            ConfigurationError::invalid_unit_id(0),
        ))
        .into();
        assert_eq!(err.exit_code(), 1);
    }
}
