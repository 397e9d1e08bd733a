// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration error types for sentio-config.

use std::path::PathBuf;

use sentio_modbus::SentioError;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse the configuration file.
    #[error("Failed to parse config file '{path}': {message}")]
    Parse {
        /// Path to the configuration file.
        path: PathBuf,
        /// Error message.
        message: String,
        /// Line number (if available).
        line: Option<usize>,
    },

    /// Configuration validation failed.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// File I/O error.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// File not found.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Environment variable referenced without a default is unset.
    #[error("Environment variable not found: {name}")]
    EnvVarNotFound {
        /// The environment variable name.
        name: String,
    },

    /// Environment override could not be parsed.
    #[error("Invalid environment variable value for '{name}': {message}")]
    InvalidEnvVar {
        /// The environment variable name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Value out of range.
    #[error("Value out of range for '{field}': {value} (expected {min}..={max})")]
    OutOfRange {
        /// The field name.
        field: String,
        /// The actual value.
        value: String,
        /// Minimum value.
        min: String,
        /// Maximum value.
        max: String,
    },

    /// Unsupported configuration format.
    #[error("Unsupported configuration format: {format}")]
    UnsupportedFormat {
        /// The unsupported format.
        format: String,
    },

    /// The connection section was rejected by the gateway.
    #[error("Invalid connection settings: {0}")]
    Connection(#[from] SentioError),

    /// Serialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

impl ConfigError {
    /// Creates a parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: None,
        }
    }

    /// Creates a parse error with a line number.
    pub fn parse_at_line(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        line: usize,
    ) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
            line: Some(line),
        }
    }

    /// Creates a validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a file-not-found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Creates an env-var-not-found error.
    pub fn env_var_not_found(name: impl Into<String>) -> Self {
        Self::EnvVarNotFound { name: name.into() }
    }

    /// Creates an invalid env var error.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an out-of-range error.
    pub fn out_of_range<T: std::fmt::Display>(
        field: impl Into<String>,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Creates an unsupported-format error.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Creates a serialization error.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Parse {
                path,
                message,
                line: Some(line),
            } => format!("{} line {line}: {message}", path.display()),
            Self::Parse { path, message, .. } => format!("{}: {message}", path.display()),
            Self::Io { path, .. } | Self::FileNotFound { path } => {
                format!("Cannot read configuration file {}", path.display())
            }
            Self::EnvVarNotFound { name } => {
                format!("Set {name} or give the placeholder a default (${{{name}:value}})")
            }
            Self::Connection(e) => e.user_message(),
            other => other.to_string(),
        }
    }

    /// Returns `true` if this error is related to file I/O.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::FileNotFound { .. })
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "parse",
            Self::Validation { .. } => "validation",
            Self::Io { .. } => "io",
            Self::FileNotFound { .. } => "file_not_found",
            Self::EnvVarNotFound { .. } => "env_var_not_found",
            Self::InvalidEnvVar { .. } => "invalid_env_var",
            Self::OutOfRange { .. } => "out_of_range",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::Connection(_) => "connection",
            Self::Serialization { .. } => "serialization",
        }
    }
}

/// A Result type with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use sentio_modbus::ConfigurationError;

    #[test]
    fn test_config_error_creation() {
        let error = ConfigError::validation("discovery.max_rooms", "must be at least 1");
        assert!(matches!(error, ConfigError::Validation { .. }));
        assert_eq!(error.error_type(), "validation");

        let error = ConfigError::env_var_not_found("SENTIO_HOST");
        assert_eq!(error.error_type(), "env_var_not_found");
        assert!(error.user_message().contains("${SENTIO_HOST:value}"));
    }

    #[test]
    fn test_is_io_error() {
        let error = ConfigError::io(
            "sentio.yaml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(error.is_io_error());
        assert!(ConfigError::file_not_found("sentio.yaml").is_io_error());
        assert!(!ConfigError::validation("x", "y").is_io_error());
    }

    #[test]
    fn test_parse_at_line() {
        let error = ConfigError::parse_at_line("sentio.yaml", "invalid syntax", 7);
        match &error {
            ConfigError::Parse { line, .. } => assert_eq!(*line, Some(7)),
            _ => panic!("Expected Parse error"),
        }
        assert!(error.user_message().contains("line 7"));
    }

    #[test]
    fn test_out_of_range() {
        let error = ConfigError::out_of_range("discovery.max_rooms", 30, 1, 24);
        assert!(error.to_string().contains("1..=24"));
    }

    #[test]
    fn test_from_sentio_error() {
        let error: ConfigError =
            SentioError::from(ConfigurationError::invalid_unit_id(0)).into();
        assert_eq!(error.error_type(), "connection");
    }
}
