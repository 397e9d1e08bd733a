// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration loading and processing.
//!
//! # Loading Pipeline
//!
//! 1. Read the file and pick the format from its extension
//! 2. Resolve `${VAR}` / `${VAR:default}` placeholders
//! 3. Parse into [`SentioConfig`]
//! 4. Apply `SENTIO_*` environment overrides
//! 5. Validate
//!
//! # Environment Variable Override
//!
//! ```text
//! SENTIO_HOST=192.168.1.50
//! SENTIO_PORT=502
//! SENTIO_UNIT_ID=1
//! SENTIO_SERIAL_PORT=/dev/ttyUSB0
//! SENTIO_BAUD_RATE=19200
//! SENTIO_LOG_LEVEL=debug
//! ```

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult};
use crate::schema::{ConnectionOverrides, LogLevel, SentioConfig};

/// Looks an environment variable up by name.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

// =============================================================================
// ConfigLoader
// =============================================================================

/// Configuration loader.
///
/// # Examples
///
/// ```no_run
/// use sentio_config::loader::ConfigLoader;
///
/// let config = ConfigLoader::new().load("sentio.yaml").unwrap();
/// println!("{}", config.connection.transport_name());
/// ```
#[derive(Clone)]
pub struct ConfigLoader {
    env_prefix: String,
    resolve_env_vars: bool,
    env: EnvLookup,
}

impl ConfigLoader {
    /// Creates a loader reading the process environment.
    pub fn new() -> Self {
        Self {
            env_prefix: "SENTIO".to_string(),
            resolve_env_vars: true,
            env: Arc::new(|name| std::env::var(name).ok()),
        }
    }

    /// Creates a builder for configuring the loader.
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder::new()
    }

    /// Sets the environment variable prefix.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables or disables placeholders and environment overrides.
    pub fn with_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = enabled;
        self
    }

    /// Replaces the environment lookup.
    pub fn with_env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    /// Loads configuration from a file.
    ///
    /// The file format is determined by the file extension:
    /// - `.yaml` or `.yml` - YAML format
    /// - `.toml` - TOML format
    /// - `.json` - JSON format
    pub fn load(&self, path: impl AsRef<Path>) -> ConfigResult<SentioConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        let format = ConfigFormat::from_path(path)?;
        let content = self.read_file(path)?;

        let content = self.resolve(&content)?;
        let mut config = parse_str(&content, format).map_err(|e| match e {
            ConfigError::Serialization { message } => ConfigError::parse(path, message),
            other => other,
        })?;

        self.finish(&mut config)?;

        debug!(
            transport = config.connection.transport_name(),
            max_rooms = config.discovery.max_rooms,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Loads configuration from a string.
    pub fn load_from_str(&self, content: &str, format: ConfigFormat) -> ConfigResult<SentioConfig> {
        let content = self.resolve(content)?;
        let mut config = parse_str(&content, format)?;
        self.finish(&mut config)?;
        Ok(config)
    }

    fn finish(&self, config: &mut SentioConfig) -> ConfigResult<()> {
        if self.resolve_env_vars {
            self.apply_env_overrides(config)?;
        }
        config.validate()
    }

    fn read_file(&self, path: &Path) -> ConfigResult<String> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))
    }

    fn resolve(&self, content: &str) -> ConfigResult<String> {
        if self.resolve_env_vars {
            self.resolve_env_placeholders(content)
        } else {
            Ok(content.to_string())
        }
    }

    /// Resolves `${VAR_NAME}` and `${VAR_NAME:default}` placeholders.
    ///
    /// An unset variable without a default is an error. An unterminated
    /// placeholder is kept verbatim.
    fn resolve_env_placeholders(&self, content: &str) -> ConfigResult<String> {
        let mut result = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("${") {
            result.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find('}') else {
                result.push_str(&rest[start..]);
                return Ok(result);
            };

            let inner = &after[..end];
            let (name, default) = match inner.split_once(':') {
                Some((name, default)) => (name, Some(default)),
                None => (inner, None),
            };

            match ((self.env)(name), default) {
                (Some(value), _) => result.push_str(&value),
                (None, Some(default)) => result.push_str(default),
                (None, None) => return Err(ConfigError::env_var_not_found(name)),
            }

            rest = &after[end + 1..];
        }

        result.push_str(rest);
        Ok(result)
    }

    /// Reads `SENTIO_*` overrides from the environment.
    pub fn env_overrides(&self) -> ConfigResult<ConnectionOverrides> {
        Ok(ConnectionOverrides {
            host: self.var("HOST"),
            port: self.parsed_var("PORT", "expected a port number")?,
            serial_port: self.var("SERIAL_PORT"),
            baud_rate: self.parsed_var("BAUD_RATE", "expected a baud rate")?,
            unit_id: self.parsed_var("UNIT_ID", "expected a unit ID (1-247)")?,
        })
    }

    fn apply_env_overrides(&self, config: &mut SentioConfig) -> ConfigResult<()> {
        let overrides = self.env_overrides()?;
        if !overrides.is_empty() {
            debug!(?overrides, "Applying environment overrides");
            config.apply_overrides(&overrides);
        }

        if let Some(value) = self.var("LOG_LEVEL") {
            config.logging.level = LogLevel::from_str(&value)
                .map_err(|message| ConfigError::invalid_env_var(self.var_name("LOG_LEVEL"), message))?;
        }

        Ok(())
    }

    fn var_name(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.env_prefix)
    }

    fn var(&self, suffix: &str) -> Option<String> {
        (self.env)(&self.var_name(suffix)).filter(|v| !v.is_empty())
    }

    fn parsed_var<T: FromStr>(&self, suffix: &str, expected: &str) -> ConfigResult<Option<T>> {
        self.var(suffix)
            .map(|value| {
                value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::invalid_env_var(self.var_name(suffix), expected))
            })
            .transpose()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("env_prefix", &self.env_prefix)
            .field("resolve_env_vars", &self.resolve_env_vars)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// ConfigLoaderBuilder
// =============================================================================

/// Builder for ConfigLoader.
#[derive(Default)]
pub struct ConfigLoaderBuilder {
    env_prefix: Option<String>,
    resolve_env_vars: Option<bool>,
    env: Option<EnvLookup>,
}

impl ConfigLoaderBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the environment prefix.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Enables or disables environment variable resolution.
    pub fn resolve_env_vars(mut self, enabled: bool) -> Self {
        self.resolve_env_vars = Some(enabled);
        self
    }

    /// Sets the environment lookup.
    pub fn env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Some(Arc::new(lookup));
        self
    }

    /// Builds the ConfigLoader.
    pub fn build(self) -> ConfigLoader {
        let mut loader = ConfigLoader::new();

        if let Some(prefix) = self.env_prefix {
            loader.env_prefix = prefix;
        }
        if let Some(resolve_env_vars) = self.resolve_env_vars {
            loader.resolve_env_vars = resolve_env_vars;
        }
        if let Some(env) = self.env {
            loader.env = env;
        }

        loader
    }
}

// =============================================================================
// ConfigFormat
// =============================================================================

/// Supported configuration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format.
    Yaml,
    /// TOML format.
    Toml,
    /// JSON format.
    Json,
}

impl ConfigFormat {
    /// Determines the format from a file path.
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some("json") => Ok(ConfigFormat::Json),
            Some(other) => Err(ConfigError::unsupported_format(other)),
            None => Err(ConfigError::unsupported_format("(no extension)")),
        }
    }

    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
            ConfigFormat::Json => "json",
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_str(content: &str, format: ConfigFormat) -> ConfigResult<SentioConfig> {
    match format {
        ConfigFormat::Yaml => parse_yaml(content),
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::serialization(e.to_string()))
        }
    }
}

fn parse_yaml<T: DeserializeOwned>(content: &str) -> ConfigResult<T> {
    config::Config::builder()
        .add_source(config::File::from_str(content, config::FileFormat::Yaml))
        .build()
        .map_err(|e| ConfigError::serialization(e.to_string()))?
        .try_deserialize()
        .map_err(|e| ConfigError::serialization(e.to_string()))
}

// =============================================================================
// Convenience Functions
// =============================================================================

/// Loads configuration from a file with default settings.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<SentioConfig> {
    ConfigLoader::new().load(path)
}

/// Loads configuration from a string with the specified format.
pub fn load_config_str(content: &str, format: ConfigFormat) -> ConfigResult<SentioConfig> {
    ConfigLoader::new().load_from_str(content, format)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ConnectionConfig, LogFormat};
    use std::collections::HashMap;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    const TCP_YAML: &str = r#"
connection:
  transport: tcp
  host: 192.168.1.50
  operation_timeout: 2s

discovery:
  max_rooms: 12

logging:
  level: debug
  format: json
"#;

    fn loader_with(vars: &[(&str, &str)]) -> ConfigLoader {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigLoader::new().with_env_lookup(move |name| vars.get(name).cloned())
    }

    #[test]
    fn test_load_yaml() {
        let mut file = NamedTempFile::with_suffix(".yaml").unwrap();
        file.write_all(TCP_YAML.as_bytes()).unwrap();

        let config = loader_with(&[]).load(file.path()).unwrap();

        let ConnectionConfig::Tcp(tcp) = &config.connection else {
            panic!("Expected TCP");
        };
        assert_eq!(tcp.host, "192.168.1.50");
        assert_eq!(tcp.port, 502);
        assert_eq!(tcp.operation_timeout, Duration::from_secs(2));
        assert_eq!(config.discovery.max_rooms, 12);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_toml_rtu() {
        let toml = r#"
[connection]
transport = "rtu"
port = "/dev/ttyUSB0"
baud_rate = 9600
parity = "even"
"#;
        let config = loader_with(&[])
            .load_from_str(toml, ConfigFormat::Toml)
            .unwrap();

        let ConnectionConfig::Rtu(rtu) = &config.connection else {
            panic!("Expected RTU");
        };
        assert_eq!(rtu.baud_rate, 9600);
        assert_eq!(rtu.data_bits, 8);
        assert_eq!(rtu.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_load_json() {
        let json = r#"{"connection": {"transport": "tcp", "host": "sentio.local", "unit_id": 2}}"#;
        let config = loader_with(&[]).load_from_str(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.connection_settings().unwrap().unit_id(), 2);
    }

    #[test]
    fn test_config_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("sentio.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("sentio.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(ConfigFormat::from_path(Path::new("sentio.ini")).is_err());
        assert!(ConfigFormat::from_path(Path::new("sentio")).is_err());
    }

    #[test]
    fn test_env_placeholders() {
        let loader = loader_with(&[("CONTROLLER", "10.1.2.3")]);
        assert_eq!(
            loader.resolve_env_placeholders("host: ${CONTROLLER}").unwrap(),
            "host: 10.1.2.3"
        );
        assert_eq!(
            loader.resolve_env_placeholders("port: ${PORT:1502}").unwrap(),
            "port: 1502"
        );
        assert_eq!(
            loader.resolve_env_placeholders("x: ${OPEN").unwrap(),
            "x: ${OPEN"
        );
        assert!(matches!(
            loader.resolve_env_placeholders("host: ${MISSING}"),
            Err(ConfigError::EnvVarNotFound { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let loader = loader_with(&[
            ("SENTIO_HOST", "10.9.9.9"),
            ("SENTIO_PORT", "1502"),
            ("SENTIO_LOG_LEVEL", "warn"),
        ]);
        let config = loader.load_from_str(TCP_YAML, ConfigFormat::Yaml).unwrap();

        let ConnectionConfig::Tcp(tcp) = &config.connection else {
            panic!("Expected TCP");
        };
        assert_eq!(tcp.host, "10.9.9.9");
        assert_eq!(tcp.port, 1502);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_invalid_env_override() {
        let loader = loader_with(&[("SENTIO_UNIT_ID", "many")]);
        let err = loader.load_from_str(TCP_YAML, ConfigFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref name, .. } if name == "SENTIO_UNIT_ID"));
    }

    #[test]
    fn test_env_vars_disabled() {
        let loader = ConfigLoader::builder()
            .resolve_env_vars(false)
            .env_lookup(|_| Some("ignored".to_string()))
            .build();
        let config = loader.load_from_str(TCP_YAML, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = "connection:\n  transport: tcp\n  host: h\npolling: 5\n";
        let err = loader_with(&[]).load_from_str(yaml, ConfigFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Serialization { .. }));
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let yaml = "connection:\n  transport: tcp\n  host: h\ndiscovery:\n  max_rooms: 40\n";
        let err = loader_with(&[]).load_from_str(yaml, ConfigFormat::Yaml).unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { .. }));
    }

    #[test]
    fn test_file_not_found() {
        let result = ConfigLoader::new().load("/nonexistent/path/sentio.yaml");
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = loader_with(&[]).load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
