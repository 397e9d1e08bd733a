// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema definitions.
//!
//! # Schema Structure
//!
//! ```text
//! SentioConfig
//! ├── connection: ConnectionConfig   (transport: tcp | rtu)
//! ├── discovery: DiscoveryConfig
//! └── logging: LoggingConfig
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use sentio_modbus::registers::{
    DEFAULT_BAUD_RATE, DEFAULT_TCP_PORT, DEFAULT_UNIT_ID, MAX_ROOMS,
};
use sentio_modbus::{ConnectionSettings, DataBits, Parity, RtuSettings, StopBits, TcpSettings};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

// =============================================================================
// Constants
// =============================================================================

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default per-operation timeout.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(3);

// =============================================================================
// Top-Level Configuration
// =============================================================================

/// The root configuration of the Sentio gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SentioConfig {
    /// Controller connection.
    pub connection: ConnectionConfig,

    /// Discovery settings.
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SentioConfig {
    /// Creates a configuration with default discovery and logging sections.
    pub fn new(connection: ConnectionConfig) -> Self {
        Self {
            connection,
            discovery: DiscoveryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Builds a configuration from command-line overrides alone.
    ///
    /// Either a host or a serial port must be given.
    pub fn from_overrides(overrides: &ConnectionOverrides) -> ConfigResult<Self> {
        let connection = if let Some(port) = &overrides.serial_port {
            ConnectionConfig::Rtu(RtuConfig::new(port.clone()))
        } else if let Some(host) = &overrides.host {
            ConnectionConfig::Tcp(TcpConfig::new(host.clone()))
        } else {
            return Err(ConfigError::validation(
                "connection",
                "no configuration file and neither --host nor --serial-port given",
            ));
        };

        let mut config = Self::new(connection);
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Applies connection overrides in place.
    ///
    /// A host switches the connection to TCP and a serial port switches it to
    /// RTU. Port and baud rate only apply to their own transport.
    pub fn apply_overrides(&mut self, overrides: &ConnectionOverrides) {
        if let Some(host) = &overrides.host {
            if let ConnectionConfig::Tcp(tcp) = &mut self.connection {
                tcp.host = host.clone();
            } else {
                self.connection = ConnectionConfig::Tcp(TcpConfig::new(host.clone()));
            }
        }
        if let Some(port) = &overrides.serial_port {
            if let ConnectionConfig::Rtu(rtu) = &mut self.connection {
                rtu.port = port.clone();
            } else {
                self.connection = ConnectionConfig::Rtu(RtuConfig::new(port.clone()));
            }
        }

        match &mut self.connection {
            ConnectionConfig::Tcp(tcp) => {
                if let Some(port) = overrides.port {
                    tcp.port = port;
                }
                if let Some(unit_id) = overrides.unit_id {
                    tcp.unit_id = unit_id;
                }
            }
            ConnectionConfig::Rtu(rtu) => {
                if let Some(baud_rate) = overrides.baud_rate {
                    rtu.baud_rate = baud_rate;
                }
                if let Some(unit_id) = overrides.unit_id {
                    rtu.unit_id = unit_id;
                }
            }
        }
    }

    /// Validates the entire configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.connection_settings()?.validate()?;
        self.discovery.validate()?;
        Ok(())
    }

    /// Converts the connection section into gateway settings.
    pub fn connection_settings(&self) -> ConfigResult<ConnectionSettings> {
        self.connection.to_settings()
    }
}

// =============================================================================
// Connection Configuration
// =============================================================================

/// Connection to the controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum ConnectionConfig {
    /// Modbus TCP.
    Tcp(TcpConfig),
    /// Modbus RTU.
    Rtu(RtuConfig),
}

impl ConnectionConfig {
    /// Returns `"tcp"` or `"rtu"`.
    pub fn transport_name(&self) -> &'static str {
        match self {
            Self::Tcp(_) => "tcp",
            Self::Rtu(_) => "rtu",
        }
    }

    /// Converts into gateway settings.
    pub fn to_settings(&self) -> ConfigResult<ConnectionSettings> {
        Ok(match self {
            Self::Tcp(tcp) => ConnectionSettings::Tcp(tcp.to_settings()),
            Self::Rtu(rtu) => ConnectionSettings::Rtu(rtu.to_settings()?),
        })
    }
}

/// Modbus TCP configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpConfig {
    /// Host address.
    pub host: String,

    /// TCP port.
    #[serde(default = "default_modbus_port")]
    pub port: u16,

    /// Unit ID (slave address).
    #[serde(default = "default_unit_id")]
    pub unit_id: u8,

    /// Connect timeout.
    #[serde(default = "default_connect_timeout", with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Per-operation timeout.
    #[serde(default = "default_operation_timeout", with = "humantime_serde")]
    pub operation_timeout: Duration,

    /// Enable TCP_NODELAY.
    #[serde(default = "default_enabled")]
    pub tcp_nodelay: bool,
}

fn default_modbus_port() -> u16 {
    DEFAULT_TCP_PORT
}

fn default_unit_id() -> u8 {
    DEFAULT_UNIT_ID
}

fn default_connect_timeout() -> Duration {
    DEFAULT_CONNECT_TIMEOUT
}

fn default_operation_timeout() -> Duration {
    DEFAULT_OPERATION_TIMEOUT
}

fn default_enabled() -> bool {
    true
}

impl TcpConfig {
    /// Creates a TCP configuration with defaults.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_modbus_port(),
            unit_id: default_unit_id(),
            connect_timeout: default_connect_timeout(),
            operation_timeout: default_operation_timeout(),
            tcp_nodelay: true,
        }
    }

    fn to_settings(&self) -> TcpSettings {
        TcpSettings {
            host: self.host.clone(),
            port: self.port,
            unit_id: self.unit_id,
            connect_timeout: self.connect_timeout,
            operation_timeout: self.operation_timeout,
            tcp_nodelay: self.tcp_nodelay,
        }
    }
}

/// Modbus RTU configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtuConfig {
    /// Serial port path (e.g., /dev/ttyUSB0 or COM1).
    pub port: String,

    /// Baud rate.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Data bits (5, 6, 7, or 8).
    #[serde(default = "default_data_bits")]
    pub data_bits: u8,

    /// Parity (none, odd, or even).
    #[serde(default)]
    pub parity: Parity,

    /// Stop bits (1 or 2).
    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,

    /// Unit ID (slave address).
    #[serde(default = "default_unit_id")]
    pub unit_id: u8,

    /// Per-operation timeout.
    #[serde(default = "default_operation_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

fn default_data_bits() -> u8 {
    8
}

fn default_stop_bits() -> u8 {
    1
}

impl RtuConfig {
    /// Creates an RTU configuration at 19200 8N1.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: default_baud_rate(),
            data_bits: default_data_bits(),
            parity: Parity::None,
            stop_bits: default_stop_bits(),
            unit_id: default_unit_id(),
            timeout: default_operation_timeout(),
        }
    }

    fn to_settings(&self) -> ConfigResult<RtuSettings> {
        Ok(RtuSettings {
            port: self.port.clone(),
            baud_rate: self.baud_rate,
            data_bits: DataBits::try_from(self.data_bits)?,
            parity: self.parity,
            stop_bits: StopBits::try_from(self.stop_bits)?,
            unit_id: self.unit_id,
            timeout: self.timeout,
        })
    }
}

/// Connection values given on the command line or in the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOverrides {
    /// TCP host.
    pub host: Option<String>,
    /// TCP port.
    pub port: Option<u16>,
    /// Serial port path.
    pub serial_port: Option<String>,
    /// Serial baud rate.
    pub baud_rate: Option<u32>,
    /// Unit ID.
    pub unit_id: Option<u8>,
}

impl ConnectionOverrides {
    /// Returns `true` if no value is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Returns `true` if these overrides name a controller on their own.
    pub fn names_endpoint(&self) -> bool {
        self.host.is_some() || self.serial_port.is_some()
    }
}

// =============================================================================
// Discovery Configuration
// =============================================================================

/// Room discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Number of room slots to scan.
    #[serde(default = "default_max_rooms")]
    pub max_rooms: u8,

    /// Run discovery before room commands.
    #[serde(default = "default_enabled")]
    pub require_discovery: bool,
}

fn default_max_rooms() -> u8 {
    MAX_ROOMS
}

impl DiscoveryConfig {
    /// Validates the discovery configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_rooms == 0 || self.max_rooms > MAX_ROOMS {
            return Err(ConfigError::out_of_range(
                "discovery.max_rooms",
                self.max_rooms,
                1,
                MAX_ROOMS,
            ));
        }
        Ok(())
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_rooms: default_max_rooms(),
            require_discovery: true,
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!("Unknown log level '{s}'")),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// Compact lines.
    Compact,
    /// JSON lines.
    Json,
}

impl LogFormat {
    /// Returns the lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Compact => "compact",
            Self::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown log format '{s}'")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================
