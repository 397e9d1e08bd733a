// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core types for the Sentio register gateway.
//!
//! - **RegisterKind**: the three Modbus tables the controller exposes
//! - **RegisterDescriptor**: an immutable named register entry
//! - **RegisterValue**: a decoded register value
//! - **TcpSettings** / **RtuSettings**: connection settings with builders
//! - **ConnectionSettings**: either of the above, tagged by transport
//!
//! # Examples
//!
//! ```
//! use sentio_modbus::registers;
//! use sentio_modbus::types::TcpSettings;
//!
//! assert_eq!(registers::ROOM_NAME.address_for(Some(3)).unwrap(), 401);
//!
//! let settings = TcpSettings::builder()
//!     .host("192.168.1.50")
//!     .unit_id(1)
//!     .build()
//!     .unwrap();
//! assert_eq!(settings.port, 502);
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, ConversionError, OperationError, SentioError, SentioResult};
use crate::registers::{DEFAULT_BAUD_RATE, DEFAULT_TCP_PORT, DEFAULT_UNIT_ID, ROOM_ADDRESS_STRIDE};

// =============================================================================
// RegisterKind
// =============================================================================

/// The Modbus table a register lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterKind {
    /// Discrete input (read-only, 1 bit, function code 2).
    DiscreteInput,

    /// Input register (read-only, 16 bits, function code 4).
    InputRegister,

    /// Holding register (read/write, 16 bits, function codes 3 and 6).
    HoldingRegister,
}

impl RegisterKind {
    /// Returns `true` if registers of this kind accept writes.
    #[inline]
    pub const fn is_writable(&self) -> bool {
        matches!(self, Self::HoldingRegister)
    }

    /// Returns the short name used in listings.
    pub const fn short_name(&self) -> &'static str {
        match self {
            Self::DiscreteInput => "DI",
            Self::InputRegister => "IR",
            Self::HoldingRegister => "HR",
        }
    }

    /// Returns the full name.
    pub const fn full_name(&self) -> &'static str {
        match self {
            Self::DiscreteInput => "discrete input",
            Self::InputRegister => "input register",
            Self::HoldingRegister => "holding register",
        }
    }
}

impl fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.full_name())
    }
}

// =============================================================================
// ValueType / Scope
// =============================================================================

/// How the words of a register are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Unsigned integer over 1, 2 or 4 big-endian words.
    RawInteger,
    /// UTF-8 text, two bytes per word, NUL padded.
    AsciiString,
    /// A single word holding the value multiplied by 100.
    FixedPoint100,
}

impl ValueType {
    /// Returns the type name used in messages.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RawInteger => "integer",
            Self::AsciiString => "string",
            Self::FixedPoint100 => "fixed_point_100",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a register is global or repeated per room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// One register for the whole controller.
    Generic,
    /// Repeated every [`ROOM_ADDRESS_STRIDE`] addresses, once per room.
    PerRoom,
}

// =============================================================================
// RegisterDescriptor
// =============================================================================

/// An immutable, named entry of the register map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RegisterDescriptor {
    /// Register name.
    pub name: &'static str,
    /// Modbus table.
    pub kind: RegisterKind,
    /// Base address (room 0 for per-room registers).
    pub address: u16,
    /// Number of words.
    pub count: u16,
    /// Word interpretation.
    pub value_type: ValueType,
    /// Addressing scope.
    pub scope: Scope,
}

impl RegisterDescriptor {
    /// Creates a descriptor.
    pub const fn new(
        name: &'static str,
        kind: RegisterKind,
        address: u16,
        count: u16,
        value_type: ValueType,
        scope: Scope,
    ) -> Self {
        Self {
            name,
            kind,
            address,
            count,
            value_type,
            scope,
        }
    }

    /// Returns the effective address for the given room.
    ///
    /// Generic registers ignore `room`. Per-room registers resolve to
    /// `address + room * 100` and fail when `room` is missing or the result
    /// leaves the 16-bit address space.
    pub fn address_for(&self, room: Option<u8>) -> SentioResult<u16> {
        match self.scope {
            Scope::Generic => Ok(self.address),
            Scope::PerRoom => {
                let room = room.ok_or(OperationError::RoomRequired { name: self.name })?;
                let offset = u32::from(room) * u32::from(ROOM_ADDRESS_STRIDE);
                u16::try_from(u32::from(self.address) + offset).map_err(|_| {
                    SentioError::operation(OperationError::AddressOverflow {
                        name: self.name,
                        room,
                    })
                })
            }
        }
    }

    /// Returns `true` if this register accepts writes.
    #[inline]
    pub const fn is_writable(&self) -> bool {
        self.kind.is_writable()
    }

    /// Returns `true` if this register is repeated per room.
    #[inline]
    pub const fn is_per_room(&self) -> bool {
        matches!(self.scope, Scope::PerRoom)
    }
}

impl fmt::Display for RegisterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {}", self.name, self.kind.short_name(), self.address)?;
        if self.count > 1 {
            write!(f, ", {} words", self.count)?;
        }
        if self.is_per_room() {
            f.write_str(", per room")?;
        }
        f.write_str(")")
    }
}

// =============================================================================
// RegisterValue
// =============================================================================

/// A decoded register value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RegisterValue {
    /// Unsigned integer (also discrete inputs, as 0 or 1).
    Integer(u64),
    /// Decoded text.
    Text(String),
    /// Fixed-point value as a decimal.
    Decimal(f64),
}

impl RegisterValue {
    /// Returns the variant name used in type mismatch errors.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Text(_) => "string",
            Self::Decimal(_) => "decimal",
        }
    }

    /// Returns the integer, if this is one.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as a float for integer and decimal variants.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Decimal(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Returns the text, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer or a type mismatch error.
    pub fn expect_integer(&self) -> SentioResult<u64> {
        self.as_u64().ok_or_else(|| {
            SentioError::conversion(ConversionError::type_mismatch("integer", self.type_name()))
        })
    }

    /// Returns the text or a type mismatch error.
    pub fn into_text(self) -> SentioResult<String> {
        match self {
            Self::Text(s) => Ok(s),
            other => Err(SentioError::conversion(ConversionError::type_mismatch(
                "string",
                other.type_name(),
            ))),
        }
    }

    /// Returns the decimal or a type mismatch error.
    pub fn expect_decimal(&self) -> SentioResult<f64> {
        match self {
            Self::Decimal(v) => Ok(*v),
            other => Err(SentioError::conversion(ConversionError::type_mismatch(
                "decimal",
                other.type_name(),
            ))),
        }
    }
}

impl fmt::Display for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "\"{s}\""),
            Self::Decimal(v) => write!(f, "{v:.2}"),
        }
    }
}

impl From<u64> for RegisterValue {
    fn from(v: u64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for RegisterValue {
    fn from(v: f64) -> Self {
        Self::Decimal(v)
    }
}

impl From<&str> for RegisterValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

// =============================================================================
// TcpSettings
// =============================================================================

/// Settings for a Modbus TCP connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpSettings {
    /// Controller host name or address.
    pub host: String,

    /// TCP port (default: 502).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Unit ID (default: 1).
    #[serde(default = "default_unit_id")]
    pub unit_id: u8,

    /// Deadline for establishing the connection.
    #[serde(default = "default_connect_timeout")]
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Deadline for each read or write.
    #[serde(default = "default_operation_timeout")]
    #[serde(with = "humantime_serde")]
    pub operation_timeout: Duration,

    /// Enable TCP_NODELAY.
    #[serde(default = "default_true")]
    pub tcp_nodelay: bool,
}

fn default_port() -> u16 {
    DEFAULT_TCP_PORT
}

fn default_unit_id() -> u8 {
    DEFAULT_UNIT_ID
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_operation_timeout() -> Duration {
    Duration::from_secs(3)
}

fn default_true() -> bool {
    true
}

fn validate_unit_id(unit_id: u8) -> SentioResult<()> {
    if unit_id == 0 || unit_id > 247 {
        return Err(SentioError::configuration(ConfigurationError::invalid_unit_id(
            unit_id,
        )));
    }
    Ok(())
}

fn validate_timeout(duration: Duration, what: &str) -> SentioResult<()> {
    if duration.is_zero() {
        return Err(SentioError::configuration(ConfigurationError::InvalidTimeout {
            duration,
            reason: format!("{what} must be greater than 0"),
        }));
    }
    Ok(())
}

impl TcpSettings {
    /// Creates a new builder.
    pub fn builder() -> TcpSettingsBuilder {
        TcpSettingsBuilder::default()
    }

    /// Creates settings for `host` with all defaults.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Returns `host:port`.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates these settings.
    pub fn validate(&self) -> SentioResult<()> {
        if self.host.trim().is_empty() {
            return Err(SentioError::configuration(ConfigurationError::missing_field(
                "host",
            )));
        }
        if self.port == 0 {
            return Err(SentioError::configuration(ConfigurationError::InvalidPort {
                port: self.port,
            }));
        }
        validate_unit_id(self.unit_id)?;
        validate_timeout(self.connect_timeout, "Connect timeout")?;
        validate_timeout(self.operation_timeout, "Operation timeout")?;
        Ok(())
    }
}

impl Default for TcpSettings {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            unit_id: default_unit_id(),
            connect_timeout: default_connect_timeout(),
            operation_timeout: default_operation_timeout(),
            tcp_nodelay: true,
        }
    }
}

/// Builder for [`TcpSettings`].
#[derive(Debug, Default)]
pub struct TcpSettingsBuilder {
    host: Option<String>,
    port: Option<u16>,
    unit_id: Option<u8>,
    connect_timeout: Option<Duration>,
    operation_timeout: Option<Duration>,
    tcp_nodelay: Option<bool>,
}

impl TcpSettingsBuilder {
    /// Sets the host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the unit ID.
    pub fn unit_id(mut self, unit_id: u8) -> Self {
        self.unit_id = Some(unit_id);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the per-operation timeout.
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Enables or disables TCP_NODELAY.
    pub fn tcp_nodelay(mut self, nodelay: bool) -> Self {
        self.tcp_nodelay = Some(nodelay);
        self
    }

    /// Builds and validates the settings.
    pub fn build(self) -> SentioResult<TcpSettings> {
        let host = self
            .host
            .ok_or_else(|| SentioError::configuration(ConfigurationError::missing_field("host")))?;

        let settings = TcpSettings {
            host,
            port: self.port.unwrap_or_else(default_port),
            unit_id: self.unit_id.unwrap_or_else(default_unit_id),
            connect_timeout: self.connect_timeout.unwrap_or_else(default_connect_timeout),
            operation_timeout: self
                .operation_timeout
                .unwrap_or_else(default_operation_timeout),
            tcp_nodelay: self.tcp_nodelay.unwrap_or(true),
        };

        settings.validate()?;
        Ok(settings)
    }
}

// =============================================================================
// RtuSettings
// =============================================================================

const VALID_BAUD_RATES: &[u32] = &[
    1200, 2400, 4800, 9600, 14400, 19200, 38400, 57600, 115200,
];

/// Settings for a Modbus RTU (RS-485) connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RtuSettings {
    /// Serial port path (e.g. "/dev/ttyUSB0").
    pub port: String,

    /// Baud rate (default: 19200).
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Data bits.
    #[serde(default)]
    pub data_bits: DataBits,

    /// Parity.
    #[serde(default)]
    pub parity: Parity,

    /// Stop bits.
    #[serde(default)]
    pub stop_bits: StopBits,

    /// Unit ID (default: 1).
    #[serde(default = "default_unit_id")]
    pub unit_id: u8,

    /// Deadline for each read or write.
    #[serde(default = "default_operation_timeout")]
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

impl RtuSettings {
    /// Creates a new builder.
    pub fn builder() -> RtuSettingsBuilder {
        RtuSettingsBuilder::default()
    }

    /// Creates settings for `port` at 19200 8N1.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Default::default()
        }
    }

    /// Returns the line settings in the usual "19200 8N1" notation.
    pub fn line_settings(&self) -> String {
        format!(
            "{} {}{}{}",
            self.baud_rate, self.data_bits, self.parity, self.stop_bits
        )
    }

    /// Validates these settings.
    pub fn validate(&self) -> SentioResult<()> {
        if self.port.trim().is_empty() {
            return Err(SentioError::configuration(ConfigurationError::missing_field(
                "port",
            )));
        }
        if !VALID_BAUD_RATES.contains(&self.baud_rate) {
            return Err(SentioError::configuration(
                ConfigurationError::InvalidBaudRate {
                    baud_rate: self.baud_rate,
                },
            ));
        }
        validate_unit_id(self.unit_id)?;
        validate_timeout(self.timeout, "Timeout")?;
        Ok(())
    }
}

impl Default for RtuSettings {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: default_baud_rate(),
            data_bits: DataBits::default(),
            parity: Parity::default(),
            stop_bits: StopBits::default(),
            unit_id: default_unit_id(),
            timeout: default_operation_timeout(),
        }
    }
}

/// Builder for [`RtuSettings`].
#[derive(Debug, Default)]
pub struct RtuSettingsBuilder {
    port: Option<String>,
    baud_rate: Option<u32>,
    data_bits: Option<DataBits>,
    parity: Option<Parity>,
    stop_bits: Option<StopBits>,
    unit_id: Option<u8>,
    timeout: Option<Duration>,
}

impl RtuSettingsBuilder {
    /// Sets the serial port path.
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.port = Some(port.into());
        self
    }

    /// Sets the baud rate.
    pub fn baud_rate(mut self, rate: u32) -> Self {
        self.baud_rate = Some(rate);
        self
    }

    /// Sets the data bits.
    pub fn data_bits(mut self, bits: DataBits) -> Self {
        self.data_bits = Some(bits);
        self
    }

    /// Sets the parity.
    pub fn parity(mut self, parity: Parity) -> Self {
        self.parity = Some(parity);
        self
    }

    /// Sets the stop bits.
    pub fn stop_bits(mut self, bits: StopBits) -> Self {
        self.stop_bits = Some(bits);
        self
    }

    /// Sets the unit ID.
    pub fn unit_id(mut self, id: u8) -> Self {
        self.unit_id = Some(id);
        self
    }

    /// Sets the per-operation timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds and validates the settings.
    pub fn build(self) -> SentioResult<RtuSettings> {
        let port = self
            .port
            .ok_or_else(|| SentioError::configuration(ConfigurationError::missing_field("port")))?;

        let settings = RtuSettings {
            port,
            baud_rate: self.baud_rate.unwrap_or_else(default_baud_rate),
            data_bits: self.data_bits.unwrap_or_default(),
            parity: self.parity.unwrap_or_default(),
            stop_bits: self.stop_bits.unwrap_or_default(),
            unit_id: self.unit_id.unwrap_or_else(default_unit_id),
            timeout: self.timeout.unwrap_or_else(default_operation_timeout),
        };

        settings.validate()?;
        Ok(settings)
    }
}

// =============================================================================
// Serial Line Settings
// =============================================================================

/// Data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DataBits {
    /// 5 data bits.
    Five,
    /// 6 data bits.
    Six,
    /// 7 data bits.
    Seven,
    /// 8 data bits (default).
    #[default]
    Eight,
}

impl DataBits {
    /// Returns the number of bits.
    pub const fn bits(&self) -> u8 {
        match self {
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
        }
    }
}

impl TryFrom<u8> for DataBits {
    type Error = SentioError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            5 => Ok(Self::Five),
            6 => Ok(Self::Six),
            7 => Ok(Self::Seven),
            8 => Ok(Self::Eight),
            other => Err(SentioError::configuration(
                ConfigurationError::invalid_serial_setting("data_bits", other),
            )),
        }
    }
}

impl fmt::Display for DataBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Parity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Parity {
    /// No parity (default).
    #[default]
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
}

impl Parity {
    /// Returns the single-letter notation.
    pub const fn char(&self) -> char {
        match self {
            Self::None => 'N',
            Self::Odd => 'O',
            Self::Even => 'E',
        }
    }
}

impl FromStr for Parity {
    type Err = SentioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "n" => Ok(Self::None),
            "odd" | "o" => Ok(Self::Odd),
            "even" | "e" => Ok(Self::Even),
            _ => Err(SentioError::configuration(
                ConfigurationError::invalid_serial_setting("parity", s),
            )),
        }
    }
}

impl fmt::Display for Parity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.char())
    }
}

/// Stop bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopBits {
    /// 1 stop bit (default).
    #[default]
    One,
    /// 2 stop bits.
    Two,
}

impl StopBits {
    /// Returns the number of stop bits.
    pub const fn bits(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }
}

impl TryFrom<u8> for StopBits {
    type Error = SentioError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(SentioError::configuration(
                ConfigurationError::invalid_serial_setting("stop_bits", other),
            )),
        }
    }
}

impl fmt::Display for StopBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

// =============================================================================
// ConnectionSettings
// =============================================================================

/// Connection settings for either transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum ConnectionSettings {
    /// Modbus TCP.
    Tcp(TcpSettings),

    /// Modbus RTU over a serial line.
    Rtu(RtuSettings),
}

impl ConnectionSettings {
    /// Returns the transport name.
    pub const fn transport_name(&self) -> &'static str {
        match self {
            Self::Tcp(_) => "tcp",
            Self::Rtu(_) => "rtu",
        }
    }

    /// Returns the unit ID.
    pub fn unit_id(&self) -> u8 {
        match self {
            Self::Tcp(c) => c.unit_id,
            Self::Rtu(c) => c.unit_id,
        }
    }

    /// Returns the per-operation timeout.
    pub fn operation_timeout(&self) -> Duration {
        match self {
            Self::Tcp(c) => c.operation_timeout,
            Self::Rtu(c) => c.timeout,
        }
    }

    /// Returns a short description of the endpoint.
    pub fn endpoint(&self) -> String {
        match self {
            Self::Tcp(c) => c.socket_addr(),
            Self::Rtu(c) => format!("{} @ {}", c.port, c.line_settings()),
        }
    }

    /// Validates the inner settings.
    pub fn validate(&self) -> SentioResult<()> {
        match self {
            Self::Tcp(c) => c.validate(),
            Self::Rtu(c) => c.validate(),
        }
    }
}

impl From<TcpSettings> for ConnectionSettings {
    fn from(settings: TcpSettings) -> Self {
        Self::Tcp(settings)
    }
}

impl From<RtuSettings> for ConnectionSettings {
    fn from(settings: RtuSettings) -> Self {
        Self::Rtu(settings)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::registers;

    #[test]
    fn test_register_kind_writability() {
        assert!(RegisterKind::HoldingRegister.is_writable());
        assert!(!RegisterKind::InputRegister.is_writable());
        assert!(!RegisterKind::DiscreteInput.is_writable());
    }

    #[test]
    fn test_per_room_address_for_every_slot() {
        for room in 0..registers::MAX_ROOMS {
            let address = registers::ROOM_AIR_TEMP_ACTUAL.address_for(Some(room)).unwrap();
            assert_eq!(address, 104 + u16::from(room) * 100);
        }
    }

    #[test]
    fn test_generic_address_ignores_room() {
        assert_eq!(registers::OUTDOOR_TEMPERATURE.address_for(None).unwrap(), 3301);
        assert_eq!(registers::OUTDOOR_TEMPERATURE.address_for(Some(5)).unwrap(), 3301);
    }

    #[test]
    fn test_per_room_address_requires_room() {
        let err = registers::ROOM_NAME.address_for(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
    }

    #[test]
    fn test_per_room_address_overflow() {
        let err = registers::ROOM_NAME.address_for(Some(255)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert!(err.to_string().contains("room 255"));
    }

    #[test]
    fn test_descriptor_display() {
        assert_eq!(
            registers::ROOM_NAME.to_string(),
            "RoomName (HR 101, 16 words, per room)"
        );
        assert_eq!(registers::DEVICE_TYPE.to_string(), "DeviceType (IR 10)");
    }

    #[test]
    fn test_register_value_accessors() {
        assert_eq!(RegisterValue::Integer(42).as_u64(), Some(42));
        assert_eq!(RegisterValue::Integer(42).as_f64(), Some(42.0));
        assert_eq!(RegisterValue::from("Kitchen").as_str(), Some("Kitchen"));
        assert!(RegisterValue::Decimal(1.5).expect_integer().is_err());
        assert_eq!(RegisterValue::Decimal(19.5).to_string(), "19.50");
    }

    #[test]
    fn test_tcp_builder_defaults() {
        let settings = TcpSettings::builder().host("sentio.local").build().unwrap();
        assert_eq!(settings.port, 502);
        assert_eq!(settings.unit_id, 1);
        assert_eq!(settings.connect_timeout, Duration::from_secs(5));
        assert_eq!(settings.operation_timeout, Duration::from_secs(3));
        assert!(settings.tcp_nodelay);
        assert_eq!(settings.socket_addr(), "sentio.local:502");
    }

    #[test]
    fn test_tcp_validation() {
        assert!(TcpSettings::builder().build().is_err());
        assert!(TcpSettings::builder().host("h").unit_id(0).build().is_err());
        assert!(TcpSettings::builder().host("h").unit_id(248).build().is_err());
        assert!(TcpSettings::builder().host("h").port(0).build().is_err());
        let err = TcpSettings::builder()
            .host("h")
            .operation_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_rtu_builder_defaults() {
        let settings = RtuSettings::builder().port("/dev/ttyUSB0").build().unwrap();
        assert_eq!(settings.baud_rate, 19200);
        assert_eq!(settings.line_settings(), "19200 8N1");
    }

    #[test]
    fn test_rtu_invalid_baud_rate() {
        let err = RtuSettings::builder()
            .port("/dev/ttyUSB0")
            .baud_rate(12345)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("12345"));
    }

    #[test]
    fn test_serial_setting_conversions() {
        assert_eq!(DataBits::try_from(7).unwrap(), DataBits::Seven);
        assert!(DataBits::try_from(9).is_err());
        assert_eq!(StopBits::try_from(2).unwrap(), StopBits::Two);
        assert_eq!("even".parse::<Parity>().unwrap(), Parity::Even);
        assert!("mark".parse::<Parity>().is_err());
    }

    #[test]
    fn test_connection_settings_serde() {
        let json = r#"{"transport":"tcp","host":"10.0.0.5","operation_timeout":"1s"}"#;
        let settings: ConnectionSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.transport_name(), "tcp");
        assert_eq!(settings.operation_timeout(), Duration::from_secs(1));
        assert_eq!(settings.endpoint(), "10.0.0.5:502");

        let rtu = ConnectionSettings::from(RtuSettings::new("/dev/ttyUSB0"));
        assert_eq!(rtu.endpoint(), "/dev/ttyUSB0 @ 19200 8N1");
        assert_eq!(rtu.unit_id(), 1);
    }
}
