// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the Sentio register gateway.
//!
//! Errors are grouped by the layer that produced them, and every error can be
//! collapsed into a coarse [`ErrorKind`] for callers that only care about the
//! outcome class.
//!
//! # Error Categories
//!
//! ```text
//! SentioError
//! ├── Connection    - TCP/RTU session failures          -> ConnectionFailure
//! ├── Protocol      - Modbus exception responses        -> ConnectionFailure
//! ├── Timeout       - Connect/read/write deadlines      -> ConnectionFailure
//! ├── Device        - Discovery preconditions           -> UnsupportedDevice / IdentityMismatch / UnsupportedFirmware
//! ├── Operation     - Read-only writes, unknown rooms   -> InvalidOperation / RoomNotFound
//! ├── Conversion    - Decode/encode failures            -> UnsupportedEncoding / UnknownEnumValue / InvalidValue
//! └── Configuration - Invalid connection settings       -> Configuration
//! ```
//!
//! # Examples
//!
//! ```
//! use sentio_modbus::error::{ErrorKind, OperationError, SentioError};
//!
//! let error = SentioError::operation(OperationError::room_not_found(7));
//! assert_eq!(error.kind(), ErrorKind::RoomNotFound);
//! assert_eq!(error.to_string(), "Room 7 not found");
//! ```

use std::fmt;
use std::io;
use std::time::Duration;

use thiserror::Error;

use crate::types::RegisterKind;

// =============================================================================
// SentioError - Main Error Type
// =============================================================================

/// The main error type for gateway operations.
#[derive(Debug, Error)]
pub enum SentioError {
    /// Connection-related errors (TCP/RTU).
    #[error("{0}")]
    Connection(#[from] ConnectionError),

    /// Modbus protocol errors (exception responses).
    #[error("{0}")]
    Protocol(#[from] ProtocolError),

    /// Timeout errors.
    #[error("{0}")]
    Timeout(#[from] TimeoutError),

    /// Discovery precondition failures.
    #[error("{0}")]
    Device(#[from] DeviceError),

    /// Operation errors (read-only writes, unknown rooms).
    #[error("{0}")]
    Operation(#[from] OperationError),

    /// Data conversion errors.
    #[error("{0}")]
    Conversion(#[from] ConversionError),

    /// Configuration errors.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),
}

impl SentioError {
    // =========================================================================
    // Factory Methods
    // =========================================================================

    /// Creates a connection error.
    #[inline]
    pub fn connection(error: ConnectionError) -> Self {
        Self::Connection(error)
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(error: ProtocolError) -> Self {
        Self::Protocol(error)
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(error: TimeoutError) -> Self {
        Self::Timeout(error)
    }

    /// Creates a device error.
    #[inline]
    pub fn device(error: DeviceError) -> Self {
        Self::Device(error)
    }

    /// Creates an operation error.
    #[inline]
    pub fn operation(error: OperationError) -> Self {
        Self::Operation(error)
    }

    /// Creates a conversion error.
    #[inline]
    pub fn conversion(error: ConversionError) -> Self {
        Self::Conversion(error)
    }

    /// Creates a configuration error.
    #[inline]
    pub fn configuration(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }

    // =========================================================================
    // Convenience Factory Methods
    // =========================================================================

    /// Creates a not connected error.
    pub fn not_connected() -> Self {
        Self::Connection(ConnectionError::NotConnected)
    }

    /// Creates a read-only register error.
    pub fn read_only(name: &'static str, kind: RegisterKind) -> Self {
        Self::Operation(OperationError::read_only(name, kind))
    }

    /// Creates a room not found error.
    pub fn room_not_found(room: u8) -> Self {
        Self::Operation(OperationError::room_not_found(room))
    }

    /// Creates an unknown enum value error.
    pub fn unknown_enum_value(enum_name: &'static str, value: u64) -> Self {
        Self::Conversion(ConversionError::unknown_enum_value(enum_name, value))
    }

    /// Creates an exception response error.
    pub fn exception(function_code: u8, exception_code: u8) -> Self {
        Self::Protocol(ProtocolError::exception_response(function_code, exception_code))
    }

    // =========================================================================
    // Error Properties
    // =========================================================================

    /// Returns the coarse outcome class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Connection(_) | Self::Protocol(_) | Self::Timeout(_) => {
                ErrorKind::ConnectionFailure
            }
            Self::Device(e) => match e {
                DeviceError::UnsupportedDevice { .. } => ErrorKind::UnsupportedDevice,
                DeviceError::IdentityMismatch { .. } => ErrorKind::IdentityMismatch,
                DeviceError::UnsupportedFirmware { .. } => ErrorKind::UnsupportedFirmware,
            },
            Self::Operation(e) => match e {
                OperationError::ReadOnly { .. } => ErrorKind::InvalidOperation,
                OperationError::RoomNotFound { .. } => ErrorKind::RoomNotFound,
                OperationError::AddressOverflow { .. } | OperationError::RoomRequired { .. } => {
                    ErrorKind::InvalidOperation
                }
            },
            Self::Conversion(e) => match e {
                ConversionError::UnsupportedEncoding { .. } => ErrorKind::UnsupportedEncoding,
                ConversionError::UnknownEnumValue { .. } => ErrorKind::UnknownEnumValue,
                _ => ErrorKind::InvalidValue,
            },
            Self::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Returns recovery hints for this error.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::Connection(e) => e.recovery_hints(),
            Self::Protocol(e) => e.recovery_hints(),
            Self::Timeout(_) => vec![
                "Check that the controller is powered and reachable",
                "Increase the operation timeout in the connection settings",
            ],
            Self::Device(e) => e.recovery_hints(),
            Self::Operation(e) => e.recovery_hints(),
            Self::Conversion(e) => e.recovery_hints(),
            Self::Configuration(e) => e.recovery_hints(),
        }
    }

    /// Returns a short message suitable for end users.
    pub fn user_message(&self) -> String {
        match self {
            Self::Connection(e) => e.user_message(),
            Self::Protocol(_) => "The controller rejected the request".to_string(),
            Self::Timeout(e) => format!(
                "The controller did not answer within {:.1}s",
                e.duration().as_secs_f64()
            ),
            Self::Device(e) => e.to_string(),
            Self::Operation(e) => e.to_string(),
            Self::Conversion(_) => "The controller returned an unexpected value".to_string(),
            Self::Configuration(e) => format!("Invalid connection settings: {e}"),
        }
    }

    /// Logs this error at a level matching its kind.
    pub fn log(&self, context: &str) {
        let kind = self.kind();
        match kind {
            ErrorKind::UnsupportedDevice
            | ErrorKind::IdentityMismatch
            | ErrorKind::UnsupportedFirmware
            | ErrorKind::Configuration => {
                tracing::error!(kind = %kind, context = context, "{self}")
            }
            ErrorKind::ConnectionFailure => {
                tracing::warn!(kind = %kind, context = context, "{self}")
            }
            _ => tracing::debug!(kind = %kind, context = context, "{self}"),
        }
    }
}

// =============================================================================
// ErrorKind
// =============================================================================

/// Coarse outcome classes reported to gateway callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport-level failure: connect, I/O, timeout or exception response.
    ConnectionFailure,
    /// The controller is not a supported model.
    UnsupportedDevice,
    /// The serial number prefix does not match the manufacturer.
    IdentityMismatch,
    /// The controller firmware is too old.
    UnsupportedFirmware,
    /// No decode rule exists for the descriptor's type and word count.
    UnsupportedEncoding,
    /// A write was attempted against a read-only register kind.
    InvalidOperation,
    /// The room index is not part of the discovered set.
    RoomNotFound,
    /// A raw integer has no matching enum member.
    UnknownEnumValue,
    /// Any other decode/encode failure.
    InvalidValue,
    /// Invalid connection settings.
    Configuration,
}

impl ErrorKind {
    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConnectionFailure => "connection_failure",
            Self::UnsupportedDevice => "unsupported_device",
            Self::IdentityMismatch => "identity_mismatch",
            Self::UnsupportedFirmware => "unsupported_firmware",
            Self::UnsupportedEncoding => "unsupported_encoding",
            Self::InvalidOperation => "invalid_operation",
            Self::RoomNotFound => "room_not_found",
            Self::UnknownEnumValue => "unknown_enum_value",
            Self::InvalidValue => "invalid_value",
            Self::Configuration => "configuration",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ConnectionError
// =============================================================================

/// Connection-related errors for TCP and RTU.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// TCP connection refused.
    #[error("Connection refused to {host}:{port}")]
    Refused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        /// Underlying error.
        #[source]
        source: Option<io::Error>,
    },

    /// TCP connection timed out.
    #[error("Connection timed out to {host}:{port} after {duration:?}")]
    TimedOut {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
        /// Elapsed time.
        duration: Duration,
    },

    /// DNS resolution failed.
    #[error("Failed to resolve hostname '{hostname}'")]
    DnsResolutionFailed {
        /// Hostname that failed.
        hostname: String,
        /// Underlying error.
        #[source]
        source: Option<io::Error>,
    },

    /// Serial port not found.
    #[error("Serial port not found: {port}")]
    SerialPortNotFound {
        /// Port path.
        port: String,
    },

    /// Serial port access denied.
    #[error("Serial port access denied: {port}")]
    SerialAccessDenied {
        /// Port path.
        port: String,
    },

    /// Serial port configuration failed.
    #[error("Serial port configuration failed for '{port}': {message}")]
    SerialConfigurationFailed {
        /// Port path.
        port: String,
        /// Error message.
        message: String,
    },

    /// Connection closed by the peer.
    #[error("Connection closed unexpectedly")]
    Closed {
        /// Optional reason.
        reason: Option<String>,
    },

    /// Operation attempted without an open session.
    #[error("Not connected to the controller")]
    NotConnected,

    /// Generic I/O error on an open session.
    #[error("I/O error during {operation}: {source}")]
    Io {
        /// The operation in progress.
        operation: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

impl ConnectionError {
    /// Creates a connection refused error.
    pub fn refused(host: impl Into<String>, port: u16) -> Self {
        Self::Refused {
            host: host.into(),
            port,
            source: None,
        }
    }

    /// Creates a connection refused error with its io source.
    pub fn refused_with(host: impl Into<String>, port: u16, source: io::Error) -> Self {
        Self::Refused {
            host: host.into(),
            port,
            source: Some(source),
        }
    }

    /// Creates a connection timeout error.
    pub fn timed_out(host: impl Into<String>, port: u16, duration: Duration) -> Self {
        Self::TimedOut {
            host: host.into(),
            port,
            duration,
        }
    }

    /// Creates a DNS resolution error.
    pub fn dns_failed(hostname: impl Into<String>) -> Self {
        Self::DnsResolutionFailed {
            hostname: hostname.into(),
            source: None,
        }
    }

    /// Creates a serial port not found error.
    pub fn serial_not_found(port: impl Into<String>) -> Self {
        Self::SerialPortNotFound { port: port.into() }
    }

    /// Creates a serial access denied error.
    pub fn serial_access_denied(port: impl Into<String>) -> Self {
        Self::SerialAccessDenied { port: port.into() }
    }

    /// Creates a closed connection error.
    pub fn closed(reason: Option<String>) -> Self {
        Self::Closed { reason }
    }

    /// Creates an I/O error for the given operation.
    pub fn io(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::Refused { .. } | Self::TimedOut { .. } => vec![
                "Check that the controller is powered on and on the network",
                "Verify the host and port (Modbus TCP defaults to 502)",
                "Make sure no other client holds the controller's only Modbus session",
            ],
            Self::DnsResolutionFailed { .. } => vec![
                "Check the hostname spelling",
                "Use the controller's IP address instead of its hostname",
            ],
            Self::SerialPortNotFound { .. } => vec![
                "Check that the RS-485 adapter is plugged in",
                "List available ports (e.g. ls /dev/ttyUSB*)",
            ],
            Self::SerialAccessDenied { .. } => vec![
                "Add the user to the dialout group",
                "Check the device file permissions",
            ],
            Self::SerialConfigurationFailed { .. } => vec![
                "The Sentio controller uses 19200 baud, 8 data bits, no parity, 1 stop bit",
            ],
            Self::Closed { .. } | Self::Io { .. } => vec![
                "Reconnect and re-run discovery",
            ],
            Self::NotConnected => vec!["Call connect() before issuing register operations"],
        }
    }

    /// Returns a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Refused { host, port, .. } => {
                format!("Could not connect to the controller at {host}:{port}")
            }
            Self::TimedOut { host, port, duration } => format!(
                "Connecting to {host}:{port} timed out after {:.1}s",
                duration.as_secs_f64()
            ),
            Self::SerialPortNotFound { port } => format!("Serial port {port} does not exist"),
            Self::NotConnected => "Not connected to the controller".to_string(),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// ProtocolError
// =============================================================================

/// Modbus protocol errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The device answered with an exception response.
    #[error("Modbus exception: function code {function_code:#04x}, exception {exception_code} ({exception_name})")]
    ExceptionResponse {
        /// Function code of the request.
        function_code: u8,
        /// Exception code from the device.
        exception_code: u8,
        /// Human-readable exception name.
        exception_name: &'static str,
    },

    /// The response could not be interpreted.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// Error message.
        message: String,
    },
}

impl ProtocolError {
    /// Creates an exception response error.
    pub fn exception_response(function_code: u8, exception_code: u8) -> Self {
        Self::ExceptionResponse {
            function_code,
            exception_code,
            exception_name: Self::exception_name(exception_code),
        }
    }

    /// Creates an unexpected response error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse {
            message: message.into(),
        }
    }

    /// Returns the standard name of a Modbus exception code.
    pub fn exception_name(code: u8) -> &'static str {
        match code {
            0x01 => "Illegal Function",
            0x02 => "Illegal Data Address",
            0x03 => "Illegal Data Value",
            0x04 => "Server Device Failure",
            0x05 => "Acknowledge",
            0x06 => "Server Device Busy",
            0x08 => "Memory Parity Error",
            0x0A => "Gateway Path Unavailable",
            0x0B => "Gateway Target Device Failed to Respond",
            _ => "Unknown Exception",
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::ExceptionResponse {
                exception_code: 0x02,
                ..
            } => vec![
                "The register does not exist on this controller",
                "Check the firmware version; older firmware exposes fewer registers",
            ],
            Self::ExceptionResponse { .. } => vec!["Check the unit id and register address"],
            Self::UnexpectedResponse { .. } => vec!["Check for another master on the RS-485 bus"],
        }
    }
}

// =============================================================================
// TimeoutError
// =============================================================================

/// Timeout errors raised by transport deadlines.
#[derive(Debug, Error)]
pub enum TimeoutError {
    /// A read did not complete in time.
    #[error("Read operation timed out after {duration:?}")]
    Read {
        /// Configured deadline.
        duration: Duration,
    },

    /// A write did not complete in time.
    #[error("Write operation timed out after {duration:?}")]
    Write {
        /// Configured deadline.
        duration: Duration,
    },
}

impl TimeoutError {
    /// Creates a read timeout.
    pub fn read(duration: Duration) -> Self {
        Self::Read { duration }
    }

    /// Creates a write timeout.
    pub fn write(duration: Duration) -> Self {
        Self::Write { duration }
    }

    /// Returns the deadline that expired.
    pub fn duration(&self) -> Duration {
        match self {
            Self::Read { duration } | Self::Write { duration } => *duration,
        }
    }
}

// =============================================================================
// DeviceError
// =============================================================================

/// Discovery precondition failures.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device type register holds an unsupported model.
    #[error("Unsupported device type {device_type} ({model})")]
    UnsupportedDevice {
        /// Raw device type code.
        device_type: u64,
        /// Model name, when the code is known.
        model: &'static str,
    },

    /// The serial number prefix is not the manufacturer's.
    #[error("Serial number prefix mismatch: expected {expected}, got {actual}")]
    IdentityMismatch {
        /// Expected prefix.
        expected: u64,
        /// Prefix read from the device.
        actual: u64,
    },

    /// The firmware major version is below the supported minimum.
    #[error("Unsupported firmware {major}.{minor} (minimum major version is {minimum})")]
    UnsupportedFirmware {
        /// Major version read from the device.
        major: u64,
        /// Minor version read from the device.
        minor: u64,
        /// Minimum supported major version.
        minimum: u64,
    },
}

impl DeviceError {
    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::UnsupportedDevice { .. } => vec![
                "Only the CCU-208 central control unit is supported",
                "Check the unit id; another Modbus device may answer on this address",
            ],
            Self::IdentityMismatch { .. } => {
                vec!["The device does not report a Wavin serial number"]
            }
            Self::UnsupportedFirmware { .. } => {
                vec!["Update the controller firmware to 12.x or newer"]
            }
        }
    }
}

// =============================================================================
// OperationError
// =============================================================================

/// Errors raised by the gateway before any transport call is made.
#[derive(Debug, Error)]
pub enum OperationError {
    /// Write attempted against a read-only register kind.
    #[error("Register {name} is read-only ({kind})")]
    ReadOnly {
        /// Descriptor name.
        name: &'static str,
        /// Register kind.
        kind: RegisterKind,
    },

    /// Room index not in the discovered set.
    #[error("Room {room} not found")]
    RoomNotFound {
        /// Requested room index.
        room: u8,
    },

    /// The per-room offset pushed the address beyond the register space.
    #[error("Register {name} has no address for room {room}")]
    AddressOverflow {
        /// Descriptor name.
        name: &'static str,
        /// Requested room index.
        room: u8,
    },

    /// A per-room register was addressed without a room.
    #[error("Register {name} is per-room and needs a room index")]
    RoomRequired {
        /// Descriptor name.
        name: &'static str,
    },
}

impl OperationError {
    /// Creates a read-only error.
    pub fn read_only(name: &'static str, kind: RegisterKind) -> Self {
        Self::ReadOnly { name, kind }
    }

    /// Creates a room not found error.
    pub fn room_not_found(room: u8) -> Self {
        Self::RoomNotFound { room }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::ReadOnly { .. } => vec!["Only holding registers can be written"],
            Self::RoomNotFound { .. } => vec![
                "Run discovery after connecting",
                "Check that the room has a name configured on the controller",
            ],
            Self::AddressOverflow { .. } => vec!["Room indices range from 0 to 23"],
            Self::RoomRequired { .. } => vec!["Pass --room for per-room registers"],
        }
    }
}

// =============================================================================
// ConversionError
// =============================================================================

/// Errors raised while decoding or encoding register words.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// No decode rule for the descriptor's type and word count.
    #[error("Unsupported encoding: {value_type} with {count} register(s)")]
    UnsupportedEncoding {
        /// Value type name.
        value_type: &'static str,
        /// Word count.
        count: u16,
    },

    /// A raw integer has no matching enum member.
    #[error("Unknown {enum_name} value: {value}")]
    UnknownEnumValue {
        /// Enum name.
        enum_name: &'static str,
        /// Raw value.
        value: u64,
    },

    /// The device returned fewer words than requested.
    #[error("Not enough data: expected {expected} register(s), got {actual}")]
    InsufficientData {
        /// Expected word count.
        expected: usize,
        /// Received word count.
        actual: usize,
    },

    /// String registers did not hold valid UTF-8.
    #[error("Invalid string encoding: {message}")]
    InvalidEncoding {
        /// Decoder message.
        message: String,
    },

    /// A value does not fit the target register.
    #[error("Value overflow: {value} exceeds range for {target_type}")]
    Overflow {
        /// Offending value.
        value: String,
        /// Target type name.
        target_type: &'static str,
    },

    /// A write value does not match the descriptor's type.
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected value type.
        expected: &'static str,
        /// Provided value type.
        actual: &'static str,
    },
}

impl ConversionError {
    /// Creates an unsupported encoding error.
    pub fn unsupported_encoding(value_type: &'static str, count: u16) -> Self {
        Self::UnsupportedEncoding { value_type, count }
    }

    /// Creates an unknown enum value error.
    pub fn unknown_enum_value(enum_name: &'static str, value: u64) -> Self {
        Self::UnknownEnumValue { enum_name, value }
    }

    /// Creates an insufficient data error.
    pub fn insufficient_data(expected: usize, actual: usize) -> Self {
        Self::InsufficientData { expected, actual }
    }

    /// Creates an invalid encoding error.
    pub fn invalid_encoding(message: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            message: message.into(),
        }
    }

    /// Creates an overflow error.
    pub fn overflow(value: impl ToString, target_type: &'static str) -> Self {
        Self::Overflow {
            value: value.to_string(),
            target_type,
        }
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(expected: &'static str, actual: &'static str) -> Self {
        Self::TypeMismatch { expected, actual }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::UnknownEnumValue { .. } => {
                vec!["The controller firmware may report states this version does not know"]
            }
            Self::Overflow { .. } => vec!["Fixed-point values must lie within -327.68..=327.67"],
            _ => vec!["Check the register map entry for this value"],
        }
    }
}

// =============================================================================
// ConfigurationError
// =============================================================================

/// Invalid connection settings.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Required field is missing.
    #[error("Missing required configuration: {field}")]
    MissingField {
        /// Field name.
        field: String,
    },

    /// Unit id outside the Modbus range.
    #[error("Invalid unit ID: {unit_id} (valid range: 1-247)")]
    InvalidUnitId {
        /// Offending unit id.
        unit_id: u8,
    },

    /// Port number of zero.
    #[error("Invalid port: {port}")]
    InvalidPort {
        /// Offending port.
        port: u16,
    },

    /// Baud rate not supported by serial adapters.
    #[error("Invalid baud rate: {baud_rate}")]
    InvalidBaudRate {
        /// Offending baud rate.
        baud_rate: u32,
    },

    /// Serial line setting outside the supported values.
    #[error("Invalid {field}: {value}")]
    InvalidSerialSetting {
        /// Setting name.
        field: &'static str,
        /// Offending value.
        value: String,
    },

    /// Timeout of zero.
    #[error("Invalid timeout: {duration:?} ({reason})")]
    InvalidTimeout {
        /// Offending duration.
        duration: Duration,
        /// Reason.
        reason: String,
    },
}

impl ConfigurationError {
    /// Creates a missing field error.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates an invalid unit id error.
    pub fn invalid_unit_id(unit_id: u8) -> Self {
        Self::InvalidUnitId { unit_id }
    }

    /// Creates an invalid serial setting error.
    pub fn invalid_serial_setting(field: &'static str, value: impl ToString) -> Self {
        Self::InvalidSerialSetting {
            field,
            value: value.to_string(),
        }
    }

    /// Returns recovery hints.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::MissingField { .. } => vec!["Set the host (tcp) or serial port (rtu)"],
            Self::InvalidUnitId { .. } => vec!["Unit IDs range from 1 to 247; the Sentio default is 1"],
            Self::InvalidPort { .. } => vec!["Modbus TCP uses port 502"],
            Self::InvalidBaudRate { .. } => vec!["The Sentio controller uses 19200 baud"],
            Self::InvalidTimeout { .. } => vec!["Use a timeout greater than zero, e.g. \"3s\""],
            Self::InvalidSerialSetting { .. } => {
                vec!["Data bits are 5-8, stop bits 1 or 2, parity none/odd/even"]
            }
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// A Result type with SentioError.
pub type SentioResult<T> = Result<T, SentioError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping_for_transport_failures() {
        assert_eq!(SentioError::not_connected().kind(), ErrorKind::ConnectionFailure);
        assert_eq!(SentioError::exception(0x03, 0x02).kind(), ErrorKind::ConnectionFailure);
        assert_eq!(
            SentioError::timeout(TimeoutError::read(Duration::from_secs(3))).kind(),
            ErrorKind::ConnectionFailure
        );
    }

    #[test]
    fn test_kind_mapping_for_discovery_failures() {
        let unsupported = SentioError::device(DeviceError::UnsupportedDevice {
            device_type: 2,
            model: "DHW-201",
        });
        assert_eq!(unsupported.kind(), ErrorKind::UnsupportedDevice);
        assert!(unsupported.to_string().contains("DHW-201"));

        let mismatch = SentioError::device(DeviceError::IdentityMismatch {
            expected: 1530,
            actual: 1234,
        });
        assert_eq!(mismatch.kind(), ErrorKind::IdentityMismatch);

        let firmware = SentioError::device(DeviceError::UnsupportedFirmware {
            major: 11,
            minor: 4,
            minimum: 12,
        });
        assert_eq!(firmware.kind(), ErrorKind::UnsupportedFirmware);
        assert!(firmware.to_string().contains("11.4"));
    }

    #[test]
    fn test_kind_mapping_for_conversion_failures() {
        let encoding = SentioError::conversion(ConversionError::unsupported_encoding("integer", 3));
        assert_eq!(encoding.kind(), ErrorKind::UnsupportedEncoding);

        let unknown = SentioError::unknown_enum_value("HeatingState", 9);
        assert_eq!(unknown.kind(), ErrorKind::UnknownEnumValue);
        assert_eq!(unknown.to_string(), "Unknown HeatingState value: 9");

        let overflow = SentioError::conversion(ConversionError::overflow(1000.0, "fixed-point word"));
        assert_eq!(overflow.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_read_only_message() {
        let error = SentioError::read_only("OutdoorTemperature", RegisterKind::InputRegister);
        assert_eq!(error.kind(), ErrorKind::InvalidOperation);
        assert!(error.to_string().contains("read-only"));
    }

    #[test]
    fn test_exception_names() {
        assert_eq!(ProtocolError::exception_name(0x02), "Illegal Data Address");
        assert_eq!(ProtocolError::exception_name(0x06), "Server Device Busy");
        assert_eq!(ProtocolError::exception_name(0x42), "Unknown Exception");
    }

    #[test]
    fn test_recovery_hints_and_user_message() {
        let error = SentioError::connection(ConnectionError::refused("192.168.1.50", 502));
        assert!(error.recovery_hints().iter().any(|h| h.contains("502")));
        assert!(error.user_message().contains("192.168.1.50:502"));
    }
}
