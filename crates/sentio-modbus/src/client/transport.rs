// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Transport abstraction between the gateway and the Modbus client library.
//!
//! The gateway only ever talks to a [`ModbusTransport`]. Implementations own
//! the live session and serialize requests on it; library errors never cross
//! this boundary unconverted.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio_modbus::ExceptionCode;

use crate::error::{ProtocolError, SentioError, SentioResult};

// =============================================================================
// TransportState
// =============================================================================

/// Connection state of a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransportState {
    /// No session.
    #[default]
    Disconnected,
    /// Session being established.
    Connecting,
    /// Session ready for requests.
    Connected,
    /// The last connect attempt failed, or an open session broke.
    Error,
}

impl TransportState {
    /// Returns `true` if the transport is connected.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// ModbusTransport Trait
// =============================================================================

/// A request/response Modbus session to a single unit.
///
/// # Implementors
///
/// - [`ModbusTcpTransport`](super::tcp::ModbusTcpTransport)
/// - [`ModbusRtuTransport`](super::rtu::ModbusRtuTransport)
/// - [`SentioTransport`](crate::driver::SentioTransport), dispatching to either
///
/// Reads and writes take `&self`; implementations hold at most one request in
/// flight at a time.
#[async_trait]
pub trait ModbusTransport: Send + Sync {
    // =========================================================================
    // Connection Management
    // =========================================================================

    /// Opens the session.
    async fn connect(&mut self) -> SentioResult<()>;

    /// Closes the session. Closing a closed transport is a no-op.
    async fn disconnect(&mut self) -> SentioResult<()>;

    /// Returns `true` if the session is open.
    fn is_connected(&self) -> bool;

    /// Returns the current state.
    fn state(&self) -> TransportState;

    // =========================================================================
    // Register Access
    // =========================================================================

    /// Reads discrete inputs (FC 02).
    async fn read_discrete_inputs(&self, address: u16, count: u16) -> SentioResult<Vec<bool>>;

    /// Reads holding registers (FC 03).
    async fn read_holding_registers(&self, address: u16, count: u16) -> SentioResult<Vec<u16>>;

    /// Reads input registers (FC 04).
    async fn read_input_registers(&self, address: u16, count: u16) -> SentioResult<Vec<u16>>;

    /// Writes a single holding register (FC 06).
    async fn write_single_register(&self, address: u16, value: u16) -> SentioResult<()>;

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Returns the unit ID.
    fn unit_id(&self) -> u8;

    /// Returns a display name for logs.
    fn display_name(&self) -> String;
}

// =============================================================================
// LinkHealth
// =============================================================================

/// Marks an open session as broken from the `&self` request paths.
///
/// A lost link reports [`TransportState::Error`] and lets `connect()` open a
/// fresh session.
#[derive(Debug, Default)]
pub(crate) struct LinkHealth {
    lost: AtomicBool,
}

impl LinkHealth {
    pub(crate) fn mark_lost(&self) {
        self.lost.store(true, Ordering::Release);
    }

    pub(crate) fn reset(&self) {
        self.lost.store(false, Ordering::Release);
    }

    /// Folds the lost flag into the state recorded at connect time.
    pub(crate) fn resolve(&self, state: TransportState) -> TransportState {
        if state == TransportState::Connected && self.lost.load(Ordering::Acquire) {
            TransportState::Error
        } else {
            state
        }
    }
}

// =============================================================================
// Shared Error Mapping
// =============================================================================

/// Converts a tokio-modbus exception code to its wire value.
pub(crate) fn exception_code_to_u8(code: &ExceptionCode) -> u8 {
    match code {
        ExceptionCode::IllegalFunction => 0x01,
        ExceptionCode::IllegalDataAddress => 0x02,
        ExceptionCode::IllegalDataValue => 0x03,
        ExceptionCode::ServerDeviceFailure => 0x04,
        ExceptionCode::Acknowledge => 0x05,
        ExceptionCode::ServerDeviceBusy => 0x06,
        ExceptionCode::MemoryParityError => 0x08,
        ExceptionCode::GatewayPathUnavailable => 0x0A,
        ExceptionCode::GatewayTargetDevice => 0x0B,
        _ => 0xFF,
    }
}

/// Maps an exception response for the given function code.
pub(crate) fn map_exception(exception: ExceptionCode, function_code: u8) -> SentioError {
    SentioError::exception(function_code, exception_code_to_u8(&exception))
}

/// Maps a tokio-modbus protocol violation (mismatched header or function code).
pub(crate) fn map_protocol_violation(error: tokio_modbus::ProtocolError) -> SentioError {
    SentioError::protocol(ProtocolError::unexpected(error.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_state() {
        assert!(TransportState::Connected.is_connected());
        assert!(!TransportState::Error.is_connected());
        assert_eq!(TransportState::default(), TransportState::Disconnected);
        assert_eq!(TransportState::Connecting.to_string(), "connecting");
    }

    #[test]
    fn test_link_health_resolves_state() {
        let health = LinkHealth::default();
        assert_eq!(health.resolve(TransportState::Connected), TransportState::Connected);

        health.mark_lost();
        assert_eq!(health.resolve(TransportState::Connected), TransportState::Error);
        assert_eq!(health.resolve(TransportState::Disconnected), TransportState::Disconnected);

        health.reset();
        assert_eq!(health.resolve(TransportState::Connected), TransportState::Connected);
    }

    #[test]
    fn test_exception_mapping() {
        let err = map_exception(ExceptionCode::IllegalDataAddress, 0x04);
        assert_eq!(err.kind(), crate::error::ErrorKind::ConnectionFailure);
        assert!(err.to_string().contains("Illegal Data Address"));
        assert!(err.to_string().contains("0x04"));
        assert_eq!(exception_code_to_u8(&ExceptionCode::ServerDeviceBusy), 0x06);
    }
}
