// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Transport selection from connection settings.
//!
//! [`SentioTransport`] picks TCP or RTU at runtime so that applications can
//! hold a single `RegisterGateway<SentioTransport>` regardless of how the
//! controller is wired.

use async_trait::async_trait;

use crate::client::{
    ModbusRtuTransport, ModbusTcpTransport, ModbusTransport, RegisterGateway, TransportState,
};
use crate::error::SentioResult;
use crate::types::ConnectionSettings;

// =============================================================================
// SentioTransport
// =============================================================================

/// A TCP or RTU transport chosen from [`ConnectionSettings`].
pub enum SentioTransport {
    /// Modbus TCP.
    Tcp(ModbusTcpTransport),
    /// Modbus RTU.
    Rtu(ModbusRtuTransport),
}

impl SentioTransport {
    /// Validates `settings` and builds the matching transport.
    pub fn from_settings(settings: ConnectionSettings) -> SentioResult<Self> {
        settings.validate()?;
        Ok(match settings {
            ConnectionSettings::Tcp(tcp) => Self::Tcp(ModbusTcpTransport::new(tcp)),
            ConnectionSettings::Rtu(rtu) => Self::Rtu(ModbusRtuTransport::new(rtu)),
        })
    }

    /// Returns `"tcp"` or `"rtu"`.
    pub fn transport_name(&self) -> &'static str {
        match self {
            Self::Tcp(_) => "tcp",
            Self::Rtu(_) => "rtu",
        }
    }
}

#[async_trait]
impl ModbusTransport for SentioTransport {
    async fn connect(&mut self) -> SentioResult<()> {
        match self {
            Self::Tcp(t) => t.connect().await,
            Self::Rtu(t) => t.connect().await,
        }
    }

    async fn disconnect(&mut self) -> SentioResult<()> {
        match self {
            Self::Tcp(t) => t.disconnect().await,
            Self::Rtu(t) => t.disconnect().await,
        }
    }

    fn is_connected(&self) -> bool {
        match self {
            Self::Tcp(t) => t.is_connected(),
            Self::Rtu(t) => t.is_connected(),
        }
    }

    fn state(&self) -> TransportState {
        match self {
            Self::Tcp(t) => t.state(),
            Self::Rtu(t) => t.state(),
        }
    }

    async fn read_discrete_inputs(&self, address: u16, count: u16) -> SentioResult<Vec<bool>> {
        match self {
            Self::Tcp(t) => t.read_discrete_inputs(address, count).await,
            Self::Rtu(t) => t.read_discrete_inputs(address, count).await,
        }
    }

    async fn read_holding_registers(&self, address: u16, count: u16) -> SentioResult<Vec<u16>> {
        match self {
            Self::Tcp(t) => t.read_holding_registers(address, count).await,
            Self::Rtu(t) => t.read_holding_registers(address, count).await,
        }
    }

    async fn read_input_registers(&self, address: u16, count: u16) -> SentioResult<Vec<u16>> {
        match self {
            Self::Tcp(t) => t.read_input_registers(address, count).await,
            Self::Rtu(t) => t.read_input_registers(address, count).await,
        }
    }

    async fn write_single_register(&self, address: u16, value: u16) -> SentioResult<()> {
        match self {
            Self::Tcp(t) => t.write_single_register(address, value).await,
            Self::Rtu(t) => t.write_single_register(address, value).await,
        }
    }

    fn unit_id(&self) -> u8 {
        match self {
            Self::Tcp(t) => t.unit_id(),
            Self::Rtu(t) => t.unit_id(),
        }
    }

    fn display_name(&self) -> String {
        match self {
            Self::Tcp(t) => t.display_name(),
            Self::Rtu(t) => t.display_name(),
        }
    }
}

impl std::fmt::Debug for SentioTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tcp(t) => t.fmt(f),
            Self::Rtu(t) => t.fmt(f),
        }
    }
}

impl RegisterGateway<SentioTransport> {
    /// Builds a gateway from connection settings. Nothing is opened yet.
    pub fn from_settings(settings: ConnectionSettings) -> SentioResult<Self> {
        Ok(Self::new(SentioTransport::from_settings(settings)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::types::{RtuSettings, TcpSettings};

    #[test]
    fn test_tcp_from_settings() {
        let transport = SentioTransport::from_settings(TcpSettings::new("10.0.0.5").into()).unwrap();
        assert_eq!(transport.transport_name(), "tcp");
        assert_eq!(transport.display_name(), "tcp://10.0.0.5:502");
        assert_eq!(transport.state(), TransportState::Disconnected);
    }

    #[test]
    fn test_rtu_from_settings() {
        let transport =
            SentioTransport::from_settings(RtuSettings::new("/dev/ttyUSB1").into()).unwrap();
        assert_eq!(transport.transport_name(), "rtu");
        assert_eq!(transport.unit_id(), 1);
        assert!(!transport.is_connected());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = TcpSettings {
            unit_id: 0,
            ..TcpSettings::new("10.0.0.5")
        };
        let err = SentioTransport::from_settings(settings.into()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_gateway_from_settings_is_not_connected() {
        let gateway = RegisterGateway::from_settings(TcpSettings::new("10.0.0.5").into()).unwrap();
        assert!(!gateway.is_connected());
        assert!(gateway.identity().is_none());

        let err = gateway.outdoor_temperature().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
    }
}
