// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Modbus RTU transport over an RS-485 serial line.
//!
//! The Sentio controller's RS-485 port runs at 19200 baud, 8N1 by default.
//! The serial port is opened with `tokio-serial` and framed by `tokio-modbus`.

use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::error::Elapsed;
use tokio::time::timeout;
use tokio_modbus::client::{Context as ModbusContext, Reader, Writer};
use tokio_modbus::prelude::*;
use tokio_modbus::Error as TokioModbusError;
use tokio_serial::{
    DataBits as SerialDataBits, Parity as SerialParity, SerialPortBuilderExt,
    StopBits as SerialStopBits,
};

use crate::error::{ConnectionError, SentioError, SentioResult, TimeoutError};
use crate::types::{DataBits, Parity, RtuSettings, StopBits};

use super::transport::{
    map_exception, map_protocol_violation, LinkHealth, ModbusTransport, TransportState,
};

// =============================================================================
// ModbusRtuTransport
// =============================================================================

/// Modbus RTU transport.
///
/// A serial I/O failure closes the port handle. Call `connect()` to reopen it.
///
/// # Example
///
/// ```rust,ignore
/// use sentio_modbus::client::{ModbusRtuTransport, ModbusTransport};
/// use sentio_modbus::types::RtuSettings;
///
/// let mut transport = ModbusRtuTransport::new(RtuSettings::new("/dev/ttyUSB0"));
/// transport.connect().await?;
/// ```
pub struct ModbusRtuTransport {
    settings: RtuSettings,
    context: Arc<Mutex<Option<ModbusContext>>>,
    state: TransportState,
    health: LinkHealth,
}

impl ModbusRtuTransport {
    /// Creates a transport for the given settings. The port is not opened yet.
    pub fn new(settings: RtuSettings) -> Self {
        Self {
            settings,
            context: Arc::new(Mutex::new(None)),
            state: TransportState::Disconnected,
            health: LinkHealth::default(),
        }
    }

    /// Returns the settings.
    pub fn settings(&self) -> &RtuSettings {
        &self.settings
    }

    /// Returns the serial port path.
    pub fn port(&self) -> &str {
        &self.settings.port
    }

    fn convert_data_bits(bits: DataBits) -> SerialDataBits {
        match bits {
            DataBits::Five => SerialDataBits::Five,
            DataBits::Six => SerialDataBits::Six,
            DataBits::Seven => SerialDataBits::Seven,
            DataBits::Eight => SerialDataBits::Eight,
        }
    }

    fn convert_parity(parity: Parity) -> SerialParity {
        match parity {
            Parity::None => SerialParity::None,
            Parity::Odd => SerialParity::Odd,
            Parity::Even => SerialParity::Even,
        }
    }

    fn convert_stop_bits(bits: StopBits) -> SerialStopBits {
        match bits {
            StopBits::One => SerialStopBits::One,
            StopBits::Two => SerialStopBits::Two,
        }
    }

    fn map_open_error(&self, e: tokio_serial::Error) -> SentioError {
        let port = &self.settings.port;
        let error = match e.kind {
            tokio_serial::ErrorKind::NoDevice => ConnectionError::serial_not_found(port),
            tokio_serial::ErrorKind::Io(io::ErrorKind::PermissionDenied) => {
                ConnectionError::serial_access_denied(port)
            }
            tokio_serial::ErrorKind::Io(io::ErrorKind::NotFound) => {
                ConnectionError::serial_not_found(port)
            }
            _ => ConnectionError::SerialConfigurationFailed {
                port: port.clone(),
                message: e.to_string(),
            },
        };
        SentioError::connection(error)
    }

    fn map_modbus_error(&self, error: TokioModbusError, operation: &str) -> SentioError {
        match error {
            TokioModbusError::Transport(io_error) => match io_error.kind() {
                io::ErrorKind::TimedOut => SentioError::timeout(TimeoutError::read(self.settings.timeout)),
                io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset => {
                    SentioError::connection(ConnectionError::closed(Some(
                        "Serial connection lost".to_string(),
                    )))
                }
                _ => SentioError::connection(ConnectionError::io(operation, io_error)),
            },
            TokioModbusError::Protocol(protocol_error) => map_protocol_violation(protocol_error),
        }
    }

    /// Turns a bounded request outcome into a result, closing the port
    /// handle when the serial line itself failed.
    fn settle<R>(
        &self,
        slot: &mut Option<ModbusContext>,
        outcome: Result<tokio_modbus::Result<R>, Elapsed>,
        operation: &'static str,
        function_code: u8,
    ) -> SentioResult<R> {
        match outcome {
            Ok(Ok(response)) => response.map_err(|e| map_exception(e, function_code)),
            Ok(Err(error)) => {
                let link_broken = matches!(
                    &error,
                    TokioModbusError::Transport(e) if e.kind() != io::ErrorKind::TimedOut
                );
                let mapped = self.map_modbus_error(error, operation);
                if link_broken {
                    *slot = None;
                    self.health.mark_lost();
                    tracing::warn!(
                        port = %self.settings.port,
                        error = %mapped,
                        "Modbus RTU session lost"
                    );
                }
                Err(mapped)
            }
            Err(_) if function_code == 0x06 => {
                Err(SentioError::timeout(TimeoutError::write(self.settings.timeout)))
            }
            Err(_) => Err(SentioError::timeout(TimeoutError::read(self.settings.timeout))),
        }
    }
}

#[async_trait]
impl ModbusTransport for ModbusRtuTransport {
    async fn connect(&mut self) -> SentioResult<()> {
        if self.is_connected() {
            return Ok(());
        }

        self.state = TransportState::Connecting;

        let builder = tokio_serial::new(&self.settings.port, self.settings.baud_rate)
            .data_bits(Self::convert_data_bits(self.settings.data_bits))
            .parity(Self::convert_parity(self.settings.parity))
            .stop_bits(Self::convert_stop_bits(self.settings.stop_bits));

        let serial = match builder.open_native_async() {
            Ok(serial) => serial,
            Err(e) => {
                self.state = TransportState::Error;
                return Err(self.map_open_error(e));
            }
        };

        *self.context.lock().await = Some(rtu::attach_slave(serial, Slave(self.settings.unit_id)));
        self.health.reset();
        self.state = TransportState::Connected;

        tracing::info!(
            port = %self.settings.port,
            line = %self.settings.line_settings(),
            unit_id = self.settings.unit_id,
            "Connected to Sentio controller over RTU"
        );

        Ok(())
    }

    async fn disconnect(&mut self) -> SentioResult<()> {
        if let Some(mut ctx) = self.context.lock().await.take() {
            if let Err(e) = ctx.disconnect().await {
                tracing::warn!(error = %e, "Error while closing Modbus RTU session");
            }
        }

        self.health.reset();
        self.state = TransportState::Disconnected;
        tracing::info!(port = %self.settings.port, "Disconnected from Sentio controller");

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state() == TransportState::Connected
    }

    fn state(&self) -> TransportState {
        self.health.resolve(self.state)
    }

    async fn read_discrete_inputs(&self, address: u16, count: u16) -> SentioResult<Vec<bool>> {
        let mut guard = self.context.lock().await;
        let ctx = guard.as_mut().ok_or_else(SentioError::not_connected)?;

        let outcome = timeout(self.settings.timeout, ctx.read_discrete_inputs(address, count)).await;
        self.settle(&mut guard, outcome, "read_discrete_inputs", 0x02)
    }

    async fn read_holding_registers(&self, address: u16, count: u16) -> SentioResult<Vec<u16>> {
        let mut guard = self.context.lock().await;
        let ctx = guard.as_mut().ok_or_else(SentioError::not_connected)?;

        let outcome = timeout(self.settings.timeout, ctx.read_holding_registers(address, count)).await;
        self.settle(&mut guard, outcome, "read_holding_registers", 0x03)
    }

    async fn read_input_registers(&self, address: u16, count: u16) -> SentioResult<Vec<u16>> {
        let mut guard = self.context.lock().await;
        let ctx = guard.as_mut().ok_or_else(SentioError::not_connected)?;

        let outcome = timeout(self.settings.timeout, ctx.read_input_registers(address, count)).await;
        self.settle(&mut guard, outcome, "read_input_registers", 0x04)
    }

    async fn write_single_register(&self, address: u16, value: u16) -> SentioResult<()> {
        let mut guard = self.context.lock().await;
        let ctx = guard.as_mut().ok_or_else(SentioError::not_connected)?;

        let outcome = timeout(self.settings.timeout, ctx.write_single_register(address, value)).await;
        self.settle(&mut guard, outcome, "write_single_register", 0x06)
    }

    fn unit_id(&self) -> u8 {
        self.settings.unit_id
    }

    fn display_name(&self) -> String {
        format!("rtu://{} ({})", self.settings.port, self.settings.line_settings())
    }
}

impl std::fmt::Debug for ModbusRtuTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModbusRtuTransport")
            .field("settings", &self.settings)
            .field("state", &self.state())
            .finish()
    }
}
