// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Modbus TCP transport over `tokio-modbus`.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::error::Elapsed;
use tokio::time::timeout;
use tokio_modbus::client::{Context as ModbusContext, Reader, Writer};
use tokio_modbus::prelude::*;
use tokio_modbus::Error as TokioModbusError;

use crate::error::{ConnectionError, SentioError, SentioResult, TimeoutError};
use crate::types::TcpSettings;

use super::transport::{
    map_exception, map_protocol_violation, LinkHealth, ModbusTransport, TransportState,
};

// =============================================================================
// ModbusTcpTransport
// =============================================================================

/// Modbus TCP transport.
///
/// Connects within `connect_timeout` and bounds every request by
/// `operation_timeout`. The tokio-modbus context sits behind a mutex, so at
/// most one request is outstanding. A socket-level failure drops the session
/// and the next `connect()` opens a new one.
///
/// # Example
///
/// ```rust,ignore
/// use sentio_modbus::client::{ModbusTcpTransport, ModbusTransport};
/// use sentio_modbus::types::TcpSettings;
///
/// let mut transport = ModbusTcpTransport::new(TcpSettings::new("192.168.1.50"));
/// transport.connect().await?;
/// let device_type = transport.read_input_registers(10, 1).await?;
/// ```
pub struct ModbusTcpTransport {
    settings: TcpSettings,
    inner: Arc<Mutex<TcpTransportInner>>,
    state: TransportState,
    health: LinkHealth,
}

struct TcpTransportInner {
    context: Option<ModbusContext>,
    last_success: Option<Instant>,
}

impl TcpTransportInner {
    fn new() -> Self {
        Self {
            context: None,
            last_success: None,
        }
    }

    fn record_success(&mut self) {
        self.last_success = Some(Instant::now());
    }
}

impl ModbusTcpTransport {
    /// Creates a transport for the given settings. Nothing is opened yet.
    pub fn new(settings: TcpSettings) -> Self {
        Self {
            settings,
            inner: Arc::new(Mutex::new(TcpTransportInner::new())),
            state: TransportState::Disconnected,
            health: LinkHealth::default(),
        }
    }

    /// Returns the settings.
    pub fn settings(&self) -> &TcpSettings {
        &self.settings
    }

    /// Returns the time of the last successful request, if any.
    pub async fn last_success(&self) -> Option<Instant> {
        self.inner.lock().await.last_success
    }

    async fn resolve_address(&self) -> SentioResult<SocketAddr> {
        let addr_str = self.settings.socket_addr();

        if let Ok(addr) = addr_str.parse::<SocketAddr>() {
            return Ok(addr);
        }

        let mut addrs = tokio::net::lookup_host(&addr_str).await.map_err(|e| {
            SentioError::connection(ConnectionError::DnsResolutionFailed {
                hostname: self.settings.host.clone(),
                source: Some(e),
            })
        })?;

        addrs
            .next()
            .ok_or_else(|| SentioError::connection(ConnectionError::dns_failed(&self.settings.host)))
    }

    fn map_modbus_error(&self, error: TokioModbusError, operation: &str) -> SentioError {
        match error {
            TokioModbusError::Transport(io_error) => match io_error.kind() {
                io::ErrorKind::ConnectionRefused => SentioError::connection(
                    ConnectionError::refused_with(&self.settings.host, self.settings.port, io_error),
                ),
                io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::UnexpectedEof => {
                    SentioError::connection(ConnectionError::closed(Some(io_error.to_string())))
                }
                io::ErrorKind::TimedOut => {
                    SentioError::timeout(TimeoutError::read(self.settings.operation_timeout))
                }
                io::ErrorKind::NotConnected => SentioError::not_connected(),
                _ => SentioError::connection(ConnectionError::io(operation, io_error)),
            },
            TokioModbusError::Protocol(protocol_error) => map_protocol_violation(protocol_error),
        }
    }

    /// Turns a bounded request outcome into a result.
    ///
    /// Exception responses and timeouts keep the session. A transport error
    /// means the socket is gone, so the context is dropped.
    fn settle<R>(
        &self,
        inner: &mut TcpTransportInner,
        outcome: Result<tokio_modbus::Result<R>, Elapsed>,
        operation: &'static str,
        function_code: u8,
    ) -> SentioResult<R> {
        match outcome {
            Ok(Ok(response)) => {
                let value = response.map_err(|e| map_exception(e, function_code))?;
                inner.record_success();
                Ok(value)
            }
            Ok(Err(error)) => {
                let link_broken = matches!(error, TokioModbusError::Transport(_));
                let mapped = self.map_modbus_error(error, operation);
                if link_broken {
                    self.drop_session(inner, &mapped);
                }
                Err(mapped)
            }
            Err(_) if function_code == 0x06 => Err(SentioError::timeout(TimeoutError::write(
                self.settings.operation_timeout,
            ))),
            Err(_) => Err(SentioError::timeout(TimeoutError::read(
                self.settings.operation_timeout,
            ))),
        }
    }

    fn drop_session(&self, inner: &mut TcpTransportInner, cause: &SentioError) {
        inner.context = None;
        self.health.mark_lost();
        tracing::warn!(
            host = %self.settings.host,
            port = self.settings.port,
            error = %cause,
            "Modbus TCP session lost"
        );
    }
}

#[async_trait]
impl ModbusTransport for ModbusTcpTransport {
    async fn connect(&mut self) -> SentioResult<()> {
        if self.is_connected() {
            return Ok(());
        }

        self.state = TransportState::Connecting;

        let result = async {
            let socket_addr = self.resolve_address().await?;

            let connect_future = async {
                let stream = TcpStream::connect(socket_addr).await.map_err(|e| {
                    SentioError::connection(ConnectionError::refused_with(
                        &self.settings.host,
                        self.settings.port,
                        e,
                    ))
                })?;

                if let Err(e) = stream.set_nodelay(self.settings.tcp_nodelay) {
                    tracing::debug!(error = %e, "Failed to set TCP_NODELAY");
                }

                Ok::<_, SentioError>(tcp::attach_slave(stream, Slave(self.settings.unit_id)))
            };

            timeout(self.settings.connect_timeout, connect_future)
                .await
                .map_err(|_| {
                    SentioError::connection(ConnectionError::timed_out(
                        &self.settings.host,
                        self.settings.port,
                        self.settings.connect_timeout,
                    ))
                })?
        }
        .await;

        let ctx = match result {
            Ok(ctx) => ctx,
            Err(e) => {
                self.state = TransportState::Error;
                return Err(e);
            }
        };

        let mut inner = self.inner.lock().await;
        inner.context = Some(ctx);
        inner.record_success();
        drop(inner);

        self.health.reset();
        self.state = TransportState::Connected;

        tracing::info!(
            host = %self.settings.host,
            port = self.settings.port,
            unit_id = self.settings.unit_id,
            "Connected to Sentio controller over TCP"
        );

        Ok(())
    }

    async fn disconnect(&mut self) -> SentioResult<()> {
        let mut inner = self.inner.lock().await;

        if let Some(mut ctx) = inner.context.take() {
            if let Err(e) = ctx.disconnect().await {
                tracing::warn!(error = %e, "Error while closing Modbus TCP session");
            }
        }

        drop(inner);
        self.health.reset();
        self.state = TransportState::Disconnected;

        tracing::info!(
            host = %self.settings.host,
            port = self.settings.port,
            "Disconnected from Sentio controller"
        );

        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state() == TransportState::Connected
    }

    fn state(&self) -> TransportState {
        self.health.resolve(self.state)
    }

    async fn read_discrete_inputs(&self, address: u16, count: u16) -> SentioResult<Vec<bool>> {
        let mut inner = self.inner.lock().await;
        let ctx = inner.context.as_mut().ok_or_else(SentioError::not_connected)?;

        let outcome = timeout(
            self.settings.operation_timeout,
            ctx.read_discrete_inputs(address, count),
        )
        .await;
        self.settle(&mut inner, outcome, "read_discrete_inputs", 0x02)
    }

    async fn read_holding_registers(&self, address: u16, count: u16) -> SentioResult<Vec<u16>> {
        let mut inner = self.inner.lock().await;
        let ctx = inner.context.as_mut().ok_or_else(SentioError::not_connected)?;

        let outcome = timeout(
            self.settings.operation_timeout,
            ctx.read_holding_registers(address, count),
        )
        .await;
        self.settle(&mut inner, outcome, "read_holding_registers", 0x03)
    }

    async fn read_input_registers(&self, address: u16, count: u16) -> SentioResult<Vec<u16>> {
        let mut inner = self.inner.lock().await;
        let ctx = inner.context.as_mut().ok_or_else(SentioError::not_connected)?;

        let outcome = timeout(
            self.settings.operation_timeout,
            ctx.read_input_registers(address, count),
        )
        .await;
        self.settle(&mut inner, outcome, "read_input_registers", 0x04)
    }

    async fn write_single_register(&self, address: u16, value: u16) -> SentioResult<()> {
        let mut inner = self.inner.lock().await;
        let ctx = inner.context.as_mut().ok_or_else(SentioError::not_connected)?;

        let outcome = timeout(
            self.settings.operation_timeout,
            ctx.write_single_register(address, value),
        )
        .await;
        self.settle(&mut inner, outcome, "write_single_register", 0x06)
    }

    fn unit_id(&self) -> u8 {
        self.settings.unit_id
    }

    fn display_name(&self) -> String {
        format!("tcp://{}", self.settings.socket_addr())
    }
}

impl std::fmt::Debug for ModbusTcpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModbusTcpTransport")
            .field("settings", &self.settings)
            .field("state", &self.state())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
