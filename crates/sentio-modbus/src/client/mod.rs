// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The register gateway and its transports.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       RegisterGateway                           │
//! │   discover() · room accessors · read(desc, room) · write(...)   │
//! └─────────────────────────────────────────────────────────────────┘
//!                  │                              │
//!                  ▼                              ▼
//! ┌───────────────────────────────┐  ┌──────────────────────────────┐
//! │         RegisterCodec         │  │       ModbusTransport        │
//! │  (kind, type, count) → value  │  │  (one request in flight)     │
//! └───────────────────────────────┘  └──────────────────────────────┘
//!                                           │               │
//!                                           ▼               ▼
//!                              ┌──────────────────┐ ┌──────────────────┐
//!                              │ModbusTcpTransport│ │ModbusRtuTransport│
//!                              └──────────────────┘ └──────────────────┘
//! ```

mod conversion;
mod discovery;
mod rooms;
mod rtu;
mod tcp;
mod transport;

pub use conversion::{RegisterCodec, FIXED_POINT_SCALE};
pub use rtu::ModbusRtuTransport;
pub use tcp::ModbusTcpTransport;
pub use transport::{ModbusTransport, TransportState};

use std::sync::atomic::{AtomicU64, Ordering};

use crate::device::{DeviceIdentity, Room};
use crate::error::{SentioError, SentioResult};
use crate::registers::MAX_ROOMS;
use crate::types::{RegisterDescriptor, RegisterKind, RegisterValue};

// =============================================================================
// RegisterGateway
// =============================================================================

/// Named-register access to one Sentio controller.
///
/// The gateway owns its transport. Lifecycle operations (`connect`,
/// `disconnect`, `discover`) take `&mut self`; reads and writes take `&self`
/// and are serialized by the transport. The gateway adds no locking of its
/// own: tasks sharing one gateway must wrap it in a `tokio::sync::Mutex`.
///
/// # Example
///
/// ```rust,ignore
/// use sentio_modbus::{RegisterGateway, RoomField, TcpSettings};
///
/// let mut gateway = RegisterGateway::from_settings(TcpSettings::new("192.168.1.50").into())?;
/// gateway.connect().await?;
/// let discovery = gateway.discover().await?;
/// for room in &discovery.rooms {
///     let temp = gateway.read_room_field(room.index, RoomField::AirTemperature).await?;
///     println!("{}: {temp}", room.name);
/// }
/// ```
pub struct RegisterGateway<T: ModbusTransport> {
    transport: T,
    codec: RegisterCodec,
    identity: Option<DeviceIdentity>,
    rooms: Vec<Room>,
    max_rooms: u8,
    stats: GatewayStats,
}

impl<T: ModbusTransport> RegisterGateway<T> {
    /// Creates a gateway over `transport`. Nothing is opened yet.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            codec: RegisterCodec::new(),
            identity: None,
            rooms: Vec::new(),
            max_rooms: MAX_ROOMS,
            stats: GatewayStats::new(),
        }
    }

    /// Limits the number of room slots scanned by discovery (1..=24).
    pub fn with_max_rooms(mut self, max_rooms: u8) -> Self {
        self.max_rooms = max_rooms.clamp(1, MAX_ROOMS);
        self
    }

    /// Returns the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the operation counters.
    pub fn stats(&self) -> &GatewayStats {
        &self.stats
    }

    /// Returns the identity from the last successful discovery.
    pub fn identity(&self) -> Option<&DeviceIdentity> {
        self.identity.as_ref()
    }

    /// Returns the rooms from the last successful discovery.
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Returns a discovered room by index.
    pub fn room(&self, index: u8) -> Option<&Room> {
        self.rooms.iter().find(|r| r.index == index)
    }

    /// Returns the number of slots discovery scans.
    pub fn max_rooms(&self) -> u8 {
        self.max_rooms
    }

    // =========================================================================
    // Connection Management
    // =========================================================================

    /// Opens the transport session.
    pub async fn connect(&mut self) -> SentioResult<()> {
        match self.transport.connect().await {
            Ok(()) => {
                self.stats.record_connection();
                Ok(())
            }
            Err(e) => {
                e.log(&self.transport.display_name());
                Err(e)
            }
        }
    }

    /// Closes the transport session and forgets discovered state.
    pub async fn disconnect(&mut self) -> SentioResult<()> {
        self.identity = None;
        self.rooms.clear();
        self.transport.disconnect().await
    }

    /// Returns `true` if the transport session is open.
    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Reads and decodes `descriptor`, offset for `room` when per-room.
    ///
    /// Unsupported encodings and missing rooms fail before any transport call.
    pub async fn read(
        &self,
        descriptor: &RegisterDescriptor,
        room: Option<u8>,
    ) -> SentioResult<RegisterValue> {
        self.codec.check(descriptor)?;
        let address = descriptor.address_for(room)?;

        let result = self.read_at(descriptor, address).await;
        match &result {
            Ok(value) => {
                self.stats.record_read();
                tracing::trace!(register = descriptor.name, address, %value, "Register read");
            }
            Err(_) => self.stats.record_failure(),
        }
        result
    }

    async fn read_at(
        &self,
        descriptor: &RegisterDescriptor,
        address: u16,
    ) -> SentioResult<RegisterValue> {
        let count = descriptor.count;
        match descriptor.kind {
            RegisterKind::DiscreteInput => {
                let bits = self.transport.read_discrete_inputs(address, count).await?;
                self.codec.decode_bits(descriptor, &bits)
            }
            RegisterKind::InputRegister => {
                let words = self.transport.read_input_registers(address, count).await?;
                self.codec.decode(descriptor, &words)
            }
            RegisterKind::HoldingRegister => {
                let words = self.transport.read_holding_registers(address, count).await?;
                self.codec.decode(descriptor, &words)
            }
        }
    }

    /// Encodes and writes `value` to `descriptor`, offset for `room` when per-room.
    ///
    /// Read-only kinds fail with `InvalidOperation` before any transport call.
    pub async fn write(
        &self,
        descriptor: &RegisterDescriptor,
        value: RegisterValue,
        room: Option<u8>,
    ) -> SentioResult<()> {
        if !descriptor.is_writable() {
            return Err(SentioError::read_only(descriptor.name, descriptor.kind));
        }

        let address = descriptor.address_for(room)?;
        let word = self.codec.encode(descriptor, &value)?;

        tracing::debug!(
            register = descriptor.name,
            address,
            value = %value,
            raw = word,
            "Writing register"
        );

        match self.transport.write_single_register(address, word).await {
            Ok(()) => {
                self.stats.record_write();
                Ok(())
            }
            Err(e) => {
                self.stats.record_failure();
                Err(e)
            }
        }
    }

    /// Returns the room if it is part of the discovered set.
    pub(crate) fn ensure_room(&self, index: u8) -> SentioResult<&Room> {
        self.room(index)
            .ok_or_else(|| SentioError::room_not_found(index))
    }
}

impl<T: ModbusTransport> std::fmt::Debug for RegisterGateway<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterGateway")
            .field("transport", &self.transport.display_name())
            .field("state", &self.transport.state())
            .field("identity", &self.identity)
            .field("rooms", &self.rooms.len())
            .finish()
    }
}

// =============================================================================
// GatewayStats
// =============================================================================

/// Operation counters of a gateway.
#[derive(Debug, Default)]
pub struct GatewayStats {
    reads: AtomicU64,
    writes: AtomicU64,
    failures: AtomicU64,
    connections: AtomicU64,
}

impl GatewayStats {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    fn record_connection(&self) {
        self.connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Resets all counters.
    pub fn reset(&self) {
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
        self.failures.store(0, Ordering::Relaxed);
        self.connections.store(0, Ordering::Relaxed);
    }

    /// Returns the number of successful reads.
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Returns the number of successful writes.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Returns the number of failed transport operations.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    /// Returns the number of successful connects.
    pub fn connections(&self) -> u64 {
        self.connections.load(Ordering::Relaxed)
    }

    /// Returns the success rate (0.0 - 1.0).
    pub fn success_rate(&self) -> f64 {
        let ok = self.reads() + self.writes();
        let total = ok + self.failures();
        if total == 0 {
            return 1.0;
        }
        ok as f64 / total as f64
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::registers;

    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    /// A scripted transport: register images per kind plus a call log.
    #[derive(Default, Clone)]
    pub(crate) struct ScriptedTransport {
        pub input: HashMap<u16, u16>,
        pub holding: Arc<Mutex<HashMap<u16, u16>>>,
        pub calls: Arc<Mutex<Vec<String>>>,
        pub failing: Arc<Mutex<Vec<u16>>>,
        pub connected: bool,
    }

    impl ScriptedTransport {
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        pub fn set_text(&mut self, address: u16, count: u16, text: &str) {
            let mut bytes = text.as_bytes().to_vec();
            bytes.resize(usize::from(count) * 2, 0);
            let mut holding = self.holding.lock().unwrap();
            for (i, pair) in bytes.chunks(2).enumerate() {
                holding.insert(address + i as u16, u16::from_be_bytes([pair[0], pair[1]]));
            }
        }

        fn bank_read(&self, bank: &HashMap<u16, u16>, address: u16, count: u16) -> SentioResult<Vec<u16>> {
            if self.failing.lock().unwrap().contains(&address) {
                return Err(SentioError::exception(0x03, 0x02));
            }
            Ok((address..address + count)
                .map(|a| bank.get(&a).copied().unwrap_or(0))
                .collect())
        }
    }

    #[async_trait]
    impl ModbusTransport for ScriptedTransport {
        async fn connect(&mut self) -> SentioResult<()> {
            self.connected = true;
            Ok(())
        }

        async fn disconnect(&mut self) -> SentioResult<()> {
            self.connected = false;
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }

        fn state(&self) -> TransportState {
            if self.connected {
                TransportState::Connected
            } else {
                TransportState::Disconnected
            }
        }

        async fn read_discrete_inputs(&self, address: u16, count: u16) -> SentioResult<Vec<bool>> {
            self.calls.lock().unwrap().push(format!("DI {address}"));
            Ok(vec![self.input.contains_key(&address); usize::from(count)])
        }

        async fn read_holding_registers(&self, address: u16, count: u16) -> SentioResult<Vec<u16>> {
            self.calls.lock().unwrap().push(format!("HR {address}"));
            let bank = self.holding.lock().unwrap().clone();
            self.bank_read(&bank, address, count)
        }

        async fn read_input_registers(&self, address: u16, count: u16) -> SentioResult<Vec<u16>> {
            self.calls.lock().unwrap().push(format!("IR {address}"));
            self.bank_read(&self.input, address, count)
        }

        async fn write_single_register(&self, address: u16, value: u16) -> SentioResult<()> {
            self.calls.lock().unwrap().push(format!("W {address}={value}"));
            self.holding.lock().unwrap().insert(address, value);
            Ok(())
        }

        fn unit_id(&self) -> u8 {
            1
        }

        fn display_name(&self) -> String {
            "scripted".to_string()
        }
    }

    /// A transport image of a supported CCU-208 with firmware 14.2.
    pub(crate) fn ccu208() -> ScriptedTransport {
        let mut t = ScriptedTransport::default();
        t.input.insert(10, 1);
        t.input.insert(11, 3);
        t.input.insert(12, 14);
        t.input.insert(13, 2);
        t.input.insert(14, 1530);
        t.input.insert(15, 0x0001);
        t.input.insert(16, 0x0002);
        t
    }

    #[tokio::test]
    async fn test_read_generic_register() {
        let mut t = ccu208();
        t.input.insert(3301, 1950);
        let gateway = RegisterGateway::new(t);

        let value = gateway.read(&registers::OUTDOOR_TEMPERATURE, None).await.unwrap();
        assert_eq!(value, RegisterValue::Decimal(19.5));
        assert_eq!(gateway.stats().reads(), 1);
    }

    #[tokio::test]
    async fn test_read_per_room_offset() {
        let mut t = ccu208();
        t.input.insert(304, 2150);
        let calls = t.calls.clone();
        let gateway = RegisterGateway::new(t);

        let value = gateway
            .read(&registers::ROOM_AIR_TEMP_ACTUAL, Some(2))
            .await
            .unwrap();
        assert_eq!(value, RegisterValue::Integer(2150));
        assert_eq!(calls.lock().unwrap().as_slice(), ["IR 304"]);
    }

    #[tokio::test]
    async fn test_write_read_only_issues_no_transport_call() {
        let t = ccu208();
        let calls = t.calls.clone();
        let gateway = RegisterGateway::new(t);

        let err = gateway
            .write(&registers::OUTDOOR_TEMPERATURE, RegisterValue::Decimal(1.0), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_encodes_fixed_point() {
        let t = ccu208();
        let calls = t.calls.clone();
        let gateway = RegisterGateway::new(t);

        gateway
            .write(&registers::ROOM_TEMP_SETP_CHANGE, RegisterValue::Decimal(19.5), Some(1))
            .await
            .unwrap();
        assert_eq!(calls.lock().unwrap().as_slice(), ["W 219=1950"]);
        assert_eq!(gateway.stats().writes(), 1);
    }

    #[tokio::test]
    async fn test_failed_read_is_counted() {
        let mut t = ccu208();
        t.failing.lock().unwrap().push(3301);
        let gateway = RegisterGateway::new(t);

        let err = gateway.read(&registers::OUTDOOR_TEMPERATURE, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
        assert_eq!(gateway.stats().failures(), 1);
        assert!(gateway.stats().success_rate() < 1.0);
    }

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let mut gateway = RegisterGateway::new(ccu208());
        gateway.connect().await.unwrap();
        assert!(gateway.is_connected());
        assert_eq!(gateway.stats().connections(), 1);

        gateway.disconnect().await.unwrap();
        assert!(!gateway.is_connected());
        assert!(gateway.rooms().is_empty());
    }

    #[test]
    fn test_max_rooms_is_clamped() {
        assert_eq!(RegisterGateway::new(ccu208()).with_max_rooms(0).max_rooms(), 1);
        assert_eq!(RegisterGateway::new(ccu208()).with_max_rooms(99).max_rooms(), 24);
        assert_eq!(RegisterGateway::new(ccu208()).with_max_rooms(8).max_rooms(), 8);
    }
}
