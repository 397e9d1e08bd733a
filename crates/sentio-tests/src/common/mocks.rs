// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! An in-memory Modbus transport for testing the gateway without a controller.
//!
//! [`MockTransport`] is a cheap handle: clones share the same register banks,
//! call log and failure flags, so a test can keep one clone while the gateway
//! owns another.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use sentio_modbus::{ModbusTransport, SentioError, SentioResult, TransportState};

// =============================================================================
// TransportCall
// =============================================================================

/// One request seen by the mock transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportCall {
    /// `connect()`.
    Connect,
    /// `disconnect()`.
    Disconnect,
    /// FC 02.
    ReadDiscreteInputs {
        /// Start address.
        address: u16,
        /// Number of inputs.
        count: u16,
    },
    /// FC 03.
    ReadHoldingRegisters {
        /// Start address.
        address: u16,
        /// Number of words.
        count: u16,
    },
    /// FC 04.
    ReadInputRegisters {
        /// Start address.
        address: u16,
        /// Number of words.
        count: u16,
    },
    /// FC 06.
    WriteSingleRegister {
        /// Register address.
        address: u16,
        /// Written word.
        value: u16,
    },
}

impl TransportCall {
    /// Returns `true` for register reads and writes.
    pub fn is_register_access(&self) -> bool {
        !matches!(self, Self::Connect | Self::Disconnect)
    }

    /// Returns `true` for writes.
    pub fn is_write(&self) -> bool {
        matches!(self, Self::WriteSingleRegister { .. })
    }
}

// =============================================================================
// MockTransport
// =============================================================================

#[derive(Debug, Default)]
struct Banks {
    discrete: HashMap<u16, bool>,
    input: HashMap<u16, u16>,
    holding: HashMap<u16, u16>,
}

#[derive(Debug, Default)]
struct Faults {
    connect: AtomicBool,
    writes: AtomicBool,
    reads_at: Mutex<HashSet<u16>>,
}

/// An in-memory register bank implementing [`ModbusTransport`].
///
/// Unset registers read as zero. Reads and writes fail with `NotConnected`
/// until [`connect`](ModbusTransport::connect) succeeds.
#[derive(Debug, Clone)]
pub struct MockTransport {
    banks: Arc<Mutex<Banks>>,
    calls: Arc<Mutex<Vec<TransportCall>>>,
    faults: Arc<Faults>,
    connected: Arc<AtomicBool>,
    unit_id: u8,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTransport {
    /// Creates an empty, disconnected mock with unit ID 1.
    pub fn new() -> Self {
        Self {
            banks: Arc::new(Mutex::new(Banks::default())),
            calls: Arc::new(Mutex::new(Vec::new())),
            faults: Arc::new(Faults::default()),
            connected: Arc::new(AtomicBool::new(false)),
            unit_id: 1,
        }
    }

    /// Sets the unit ID reported by the mock.
    pub fn with_unit_id(mut self, unit_id: u8) -> Self {
        self.unit_id = unit_id;
        self
    }

    // =========================================================================
    // Register Banks
    // =========================================================================

    /// Sets one input register.
    pub fn set_input(&self, address: u16, value: u16) {
        lock(&self.banks).input.insert(address, value);
    }

    /// Sets consecutive input registers starting at `address`.
    pub fn set_input_words(&self, address: u16, words: &[u16]) {
        let mut banks = lock(&self.banks);
        for (offset, word) in (0u16..).zip(words) {
            banks.input.insert(address + offset, *word);
        }
    }

    /// Sets one holding register.
    pub fn set_holding(&self, address: u16, value: u16) {
        lock(&self.banks).holding.insert(address, value);
    }

    /// Writes `text` into `count` holding registers, two bytes per word,
    /// padded with NULs.
    pub fn set_holding_text(&self, address: u16, count: u16, text: &str) {
        let mut bytes = text.as_bytes().to_vec();
        bytes.resize(usize::from(count) * 2, 0);

        let mut banks = lock(&self.banks);
        for (offset, pair) in (0u16..).zip(bytes.chunks(2)) {
            banks
                .holding
                .insert(address + offset, u16::from_be_bytes([pair[0], pair[1]]));
        }
    }

    /// Sets one discrete input.
    pub fn set_discrete(&self, address: u16, value: bool) {
        lock(&self.banks).discrete.insert(address, value);
    }

    /// Returns a holding register, if set.
    pub fn holding(&self, address: u16) -> Option<u16> {
        lock(&self.banks).holding.get(&address).copied()
    }

    /// Returns an input register, if set.
    pub fn input(&self, address: u16) -> Option<u16> {
        lock(&self.banks).input.get(&address).copied()
    }

    // =========================================================================
    // Call Log
    // =========================================================================

    /// Returns every call so far, in order.
    pub fn calls(&self) -> Vec<TransportCall> {
        lock(&self.calls).clone()
    }

    /// Returns register reads and writes, without connect and disconnect.
    pub fn register_calls(&self) -> Vec<TransportCall> {
        self.calls()
            .into_iter()
            .filter(TransportCall::is_register_access)
            .collect()
    }

    /// Returns `(address, value)` for every write, in order.
    pub fn writes(&self) -> Vec<(u16, u16)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                TransportCall::WriteSingleRegister { address, value } => Some((address, value)),
                _ => None,
            })
            .collect()
    }

    /// Clears the call log.
    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    fn record(&self, call: TransportCall) {
        lock(&self.calls).push(call);
    }

    // =========================================================================
    // Failure Injection
    // =========================================================================

    /// Makes `connect()` fail.
    pub fn fail_connect(&self, fail: bool) {
        self.faults.connect.store(fail, Ordering::SeqCst);
    }

    /// Makes every read starting at `address` fail with an exception response.
    pub fn fail_read_at(&self, address: u16) {
        lock(&self.faults.reads_at).insert(address);
    }

    /// Clears read failures.
    pub fn clear_read_failures(&self) {
        lock(&self.faults.reads_at).clear();
    }

    /// Makes every write fail with an exception response.
    pub fn fail_writes(&self, fail: bool) {
        self.faults.writes.store(fail, Ordering::SeqCst);
    }

    fn check_read(&self, function_code: u8, address: u16) -> SentioResult<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(SentioError::not_connected());
        }
        if lock(&self.faults.reads_at).contains(&address) {
            return Err(SentioError::exception(function_code, 0x02));
        }
        Ok(())
    }

    fn read_words(&self, holding: bool, address: u16, count: u16) -> Vec<u16> {
        let banks = lock(&self.banks);
        let bank = if holding { &banks.holding } else { &banks.input };
        (0..count)
            .map(|offset| bank.get(&(address + offset)).copied().unwrap_or(0))
            .collect()
    }
}

#[async_trait]
impl ModbusTransport for MockTransport {
    async fn connect(&mut self) -> SentioResult<()> {
        self.record(TransportCall::Connect);
        if self.faults.connect.load(Ordering::SeqCst) {
            return Err(SentioError::connection(
                sentio_modbus::ConnectionError::refused("mock", 502),
            ));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&mut self) -> SentioResult<()> {
        self.record(TransportCall::Disconnect);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn state(&self) -> TransportState {
        if self.is_connected() {
            TransportState::Connected
        } else {
            TransportState::Disconnected
        }
    }

    async fn read_discrete_inputs(&self, address: u16, count: u16) -> SentioResult<Vec<bool>> {
        self.record(TransportCall::ReadDiscreteInputs { address, count });
        self.check_read(0x02, address)?;
        let banks = lock(&self.banks);
        Ok((0..count)
            .map(|offset| banks.discrete.get(&(address + offset)).copied().unwrap_or(false))
            .collect())
    }

    async fn read_holding_registers(&self, address: u16, count: u16) -> SentioResult<Vec<u16>> {
        self.record(TransportCall::ReadHoldingRegisters { address, count });
        self.check_read(0x03, address)?;
        Ok(self.read_words(true, address, count))
    }

    async fn read_input_registers(&self, address: u16, count: u16) -> SentioResult<Vec<u16>> {
        self.record(TransportCall::ReadInputRegisters { address, count });
        self.check_read(0x04, address)?;
        Ok(self.read_words(false, address, count))
    }

    async fn write_single_register(&self, address: u16, value: u16) -> SentioResult<()> {
        self.record(TransportCall::WriteSingleRegister { address, value });
        if !self.is_connected() {
            return Err(SentioError::not_connected());
        }
        if self.faults.writes.load(Ordering::SeqCst) {
            return Err(SentioError::exception(0x06, 0x04));
        }
        lock(&self.banks).holding.insert(address, value);
        Ok(())
    }

    fn unit_id(&self) -> u8 {
        self.unit_id
    }

    fn display_name(&self) -> String {
        format!("mock (unit {})", self.unit_id)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_require_connection() {
        let mut mock = MockTransport::new();
        mock.set_input(10, 1);
        assert!(mock.read_input_registers(10, 1).await.is_err());

        mock.connect().await.unwrap();
        assert_eq!(mock.read_input_registers(10, 2).await.unwrap(), vec![1, 0]);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let mut mock = MockTransport::new();
        let handle = mock.clone();
        mock.connect().await.unwrap();
        mock.write_single_register(219, 2150).await.unwrap();

        assert_eq!(handle.holding(219), Some(2150));
        assert_eq!(handle.writes(), vec![(219, 2150)]);
        assert_eq!(handle.calls()[0], TransportCall::Connect);
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let mut mock = MockTransport::new();
        mock.connect().await.unwrap();

        mock.fail_read_at(301);
        assert!(mock.read_holding_registers(301, 16).await.is_err());
        mock.clear_read_failures();
        assert!(mock.read_holding_registers(301, 16).await.is_ok());

        mock.fail_writes(true);
        assert!(mock.write_single_register(5, 1).await.is_err());
        assert_eq!(mock.holding(5), None);

        mock.fail_connect(true);
        assert!(mock.connect().await.is_err());
    }

    #[test]
    fn test_holding_text() {
        let mock = MockTransport::new();
        mock.set_holding_text(101, 16, "Bad");
        assert_eq!(mock.holding(101), Some(u16::from_be_bytes([b'B', b'a'])));
        assert_eq!(mock.holding(102), Some(u16::from_be_bytes([b'd', 0])));
        assert_eq!(mock.holding(103), Some(0));
    }
}
