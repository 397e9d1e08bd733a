// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertion helpers for gateway results and transport traffic.

use std::fmt::Debug;

use sentio_modbus::{ErrorKind, SentioResult};

use super::mocks::{MockTransport, TransportCall};

// =============================================================================
// Result Assertions
// =============================================================================

/// Assertion extensions for gateway results.
pub trait ResultAssertions<T> {
    /// Asserts the result failed with `expected`.
    fn assert_kind(self, expected: ErrorKind);

    /// Asserts the value is within `tolerance` of `expected`.
    fn assert_approx(self, expected: f64, tolerance: f64)
    where
        T: Into<f64>;
}

impl<T: Debug> ResultAssertions<T> for SentioResult<T> {
    fn assert_kind(self, expected: ErrorKind) {
        match self {
            Ok(value) => panic!("Expected {expected:?} error, but got Ok({value:?})"),
            Err(e) => assert_eq!(
                e.kind(),
                expected,
                "Expected {expected:?} error, but got {:?}: {e}",
                e.kind()
            ),
        }
    }

    fn assert_approx(self, expected: f64, tolerance: f64)
    where
        T: Into<f64>,
    {
        let actual: f64 = match self {
            Ok(value) => value.into(),
            Err(e) => panic!("Expected {expected}, but got error: {e}"),
        };
        let diff = (actual - expected).abs();
        assert!(
            diff <= tolerance,
            "Expected {expected} ± {tolerance}, but got {actual} (diff: {diff})"
        );
    }
}

// =============================================================================
// Transport Assertions
// =============================================================================

/// Asserts that no register was read or written.
pub fn assert_no_register_access(mock: &MockTransport) {
    let calls = mock.register_calls();
    assert!(calls.is_empty(), "Expected no register access, but saw {calls:?}");
}

/// Asserts that nothing was written.
pub fn assert_no_writes(mock: &MockTransport) {
    let writes = mock.writes();
    assert!(writes.is_empty(), "Expected no writes, but saw {writes:?}");
}

/// Asserts the exact sequence of writes.
pub fn assert_writes(mock: &MockTransport, expected: &[(u16, u16)]) {
    assert_eq!(mock.writes(), expected, "Unexpected write sequence");
}

/// Asserts that `call` was issued at least once.
pub fn assert_called(mock: &MockTransport, call: TransportCall) {
    let calls = mock.calls();
    assert!(calls.contains(&call), "Expected {call:?} in {calls:?}");
}
