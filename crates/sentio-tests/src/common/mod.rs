// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Common Test Utilities
//!
//! - `fixtures`: Controller register images and configuration documents
//! - `mocks`: The in-memory [`MockTransport`]
//! - `assertions`: Assertion helpers for results and transport traffic

pub mod assertions;
pub mod fixtures;
pub mod mocks;

pub use assertions::*;
pub use fixtures::*;
pub use mocks::*;

use std::sync::Once;

use sentio_modbus::RegisterGateway;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize test logging. Call this at the start of each test.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("warn,sentio_modbus=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Connects and discovers a gateway over `mock`, returning it with a handle
/// to the mock whose call log has been cleared.
pub async fn discovered_gateway(
    mock: MockTransport,
) -> (RegisterGateway<MockTransport>, MockTransport) {
    let handle = mock.clone();
    let mut gateway = RegisterGateway::new(mock);
    gateway.connect().await.expect("mock connect");
    gateway.discover().await.expect("fixture discovery");
    handle.clear_calls();
    (gateway, handle)
}

/// Create a temporary directory for test data.
pub fn temp_test_dir(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temp directory")
}
