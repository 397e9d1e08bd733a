// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Sentio Integration Tests
//!
//! Test doubles, fixtures and integration tests for the Sentio register
//! gateway. Nothing here talks to a real controller.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `fixtures`: CCU-208 register images, room slots and config documents
//!   - `mocks`: `MockTransport`, an in-memory register bank with a call log
//!   - `assertions`: Assertion helpers
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p sentio-tests
//!
//! # Run a specific suite
//! cargo test -p sentio-tests --test integration_gateway
//! cargo test -p sentio-tests --test integration_discovery
//! cargo test -p sentio-tests --test integration_config
//! ```
//!
//! ## Test Categories
//!
//! ### Gateway Tests (`integration_gateway.rs`)
//! - Address resolution and the decode/encode engine over a transport
//! - Room accessors, setpoint write ordering and read-only protection
//! - Connection lifecycle and statistics
//!
//! ### Discovery Tests (`integration_discovery.rs`)
//! - Identity preconditions
//! - Room slot scanning
//!
//! ### Config Tests (`integration_config.rs`)
//! - YAML, TOML and JSON files
//! - Placeholders and `SENTIO_*` overrides
//! - Building a gateway from a configuration
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use sentio_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (gateway, mock) = discovered_gateway(ControllerFixtures::house()).await;
//!     gateway.set_setpoint(3, 21.5).await.unwrap();
//!     assert_writes(&mock, &[(419, 2150)]);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::mocks::*;
    pub use crate::common::{discovered_gateway, init_test_logging, temp_test_dir};
}
