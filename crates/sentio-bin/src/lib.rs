// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # sentio-bin
//!
//! Command-line front end for the Sentio register gateway.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         main.rs                             │
//! │                      (Entry Point)                          │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │
//!                    ┌──────▼──────┐
//!                    │    cli.rs   │
//!                    │ (Argument   │
//!                    │  Parsing)   │
//!                    └──────┬──────┘
//!                           │
//!               ┌───────────┴───────────┐
//!               ▼                       ▼
//!        ┌──────────────┐        ┌──────────┐
//!        │   commands   │        │ logging  │
//!        │   (Session)  │        │          │
//!        └──────┬───────┘        └──────────┘
//!               │
//!        ┌──────┴──────────────────┐
//!        │ sentio-config           │
//!        │ sentio-modbus (gateway) │
//!        └─────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Identity and rooms (default command)
//! sentio --host 192.168.1.50
//!
//! # Every room as JSON
//! sentio -c /etc/sentio.yaml status --format json
//!
//! # Change a room
//! sentio set-setpoint 2 21.5
//! sentio set-mode 2 manual
//!
//! # Raw register by name
//! sentio register RoomFloorTempActual --room 2
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// =============================================================================
// Re-exports
// =============================================================================

pub use cli::{Cli, Commands};
pub use error::{BinError, BinResult};
pub use logging::init_logging;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
