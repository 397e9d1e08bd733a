// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # sentio-modbus
//!
//! Modbus register gateway for Wavin Sentio heating controllers.
//!
//! This crate provides:
//!
//! - **Register map**: every known register as a `const` descriptor
//! - **Decode engine**: raw words to integers, text and fixed-point decimals
//! - **Transports**: Modbus TCP and Modbus RTU over `tokio-modbus`
//! - **Discovery**: identity validation and room scanning
//! - **Typed accessors**: room measurements, modes and setpoints
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 RegisterGateway<SentioTransport>                │
//! │        discover · rooms · read_room_field · set_setpoint        │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │          registers (descriptors)  +  RegisterCodec              │
//! └─────────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      ModbusTransport                            │
//! └─────────────────────────────────────────────────────────────────┘
//!            │                                     │
//!            ▼                                     ▼
//! ┌─────────────────────┐             ┌─────────────────────┐
//! │  ModbusTcpTransport │             │  ModbusRtuTransport │
//! └─────────────────────┘             └─────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sentio_modbus::{RegisterGateway, RoomMode, TcpSettings};
//!
//! let settings = TcpSettings::builder().host("192.168.1.50").build()?;
//! let mut gateway = RegisterGateway::from_settings(settings.into())?;
//!
//! gateway.connect().await?;
//! let discovery = gateway.discover().await?;
//!
//! for room in &discovery.rooms {
//!     let temp = gateway.actual_temperature(room.index).await?;
//!     println!("{}: {temp:.2} °C", room.name);
//! }
//!
//! gateway.set_setpoint(0, 21.5).await?;
//! gateway.set_mode(0, RoomMode::Manual).await?;
//! ```
//!
//! ### Error Handling
//!
//! ```rust,ignore
//! use sentio_modbus::{ErrorKind, SentioResult};
//!
//! fn report(result: SentioResult<f64>) {
//!     if let Err(error) = result {
//!         match error.kind() {
//!             ErrorKind::RoomNotFound => println!("Run discovery first"),
//!             _ => {
//!                 for hint in error.recovery_hints() {
//!                     println!("Hint: {hint}");
//!                 }
//!             }
//!         }
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod client;
pub mod device;
pub mod driver;
pub mod error;
pub mod registers;
pub mod types;

// =============================================================================
// Re-exports - Error Module
// =============================================================================

pub use error::{
    // Main error type
    SentioError,
    SentioResult,
    ErrorKind,
    // Error categories
    ConfigurationError,
    ConnectionError,
    ConversionError,
    DeviceError,
    OperationError,
    ProtocolError,
    TimeoutError,
};

// =============================================================================
// Re-exports - Types Module
// =============================================================================

pub use types::{
    // Register map
    RegisterDescriptor,
    RegisterKind,
    RegisterValue,
    Scope,
    ValueType,
    // Connection settings
    ConnectionSettings,
    RtuSettings,
    RtuSettingsBuilder,
    TcpSettings,
    TcpSettingsBuilder,
    // Serial port settings
    DataBits,
    Parity,
    StopBits,
};

// =============================================================================
// Re-exports - Device Module
// =============================================================================

pub use device::{
    DeviceIdentity,
    DeviceInfo,
    DeviceType,
    Discovery,
    FieldValue,
    HeatingState,
    Room,
    RoomField,
    RoomMode,
    RoomModeOverride,
    RoomSnapshot,
    VentilationState,
};

// =============================================================================
// Re-exports - Client Module
// =============================================================================

pub use client::{
    // Gateway
    GatewayStats,
    RegisterGateway,
    // Transport
    ModbusRtuTransport,
    ModbusTcpTransport,
    ModbusTransport,
    TransportState,
    // Conversion
    RegisterCodec,
};

pub use driver::SentioTransport;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
