// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # sentio-config
//!
//! Configuration management for the Sentio register gateway.
//!
//! ## Features
//!
//! - **Schema Definition**: connection, discovery and logging sections with validation
//! - **Multi-Format Support**: YAML, TOML, and JSON configuration files
//! - **Environment Overrides**: `SENTIO_*` variables override connection values
//! - **Placeholders**: `${VAR}` and `${VAR:default}` inside configuration files
//!
//! ## Quick Start
//!
//! ```no_run
//! use sentio_config::loader::load_config;
//!
//! let config = load_config("sentio.yaml").unwrap();
//! let settings = config.connection_settings().unwrap();
//! println!("Controller at {}", settings.endpoint());
//! ```
//!
//! ## Configuration File
//!
//! ```yaml
//! connection:
//!   transport: tcp
//!   host: "${SENTIO_CONTROLLER:192.168.1.50}"
//!   port: 502
//!   unit_id: 1
//!   operation_timeout: 3s
//!
//! discovery:
//!   max_rooms: 24
//!   require_discovery: true
//!
//! logging:
//!   level: info
//!   format: text
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// =============================================================================
// Modules
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ConfigError, ConfigResult};
pub use schema::{
    // Top-level config
    SentioConfig,
    // Connection
    ConnectionConfig,
    ConnectionOverrides,
    RtuConfig,
    TcpConfig,
    // Discovery
    DiscoveryConfig,
    // Logging config
    LogFormat,
    LogLevel,
    LoggingConfig,
};

pub use loader::{ConfigFormat, ConfigLoader, ConfigLoaderBuilder, load_config, load_config_str};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// =============================================================================
// Prelude
// =============================================================================

/// Convenience re-exports for common use cases.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult};
    pub use crate::loader::{ConfigLoader, load_config};
    pub use crate::schema::{ConnectionConfig, ConnectionOverrides, SentioConfig};
}
