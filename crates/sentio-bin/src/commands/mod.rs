// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `info`: Controller identity and rooms
//! - `status`: Snapshot of every room
//! - `read`, `set-setpoint`, `set-mode`: Single room access
//! - `outdoor`, `register`: Generic reads
//! - `validate`, `version`: Offline commands

mod info;
mod read;
mod register;
mod set;
mod status;
mod validate;
mod version;

pub use info::info;
pub use read::{outdoor, read};
pub use register::register;
pub use set::{set_mode, set_setpoint};
pub use status::status;
pub use validate::validate;
pub use version::version;

use sentio_config::SentioConfig;
use sentio_modbus::{RegisterGateway, SentioTransport};
use tracing::{debug, info, warn};

use crate::cli::{Cli, Commands};
use crate::error::BinResult;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Info => info::info(&cli).await,
        Commands::Status(args) => status::status(&cli, args).await,
        Commands::Read(args) => read::read(&cli, args).await,
        Commands::SetSetpoint(args) => set::set_setpoint(&cli, args).await,
        Commands::SetMode(args) => set::set_mode(&cli, args).await,
        Commands::Outdoor => read::outdoor(&cli).await,
        Commands::Register(args) => register::register(&cli, args).await,
        Commands::Validate(args) => validate::validate(&cli, args),
        Commands::Version => version::version(&cli),
    }
}

// =============================================================================
// Configuration Resolution
// =============================================================================

/// Loads the configuration file and applies the command-line overrides.
///
/// A missing configuration file is accepted when `--host` or `--serial-port`
/// name the controller on their own.
pub fn resolve_config(cli: &Cli) -> BinResult<SentioConfig> {
    let overrides = cli.connection.to_overrides();

    if !cli.config.exists() && overrides.names_endpoint() {
        debug!(
            path = %cli.config.display(),
            "No configuration file, using command-line connection"
        );
        return Ok(SentioConfig::from_overrides(&overrides)?);
    }

    let mut config = sentio_config::load_config(&cli.config)?;
    if !overrides.is_empty() {
        config.apply_overrides(&overrides);
        config.validate()?;
    }
    Ok(config)
}

// =============================================================================
// Session
// =============================================================================

/// Whether a command needs the room list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Discover {
    /// Always run discovery.
    Always,
    /// Run discovery when the configuration asks for it.
    Configured,
}

/// A connected gateway for the lifetime of one command.
pub(crate) struct Session {
    pub gateway: RegisterGateway<SentioTransport>,
    pub config: SentioConfig,
}

impl Session {
    /// Connects to the controller and runs discovery as requested.
    pub async fn open(cli: &Cli, discover: Discover) -> BinResult<Self> {
        let config = resolve_config(cli)?;
        let settings = config.connection_settings()?;
        info!(endpoint = %settings.endpoint(), "Connecting to controller");

        let mut gateway = RegisterGateway::from_settings(settings)?
            .with_max_rooms(config.discovery.max_rooms);
        gateway.connect().await?;

        let mut session = Self { gateway, config };
        if discover == Discover::Always || session.config.discovery.require_discovery {
            if let Err(e) = session.gateway.discover().await {
                session.close().await;
                return Err(e.into());
            }
        }
        Ok(session)
    }

    /// Disconnects, logging instead of failing.
    pub async fn close(mut self) {
        if let Err(e) = self.gateway.disconnect().await {
            warn!(error = %e, "Disconnect failed");
        }
        let stats = self.gateway.stats();
        debug!(
            reads = stats.reads(),
            writes = stats.writes(),
            failures = stats.failures(),
            "Session closed"
        );
    }
}

// =============================================================================
// Tests
// =============================================================================
