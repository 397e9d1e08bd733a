// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `info`: Show controller identity and rooms (default)
//! - `status`: Show every room plus the outdoor temperature
//! - `read`: Read one room field
//! - `set-setpoint` / `set-mode`: Change a room
//! - `outdoor`: Show the outdoor temperature
//! - `register`: Read any register of the map by name
//! - `validate`: Validate the configuration file
//! - `version`: Show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sentio_config::ConnectionOverrides;
use sentio_modbus::{RoomField, RoomMode};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// Command-line client for Wavin Sentio heating controllers.
///
/// Talks Modbus TCP or Modbus RTU to a Sentio CCU-208, discovers its rooms
/// and reads or changes their temperatures and modes.
#[derive(Parser, Debug)]
#[command(
    name = "sentio",
    author = "Sylvex <contact@sylvex.io>",
    version = sentio_modbus::VERSION,
    about = "Register gateway for Wavin Sentio heating controllers",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "sentio.yaml",
        env = "SENTIO_CONFIG",
        global = true
    )]
    pub config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact); overrides the config file
    #[arg(long, global = true)]
    pub log_format: Option<LogFormat>,

    /// Enable quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Connection overrides
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Connection values that override the configuration file.
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Controller host (selects Modbus TCP)
    #[arg(long, global = true, conflicts_with = "serial_port")]
    pub host: Option<String>,

    /// Controller TCP port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Serial port path (selects Modbus RTU)
    #[arg(long, global = true)]
    pub serial_port: Option<String>,

    /// Serial baud rate
    #[arg(long, global = true)]
    pub baud_rate: Option<u32>,

    /// Modbus unit ID
    #[arg(long, global = true)]
    pub unit_id: Option<u8>,
}

impl ConnectionArgs {
    /// Converts into configuration overrides.
    pub fn to_overrides(&self) -> ConnectionOverrides {
        ConnectionOverrides {
            host: self.host.clone(),
            port: self.port,
            serial_port: self.serial_port.clone(),
            baud_rate: self.baud_rate,
            unit_id: self.unit_id,
        }
    }
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show controller identity and rooms
    ///
    /// This is the default command when no subcommand is specified.
    /// With `--verbose` the raw device information is shown as well.
    Info,

    /// Show every room and the outdoor temperature
    Status(StatusArgs),

    /// Read one field of a room
    Read(ReadArgs),

    /// Request a new setpoint for a room
    #[command(name = "set-setpoint")]
    SetSetpoint(SetSetpointArgs),

    /// Switch a room between schedule and manual mode
    #[command(name = "set-mode")]
    SetMode(SetModeArgs),

    /// Show the outdoor temperature
    Outdoor,

    /// Read a register of the register map by name
    Register(RegisterArgs),

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration file without connecting.
    Validate(ValidateArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Arguments for the `status` command.
#[derive(Args, Debug, Default, Clone)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

/// Arguments for the `read` command.
#[derive(Args, Debug, Clone)]
pub struct ReadArgs {
    /// Room index (0-23)
    pub room: u8,

    /// Field name (setpoint, air_temperature, floor_temperature,
    /// relative_humidity, dew_point, heating_state, mode, mode_override,
    /// vacation_setpoint, standby_setpoint)
    pub field: RoomField,
}

/// Arguments for the `set-setpoint` command.
#[derive(Args, Debug, Clone)]
pub struct SetSetpointArgs {
    /// Room index (0-23)
    pub room: u8,

    /// Setpoint in °C
    #[arg(allow_negative_numbers = true)]
    pub degrees: f64,
}

/// Arguments for the `set-mode` command.
#[derive(Args, Debug, Clone)]
pub struct SetModeArgs {
    /// Room index (0-23)
    pub room: u8,

    /// Mode (schedule or manual)
    pub mode: RoomMode,
}

/// Arguments for the `register` command.
#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Register name, e.g. RoomAirTempActual
    pub name: String,

    /// Room index for per-room registers
    #[arg(short, long)]
    pub room: Option<u8>,
}

/// Arguments for the `validate` command.
#[derive(Args, Debug, Default, Clone)]
pub struct ValidateArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<sentio_config::LogFormat> for LogFormat {
    fn from(format: sentio_config::LogFormat) -> Self {
        match format {
            sentio_config::LogFormat::Text => Self::Text,
            sentio_config::LogFormat::Json => Self::Json,
            sentio_config::LogFormat::Compact => Self::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective command, defaulting to `Info` if none specified.
    pub fn effective_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Info)
    }

    /// Check if verbose output is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Get the effective log level: `-q` and `-v` win over `--log-level`,
    /// which wins over `fallback`.
    pub fn effective_log_level<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(fallback)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command() {
        let cli = Cli::parse_from(["sentio"]);
        assert!(cli.command.is_none());
        assert!(matches!(cli.effective_command(), Commands::Info));
        assert_eq!(cli.config, PathBuf::from("sentio.yaml"));
    }

    #[test]
    fn test_read_command() {
        let cli = Cli::parse_from(["sentio", "read", "3", "air-temperature"]);
        let Some(Commands::Read(args)) = cli.command else {
            panic!("Expected Read command");
        };
        assert_eq!(args.room, 3);
        assert_eq!(args.field, RoomField::AirTemperature);
    }

    #[test]
    fn test_set_commands() {
        let cli = Cli::parse_from(["sentio", "set-setpoint", "1", "21.5"]);
        let Some(Commands::SetSetpoint(args)) = cli.command else {
            panic!("Expected SetSetpoint command");
        };
        assert_eq!((args.room, args.degrees), (1, 21.5));

        let cli = Cli::parse_from(["sentio", "set-mode", "2", "manual"]);
        let Some(Commands::SetMode(args)) = cli.command else {
            panic!("Expected SetMode command");
        };
        assert_eq!(args.mode, RoomMode::Manual);
    }

    #[test]
    fn test_register_command() {
        let cli = Cli::parse_from(["sentio", "register", "RoomName", "--room", "4"]);
        let Some(Commands::Register(args)) = cli.command else {
            panic!("Expected Register command");
        };
        assert_eq!(args.name, "RoomName");
        assert_eq!(args.room, Some(4));
    }

    #[test]
    fn test_connection_overrides() {
        let cli = Cli::parse_from(["sentio", "outdoor", "--host", "10.0.0.5", "--unit-id", "2"]);
        let overrides = cli.connection.to_overrides();
        assert_eq!(overrides.host.as_deref(), Some("10.0.0.5"));
        assert_eq!(overrides.unit_id, Some(2));
        assert!(overrides.names_endpoint());
    }

    #[test]
    fn test_host_conflicts_with_serial_port() {
        let result = Cli::try_parse_from([
            "sentio",
            "--host",
            "10.0.0.5",
            "--serial-port",
            "/dev/ttyUSB0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_status_format() {
        let cli = Cli::parse_from(["sentio", "status", "-f", "json"]);
        let Some(Commands::Status(args)) = cli.command else {
            panic!("Expected Status command");
        };
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_log_level_precedence() {
        let cli = Cli::parse_from(["sentio", "-l", "trace"]);
        assert_eq!(cli.effective_log_level("info"), "trace");

        let cli = Cli::parse_from(["sentio"]);
        assert_eq!(cli.effective_log_level("error"), "error");

        let cli = Cli::parse_from(["sentio", "-q", "-l", "trace"]);
        assert_eq!(cli.effective_log_level("info"), "warn");

        let cli = Cli::parse_from(["sentio", "-v"]);
        assert!(cli.is_verbose());
        assert_eq!(cli.effective_log_level("info"), "debug");
    }
}
