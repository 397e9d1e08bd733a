// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use sentio_modbus::registers;

use crate::cli::Cli;
use crate::error::BinResult;

/// Executes the `version` command to display version information.
pub fn version(cli: &Cli) -> BinResult<()> {
    println!("sentio {}", env!("CARGO_PKG_VERSION"));
    if cli.quiet {
        return Ok(());
    }

    println!("Register gateway for Wavin Sentio heating controllers");
    println!();
    println!("Version Information:");
    println!("  sentio-bin:    {}", env!("CARGO_PKG_VERSION"));
    println!("  sentio-modbus: {}", sentio_modbus::VERSION);
    println!("  sentio-config: {}", sentio_config::VERSION);
    println!();
    println!("Controller Support:");
    println!("  Models:       CCU-208");
    println!("  Firmware:     >= {}", registers::MIN_FIRMWARE_MAJOR);
    println!("  Rooms:        {}", registers::MAX_ROOMS);
    println!("  Registers:    {}", registers::ALL.len());
    println!("  Transports:   Modbus TCP, Modbus RTU");
    println!();
    println!("Build Information:");
    println!("  Rust Edition: 2024");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
