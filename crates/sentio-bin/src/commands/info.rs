// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `info` command.

use sentio_modbus::ModbusTransport;

use super::{Discover, Session};
use crate::cli::Cli;
use crate::error::BinResult;

/// Prints the controller identity and the discovered rooms.
///
/// With `--verbose` the raw identity registers and Modbus mode are shown too.
pub async fn info(cli: &Cli) -> BinResult<()> {
    let session = Session::open(cli, Discover::Always).await?;
    let result = print_info(&session, cli.is_verbose()).await;
    session.close().await;
    result
}

async fn print_info(session: &Session, verbose: bool) -> BinResult<()> {
    let gateway = &session.gateway;

    println!("Controller: {}", gateway.transport().display_name());
    if let Some(identity) = gateway.identity() {
        println!("  Model:    {}", identity.device_type);
        println!("  Serial:   {}", identity.serial());
        println!("  Firmware: {}", identity.firmware_version());
        if let Some(hw) = identity.hardware_version {
            println!("  Hardware: {hw}");
        }
    }

    if verbose {
        let device = gateway.device_info().await?;
        println!();
        println!("Device registers:");
        println!("  DeviceType:  {} ({})", device.device_type, device.model.unwrap_or("unknown"));
        println!("  Serial:      {}-{}", device.serial_prefix, device.serial_number);
        println!("  ModbusMode:  {}", device.modbus_mode);
    }

    println!();
    let rooms = gateway.rooms();
    if rooms.is_empty() {
        println!("No rooms configured");
    } else {
        println!("Rooms ({}):", rooms.len());
        for room in rooms {
            println!("  {:>2}  {}", room.index, room.name);
        }
    }

    Ok(())
}
