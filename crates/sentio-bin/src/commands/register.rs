// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `register` command.

use sentio_modbus::registers;
use tracing::debug;

use super::{Discover, Session};
use crate::cli::{Cli, RegisterArgs};
use crate::error::{BinError, BinResult};

/// Reads a register of the register map by name.
///
/// The read goes straight through the decode engine, so per-room registers
/// are not checked against the discovered rooms.
pub async fn register(cli: &Cli, args: RegisterArgs) -> BinResult<()> {
    let descriptor = registers::find(&args.name).ok_or_else(|| {
        let known: Vec<&str> = registers::ALL.iter().map(|d| d.name).collect();
        BinError::runtime(format!(
            "Unknown register '{}' (known: {})",
            args.name,
            known.join(", ")
        ))
    })?;
    debug!(register = %descriptor, room = ?args.room, "Raw register read");

    let session = Session::open(cli, Discover::Configured).await?;
    let result = session.gateway.read(descriptor, args.room).await;
    session.close().await;

    let value = result?;
    if cli.is_verbose() {
        println!("{descriptor} = {value}");
    } else {
        println!("{value}");
    }
    Ok(())
}
