// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `read` and `outdoor` commands.

use super::{Discover, Session};
use crate::cli::{Cli, ReadArgs};
use crate::error::BinResult;

/// Reads one field of a room.
pub async fn read(cli: &Cli, args: ReadArgs) -> BinResult<()> {
    let session = Session::open(cli, Discover::Always).await?;
    let result = session.gateway.read_room_field(args.room, args.field).await;
    session.close().await;

    let value = result?;
    match args.field.unit() {
        Some(unit) => println!("{value} {unit}"),
        None => println!("{value}"),
    }
    Ok(())
}

/// Reads the outdoor temperature.
pub async fn outdoor(cli: &Cli) -> BinResult<()> {
    let session = Session::open(cli, Discover::Configured).await?;
    let result = session.gateway.outdoor_temperature().await;
    session.close().await;

    println!("{:.2} °C", result?);
    Ok(())
}
