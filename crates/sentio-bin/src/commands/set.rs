// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `set-setpoint` and `set-mode` commands.

use super::{Discover, Session};
use crate::cli::{Cli, SetModeArgs, SetSetpointArgs};
use crate::error::BinResult;

/// Requests a new setpoint for a room.
pub async fn set_setpoint(cli: &Cli, args: SetSetpointArgs) -> BinResult<()> {
    let session = Session::open(cli, Discover::Always).await?;
    let result = session.gateway.set_setpoint(args.room, args.degrees).await;
    session.close().await;

    result?;
    if !cli.quiet {
        println!("Room {} setpoint set to {:.2} °C", args.room, args.degrees);
    }
    Ok(())
}

/// Switches a room between schedule and manual mode.
pub async fn set_mode(cli: &Cli, args: SetModeArgs) -> BinResult<()> {
    let session = Session::open(cli, Discover::Always).await?;
    let result = session.gateway.set_mode(args.room, args.mode).await;
    session.close().await;

    result?;
    if !cli.quiet {
        println!("Room {} mode set to {}", args.room, args.mode);
    }
    Ok(())
}
