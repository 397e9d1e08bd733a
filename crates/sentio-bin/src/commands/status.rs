// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `status` command.

use sentio_modbus::RoomSnapshot;
use serde::Serialize;
use tracing::warn;

use super::{Discover, Session};
use crate::cli::{Cli, OutputFormat, StatusArgs};
use crate::error::BinResult;

/// Status report printed by `status --format json`.
#[derive(Debug, Serialize)]
struct StatusReport {
    serial: Option<String>,
    outdoor_temperature: Option<f64>,
    rooms: Vec<RoomEntry>,
}

/// One row of the report: a full snapshot or the reason the room was skipped.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RoomEntry {
    Read(RoomSnapshot),
    Unavailable { index: u8, name: String, error: String },
}

/// Prints a snapshot of every discovered room plus the outdoor temperature.
pub async fn status(cli: &Cli, args: StatusArgs) -> BinResult<()> {
    let session = Session::open(cli, Discover::Always).await?;
    let result = collect(&session).await;
    session.close().await;

    let report = result?;
    match args.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

async fn collect(session: &Session) -> BinResult<StatusReport> {
    let gateway = &session.gateway;

    let mut rooms = Vec::with_capacity(gateway.rooms().len());
    for (index, outcome) in gateway.room_snapshots().await {
        let entry = match outcome {
            Ok(snapshot) => RoomEntry::Read(snapshot),
            Err(e) => {
                warn!(room = index, error = %e, "Room unavailable");
                RoomEntry::Unavailable {
                    index,
                    name: gateway.room(index).map(|r| r.name.clone()).unwrap_or_default(),
                    error: e.to_string(),
                }
            }
        };
        rooms.push(entry);
    }

    // Not every installation has an outdoor sensor.
    let outdoor_temperature = match gateway.outdoor_temperature().await {
        Ok(t) => Some(t),
        Err(e) => {
            warn!(error = %e, "Outdoor temperature unavailable");
            None
        }
    };

    Ok(StatusReport {
        serial: gateway.identity().map(|i| i.serial()),
        outdoor_temperature,
        rooms,
    })
}

fn print_text(report: &StatusReport) {
    if let Some(serial) = &report.serial {
        println!("Controller {serial}");
    }
    match report.outdoor_temperature {
        Some(t) => println!("Outdoor: {t:.1} °C"),
        None => println!("Outdoor: n/a"),
    }
    println!();

    println!(
        "{:>2}  {:<16} {:>7} {:>7} {:>7} {:>6}  {:<10} {:<8}",
        "#", "Room", "Air", "Floor", "Set", "RH", "State", "Mode"
    );
    for room in &report.rooms {
        println!("{}", text_row(room));
    }
}

fn text_row(entry: &RoomEntry) -> String {
    match entry {
        RoomEntry::Read(room) => format!(
            "{:>2}  {:<16} {:>7.1} {:>7.1} {:>7.1} {:>5.0}%  {:<10} {:<8}",
            room.index,
            room.name,
            room.air_temperature,
            room.floor_temperature,
            room.setpoint,
            room.relative_humidity,
            room.heating_state.as_str(),
            room.mode.as_str(),
        ),
        RoomEntry::Unavailable { index, name, error } => {
            format!("{index:>2}  {name:<16} unavailable: {error}")
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use sentio_modbus::{HeatingState, RoomMode, RoomModeOverride};

    fn snapshot() -> RoomSnapshot {
        RoomSnapshot {
            index: 0,
            name: "Living room".to_string(),
            setpoint: 21.0,
            air_temperature: 20.5,
            floor_temperature: 23.8,
            relative_humidity: 45.2,
            dew_point: 8.1,
            heating_state: HeatingState::Heating,
            mode: RoomMode::Schedule,
            mode_override: RoomModeOverride::None,
            vacation_setpoint: 16.0,
            standby_setpoint: 18.0,
        }
    }

    fn report() -> StatusReport {
        StatusReport {
            serial: None,
            outdoor_temperature: None,
            rooms: vec![
                RoomEntry::Read(snapshot()),
                RoomEntry::Unavailable {
                    index: 3,
                    name: "Bedroom".to_string(),
                    error: "Modbus exception".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_failed_room_keeps_report() {
        let json = serde_json::to_value(report()).unwrap();
        let rooms = json["rooms"].as_array().unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0]["air_temperature"], 20.5);
        assert_eq!(rooms[1]["index"], 3);
        assert_eq!(rooms[1]["error"], "Modbus exception");
        assert!(rooms[1].get("air_temperature").is_none());
    }

    #[test]
    fn test_text_row_for_unavailable_room() {
        let report = report();
        assert!(text_row(&report.rooms[0]).contains("Living room"));
        assert_eq!(
            text_row(&report.rooms[1]),
            " 3  Bedroom          unavailable: Modbus exception"
        );
    }
}
