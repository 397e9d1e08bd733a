// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The Sentio register map.
//!
//! Every register the gateway touches is a `const` [`RegisterDescriptor`].
//! Per-room registers are listed at their room 0 address; room `n` lives
//! [`ROOM_ADDRESS_STRIDE`] × `n` addresses higher.

use crate::types::{RegisterDescriptor, RegisterKind, Scope, ValueType};

use RegisterKind::{HoldingRegister, InputRegister};
use Scope::{Generic, PerRoom};
use ValueType::{AsciiString, FixedPoint100, RawInteger};

// =============================================================================
// Constants
// =============================================================================

/// Address distance between consecutive rooms.
pub const ROOM_ADDRESS_STRIDE: u16 = 100;

/// Number of room slots scanned during discovery.
pub const MAX_ROOMS: u8 = 24;

/// Serial number prefix of genuine controllers.
pub const SERIAL_NUMBER_PREFIX: u64 = 1530;

/// Oldest supported firmware major version.
pub const MIN_FIRMWARE_MAJOR: u64 = 12;

/// Default Modbus TCP port.
pub const DEFAULT_TCP_PORT: u16 = 502;

/// Default unit ID.
pub const DEFAULT_UNIT_ID: u8 = 1;

/// Default RS-485 baud rate.
pub const DEFAULT_BAUD_RATE: u32 = 19200;

// =============================================================================
// Device Registers
// =============================================================================

/// Device type code (1 = CCU-208, 2 = DHW-201).
pub const DEVICE_TYPE: RegisterDescriptor =
    RegisterDescriptor::new("DeviceType", InputRegister, 10, 1, RawInteger, Generic);

/// Hardware revision.
pub const DEVICE_HW_VERSION: RegisterDescriptor =
    RegisterDescriptor::new("DeviceHwVersion", InputRegister, 11, 1, RawInteger, Generic);

/// Firmware major version.
pub const DEVICE_SW_VERSION: RegisterDescriptor =
    RegisterDescriptor::new("DeviceSwVersion", InputRegister, 12, 1, RawInteger, Generic);

/// Firmware minor version.
pub const DEVICE_SW_VERSION_MINOR: RegisterDescriptor = RegisterDescriptor::new(
    "DeviceSwVersionMinor",
    InputRegister,
    13,
    1,
    RawInteger,
    Generic,
);

/// Serial number prefix.
pub const DEVICE_SERIAL_NR_PREFIX: RegisterDescriptor = RegisterDescriptor::new(
    "DeviceSerialNrPrefix",
    InputRegister,
    14,
    1,
    RawInteger,
    Generic,
);

/// Serial number (two words).
pub const DEVICE_SERIAL_NUMBER: RegisterDescriptor =
    RegisterDescriptor::new("DeviceSerialNumber", InputRegister, 15, 2, RawInteger, Generic);

/// Modbus operating mode.
pub const MODBUS_MODE: RegisterDescriptor =
    RegisterDescriptor::new("ModbusMode", HoldingRegister, 5, 1, RawInteger, Generic);

// =============================================================================
// Room Registers
// =============================================================================

/// Active setpoint, in hundredths of a degree.
pub const ROOM_TEMP_SETPOINT: RegisterDescriptor =
    RegisterDescriptor::new("RoomTempSetpoint", InputRegister, 101, 1, RawInteger, PerRoom);

/// Heating state code.
pub const ROOM_HEATING_STATE: RegisterDescriptor =
    RegisterDescriptor::new("RoomHeatingState", InputRegister, 102, 1, RawInteger, PerRoom);

/// Air temperature, in hundredths of a degree.
pub const ROOM_AIR_TEMP_ACTUAL: RegisterDescriptor =
    RegisterDescriptor::new("RoomAirTempActual", InputRegister, 104, 1, RawInteger, PerRoom);

/// Floor temperature, in hundredths of a degree.
pub const ROOM_FLOOR_TEMP_ACTUAL: RegisterDescriptor = RegisterDescriptor::new(
    "RoomFloorTempActual",
    InputRegister,
    105,
    1,
    RawInteger,
    PerRoom,
);

/// Relative humidity, in hundredths of a percent.
pub const ROOM_REL_HUMIDITY: RegisterDescriptor =
    RegisterDescriptor::new("RoomRelHumidity", InputRegister, 106, 1, RawInteger, PerRoom);

/// Calculated dew point, in hundredths of a degree.
pub const ROOM_CALC_DEW_POINT: RegisterDescriptor =
    RegisterDescriptor::new("RoomCalcDewPoint", InputRegister, 107, 1, RawInteger, PerRoom);

/// Room name (32 bytes).
pub const ROOM_NAME: RegisterDescriptor =
    RegisterDescriptor::new("RoomName", HoldingRegister, 101, 16, AsciiString, PerRoom);

/// Room mode (schedule or manual).
pub const ROOM_MODE: RegisterDescriptor =
    RegisterDescriptor::new("RoomMode", HoldingRegister, 117, 1, RawInteger, PerRoom);

/// Active mode override.
pub const ROOM_MODE_OVERRIDE: RegisterDescriptor =
    RegisterDescriptor::new("RoomModeOverride", HoldingRegister, 118, 1, RawInteger, PerRoom);

/// Setpoint change request.
pub const ROOM_TEMP_SETP_CHANGE: RegisterDescriptor = RegisterDescriptor::new(
    "RoomTempSetpChange",
    HoldingRegister,
    119,
    1,
    FixedPoint100,
    PerRoom,
);

/// Vacation setpoint.
pub const ROOM_TEMP_SETP_VACATION: RegisterDescriptor = RegisterDescriptor::new(
    "RoomTempSetpVacation",
    HoldingRegister,
    121,
    1,
    FixedPoint100,
    PerRoom,
);

/// Standby setpoint.
pub const ROOM_TEMP_SETP_STANDBY: RegisterDescriptor = RegisterDescriptor::new(
    "RoomTempSetpStandby",
    HoldingRegister,
    122,
    1,
    FixedPoint100,
    PerRoom,
);

// =============================================================================
// Outdoor / Ventilation Registers
// =============================================================================

/// Outdoor sensor temperature.
pub const OUTDOOR_TEMPERATURE: RegisterDescriptor = RegisterDescriptor::new(
    "OutdoorTemperature",
    InputRegister,
    3301,
    1,
    FixedPoint100,
    Generic,
);

/// Ventilation unit name (64 bytes).
pub const CMV_DEVICE_NAME: RegisterDescriptor =
    RegisterDescriptor::new("CmvDeviceName", HoldingRegister, 61001, 32, AsciiString, Generic);

/// Ventilation unit state code.
pub const CMV_VENTILATION_STATE: RegisterDescriptor = RegisterDescriptor::new(
    "CmvVentilationState",
    InputRegister,
    61023,
    1,
    RawInteger,
    Generic,
);

// =============================================================================
// Table
// =============================================================================

/// Every known register, in address order per table.
pub const ALL: &[RegisterDescriptor] = &[
    DEVICE_TYPE,
    DEVICE_HW_VERSION,
    DEVICE_SW_VERSION,
    DEVICE_SW_VERSION_MINOR,
    DEVICE_SERIAL_NR_PREFIX,
    DEVICE_SERIAL_NUMBER,
    ROOM_TEMP_SETPOINT,
    ROOM_HEATING_STATE,
    ROOM_AIR_TEMP_ACTUAL,
    ROOM_FLOOR_TEMP_ACTUAL,
    ROOM_REL_HUMIDITY,
    ROOM_CALC_DEW_POINT,
    OUTDOOR_TEMPERATURE,
    CMV_VENTILATION_STATE,
    MODBUS_MODE,
    ROOM_NAME,
    ROOM_MODE,
    ROOM_MODE_OVERRIDE,
    ROOM_TEMP_SETP_CHANGE,
    ROOM_TEMP_SETP_VACATION,
    ROOM_TEMP_SETP_STANDBY,
    CMV_DEVICE_NAME,
];

/// Looks a register up by name, ignoring case.
pub fn find(name: &str) -> Option<&'static RegisterDescriptor> {
    ALL.iter().find(|d| d.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_matches_controller_map() {
        let expected: &[(&str, RegisterKind, u16, u16)] = &[
            ("DeviceType", InputRegister, 10, 1),
            ("DeviceSwVersion", InputRegister, 12, 1),
            ("DeviceSwVersionMinor", InputRegister, 13, 1),
            ("DeviceSerialNrPrefix", InputRegister, 14, 1),
            ("DeviceSerialNumber", InputRegister, 15, 2),
            ("RoomTempSetpoint", InputRegister, 101, 1),
            ("RoomHeatingState", InputRegister, 102, 1),
            ("RoomAirTempActual", InputRegister, 104, 1),
            ("RoomFloorTempActual", InputRegister, 105, 1),
            ("RoomRelHumidity", InputRegister, 106, 1),
            ("RoomCalcDewPoint", InputRegister, 107, 1),
            ("RoomName", HoldingRegister, 101, 16),
            ("RoomMode", HoldingRegister, 117, 1),
            ("RoomModeOverride", HoldingRegister, 118, 1),
            ("RoomTempSetpChange", HoldingRegister, 119, 1),
            ("OutdoorTemperature", InputRegister, 3301, 1),
        ];

        for (name, kind, address, count) in expected {
            let d = find(name).unwrap_or_else(|| panic!("{name} missing"));
            assert_eq!((d.kind, d.address, d.count), (*kind, *address, *count), "{name}");
        }
    }

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<_> = ALL.iter().map(|d| d.name).collect();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn test_find_is_case_insensitive() {
        assert_eq!(find("roomname"), Some(&ROOM_NAME));
        assert_eq!(find("OUTDOORTEMPERATURE"), Some(&OUTDOOR_TEMPERATURE));
        assert!(find("RoomWindowOpen").is_none());
    }

    #[test]
    fn test_last_room_fits_address_space() {
        for d in ALL.iter().filter(|d| d.is_per_room()) {
            assert!(d.address_for(Some(MAX_ROOMS - 1)).is_ok(), "{}", d.name);
        }
    }
}
