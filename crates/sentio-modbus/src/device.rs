// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Controller, room and ventilation domain types.
//!
//! Every coded enum converts from the raw register integer with `TryFrom<u64>`
//! and fails with [`ErrorKind::UnknownEnumValue`](crate::ErrorKind) for
//! codes the controller firmware may add later.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SentioError;
use crate::registers;
use crate::types::RegisterDescriptor;

// =============================================================================
// Coded Enums
// =============================================================================

macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every member, in code order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Returns the register code.
            pub const fn code(&self) -> u16 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            /// Returns the lowercase name.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl TryFrom<u64> for $name {
            type Error = SentioError;

            fn try_from(value: u64) -> Result<Self, Self::Error> {
                match value {
                    $($code => Ok(Self::$variant),)+
                    other => Err(SentioError::unknown_enum_value(stringify!($name), other)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

code_enum! {
    /// Controller model.
    DeviceType {
        /// CCU-208 central control unit.
        Ccu208 = 1 => "CCU-208",
        /// DHW-201 domestic hot water unit.
        Dhw201 = 2 => "DHW-201",
    }
}

code_enum! {
    /// Heating state of a room.
    HeatingState {
        /// No demand.
        Idle = 1 => "idle",
        /// Heating.
        Heating = 2 => "heating",
        /// Cooling.
        Cooling = 3 => "cooling",
        /// Heating demand blocked.
        BlockedHeating = 4 => "blocked_heating",
        /// Cooling demand blocked.
        BlockedCooling = 5 => "blocked_cooling",
    }
}

code_enum! {
    /// Room operating mode.
    RoomMode {
        /// Follows the weekly program.
        Schedule = 0 => "schedule",
        /// Holds the manual setpoint.
        Manual = 1 => "manual",
    }
}

code_enum! {
    /// Temporary override of a room's mode.
    RoomModeOverride {
        /// No override.
        None = 0 => "none",
        /// Temporary setpoint until the next program switch.
        Temporary = 1 => "temporary",
        /// Vacation or away.
        VacationAway = 2 => "vacation_away",
        /// Adjusted setpoint.
        Adjust = 3 => "adjust",
    }
}

code_enum! {
    /// State of the connected ventilation (CMV) unit.
    VentilationState {
        /// Stopped.
        Stopped = 0 => "stopped",
        /// Unoccupied level.
        Unoccupied = 1 => "unoccupied",
        /// Economy level.
        Economy = 2 => "economy",
        /// Comfort level.
        Comfort = 3 => "comfort",
        /// Boost level.
        Boost = 4 => "boost",
        /// Stopped, blocked.
        BlockedStopped = 5 => "blocked_stopped",
        /// Unoccupied, blocked.
        BlockedUnoccupied = 6 => "blocked_unoccupied",
        /// Economy, blocked.
        BlockedEconomy = 7 => "blocked_economy",
        /// Comfort, blocked.
        BlockedComfort = 8 => "blocked_comfort",
        /// Boost, blocked.
        BlockedBoost = 9 => "blocked_boost",
        /// Unit failure.
        Failure = 10 => "failure",
        /// Maintenance required.
        Maintenance = 11 => "maintenance",
    }
}

impl FromStr for RoomMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "schedule" | "program" | "auto" => Ok(Self::Schedule),
            "manual" => Ok(Self::Manual),
            _ => Err(format!("Unknown room mode '{s}' (expected schedule or manual)")),
        }
    }
}

// =============================================================================
// DeviceIdentity / Room / Discovery
// =============================================================================

/// Identity of the controller, read once during discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceIdentity {
    /// Controller model.
    pub device_type: DeviceType,
    /// Serial number prefix.
    pub serial_prefix: u64,
    /// Serial number.
    pub serial_number: u64,
    /// Firmware major version.
    pub firmware_major: u64,
    /// Firmware minor version.
    pub firmware_minor: u64,
    /// Hardware revision, when readable.
    pub hardware_version: Option<u64>,
}

impl DeviceIdentity {
    /// Returns the serial in printed-label form, e.g. `1530-12345678`.
    pub fn serial(&self) -> String {
        format!("{}-{}", self.serial_prefix, self.serial_number)
    }

    /// Returns the firmware version, e.g. `12.4`.
    pub fn firmware_version(&self) -> String {
        format!("{}.{}", self.firmware_major, self.firmware_minor)
    }
}

/// A room configured on the controller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Room {
    /// Slot index (0..24).
    pub index: u8,
    /// Name as entered on the controller.
    pub name: String,
}

impl Room {
    /// Creates a room.
    pub fn new(index: u8, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.index)
    }
}

/// Result of discovery: identity plus rooms ordered by index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discovery {
    /// Controller identity.
    pub identity: DeviceIdentity,
    /// Rooms, index ascending.
    pub rooms: Vec<Room>,
}

impl Discovery {
    /// Returns the discovered room indices.
    pub fn room_indices(&self) -> Vec<u8> {
        self.rooms.iter().map(|r| r.index).collect()
    }
}

/// Diagnostic device information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// Raw device type code.
    pub device_type: u64,
    /// Model name, when the code is known.
    pub model: Option<&'static str>,
    /// Serial number prefix.
    pub serial_prefix: u64,
    /// Serial number.
    pub serial_number: u64,
    /// Modbus mode register.
    pub modbus_mode: u64,
}

// =============================================================================
// Room Fields
// =============================================================================

/// A readable per-room field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomField {
    /// Active setpoint (°C).
    Setpoint,
    /// Air temperature (°C).
    AirTemperature,
    /// Floor temperature (°C).
    FloorTemperature,
    /// Relative humidity (%).
    RelativeHumidity,
    /// Calculated dew point (°C).
    DewPoint,
    /// Heating state.
    HeatingState,
    /// Room mode.
    Mode,
    /// Mode override.
    ModeOverride,
    /// Vacation setpoint (°C).
    VacationSetpoint,
    /// Standby setpoint (°C).
    StandbySetpoint,
}

impl RoomField {
    /// Every field.
    pub const ALL: &'static [Self] = &[
        Self::Setpoint,
        Self::AirTemperature,
        Self::FloorTemperature,
        Self::RelativeHumidity,
        Self::DewPoint,
        Self::HeatingState,
        Self::Mode,
        Self::ModeOverride,
        Self::VacationSetpoint,
        Self::StandbySetpoint,
    ];

    /// Returns the register backing this field.
    pub const fn descriptor(&self) -> &'static RegisterDescriptor {
        match self {
            Self::Setpoint => &registers::ROOM_TEMP_SETPOINT,
            Self::AirTemperature => &registers::ROOM_AIR_TEMP_ACTUAL,
            Self::FloorTemperature => &registers::ROOM_FLOOR_TEMP_ACTUAL,
            Self::RelativeHumidity => &registers::ROOM_REL_HUMIDITY,
            Self::DewPoint => &registers::ROOM_CALC_DEW_POINT,
            Self::HeatingState => &registers::ROOM_HEATING_STATE,
            Self::Mode => &registers::ROOM_MODE,
            Self::ModeOverride => &registers::ROOM_MODE_OVERRIDE,
            Self::VacationSetpoint => &registers::ROOM_TEMP_SETP_VACATION,
            Self::StandbySetpoint => &registers::ROOM_TEMP_SETP_STANDBY,
        }
    }

    /// Returns the snake_case name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Setpoint => "setpoint",
            Self::AirTemperature => "air_temperature",
            Self::FloorTemperature => "floor_temperature",
            Self::RelativeHumidity => "relative_humidity",
            Self::DewPoint => "dew_point",
            Self::HeatingState => "heating_state",
            Self::Mode => "mode",
            Self::ModeOverride => "mode_override",
            Self::VacationSetpoint => "vacation_setpoint",
            Self::StandbySetpoint => "standby_setpoint",
        }
    }

    /// Returns the display unit of decimal fields.
    pub const fn unit(&self) -> Option<&'static str> {
        match self {
            Self::RelativeHumidity => Some("%"),
            Self::HeatingState | Self::Mode | Self::ModeOverride => None,
            _ => Some("°C"),
        }
    }
}

impl fmt::Display for RoomField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "temperature" | "temp" => Ok(Self::AirTemperature),
            "humidity" => Ok(Self::RelativeHumidity),
            "floor" => Ok(Self::FloorTemperature),
            "state" => Ok(Self::HeatingState),
            "override" => Ok(Self::ModeOverride),
            name => Self::ALL
                .iter()
                .copied()
                .find(|f| f.as_str() == name)
                .ok_or_else(|| format!("Unknown room field '{s}'")),
        }
    }
}

/// The value of a room field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Degrees or percent.
    Decimal(f64),
    /// Heating state.
    HeatingState(HeatingState),
    /// Room mode.
    Mode(RoomMode),
    /// Mode override.
    ModeOverride(RoomModeOverride),
}

impl FieldValue {
    /// Returns the decimal, if this is one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Decimal(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal(v) => write!(f, "{v:.2}"),
            Self::HeatingState(s) => write!(f, "{s}"),
            Self::Mode(m) => write!(f, "{m}"),
            Self::ModeOverride(o) => write!(f, "{o}"),
        }
    }
}

/// Every field of one room, read in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomSnapshot {
    /// Room index.
    pub index: u8,
    /// Room name.
    pub name: String,
    /// Active setpoint (°C).
    pub setpoint: f64,
    /// Air temperature (°C).
    pub air_temperature: f64,
    /// Floor temperature (°C).
    pub floor_temperature: f64,
    /// Relative humidity (%).
    pub relative_humidity: f64,
    /// Dew point (°C).
    pub dew_point: f64,
    /// Heating state.
    pub heating_state: HeatingState,
    /// Room mode.
    pub mode: RoomMode,
    /// Mode override.
    pub mode_override: RoomModeOverride,
    /// Vacation setpoint (°C).
    pub vacation_setpoint: f64,
    /// Standby setpoint (°C).
    pub standby_setpoint: f64,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_heating_state_codes() {
        assert_eq!(HeatingState::try_from(1).unwrap(), HeatingState::Idle);
        assert_eq!(HeatingState::try_from(5).unwrap(), HeatingState::BlockedCooling);
        for state in HeatingState::ALL {
            assert_eq!(HeatingState::try_from(u64::from(state.code())).unwrap(), *state);
        }
    }

    #[test]
    fn test_unknown_codes() {
        for raw in [0u64, 6, 255] {
            let err = HeatingState::try_from(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnknownEnumValue);
        }
        assert!(RoomMode::try_from(2).is_err());
        assert!(RoomModeOverride::try_from(4).is_err());
        assert!(VentilationState::try_from(12).is_err());
        assert!(DeviceType::try_from(0).is_err());
    }

    #[test]
    fn test_ventilation_state_codes() {
        assert_eq!(VentilationState::try_from(0).unwrap(), VentilationState::Stopped);
        assert_eq!(VentilationState::try_from(11).unwrap(), VentilationState::Maintenance);
        assert_eq!(VentilationState::ALL.len(), 12);
    }

    #[test]
    fn test_room_mode_parsing() {
        assert_eq!("manual".parse::<RoomMode>().unwrap(), RoomMode::Manual);
        assert_eq!("Schedule".parse::<RoomMode>().unwrap(), RoomMode::Schedule);
        assert!("eco".parse::<RoomMode>().is_err());
        assert_eq!(RoomMode::Manual.code(), 1);
    }

    #[test]
    fn test_room_field_parsing() {
        assert_eq!("air-temperature".parse::<RoomField>().unwrap(), RoomField::AirTemperature);
        assert_eq!("humidity".parse::<RoomField>().unwrap(), RoomField::RelativeHumidity);
        assert_eq!("mode_override".parse::<RoomField>().unwrap(), RoomField::ModeOverride);
        assert!("window".parse::<RoomField>().is_err());
    }

    #[test]
    fn test_room_field_descriptors_are_per_room() {
        for field in RoomField::ALL {
            assert!(field.descriptor().is_per_room(), "{field}");
        }
    }

    #[test]
    fn test_identity_formatting() {
        let identity = DeviceIdentity {
            device_type: DeviceType::Ccu208,
            serial_prefix: 1530,
            serial_number: 65538,
            firmware_major: 14,
            firmware_minor: 2,
            hardware_version: None,
        };
        assert_eq!(identity.serial(), "1530-65538");
        assert_eq!(identity.firmware_version(), "14.2");
        assert_eq!(DeviceType::Ccu208.to_string(), "CCU-208");
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::Decimal(21.5).to_string(), "21.50");
        assert_eq!(FieldValue::HeatingState(HeatingState::Heating).to_string(), "heating");
        assert_eq!(FieldValue::Mode(RoomMode::Schedule).to_string(), "schedule");
    }
}
