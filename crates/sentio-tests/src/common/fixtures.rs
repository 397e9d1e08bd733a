// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Register images of Sentio controllers and configuration documents.

use sentio_modbus::registers;

use super::mocks::MockTransport;

// =============================================================================
// Controller Fixtures
// =============================================================================

/// Register images of Sentio controllers.
pub struct ControllerFixtures;

impl ControllerFixtures {
    /// Serial number of the fixture controller.
    pub const SERIAL_NUMBER: u32 = 10_203_040;

    /// Firmware major version of the fixture controller.
    pub const FIRMWARE_MAJOR: u16 = 14;

    /// Firmware minor version of the fixture controller.
    pub const FIRMWARE_MINOR: u16 = 2;

    /// Hardware revision of the fixture controller.
    pub const HARDWARE_VERSION: u16 = 3;

    /// A CCU-208 with a valid identity and no rooms.
    pub fn ccu208() -> MockTransport {
        let mock = MockTransport::new();
        mock.set_input(registers::DEVICE_TYPE.address, 1);
        mock.set_input(registers::DEVICE_HW_VERSION.address, Self::HARDWARE_VERSION);
        mock.set_input(registers::DEVICE_SW_VERSION.address, Self::FIRMWARE_MAJOR);
        mock.set_input(registers::DEVICE_SW_VERSION_MINOR.address, Self::FIRMWARE_MINOR);
        mock.set_input(
            registers::DEVICE_SERIAL_NR_PREFIX.address,
            registers::SERIAL_NUMBER_PREFIX as u16,
        );
        mock.set_input_words(
            registers::DEVICE_SERIAL_NUMBER.address,
            &[
                (Self::SERIAL_NUMBER >> 16) as u16,
                (Self::SERIAL_NUMBER & 0xFFFF) as u16,
            ],
        );
        mock.set_holding(registers::MODBUS_MODE.address, 1);
        mock
    }

    /// A CCU-208 with named rooms at the given slots.
    pub fn ccu208_with_rooms(rooms: &[(u8, &str)]) -> MockTransport {
        let mock = Self::ccu208();
        for (index, name) in rooms {
            RoomFixture::new(*index, name).install(&mock);
        }
        mock
    }

    /// The usual fixture house: living room at slot 0, bathroom at slot 3.
    pub fn house() -> MockTransport {
        Self::ccu208_with_rooms(&[(0, "Living room"), (3, "Bathroom")])
    }

    /// A controller reporting a different device type code.
    pub fn with_device_type(code: u16) -> MockTransport {
        let mock = Self::ccu208();
        mock.set_input(registers::DEVICE_TYPE.address, code);
        mock
    }

    /// A controller with old firmware.
    pub fn with_firmware(major: u16, minor: u16) -> MockTransport {
        let mock = Self::ccu208();
        mock.set_input(registers::DEVICE_SW_VERSION.address, major);
        mock.set_input(registers::DEVICE_SW_VERSION_MINOR.address, minor);
        mock
    }

    /// Sets the outdoor temperature in °C.
    pub fn set_outdoor(mock: &MockTransport, degrees: f64) {
        let raw = (degrees * 100.0) as i16;
        mock.set_input(registers::OUTDOOR_TEMPERATURE.address, raw as u16);
    }
}

// =============================================================================
// Room Fixtures
// =============================================================================

/// Register values of one room slot.
#[derive(Debug, Clone)]
pub struct RoomFixture {
    /// Slot index.
    pub index: u8,
    /// Room name.
    pub name: String,
    /// Active setpoint, hundredths of °C.
    pub setpoint: u16,
    /// Air temperature, hundredths of °C.
    pub air_temperature: u16,
    /// Floor temperature, hundredths of °C.
    pub floor_temperature: u16,
    /// Relative humidity, hundredths of %.
    pub relative_humidity: u16,
    /// Dew point, hundredths of °C.
    pub dew_point: u16,
    /// Heating state code.
    pub heating_state: u16,
    /// Mode code.
    pub mode: u16,
    /// Mode override code.
    pub mode_override: u16,
    /// Vacation setpoint, hundredths of °C.
    pub vacation_setpoint: u16,
    /// Standby setpoint, hundredths of °C.
    pub standby_setpoint: u16,
}

impl RoomFixture {
    /// A heated room at 20.5 °C with a 21 °C setpoint.
    pub fn new(index: u8, name: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            setpoint: 2100,
            air_temperature: 2050,
            floor_temperature: 2380,
            relative_humidity: 4520,
            dew_point: 810,
            heating_state: 2,
            mode: 0,
            mode_override: 0,
            vacation_setpoint: 1600,
            standby_setpoint: 1800,
        }
    }

    /// Sets the mode override code.
    pub fn with_override(mut self, code: u16) -> Self {
        self.mode_override = code;
        self
    }

    /// Sets the heating state code.
    pub fn with_heating_state(mut self, code: u16) -> Self {
        self.heating_state = code;
        self
    }

    /// Writes this room into the mock's register banks.
    pub fn install(&self, mock: &MockTransport) {
        let at = |descriptor: &sentio_modbus::RegisterDescriptor| {
            descriptor.address + u16::from(self.index) * registers::ROOM_ADDRESS_STRIDE
        };

        mock.set_holding_text(at(&registers::ROOM_NAME), registers::ROOM_NAME.count, &self.name);
        mock.set_input(at(&registers::ROOM_TEMP_SETPOINT), self.setpoint);
        mock.set_input(at(&registers::ROOM_AIR_TEMP_ACTUAL), self.air_temperature);
        mock.set_input(at(&registers::ROOM_FLOOR_TEMP_ACTUAL), self.floor_temperature);
        mock.set_input(at(&registers::ROOM_REL_HUMIDITY), self.relative_humidity);
        mock.set_input(at(&registers::ROOM_CALC_DEW_POINT), self.dew_point);
        mock.set_input(at(&registers::ROOM_HEATING_STATE), self.heating_state);
        mock.set_holding(at(&registers::ROOM_MODE), self.mode);
        mock.set_holding(at(&registers::ROOM_MODE_OVERRIDE), self.mode_override);
        mock.set_holding(at(&registers::ROOM_TEMP_SETP_VACATION), self.vacation_setpoint);
        mock.set_holding(at(&registers::ROOM_TEMP_SETP_STANDBY), self.standby_setpoint);
    }
}

// =============================================================================
// Config Fixtures
// =============================================================================

/// Configuration documents.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A minimal TCP configuration.
    pub fn minimal_tcp_yaml() -> &'static str {
        r#"
connection:
  transport: tcp
  host: 192.168.1.50
"#
    }

    /// A TCP configuration with every section set.
    pub fn full_tcp_yaml() -> &'static str {
        r#"
connection:
  transport: tcp
  host: 192.168.1.50
  port: 1502
  unit_id: 2
  connect_timeout: 2s
  operation_timeout: 750ms

discovery:
  max_rooms: 8
  require_discovery: false

logging:
  level: debug
  format: json
"#
    }

    /// An RTU configuration.
    pub fn rtu_yaml() -> &'static str {
        r#"
connection:
  transport: rtu
  port: /dev/ttyUSB0
  baud_rate: 38400
  parity: even
  unit_id: 3
  timeout: 1s
"#
    }

    /// The same TCP configuration in TOML.
    pub fn tcp_toml() -> &'static str {
        r#"
[connection]
transport = "tcp"
host = "192.168.1.50"
port = 502

[discovery]
max_rooms = 12
"#
    }

    /// A configuration using environment placeholders.
    pub fn placeholder_yaml() -> &'static str {
        r#"
connection:
  transport: tcp
  host: "${SENTIO_TEST_HOST:10.0.0.1}"
  unit_id: 1
"#
    }
}
