// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed room, outdoor and ventilation accessors.
//!
//! Room accessors only accept rooms found by the last discovery and fail with
//! `RoomNotFound` before touching the transport otherwise.

use crate::device::{
    FieldValue, HeatingState, RoomField, RoomMode, RoomModeOverride, RoomSnapshot,
    VentilationState,
};
use crate::error::SentioResult;
use crate::registers;
use crate::types::{RegisterDescriptor, RegisterValue, ValueType};

use super::{ModbusTransport, RegisterGateway, FIXED_POINT_SCALE};

impl<T: ModbusTransport> RegisterGateway<T> {
    // =========================================================================
    // Room Reads
    // =========================================================================

    /// Reads one field of a discovered room.
    pub async fn read_room_field(&self, room: u8, field: RoomField) -> SentioResult<FieldValue> {
        self.ensure_room(room)?;
        let raw = self.read(field.descriptor(), Some(room)).await?;

        let value = match field {
            RoomField::HeatingState => {
                FieldValue::HeatingState(HeatingState::try_from(raw.expect_integer()?)?)
            }
            RoomField::Mode => FieldValue::Mode(RoomMode::try_from(raw.expect_integer()?)?),
            RoomField::ModeOverride => {
                FieldValue::ModeOverride(RoomModeOverride::try_from(raw.expect_integer()?)?)
            }
            _ => FieldValue::Decimal(hundredths(field.descriptor(), &raw)?),
        };
        Ok(value)
    }

    async fn read_room_decimal(&self, room: u8, field: RoomField) -> SentioResult<f64> {
        self.ensure_room(room)?;
        let raw = self.read(field.descriptor(), Some(room)).await?;
        hundredths(field.descriptor(), &raw)
    }

    /// Reads the active setpoint in °C.
    pub async fn setpoint(&self, room: u8) -> SentioResult<f64> {
        self.read_room_decimal(room, RoomField::Setpoint).await
    }

    /// Reads the air temperature in °C.
    pub async fn actual_temperature(&self, room: u8) -> SentioResult<f64> {
        self.read_room_decimal(room, RoomField::AirTemperature).await
    }

    /// Reads the floor temperature in °C.
    pub async fn floor_temperature(&self, room: u8) -> SentioResult<f64> {
        self.read_room_decimal(room, RoomField::FloorTemperature).await
    }

    /// Reads the relative humidity in %.
    pub async fn relative_humidity(&self, room: u8) -> SentioResult<f64> {
        self.read_room_decimal(room, RoomField::RelativeHumidity).await
    }

    /// Reads the calculated dew point in °C.
    pub async fn dew_point(&self, room: u8) -> SentioResult<f64> {
        self.read_room_decimal(room, RoomField::DewPoint).await
    }

    /// Reads the vacation setpoint in °C.
    pub async fn vacation_setpoint(&self, room: u8) -> SentioResult<f64> {
        self.read_room_decimal(room, RoomField::VacationSetpoint).await
    }

    /// Reads the standby setpoint in °C.
    pub async fn standby_setpoint(&self, room: u8) -> SentioResult<f64> {
        self.read_room_decimal(room, RoomField::StandbySetpoint).await
    }

    /// Reads the heating state.
    pub async fn heating_state(&self, room: u8) -> SentioResult<HeatingState> {
        self.ensure_room(room)?;
        let raw = self.read(&registers::ROOM_HEATING_STATE, Some(room)).await?;
        HeatingState::try_from(raw.expect_integer()?)
    }

    /// Reads the room mode.
    pub async fn mode(&self, room: u8) -> SentioResult<RoomMode> {
        self.ensure_room(room)?;
        let raw = self.read(&registers::ROOM_MODE, Some(room)).await?;
        RoomMode::try_from(raw.expect_integer()?)
    }

    /// Reads the mode override.
    pub async fn mode_override(&self, room: u8) -> SentioResult<RoomModeOverride> {
        self.ensure_room(room)?;
        let raw = self.read(&registers::ROOM_MODE_OVERRIDE, Some(room)).await?;
        RoomModeOverride::try_from(raw.expect_integer()?)
    }

    /// Reads every field of a room.
    pub async fn room_snapshot(&self, room: u8) -> SentioResult<RoomSnapshot> {
        let name = self.ensure_room(room)?.name.clone();

        Ok(RoomSnapshot {
            index: room,
            name,
            setpoint: self.setpoint(room).await?,
            air_temperature: self.actual_temperature(room).await?,
            floor_temperature: self.floor_temperature(room).await?,
            relative_humidity: self.relative_humidity(room).await?,
            dew_point: self.dew_point(room).await?,
            heating_state: self.heating_state(room).await?,
            mode: self.mode(room).await?,
            mode_override: self.mode_override(room).await?,
            vacation_setpoint: self.vacation_setpoint(room).await?,
            standby_setpoint: self.standby_setpoint(room).await?,
        })
    }

    /// Reads a snapshot of every discovered room.
    ///
    /// Each room carries its own outcome, so one unreadable room does not
    /// hide the others.
    pub async fn room_snapshots(&self) -> Vec<(u8, SentioResult<RoomSnapshot>)> {
        let mut snapshots = Vec::with_capacity(self.rooms().len());
        for room in self.rooms() {
            snapshots.push((room.index, self.room_snapshot(room.index).await));
        }
        snapshots
    }

    // =========================================================================
    // Room Writes
    // =========================================================================

    /// Requests a new setpoint for a room.
    ///
    /// An active mode override is cleared first, otherwise the controller
    /// ignores the change. The value is validated before anything is written.
    pub async fn set_setpoint(&self, room: u8, degrees: f64) -> SentioResult<()> {
        self.ensure_room(room)?;
        let target = &registers::ROOM_TEMP_SETP_CHANGE;
        self.codec.encode(target, &RegisterValue::Decimal(degrees))?;

        let current = self
            .read(&registers::ROOM_MODE_OVERRIDE, Some(room))
            .await?
            .expect_integer()?;
        if current != 0 {
            tracing::debug!(room, mode_override = current, "Clearing mode override");
            self.write(
                &registers::ROOM_MODE_OVERRIDE,
                RegisterValue::Integer(u64::from(RoomModeOverride::None.code())),
                Some(room),
            )
            .await?;
        }

        self.write(target, RegisterValue::Decimal(degrees), Some(room)).await?;
        tracing::info!(room, setpoint = degrees, "Setpoint changed");
        Ok(())
    }

    /// Sets the room mode.
    pub async fn set_mode(&self, room: u8, mode: RoomMode) -> SentioResult<()> {
        self.ensure_room(room)?;
        self.write(
            &registers::ROOM_MODE,
            RegisterValue::Integer(u64::from(mode.code())),
            Some(room),
        )
        .await?;
        tracing::info!(room, %mode, "Room mode changed");
        Ok(())
    }

    /// Sets the vacation setpoint in °C.
    pub async fn set_vacation_setpoint(&self, room: u8, degrees: f64) -> SentioResult<()> {
        self.ensure_room(room)?;
        self.write(
            &registers::ROOM_TEMP_SETP_VACATION,
            RegisterValue::Decimal(degrees),
            Some(room),
        )
        .await
    }

    /// Sets the standby setpoint in °C.
    pub async fn set_standby_setpoint(&self, room: u8, degrees: f64) -> SentioResult<()> {
        self.ensure_room(room)?;
        self.write(
            &registers::ROOM_TEMP_SETP_STANDBY,
            RegisterValue::Decimal(degrees),
            Some(room),
        )
        .await
    }

    // =========================================================================
    // Outdoor / Ventilation
    // =========================================================================

    /// Reads the outdoor sensor temperature in °C.
    pub async fn outdoor_temperature(&self) -> SentioResult<f64> {
        self.read(&registers::OUTDOOR_TEMPERATURE, None)
            .await?
            .expect_decimal()
    }

    /// Reads the name of the connected ventilation unit.
    pub async fn cmv_device_name(&self) -> SentioResult<String> {
        self.read(&registers::CMV_DEVICE_NAME, None).await?.into_text()
    }

    /// Reads the state of the connected ventilation unit.
    pub async fn cmv_ventilation_state(&self) -> SentioResult<VentilationState> {
        let raw = self.read_integer(&registers::CMV_VENTILATION_STATE).await?;
        VentilationState::try_from(raw)
    }
}

/// Scales a room measurement to its physical unit.
///
/// Raw-integer registers carry hundredths; fixed-point registers are
/// already decoded.
fn hundredths(descriptor: &RegisterDescriptor, raw: &RegisterValue) -> SentioResult<f64> {
    match descriptor.value_type {
        ValueType::FixedPoint100 => raw.expect_decimal(),
        _ => Ok(raw.expect_integer()? as f64 / FIXED_POINT_SCALE),
    }
}
