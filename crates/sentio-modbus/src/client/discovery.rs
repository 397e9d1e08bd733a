// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Identity validation and room scanning.

use crate::device::{DeviceIdentity, DeviceInfo, DeviceType, Discovery, Room};
use crate::error::{DeviceError, SentioError, SentioResult};
use crate::registers::{self, MIN_FIRMWARE_MAJOR, SERIAL_NUMBER_PREFIX};
use crate::types::RegisterDescriptor;

use super::{ModbusTransport, RegisterGateway};

impl<T: ModbusTransport> RegisterGateway<T> {
    /// Validates the controller identity and scans every room slot.
    ///
    /// Previously discovered state is cleared first; on failure it stays
    /// cleared. Slots whose name read fails or is empty are skipped.
    ///
    /// # Errors
    ///
    /// - `UnsupportedDevice` if the device type is not a CCU-208
    /// - `IdentityMismatch` if the serial prefix is not 1530
    /// - `UnsupportedFirmware` if the firmware major version is below 12
    /// - any transport error from the identity reads
    pub async fn discover(&mut self) -> SentioResult<Discovery> {
        self.identity = None;
        self.rooms.clear();

        let identity = self.read_identity().await?;

        let mut rooms = Vec::new();
        for index in 0..self.max_rooms {
            if let Some(room) = self.scan_slot(index).await {
                rooms.push(room);
            }
        }

        tracing::info!(
            model = %identity.device_type,
            serial = %identity.serial(),
            firmware = %identity.firmware_version(),
            rooms = rooms.len(),
            "Discovered Sentio controller"
        );

        self.identity = Some(identity.clone());
        self.rooms = rooms.clone();

        Ok(Discovery { identity, rooms })
    }

    async fn read_identity(&self) -> SentioResult<DeviceIdentity> {
        let code = self.read_integer(&registers::DEVICE_TYPE).await?;
        let device_type = match DeviceType::try_from(code) {
            Ok(DeviceType::Ccu208) => DeviceType::Ccu208,
            Ok(other) => return Err(unsupported_device(code, other.as_str())),
            Err(_) => return Err(unsupported_device(code, "unknown")),
        };

        let serial_prefix = self.read_integer(&registers::DEVICE_SERIAL_NR_PREFIX).await?;
        let serial_number = self.read_integer(&registers::DEVICE_SERIAL_NUMBER).await?;
        if serial_prefix != SERIAL_NUMBER_PREFIX {
            return Err(SentioError::device(DeviceError::IdentityMismatch {
                expected: SERIAL_NUMBER_PREFIX,
                actual: serial_prefix,
            }));
        }

        let firmware_major = self.read_integer(&registers::DEVICE_SW_VERSION).await?;
        let firmware_minor = self.read_integer(&registers::DEVICE_SW_VERSION_MINOR).await?;
        if firmware_major < MIN_FIRMWARE_MAJOR {
            return Err(SentioError::device(DeviceError::UnsupportedFirmware {
                major: firmware_major,
                minor: firmware_minor,
                minimum: MIN_FIRMWARE_MAJOR,
            }));
        }

        let hardware_version = self.read_integer(&registers::DEVICE_HW_VERSION).await.ok();

        Ok(DeviceIdentity {
            device_type,
            serial_prefix,
            serial_number,
            firmware_major,
            firmware_minor,
            hardware_version,
        })
    }

    async fn scan_slot(&self, index: u8) -> Option<Room> {
        match self.read(&registers::ROOM_NAME, Some(index)).await {
            Ok(value) => match value.into_text() {
                Ok(name) if !name.is_empty() => Some(Room::new(index, name)),
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!(room = index, error = %e, "Skipping room slot");
                    None
                }
            },
            Err(e) => {
                tracing::debug!(room = index, error = %e, "Skipping room slot");
                None
            }
        }
    }

    /// Reads the identity registers and the Modbus mode for diagnostics.
    ///
    /// Unlike [`discover`](Self::discover), nothing is validated or stored.
    pub async fn device_info(&self) -> SentioResult<DeviceInfo> {
        let device_type = self.read_integer(&registers::DEVICE_TYPE).await?;
        let serial_prefix = self.read_integer(&registers::DEVICE_SERIAL_NR_PREFIX).await?;
        let serial_number = self.read_integer(&registers::DEVICE_SERIAL_NUMBER).await?;
        let modbus_mode = self.read_integer(&registers::MODBUS_MODE).await?;

        let info = DeviceInfo {
            device_type,
            model: DeviceType::try_from(device_type).ok().map(|t| t.as_str()),
            serial_prefix,
            serial_number,
            modbus_mode,
        };

        tracing::info!(
            device_type,
            model = info.model.unwrap_or("unknown"),
            serial = %format_args!("{serial_prefix}-{serial_number}"),
            modbus_mode,
            "Device info"
        );

        Ok(info)
    }

    pub(crate) async fn read_integer(&self, descriptor: &RegisterDescriptor) -> SentioResult<u64> {
        self.read(descriptor, None).await?.expect_integer()
    }
}

fn unsupported_device(device_type: u64, model: &'static str) -> SentioError {
    SentioError::device(DeviceError::UnsupportedDevice { device_type, model })
}

#[cfg(test)]
mod tests {
    use super::super::tests::ccu208;
    use super::*;
    use crate::error::ErrorKind;

    #[tokio::test]
    async fn test_discover_supported_controller() {
        let mut t = ccu208();
        t.set_text(101, 16, "Living");
        t.set_text(301, 16, "Bath");
        let mut gateway = RegisterGateway::new(t);

        let discovery = gateway.discover().await.unwrap();
        assert_eq!(discovery.identity.device_type, DeviceType::Ccu208);
        assert_eq!(discovery.identity.serial_number, 65538);
        assert_eq!(discovery.identity.firmware_version(), "14.2");
        assert_eq!(discovery.identity.hardware_version, Some(3));
        assert_eq!(discovery.room_indices(), vec![0, 2]);
        assert_eq!(gateway.rooms()[1].name, "Bath");
        assert!(gateway.identity().is_some());
    }

    #[tokio::test]
    async fn test_failed_slot_is_skipped() {
        let mut t = ccu208();
        t.set_text(101, 16, "Living");
        t.set_text(201, 16, "Kitchen");
        t.failing.lock().unwrap().push(201);
        let mut gateway = RegisterGateway::new(t);

        let discovery = gateway.discover().await.unwrap();
        assert_eq!(discovery.room_indices(), vec![0]);
    }

    #[tokio::test]
    async fn test_scan_respects_max_rooms() {
        let t = ccu208();
        let calls = t.calls.clone();
        let mut gateway = RegisterGateway::new(t).with_max_rooms(4);

        gateway.discover().await.unwrap();
        let name_reads = calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with("HR") && c.ends_with("01"))
            .count();
        assert_eq!(name_reads, 4);
    }

    #[tokio::test]
    async fn test_wrong_device_type() {
        let mut t = ccu208();
        t.input.insert(10, 2);
        let mut gateway = RegisterGateway::new(t);

        let err = gateway.discover().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedDevice);
        assert!(gateway.rooms().is_empty());

        let mut t = ccu208();
        t.input.insert(10, 7);
        let err = RegisterGateway::new(t).discover().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedDevice);
    }

    #[tokio::test]
    async fn test_serial_prefix_mismatch() {
        let mut t = ccu208();
        t.input.insert(14, 1531);
        let err = RegisterGateway::new(t).discover().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IdentityMismatch);
    }

    #[tokio::test]
    async fn test_old_firmware_rejected() {
        let mut t = ccu208();
        t.input.insert(12, 11);
        let err = RegisterGateway::new(t).discover().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedFirmware);

        let mut t = ccu208();
        t.input.insert(12, 12);
        t.input.insert(13, 0);
        assert!(RegisterGateway::new(t).discover().await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_rediscovery_clears_state() {
        let mut t = ccu208();
        t.set_text(101, 16, "Living");
        let failing = t.failing.clone();
        let mut gateway = RegisterGateway::new(t);
        gateway.discover().await.unwrap();
        assert_eq!(gateway.rooms().len(), 1);

        failing.lock().unwrap().push(14);
        assert!(gateway.discover().await.is_err());
        assert!(gateway.identity().is_none());
        assert!(gateway.rooms().is_empty());
    }

    #[tokio::test]
    async fn test_device_info() {
        let t = ccu208();
        t.holding.lock().unwrap().insert(5, 2);
        let gateway = RegisterGateway::new(t);

        let info = gateway.device_info().await.unwrap();
        assert_eq!(info.device_type, 1);
        assert_eq!(info.model, Some("CCU-208"));
        assert_eq!(info.serial_prefix, 1530);
        assert_eq!(info.modbus_mode, 2);
    }
}
