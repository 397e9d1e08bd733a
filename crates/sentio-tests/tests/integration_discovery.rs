// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Discovery Integration Tests
//!
//! - `test_identity_*`: Device type, serial prefix and firmware checks
//! - `test_scan_*`: Room slot scanning
//! - `test_rediscover_*`: Replacing and clearing discovered state

use sentio_modbus::{registers, DeviceType, ErrorKind, RegisterGateway, RoomField};
use sentio_tests::prelude::*;

async fn connected(mock: MockTransport) -> (RegisterGateway<MockTransport>, MockTransport) {
    init_test_logging();
    let handle = mock.clone();
    let mut gateway = RegisterGateway::new(mock);
    gateway.connect().await.unwrap();
    (gateway, handle)
}

// =============================================================================
// Identity
// =============================================================================

#[tokio::test]
async fn test_identity_supported_controller() {
    let (mut gateway, _mock) = connected(ControllerFixtures::house()).await;

    let discovery = gateway.discover().await.unwrap();
    let identity = &discovery.identity;
    assert_eq!(identity.device_type, DeviceType::Ccu208);
    assert_eq!(identity.serial_prefix, 1530);
    assert_eq!(identity.serial_number, u64::from(ControllerFixtures::SERIAL_NUMBER));
    assert_eq!(identity.firmware_version(), "14.2");
    assert_eq!(identity.hardware_version, Some(3));
    assert_eq!(identity.serial(), "1530-10203040");
    assert_eq!(gateway.identity(), Some(identity));
}

#[tokio::test]
async fn test_identity_dhw_unit_rejected() {
    let (mut gateway, _mock) = connected(ControllerFixtures::with_device_type(2)).await;

    let err = gateway.discover().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedDevice);
    assert!(err.to_string().contains("DHW-201"));
}

#[tokio::test]
async fn test_identity_unknown_device_type() {
    let (mut gateway, mock) = connected(ControllerFixtures::with_device_type(7)).await;

    gateway.discover().await.assert_kind(ErrorKind::UnsupportedDevice);
    // Nothing past the device type is read.
    assert_eq!(
        mock.register_calls(),
        vec![TransportCall::ReadInputRegisters { address: 10, count: 1 }]
    );
}

#[tokio::test]
async fn test_identity_wrong_serial_prefix() {
    let mock = ControllerFixtures::house();
    mock.set_input(registers::DEVICE_SERIAL_NR_PREFIX.address, 1531);
    let (mut gateway, _mock) = connected(mock).await;

    gateway.discover().await.assert_kind(ErrorKind::IdentityMismatch);
    assert!(gateway.rooms().is_empty());
}

#[tokio::test]
async fn test_identity_old_firmware() {
    let (mut gateway, _mock) = connected(ControllerFixtures::with_firmware(11, 9)).await;
    gateway.discover().await.assert_kind(ErrorKind::UnsupportedFirmware);

    let (mut gateway, _mock) = connected(ControllerFixtures::with_firmware(12, 0)).await;
    assert!(gateway.discover().await.is_ok());
}

#[tokio::test]
async fn test_identity_hardware_version_optional() {
    let mock = ControllerFixtures::house();
    mock.fail_read_at(registers::DEVICE_HW_VERSION.address);
    let (mut gateway, _mock) = connected(mock).await;

    let discovery = gateway.discover().await.unwrap();
    assert_eq!(discovery.identity.hardware_version, None);
    assert_eq!(discovery.room_indices(), vec![0, 3]);
}

#[tokio::test]
async fn test_identity_read_failure_propagates() {
    let mock = ControllerFixtures::house();
    mock.fail_read_at(registers::DEVICE_TYPE.address);
    let (mut gateway, _mock) = connected(mock).await;

    gateway.discover().await.assert_kind(ErrorKind::ConnectionFailure);
}

// =============================================================================
// Room Scan
// =============================================================================

#[tokio::test]
async fn test_scan_only_named_slots() {
    let (mut gateway, _mock) = connected(ControllerFixtures::house()).await;

    let discovery = gateway.discover().await.unwrap();
    assert_eq!(discovery.room_indices(), vec![0, 3]);
    assert_eq!(discovery.rooms[0].name, "Living room");
    assert_eq!(discovery.rooms[1].name, "Bathroom");
    assert_eq!(gateway.room(3).map(|r| r.name.as_str()), Some("Bathroom"));
    assert!(gateway.room(1).is_none());
}

#[tokio::test]
async fn test_scan_reads_every_slot() {
    let (mut gateway, mock) = connected(ControllerFixtures::house()).await;
    gateway.discover().await.unwrap();

    let name_reads: Vec<u16> = mock
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            TransportCall::ReadHoldingRegisters { address, count: 16 } => Some(address),
            _ => None,
        })
        .collect();
    let expected: Vec<u16> = (0..24).map(|i| 101 + i * 100).collect();
    assert_eq!(name_reads, expected);
}

#[tokio::test]
async fn test_scan_failed_slot_is_skipped() {
    let mock = ControllerFixtures::ccu208_with_rooms(&[(0, "Hall"), (5, "Office"), (23, "Attic")]);
    mock.fail_read_at(101 + 5 * 100);
    let (mut gateway, _mock) = connected(mock).await;

    let discovery = gateway.discover().await.unwrap();
    assert_eq!(discovery.room_indices(), vec![0, 23]);
}

#[tokio::test]
async fn test_scan_respects_max_rooms() {
    let mock = ControllerFixtures::ccu208_with_rooms(&[(0, "Hall"), (5, "Office"), (23, "Attic")]);
    let handle = mock.clone();
    let mut gateway = RegisterGateway::new(mock).with_max_rooms(6);
    gateway.connect().await.unwrap();

    let discovery = gateway.discover().await.unwrap();
    assert_eq!(discovery.room_indices(), vec![0, 5]);
    assert!(!handle
        .calls()
        .contains(&TransportCall::ReadHoldingRegisters { address: 701, count: 16 }));
}

#[tokio::test]
async fn test_scan_empty_controller() {
    let (mut gateway, _mock) = connected(ControllerFixtures::ccu208()).await;

    let discovery = gateway.discover().await.unwrap();
    assert!(discovery.rooms.is_empty());
    gateway
        .read_room_field(0, RoomField::Setpoint)
        .await
        .assert_kind(ErrorKind::RoomNotFound);
}

// =============================================================================
// Rediscovery
// =============================================================================

#[tokio::test]
async fn test_rediscover_replaces_rooms() {
    let (mut gateway, mock) = connected(ControllerFixtures::house()).await;
    gateway.discover().await.unwrap();

    mock.set_holding_text(101, 16, "");
    RoomFixture::new(7, "Guest room").install(&mock);

    let discovery = gateway.discover().await.unwrap();
    assert_eq!(discovery.room_indices(), vec![3, 7]);
    assert!(gateway.room(0).is_none());
}

#[tokio::test]
async fn test_rediscover_failure_clears_state() {
    let (mut gateway, mock) = connected(ControllerFixtures::house()).await;
    gateway.discover().await.unwrap();
    assert_eq!(gateway.rooms().len(), 2);

    mock.set_input(registers::DEVICE_SW_VERSION.address, 10);
    gateway.discover().await.assert_kind(ErrorKind::UnsupportedFirmware);

    assert!(gateway.identity().is_none());
    assert!(gateway.rooms().is_empty());
    mock.clear_calls();
    gateway
        .read_room_field(3, RoomField::AirTemperature)
        .await
        .assert_kind(ErrorKind::RoomNotFound);
    assert_no_register_access(&mock);
}
