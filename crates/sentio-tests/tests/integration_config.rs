// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Configuration Integration Tests
//!
//! - `test_load_*`: Loading files of every format
//! - `test_env_*`: Placeholders and `SENTIO_*` overrides
//! - `test_overrides_*`: Command-line overrides
//! - `test_gateway_*`: Building a gateway from a configuration

use std::collections::HashMap;
use std::fs;
use std::time::Duration;

use sentio_config::{
    ConfigError, ConfigFormat, ConfigLoader, ConnectionConfig, ConnectionOverrides, LogFormat,
    LogLevel, SentioConfig,
};
use sentio_modbus::{ConnectionSettings, ModbusTransport, Parity, RegisterGateway, SentioTransport};
use sentio_tests::prelude::*;

fn loader_with_env(vars: &[(&str, &str)]) -> ConfigLoader {
    let env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ConfigLoader::new().with_env_lookup(move |name| env.get(name).cloned())
}

fn write_config(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// Loading
// =============================================================================

#[tokio::test]
async fn test_load_minimal_yaml_defaults() {
    let dir = temp_test_dir("sentio-config");
    let path = write_config(&dir, "sentio.yaml", ConfigFixtures::minimal_tcp_yaml());

    let config = loader_with_env(&[]).load(&path).unwrap();
    let ConnectionConfig::Tcp(tcp) = &config.connection else {
        panic!("Expected TCP connection");
    };
    assert_eq!(tcp.host, "192.168.1.50");
    assert_eq!(tcp.port, 502);
    assert_eq!(tcp.unit_id, 1);
    assert_eq!(config.discovery.max_rooms, 24);
    assert!(config.discovery.require_discovery);
    assert_eq!(config.logging.level, LogLevel::Info);
}

#[tokio::test]
async fn test_load_full_yaml() {
    let dir = temp_test_dir("sentio-config");
    let path = write_config(&dir, "sentio.yml", ConfigFixtures::full_tcp_yaml());

    let config = loader_with_env(&[]).load(&path).unwrap();
    let settings = config.connection_settings().unwrap();
    assert_eq!(settings.endpoint(), "192.168.1.50:1502");
    assert_eq!(settings.unit_id(), 2);
    assert_eq!(settings.operation_timeout(), Duration::from_millis(750));
    assert_eq!(config.discovery.max_rooms, 8);
    assert!(!config.discovery.require_discovery);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[tokio::test]
async fn test_load_rtu_yaml() {
    let config = loader_with_env(&[])
        .load_from_str(ConfigFixtures::rtu_yaml(), ConfigFormat::Yaml)
        .unwrap();

    let ConnectionSettings::Rtu(rtu) = config.connection_settings().unwrap() else {
        panic!("Expected RTU settings");
    };
    assert_eq!(rtu.port, "/dev/ttyUSB0");
    assert_eq!(rtu.baud_rate, 38400);
    assert_eq!(rtu.parity, Parity::Even);
    assert_eq!(rtu.unit_id, 3);
    assert_eq!(rtu.timeout, Duration::from_secs(1));
}

#[tokio::test]
async fn test_load_toml_and_json() {
    let dir = temp_test_dir("sentio-config");

    let path = write_config(&dir, "sentio.toml", ConfigFixtures::tcp_toml());
    let from_toml = loader_with_env(&[]).load(&path).unwrap();
    assert_eq!(from_toml.discovery.max_rooms, 12);

    let json = serde_json::to_string(&from_toml).unwrap();
    let path = write_config(&dir, "sentio.json", &json);
    let from_json = loader_with_env(&[]).load(&path).unwrap();
    assert_eq!(from_json, from_toml);
}

#[tokio::test]
async fn test_load_unsupported_extension() {
    let dir = temp_test_dir("sentio-config");
    let path = write_config(&dir, "sentio.ini", "[connection]");

    let err = loader_with_env(&[]).load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}

#[tokio::test]
async fn test_load_rejects_unknown_section() {
    let yaml = format!("{}\nmetrics:\n  enabled: true\n", ConfigFixtures::minimal_tcp_yaml());
    let result = loader_with_env(&[]).load_from_str(&yaml, ConfigFormat::Yaml);
    assert!(result.is_err());
}

#[tokio::test]
async fn test_load_validation_failure() {
    let yaml = r#"
connection:
  transport: tcp
  host: 192.168.1.50
  unit_id: 0
"#;
    let err = loader_with_env(&[])
        .load_from_str(yaml, ConfigFormat::Yaml)
        .unwrap_err();
    assert_eq!(err.error_type(), "connection");

    let yaml = r#"
connection:
  transport: rtu
  port: /dev/ttyUSB0
discovery:
  max_rooms: 25
"#;
    let err = loader_with_env(&[])
        .load_from_str(yaml, ConfigFormat::Yaml)
        .unwrap_err();
    assert_eq!(err.error_type(), "out_of_range");
}

// =============================================================================
// Environment
// =============================================================================

#[tokio::test]
async fn test_env_placeholder_default_and_value() {
    let config = loader_with_env(&[])
        .load_from_str(ConfigFixtures::placeholder_yaml(), ConfigFormat::Yaml)
        .unwrap();
    assert_eq!(config.connection_settings().unwrap().endpoint(), "10.0.0.1:502");

    let config = loader_with_env(&[("SENTIO_TEST_HOST", "10.0.0.9")])
        .load_from_str(ConfigFixtures::placeholder_yaml(), ConfigFormat::Yaml)
        .unwrap();
    assert_eq!(config.connection_settings().unwrap().endpoint(), "10.0.0.9:502");
}

#[tokio::test]
async fn test_env_placeholder_missing() {
    let yaml = "connection:\n  transport: tcp\n  host: \"${SENTIO_TEST_MISSING}\"\n";
    let err = loader_with_env(&[])
        .load_from_str(yaml, ConfigFormat::Yaml)
        .unwrap_err();
    assert!(matches!(err, ConfigError::EnvVarNotFound { ref name } if name == "SENTIO_TEST_MISSING"));
}

#[tokio::test]
async fn test_env_overrides_switch_to_rtu() {
    let config = loader_with_env(&[
        ("SENTIO_SERIAL_PORT", "/dev/ttyAMA0"),
        ("SENTIO_BAUD_RATE", "9600"),
        ("SENTIO_LOG_LEVEL", "debug"),
    ])
    .load_from_str(ConfigFixtures::minimal_tcp_yaml(), ConfigFormat::Yaml)
    .unwrap();

    let ConnectionConfig::Rtu(rtu) = &config.connection else {
        panic!("Expected RTU connection");
    };
    assert_eq!(rtu.port, "/dev/ttyAMA0");
    assert_eq!(rtu.baud_rate, 9600);
    assert_eq!(config.logging.level, LogLevel::Debug);
}

#[tokio::test]
async fn test_env_invalid_override() {
    let err = loader_with_env(&[("SENTIO_PORT", "not-a-port")])
        .load_from_str(ConfigFixtures::minimal_tcp_yaml(), ConfigFormat::Yaml)
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { .. }));
}

#[tokio::test]
async fn test_env_custom_prefix() {
    let config = loader_with_env(&[("HEATING_HOST", "10.1.1.1")])
        .with_env_prefix("HEATING")
        .load_from_str(ConfigFixtures::minimal_tcp_yaml(), ConfigFormat::Yaml)
        .unwrap();
    assert_eq!(config.connection_settings().unwrap().endpoint(), "10.1.1.1:502");
}

// =============================================================================
// Command-line Overrides
// =============================================================================

#[tokio::test]
async fn test_overrides_without_file() {
    let overrides = ConnectionOverrides {
        host: Some("10.0.0.5".to_string()),
        unit_id: Some(4),
        ..Default::default()
    };
    let config = SentioConfig::from_overrides(&overrides).unwrap();
    let settings = config.connection_settings().unwrap();
    assert_eq!(settings.endpoint(), "10.0.0.5:502");
    assert_eq!(settings.unit_id(), 4);

    assert!(SentioConfig::from_overrides(&ConnectionOverrides::default()).is_err());
}

#[tokio::test]
async fn test_overrides_port_ignored_for_rtu() {
    let mut config = loader_with_env(&[])
        .load_from_str(ConfigFixtures::rtu_yaml(), ConfigFormat::Yaml)
        .unwrap();
    config.apply_overrides(&ConnectionOverrides {
        port: Some(1502),
        baud_rate: Some(115200),
        ..Default::default()
    });

    let ConnectionConfig::Rtu(rtu) = &config.connection else {
        panic!("Expected RTU connection");
    };
    assert_eq!(rtu.baud_rate, 115200);
}

// =============================================================================
// Gateway Construction
// =============================================================================

#[tokio::test]
async fn test_gateway_from_config() {
    let config = loader_with_env(&[])
        .load_from_str(ConfigFixtures::full_tcp_yaml(), ConfigFormat::Yaml)
        .unwrap();

    let gateway = RegisterGateway::from_settings(config.connection_settings().unwrap())
        .unwrap()
        .with_max_rooms(config.discovery.max_rooms);

    assert_eq!(gateway.max_rooms(), 8);
    assert!(!gateway.is_connected());
    assert_eq!(gateway.transport().unit_id(), 2);
    assert!(matches!(gateway.transport(), SentioTransport::Tcp(_)));
}

#[tokio::test]
async fn test_gateway_from_rtu_config() {
    let config = loader_with_env(&[])
        .load_from_str(ConfigFixtures::rtu_yaml(), ConfigFormat::Yaml)
        .unwrap();

    let transport = SentioTransport::from_settings(config.connection_settings().unwrap()).unwrap();
    assert_eq!(transport.transport_name(), "rtu");
    assert_eq!(transport.unit_id(), 3);
}
