// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use sentio_config::{ConnectionConfig, SentioConfig};

use super::resolve_config;
use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::BinResult;

/// Executes the `validate` command to validate configuration.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    let config = resolve_config(cli)
        .map_err(|e| e.with_context("Configuration validation failed"))?;
    let settings = config.connection_settings()?;

    let warnings = collect_warnings(&config);

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  Transport: {}", config.connection.transport_name());
            println!("  Endpoint:  {}", settings.endpoint());
            println!("  Unit ID:   {}", settings.unit_id());
            println!("  Timeout:   {:?}", settings.operation_timeout());
            println!("  Max Rooms: {}", config.discovery.max_rooms);
            println!("  Discovery: {}", if config.discovery.require_discovery { "required" } else { "on demand" });
            println!("  Logging:   {} ({})", config.logging.level, config.logging.format);

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {warning}");
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "transport": config.connection.transport_name(),
                    "endpoint": settings.endpoint(),
                    "unit_id": settings.unit_id(),
                    "operation_timeout_ms": settings.operation_timeout().as_millis() as u64,
                    "max_rooms": config.discovery.max_rooms,
                    "require_discovery": config.discovery.require_discovery,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(&config) } else { None },
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Returns non-fatal findings about a valid configuration.
fn collect_warnings(config: &SentioConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    match &config.connection {
        ConnectionConfig::Tcp(tcp) if tcp.port != 502 => {
            warnings.push(format!("Non-standard Modbus TCP port {}", tcp.port));
        }
        ConnectionConfig::Rtu(rtu) if !std::path::Path::new(&rtu.port).exists() => {
            warnings.push(format!("Serial port does not exist: {}", rtu.port));
        }
        _ => {}
    }

    if !config.discovery.require_discovery {
        warnings.push("Discovery is not required; room commands still run it".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentio_config::{RtuConfig, TcpConfig};

    #[test]
    fn test_warnings() {
        let config = SentioConfig::new(ConnectionConfig::Tcp(TcpConfig::new("10.0.0.5")));
        assert!(collect_warnings(&config).is_empty());

        let mut tcp = TcpConfig::new("10.0.0.5");
        tcp.port = 1502;
        let config = SentioConfig::new(ConnectionConfig::Tcp(tcp));
        assert_eq!(collect_warnings(&config).len(), 1);

        let config = SentioConfig::new(ConnectionConfig::Rtu(RtuConfig::new("/dev/does-not-exist")));
        assert!(collect_warnings(&config)[0].contains("/dev/does-not-exist"));
    }
}
