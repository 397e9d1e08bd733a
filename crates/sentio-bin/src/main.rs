// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `sentio` - command-line client for Wavin Sentio heating controllers.

use sentio_bin::cli::{Cli, LogFormat};
use sentio_bin::error::report_error_and_exit;
use sentio_bin::{commands, init_logging};
use sentio_config::LoggingConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // The logging section is only a default; a broken file is reported by
    // the command that loads it.
    let logging = sentio_config::load_config(&cli.config)
        .map(|config| config.logging)
        .unwrap_or_else(|_| LoggingConfig::default());

    let level = cli.effective_log_level(logging.level.as_str());
    let format = cli.log_format.unwrap_or_else(|| LogFormat::from(logging.format));
    if let Err(e) = init_logging(level, format) {
        report_error_and_exit(e);
    }

    tracing::debug!(version = sentio_bin::VERSION, command = ?cli.effective_command(), "Starting");

    if let Err(e) = commands::execute(cli).await {
        report_error_and_exit(e);
    }
}
