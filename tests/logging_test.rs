// ABOUTME: Tests for logging configuration and environment variable handling
// ABOUTME: Validates defaults, LOG_FORMAT parsing and flag variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use cardiokinetic::logging::{LogFormat, LoggingConfig};
use serial_test::serial;
use std::env;

const LOG_VARS: [&str; 5] = [
    "RUST_LOG",
    "LOG_FORMAT",
    "LOG_INCLUDE_LOCATION",
    "LOG_INCLUDE_THREAD",
    "LOG_INCLUDE_SPANS",
];

fn clear_log_env() {
    for name in LOG_VARS {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    clear_log_env();
    env::set_var("RUST_LOG", "debug");
    env::set_var("LOG_FORMAT", "json");
    env::set_var("LOG_INCLUDE_LOCATION", "1");
    env::set_var("LOG_INCLUDE_THREAD", "false");

    let config = LoggingConfig::from_env();
    clear_log_env();

    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Json);
    assert!(config.include_location);
    assert!(!config.include_thread);
    assert!(!config.include_spans);
    assert!(config.log_startup);
}

#[test]
#[serial]
fn test_unknown_format_falls_back_to_pretty() {
    clear_log_env();
    env::set_var("LOG_FORMAT", "xml");
    let config = LoggingConfig::from_env();
    clear_log_env();

    assert_eq!(config.format, LogFormat::Pretty);
    assert_eq!(config.level, "info");
}

#[test]
fn test_default_logging_config() {
    let config = LoggingConfig::default();

    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Pretty);
    assert!(!config.include_location);
    assert!(config.log_startup);
}

#[test]
fn test_log_format_names_round_trip() {
    for format in [LogFormat::Json, LogFormat::Pretty, LogFormat::Compact] {
        assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
    }
    let error = "syslog".parse::<LogFormat>().unwrap_err();
    assert!(error.to_string().contains("Valid options"));
}
