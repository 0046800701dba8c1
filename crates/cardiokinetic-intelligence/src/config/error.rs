// ABOUTME: Configuration error types for intelligence module validation
// ABOUTME: Defines error variants for invalid ranges, parse failures, non-finite and out-of-range values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

//! Configuration error types for intelligence module validation.

use cardiokinetic_core::errors::{AppError, ErrorCode};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Bounds in the wrong order (e.g., minimum above maximum)
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Non-finite floating point parameter
    #[error("Invalid value: {0}")]
    InvalidValue(&'static str),

    /// Failed to parse configuration value
    #[error("Parse error: {0}")]
    Parse(String),

    /// Multipliers not ordered by severity
    #[error("Invalid multipliers: {0}")]
    InvalidMultipliers(&'static str),

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),
}

/// Reject NaN and infinite parameters before any range check
pub(crate) fn ensure_finite(values: &[f64], message: &'static str) -> Result<(), ConfigError> {
    if values.iter().all(|value| value.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(message))
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::new(ErrorCode::ConfigInvalid, error.to_string()).with_source(error)
    }
}
