// ABOUTME: Runtime configuration combining logging and intelligence settings
// ABOUTME: Loaded once at startup from environment variables and validated before use
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

//! Runtime configuration
//!
//! - **Logging**: level, format and output flags (`RUST_LOG`, `LOG_FORMAT`, ...)
//! - **Intelligence**: physiology, session cost, simulation and adaptive settings (`CK_*`)
//! - **Store**: percentile store capacity (`CK_PERCENTILE_STORE_CAPACITY`)

use crate::logging::LoggingConfig;
use cardiokinetic_core::errors::{AppError, AppResult};
use cardiokinetic_intelligence::config::IntelligenceConfig;
use std::env;
use tracing::{debug, info};

/// Default number of programs kept by the in-memory percentile store
pub const DEFAULT_PERCENTILE_STORE_CAPACITY: usize = 64;

/// Complete process configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Logging setup
    pub logging: LoggingConfig,
    /// Engine settings
    pub intelligence: IntelligenceConfig,
    /// Programs kept by the in-memory percentile store
    pub percentile_store_capacity: usize,
}

impl RuntimeConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any `CK_*` variable is malformed or the resulting
    /// configuration fails validation
    pub fn from_env() -> AppResult<Self> {
        let logging = LoggingConfig::from_env();
        let intelligence = IntelligenceConfig::load()?;

        let percentile_store_capacity = match env::var("CK_PERCENTILE_STORE_CAPACITY") {
            Ok(value) => value.trim().parse().map_err(|_| {
                AppError::config(format!(
                    "Invalid CK_PERCENTILE_STORE_CAPACITY value '{value}'"
                ))
            })?,
            Err(_) => DEFAULT_PERCENTILE_STORE_CAPACITY,
        };

        let config = Self {
            logging,
            intelligence,
            percentile_store_capacity,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first validation failure
    pub fn validate(&self) -> AppResult<()> {
        self.intelligence.validate()?;
        if self.percentile_store_capacity == 0 {
            return Err(AppError::config(
                "CK_PERCENTILE_STORE_CAPACITY must be at least 1",
            ));
        }
        debug!("Runtime configuration validated");
        Ok(())
    }

    /// Log the effective engine settings
    pub fn log_summary(&self) {
        let simulation = &self.intelligence.simulation;
        info!(
            simulation.runs = simulation.runs,
            simulation.batch_size = simulation.batch_size,
            simulation.parallel = simulation.parallel,
            simulation.randomness = %simulation.randomness,
            session_cost.algorithm = self.intelligence.session_cost.algorithm.name(),
            adaptive.enabled = self.intelligence.adaptive.enabled,
            "Runtime configuration loaded"
        );
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            intelligence: IntelligenceConfig::default(),
            percentile_store_capacity: DEFAULT_PERCENTILE_STORE_CAPACITY,
        }
    }
}
