// ABOUTME: Session cost engine configuration: algorithm selection and critical-power parameters
// ABOUTME: Defaults come from physiological_constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use super::error::{ensure_finite, ConfigError};
use crate::physiological_constants::session_cost;
use crate::session_cost::SessionCostAlgorithm;
use serde::{Deserialize, Serialize};

/// Session cost configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCostConfig {
    /// Load algorithm
    pub algorithm: SessionCostAlgorithm,
    /// W' assumed when only a base power is known (joules)
    pub default_w_prime_joules: f64,
    /// Rest segment power as a fraction of critical power
    pub rest_power_fraction: f64,
    /// W' reconstitution efficiency during rest
    pub w_prime_recovery_efficiency: f64,
    /// Scale of the anaerobic surcharge
    pub anaerobic_cost_scale: f64,
    /// Exponent of the anaerobic surcharge
    pub anaerobic_cost_exponent: f64,
}

impl Default for SessionCostConfig {
    fn default() -> Self {
        Self {
            algorithm: SessionCostAlgorithm::default(),
            default_w_prime_joules: session_cost::DEFAULT_W_PRIME_JOULES,
            rest_power_fraction: session_cost::REST_POWER_FRACTION,
            w_prime_recovery_efficiency: session_cost::W_PRIME_RECOVERY_EFFICIENCY,
            anaerobic_cost_scale: session_cost::ANAEROBIC_COST_SCALE,
            anaerobic_cost_exponent: session_cost::ANAEROBIC_COST_EXPONENT,
        }
    }
}

impl SessionCostConfig {
    /// Validate the cost parameters
    ///
    /// # Errors
    ///
    /// Returns an error if a parameter is not finite, a fraction leaves `[0, 1)` or the surcharge would not accelerate
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite(
            &[
                self.default_w_prime_joules,
                self.rest_power_fraction,
                self.w_prime_recovery_efficiency,
                self.anaerobic_cost_scale,
                self.anaerobic_cost_exponent,
            ],
            "Session cost parameters must be finite",
        )?;
        if !(0.0..1.0).contains(&self.rest_power_fraction) {
            return Err(ConfigError::ValueOutOfRange(
                "rest_power_fraction must be in [0, 1)",
            ));
        }
        if !(0.0..=1.0).contains(&self.w_prime_recovery_efficiency) {
            return Err(ConfigError::ValueOutOfRange(
                "w_prime_recovery_efficiency must be in [0, 1]",
            ));
        }
        if self.anaerobic_cost_scale < 0.0 || self.anaerobic_cost_exponent < 1.0 {
            return Err(ConfigError::ValueOutOfRange(
                "Anaerobic surcharge must have a non-negative scale and an exponent >= 1",
            ));
        }
        if self.default_w_prime_joules <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "default_w_prime_joules must be positive",
            ));
        }
        Ok(())
    }
}
