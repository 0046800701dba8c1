// ABOUTME: Adaptive adjustment configuration: enable flag and severity-indexed multipliers
// ABOUTME: Defaults come from physiological_constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use super::error::{ensure_finite, ConfigError};
use crate::physiological_constants::adaptive;
use serde::{Deserialize, Serialize};

/// Adaptive adjustment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptiveConfig {
    /// When false every decision is inactive
    pub enabled: bool,
    /// Power multipliers under strain (mild, moderate, extreme)
    pub strain_power_multipliers: [f64; 3],
    /// Extra reduction when fatigue and readiness both flag
    pub compound_strain_reduction: f64,
    /// Duration multipliers for volume-oriented styles (mild, moderate, extreme)
    pub strain_duration_multipliers: [f64; 3],
    /// Power multipliers when fresh (mild, moderate, extreme)
    pub fresh_power_multipliers: [f64; 3],
    /// Shift fatigue breakpoints by phase position in ascending phases
    pub phase_aware_thresholds: bool,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            strain_power_multipliers: adaptive::STRAIN_POWER_MULTIPLIERS,
            compound_strain_reduction: adaptive::COMPOUND_STRAIN_REDUCTION,
            strain_duration_multipliers: adaptive::STRAIN_DURATION_MULTIPLIERS,
            fresh_power_multipliers: adaptive::FRESH_POWER_MULTIPLIERS,
            phase_aware_thresholds: true,
        }
    }
}

impl AdaptiveConfig {
    /// Validate the multipliers
    ///
    /// # Errors
    ///
    /// Returns an error unless every multiplier is finite, strain multipliers are in `(0, 1)` and decrease with
    /// severity, and fresh multipliers are above 1 and increase with severity
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut multipliers = vec![self.compound_strain_reduction];
        multipliers.extend(self.strain_power_multipliers);
        multipliers.extend(self.strain_duration_multipliers);
        multipliers.extend(self.fresh_power_multipliers);
        ensure_finite(&multipliers, "Adaptive multipliers must be finite")?;

        let strain_ok = |values: &[f64; 3]| {
            values.iter().all(|value| *value > 0.0 && *value < 1.0)
                && values.windows(2).all(|pair| pair[0] >= pair[1])
        };
        if !strain_ok(&self.strain_power_multipliers) {
            return Err(ConfigError::InvalidMultipliers(
                "Strain power multipliers must be in (0, 1) and non-increasing",
            ));
        }
        if !strain_ok(&self.strain_duration_multipliers) {
            return Err(ConfigError::InvalidMultipliers(
                "Strain duration multipliers must be in (0, 1) and non-increasing",
            ));
        }
        if self.fresh_power_multipliers.iter().any(|value| *value < 1.0)
            || self
                .fresh_power_multipliers
                .windows(2)
                .any(|pair| pair[0] > pair[1])
        {
            return Err(ConfigError::InvalidMultipliers(
                "Fresh power multipliers must be >= 1 and non-decreasing",
            ));
        }
        let strongest = self.strain_power_multipliers[2] - self.compound_strain_reduction;
        if self.compound_strain_reduction < 0.0 || strongest <= 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "compound_strain_reduction must be non-negative and leave a positive multiplier",
            ));
        }
        Ok(())
    }
}
