// ABOUTME: Dual-compartment state model parameters: decay rates, gains, capacities and scoring
// ABOUTME: Defaults come from physiological_constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use super::error::{ensure_finite, ConfigError};
use crate::physiological_constants::{detraining, scoring, state_model};
use serde::{Deserialize, Serialize};

/// Physiological state model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhysiologyConfig {
    /// Metabolic decay rate per day
    pub metabolic_decay_rate: f64,
    /// Structural decay rate per day
    pub structural_decay_rate: f64,
    /// Metabolic debt per unit of load
    pub metabolic_gain: f64,
    /// Structural debt per unit of load
    pub structural_gain: f64,
    /// Metabolic compartment capacity
    pub metabolic_capacity: f64,
    /// Structural compartment capacity
    pub structural_capacity: f64,
    /// Lowest recovery efficiency
    pub min_recovery_efficiency: f64,
    /// Highest recovery efficiency
    pub max_recovery_efficiency: f64,
    /// Metabolic share of the fatigue score
    pub fatigue_metabolic_weight: f64,
    /// Detraining penalty settings
    pub detraining: DetrainingConfig,
}

/// Detraining penalty configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetrainingConfig {
    /// Days without penalty after a session
    pub grace_days: f64,
    /// Largest readiness reduction
    pub max_penalty: f64,
    /// Penalty time constant in days
    pub time_constant_days: f64,
}

impl Default for PhysiologyConfig {
    fn default() -> Self {
        Self {
            metabolic_decay_rate: state_model::METABOLIC_DECAY_RATE,
            structural_decay_rate: state_model::STRUCTURAL_DECAY_RATE,
            metabolic_gain: state_model::METABOLIC_GAIN,
            structural_gain: state_model::STRUCTURAL_GAIN,
            metabolic_capacity: state_model::METABOLIC_CAPACITY,
            structural_capacity: state_model::STRUCTURAL_CAPACITY,
            min_recovery_efficiency: state_model::MIN_RECOVERY_EFFICIENCY,
            max_recovery_efficiency: state_model::MAX_RECOVERY_EFFICIENCY,
            fatigue_metabolic_weight: scoring::FATIGUE_METABOLIC_WEIGHT,
            detraining: DetrainingConfig::default(),
        }
    }
}

impl Default for DetrainingConfig {
    fn default() -> Self {
        Self {
            grace_days: detraining::GRACE_DAYS,
            max_penalty: detraining::MAX_PENALTY,
            time_constant_days: detraining::TIME_CONSTANT_DAYS,
        }
    }
}

impl PhysiologyConfig {
    /// Validate the model parameters
    ///
    /// Capacities are only checked for finiteness: non-positive values fall back
    /// to a minimum at use time.
    ///
    /// # Errors
    ///
    /// Returns an error if any parameter is NaN or infinite, decay rates leave `(0, 1]`, the structural compartment
    /// is not slower than the metabolic one, or the efficiency range is inverted
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite(
            &[
                self.metabolic_decay_rate,
                self.structural_decay_rate,
                self.metabolic_gain,
                self.structural_gain,
                self.metabolic_capacity,
                self.structural_capacity,
                self.min_recovery_efficiency,
                self.max_recovery_efficiency,
                self.fatigue_metabolic_weight,
                self.detraining.grace_days,
                self.detraining.max_penalty,
                self.detraining.time_constant_days,
            ],
            "Physiology parameters must be finite",
        )?;
        for rate in [self.metabolic_decay_rate, self.structural_decay_rate] {
            if !(rate > 0.0 && rate <= 1.0) {
                return Err(ConfigError::ValueOutOfRange(
                    "Decay rates must be in (0, 1]",
                ));
            }
        }
        if self.structural_decay_rate >= self.metabolic_decay_rate {
            return Err(ConfigError::InvalidRange(
                "structural_decay_rate must be < metabolic_decay_rate",
            ));
        }
        if self.structural_gain <= 0.0 || self.structural_gain >= self.metabolic_gain {
            return Err(ConfigError::InvalidRange(
                "structural_gain must be positive and < metabolic_gain",
            ));
        }
        if self.min_recovery_efficiency <= 0.0
            || self.min_recovery_efficiency > self.max_recovery_efficiency
        {
            return Err(ConfigError::InvalidRange(
                "min_recovery_efficiency must be positive and <= max_recovery_efficiency",
            ));
        }
        if self.metabolic_decay_rate * self.max_recovery_efficiency > 1.0 {
            return Err(ConfigError::ValueOutOfRange(
                "metabolic_decay_rate * max_recovery_efficiency must not exceed 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.fatigue_metabolic_weight) {
            return Err(ConfigError::ValueOutOfRange(
                "fatigue_metabolic_weight must be in [0, 1]",
            ));
        }
        if self.detraining.grace_days < 0.0
            || self.detraining.max_penalty < 0.0
            || self.detraining.max_penalty > scoring::MAX_SCORE
            || self.detraining.time_constant_days <= 0.0
        {
            return Err(ConfigError::ValueOutOfRange(
                "Detraining settings must be non-negative with a positive time constant",
            ));
        }
        Ok(())
    }
}
