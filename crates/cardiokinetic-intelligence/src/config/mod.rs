// ABOUTME: Intelligence configuration for the simulation, cost, state and adaptation engines
// ABOUTME: Orchestrates domain-specific configs and provides unified validation and loading
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

//! Intelligence Configuration Module
//!
//! Configuration is organized into domain-specific modules:
//! - `physiology` - Dual-compartment decay rates, gains, capacities and detraining
//! - `session_cost` - Load algorithm and critical-power parameters
//! - `simulation` - Monte Carlo run counts, batching, randomness and jitter
//! - `adaptive` - Adaptive adjustment multipliers

/// Adaptive adjustment configuration
pub mod adaptive;
/// Configuration error types
pub mod error;
/// Physiological state model configuration
pub mod physiology;
/// Session cost configuration
pub mod session_cost;
/// Monte Carlo configuration
pub mod simulation;

pub use adaptive::AdaptiveConfig;
pub use error::ConfigError;
pub use physiology::{DetrainingConfig, PhysiologyConfig};
pub use session_cost::SessionCostConfig;
pub use simulation::{RandomnessMode, SimulationConfig};

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Main intelligence configuration container
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntelligenceConfig {
    /// Physiological state model
    pub physiology: PhysiologyConfig,
    /// Session cost engine
    pub session_cost: SessionCostConfig,
    /// Monte Carlo engine
    pub simulation: SimulationConfig,
    /// Adaptive adjustment engine
    pub adaptive: AdaptiveConfig,
}

impl IntelligenceConfig {
    /// Load configuration from defaults and environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every sub-configuration
    ///
    /// # Errors
    ///
    /// Returns the first validation failure
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physiology.validate()?;
        self.session_cost.validate()?;
        self.simulation.validate()?;
        self.adaptive.validate()?;
        Ok(())
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Simulation overrides
        Self::apply_env_var("CK_SIMULATION_RUNS", &mut self.simulation.runs)?;
        Self::apply_env_var("CK_SIMULATION_BATCH_SIZE", &mut self.simulation.batch_size)?;
        Self::apply_env_var("CK_SIMULATION_PARALLEL", &mut self.simulation.parallel)?;
        Self::apply_env_var("CK_SIMULATION_POWER_JITTER", &mut self.simulation.power_jitter)?;
        Self::apply_env_var("CK_SIMULATION_RPE_JITTER", &mut self.simulation.rpe_jitter)?;

        if let Ok(val) = env::var("CK_SIMULATION_SEED") {
            let seed = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse("Invalid CK_SIMULATION_SEED".to_owned()))?;
            self.simulation.randomness = RandomnessMode::Deterministic { seed };
        }

        // Session cost overrides
        Self::apply_env_var(
            "CK_SESSION_COST_ALGORITHM",
            &mut self.session_cost.algorithm,
        )?;
        Self::apply_env_var(
            "CK_SESSION_COST_W_PRIME",
            &mut self.session_cost.default_w_prime_joules,
        )?;

        // Physiology overrides
        Self::apply_env_var(
            "CK_PHYSIOLOGY_METABOLIC_CAPACITY",
            &mut self.physiology.metabolic_capacity,
        )?;
        Self::apply_env_var(
            "CK_PHYSIOLOGY_STRUCTURAL_CAPACITY",
            &mut self.physiology.structural_capacity,
        )?;
        Self::apply_env_var(
            "CK_PHYSIOLOGY_DETRAINING_MAX_PENALTY",
            &mut self.physiology.detraining.max_penalty,
        )?;

        // Adaptive overrides
        Self::apply_env_var("CK_ADAPTIVE_ENABLED", &mut self.adaptive.enabled)?;
        Self::apply_env_var(
            "CK_ADAPTIVE_PHASE_AWARE",
            &mut self.adaptive.phase_aware_thresholds,
        )?;

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(IntelligenceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_session_range() {
        let mut config = IntelligenceConfig::default();
        config.simulation.min_sessions_per_week = 5;
        config.simulation.max_sessions_per_week = 3;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRange(_))));
    }

    #[test]
    fn test_rejects_unordered_strain_multipliers() {
        let mut config = IntelligenceConfig::default();
        config.adaptive.strain_power_multipliers = [0.85, 0.90, 0.95];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMultipliers(_))
        ));
    }

    #[test]
    fn test_batch_count_rounds_up() {
        let config = SimulationConfig {
            runs: 10_001,
            batch_size: 5_000,
            ..SimulationConfig::default()
        };
        assert_eq!(config.batch_count(), 3);
    }
}
