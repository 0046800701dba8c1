// ABOUTME: Monte Carlo configuration: run counts, batching, randomness mode and session jitter
// ABOUTME: Deterministic and stochastic randomness are explicit, mutually exclusive modes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use super::error::{ensure_finite, ConfigError};
use crate::physiological_constants::simulation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source of randomness for a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RandomnessMode {
    /// Reproducible: every run derives its generator from `seed` and its index
    Deterministic {
        /// Base seed
        seed: u64,
    },
    /// Fresh base seed from the operating system per invocation
    #[default]
    Stochastic,
}

impl fmt::Display for RandomnessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deterministic { seed } => write!(f, "deterministic (seed {seed})"),
            Self::Stochastic => f.write_str("stochastic"),
        }
    }
}

/// Monte Carlo engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of simulated programs
    pub runs: usize,
    /// Runs per batch between cooperative yields
    pub batch_size: usize,
    /// Randomness source
    pub randomness: RandomnessMode,
    /// Execute runs within a batch on the rayon pool
    pub parallel: bool,
    /// Fewest sessions per simulated week
    pub min_sessions_per_week: usize,
    /// Most sessions per simulated week
    pub max_sessions_per_week: usize,
    /// Relative power jitter per session
    pub power_jitter: f64,
    /// Absolute RPE jitter per session
    pub rpe_jitter: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            runs: simulation::DEFAULT_RUNS,
            batch_size: simulation::DEFAULT_BATCH_SIZE,
            randomness: RandomnessMode::default(),
            parallel: true,
            min_sessions_per_week: simulation::MIN_SESSIONS_PER_WEEK,
            max_sessions_per_week: simulation::MAX_SESSIONS_PER_WEEK,
            power_jitter: simulation::POWER_JITTER,
            rpe_jitter: simulation::RPE_JITTER,
        }
    }
}

impl SimulationConfig {
    /// Validate the simulation parameters
    ///
    /// # Errors
    ///
    /// Returns an error for zero runs or batch size, too many runs, an impossible
    /// session range, or non-finite or negative jitter
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_finite(
            &[self.power_jitter, self.rpe_jitter],
            "Simulation jitter must be finite",
        )?;
        if self.runs == 0 || self.runs > simulation::MAX_RUNS {
            return Err(ConfigError::ValueOutOfRange(
                "runs must be between 1 and 1,000,000",
            ));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ValueOutOfRange("batch_size must be at least 1"));
        }
        if self.min_sessions_per_week == 0
            || self.min_sessions_per_week > self.max_sessions_per_week
            || self.max_sessions_per_week > simulation::DAYS_PER_WEEK
        {
            return Err(ConfigError::InvalidRange(
                "Sessions per week must satisfy 1 <= min <= max <= 7",
            ));
        }
        if !(0.0..1.0).contains(&self.power_jitter) || self.rpe_jitter < 0.0 {
            return Err(ConfigError::ValueOutOfRange(
                "power_jitter must be in [0, 1) and rpe_jitter non-negative",
            ));
        }
        Ok(())
    }

    /// Number of batches needed for all runs
    #[must_use]
    pub const fn batch_count(&self) -> usize {
        self.runs.div_ceil(self.batch_size)
    }
}
