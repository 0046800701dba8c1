// ABOUTME: Dual-compartment physiological state model with fatigue and readiness scoring
// ABOUTME: Pure day-step transition plus a harmonic-weighted detraining penalty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

//! # Physiological State Model
//!
//! Recovery state is split into two debt pools:
//!
//! - **Metabolic**: fast to fill, fast to clear. Each day
//!   `debt' = debt * (1 - k_m * efficiency) + load * gain_m`, where the recovery
//!   efficiency varies day to day in `[0.7, 1.3]`.
//! - **Structural**: slower to fill (`gain_s < gain_m`) and slower to clear.
//!   `debt' = debt * (1 - k_s) + load * gain_s`.
//!
//! Both pools are bounded by their capacity. Fatigue blends the two debt ratios
//! linearly; readiness is a non-linear freshness curve reduced by a detraining
//! penalty when recent sessions are far in the past.

use crate::config::PhysiologyConfig;
use crate::physiological_constants::{detraining, scoring, state_model};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Debt held in each compartment
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysiologicalState {
    /// Metabolic freshness debt
    pub metabolic_debt: f64,
    /// Structural health debt
    pub structural_debt: f64,
}

impl PhysiologicalState {
    /// Zero debt in both compartments
    #[must_use]
    pub const fn fresh() -> Self {
        Self {
            metabolic_debt: 0.0,
            structural_debt: 0.0,
        }
    }
}

/// Most recent session days, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionHistory {
    days: VecDeque<u32>,
}

impl SessionHistory {
    /// Empty history
    #[must_use]
    pub fn new() -> Self {
        Self {
            days: VecDeque::with_capacity(detraining::HISTORY_LENGTH),
        }
    }

    /// Record a session on `day`, forgetting the oldest beyond the history length
    pub fn record(&mut self, day: u32) {
        if self.days.front() == Some(&day) {
            return;
        }
        self.days.push_front(day);
        self.days.truncate(detraining::HISTORY_LENGTH);
    }

    /// Session days, newest first
    pub fn days(&self) -> impl Iterator<Item = u32> + '_ {
        self.days.iter().copied()
    }

    /// Whether no session has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Day-step transition and scoring for the dual-compartment model
#[derive(Debug, Clone, Default)]
pub struct PhysiologyModel {
    config: PhysiologyConfig,
}

impl PhysiologyModel {
    /// Create a model from validated configuration
    #[must_use]
    pub const fn new(config: PhysiologyConfig) -> Self {
        Self { config }
    }

    /// Model parameters
    #[must_use]
    pub const fn config(&self) -> &PhysiologyConfig {
        &self.config
    }

    fn metabolic_capacity(&self) -> f64 {
        effective_capacity(self.config.metabolic_capacity)
    }

    fn structural_capacity(&self) -> f64 {
        effective_capacity(self.config.structural_capacity)
    }

    /// Clamp a day's recovery efficiency into the configured range
    #[must_use]
    pub fn clamp_efficiency(&self, efficiency: f64) -> f64 {
        if efficiency.is_finite() {
            efficiency.clamp(
                self.config.min_recovery_efficiency,
                self.config.max_recovery_efficiency,
            )
        } else {
            1.0
        }
    }

    /// Advance the state by one day carrying `load`
    ///
    /// Non-finite or negative loads count as a rest day.
    #[must_use]
    pub fn step(&self, state: PhysiologicalState, load: f64, efficiency: f64) -> PhysiologicalState {
        let load = if load.is_finite() { load.max(0.0) } else { 0.0 };
        let efficiency = self.clamp_efficiency(efficiency);

        let metabolic_retention = (self.config.metabolic_decay_rate * efficiency).mul_add(-1.0, 1.0);
        let metabolic = load
            .mul_add(self.config.metabolic_gain, state.metabolic_debt * metabolic_retention)
            .clamp(0.0, self.metabolic_capacity());

        let structural_retention = 1.0 - self.config.structural_decay_rate;
        let structural = load
            .mul_add(
                self.config.structural_gain,
                state.structural_debt * structural_retention,
            )
            .clamp(0.0, self.structural_capacity());

        PhysiologicalState {
            metabolic_debt: metabolic,
            structural_debt: structural,
        }
    }

    /// Metabolic debt as a fraction of capacity, in `[0, 1]`
    #[must_use]
    pub fn metabolic_ratio(&self, state: &PhysiologicalState) -> f64 {
        ratio(state.metabolic_debt, self.metabolic_capacity())
    }

    /// Structural debt as a fraction of capacity, in `[0, 1]`
    #[must_use]
    pub fn structural_ratio(&self, state: &PhysiologicalState) -> f64 {
        ratio(state.structural_debt, self.structural_capacity())
    }

    /// Fatigue score: `round(100 * (0.6 m + 0.4 s))`
    #[must_use]
    pub fn fatigue_score(&self, state: &PhysiologicalState) -> u8 {
        let metabolic_weight = self.config.fatigue_metabolic_weight;
        let blend = metabolic_weight.mul_add(
            self.metabolic_ratio(state),
            (1.0 - metabolic_weight) * self.structural_ratio(state),
        );
        to_score(blend * scoring::MAX_SCORE)
    }

    /// Readiness score: `100 (1 - m)^1.5 (1 - 0.5 s^1.2)` minus the detraining penalty
    #[must_use]
    pub fn readiness_score(
        &self,
        state: &PhysiologicalState,
        history: &SessionHistory,
        today: u32,
    ) -> u8 {
        let metabolic_freshness =
            (1.0 - self.metabolic_ratio(state)).powf(scoring::READINESS_METABOLIC_EXPONENT);
        let structural_factor = scoring::READINESS_STRUCTURAL_WEIGHT.mul_add(
            -self
                .structural_ratio(state)
                .powf(scoring::READINESS_STRUCTURAL_EXPONENT),
            1.0,
        );
        let freshness = scoring::MAX_SCORE * metabolic_freshness * structural_factor;
        to_score(freshness - self.detraining_penalty(history, today))
    }

    /// Readiness reduction for time since recent sessions
    ///
    /// Days since each of the last sessions are averaged with weights `1/i`
    /// (most recent first). The excess over the grace period drives
    /// `max_penalty * (1 - exp(-excess / tau))`. No history means no penalty.
    #[must_use]
    pub fn detraining_penalty(&self, history: &SessionHistory, today: u32) -> f64 {
        if history.is_empty() {
            return 0.0;
        }

        let (weighted_days, weight_sum) = history.days().enumerate().fold(
            (0.0, 0.0),
            |(weighted, total), (index, day)| {
                let weight = 1.0 / (index as f64 + 1.0);
                let elapsed = f64::from(today.saturating_sub(day));
                (weight.mul_add(elapsed, weighted), total + weight)
            },
        );

        let mean_days = weighted_days / weight_sum;
        let settings = &self.config.detraining;
        let excess = (mean_days - settings.grace_days).max(0.0);
        if excess == 0.0 {
            return 0.0;
        }
        settings.max_penalty * (1.0 - (-excess / settings.time_constant_days).exp())
    }
}

fn effective_capacity(capacity: f64) -> f64 {
    if capacity.is_finite() && capacity > 0.0 {
        capacity
    } else {
        state_model::MIN_CAPACITY
    }
}

fn ratio(debt: f64, capacity: f64) -> f64 {
    if debt.is_finite() {
        (debt / capacity).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn to_score(value: f64) -> u8 {
    if value.is_finite() {
        value.round().clamp(0.0, scoring::MAX_SCORE) as u8
    } else {
        0
    }
}
