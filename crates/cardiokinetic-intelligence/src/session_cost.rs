// ABOUTME: Session cost engine converting planned or logged sessions into scalar daily load
// ABOUTME: Critical-power model with W' depletion for intervals, plus a session-RPE alternative
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use crate::config::SessionCostConfig;
use crate::physiological_constants::{session_cost, session_rpe};
use cardiokinetic_core::errors::AppError;
use cardiokinetic_core::models::{SessionStyle, WeekPlan, WorkRestRatio};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Session load algorithm selection
///
/// - `CriticalPower`: intensity factor relative to critical power, with an
///   accelerating surcharge for W' spent above it
/// - `SessionRpe`: perceived exertion scaled by duration and relative power
///
/// # Scientific References
///
/// - Skiba, P.F. et al. (2012). Modeling the expenditure and reconstitution of work capacity above critical power.
/// - Foster, C. et al. (2001). A new approach to monitoring exercise training.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionCostAlgorithm {
    /// Critical power model
    ///
    /// Formula: `cost = minutes / 60 x IF^2 x 100 + 25 x f^1.5`, where
    /// `IF = P / CP` and `f` is net W' depletion as a fraction of W'
    #[default]
    CriticalPower,

    /// Session-RPE model
    ///
    /// Formula: `cost = RPE^1.5 x minutes^0.75 x clamp(P / P_base, 0.25, 4)^0.5 x 0.3`
    SessionRpe,
}

impl SessionCostAlgorithm {
    /// Get algorithm name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CriticalPower => "critical_power",
            Self::SessionRpe => "session_rpe",
        }
    }

    /// Get algorithm description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::CriticalPower => "Critical power intensity factor with W' depletion surcharge",
            Self::SessionRpe => "Session RPE scaled by duration and relative power",
        }
    }
}

impl FromStr for SessionCostAlgorithm {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "critical_power" | "cp" => Ok(Self::CriticalPower),
            "session_rpe" | "srpe" | "rpe" => Ok(Self::SessionRpe),
            other => Err(AppError::invalid_input(format!(
                "Unknown session cost algorithm: '{other}'. Valid options: critical_power, session_rpe"
            ))),
        }
    }
}

/// Athlete capacity estimates used by the critical power model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Critical power in watts
    pub critical_power: f64,
    /// Anaerobic work capacity above critical power, in joules
    pub w_prime: f64,
}

impl AthleteProfile {
    /// Estimate a profile from a program's base power
    ///
    /// The base power is taken as critical power.
    #[must_use]
    pub const fn from_base_power(base_power: f64, w_prime: f64) -> Self {
        Self {
            critical_power: base_power,
            w_prime,
        }
    }

    /// Critical power, falling back to a minimum for non-positive estimates
    #[must_use]
    pub fn effective_critical_power(&self) -> f64 {
        if self.critical_power.is_finite() && self.critical_power > 0.0 {
            self.critical_power
        } else {
            session_cost::MIN_CRITICAL_POWER_WATTS
        }
    }

    /// W', falling back to a minimum for non-positive estimates
    #[must_use]
    pub fn effective_w_prime(&self) -> f64 {
        if self.w_prime.is_finite() && self.w_prime > 0.0 {
            self.w_prime
        } else {
            session_cost::MIN_W_PRIME_JOULES
        }
    }
}

/// One session to cost
#[derive(Debug, Clone, Copy)]
pub struct SessionLoadInput<'a> {
    /// Program base power in watts
    pub base_power: f64,
    /// Planned power relative to base power
    pub power_multiplier: f64,
    /// Multiplicative deviation from plan (1.0 = as planned)
    pub power_jitter: f64,
    /// Duration in minutes
    pub duration_minutes: f64,
    /// Perceived exertion
    pub rpe: f64,
    /// Work:rest structure for intervals
    pub work_rest_ratio: WorkRestRatio,
    /// Session structure
    pub style: &'a SessionStyle,
}

impl<'a> SessionLoadInput<'a> {
    /// Input for a planned week's session, as planned
    #[must_use]
    pub fn planned(week: &'a WeekPlan, base_power: f64) -> Self {
        Self {
            base_power,
            power_multiplier: week.power_multiplier,
            power_jitter: 1.0,
            duration_minutes: week.duration_minutes,
            rpe: week.target_rpe,
            work_rest_ratio: week.work_rest_ratio,
            style: &week.session_style,
        }
    }

    /// Same session with power and RPE deviations applied
    #[must_use]
    pub const fn with_jitter(mut self, power_jitter: f64, rpe: f64) -> Self {
        self.power_jitter = power_jitter;
        self.rpe = rpe;
        self
    }

    /// Average target power in watts
    #[must_use]
    pub fn target_power(&self) -> f64 {
        self.base_power * self.power_multiplier * self.power_jitter
    }
}

/// Converts sessions into daily load
#[derive(Debug, Clone)]
pub struct SessionCostEngine {
    config: SessionCostConfig,
    athlete: AthleteProfile,
}

impl SessionCostEngine {
    /// Create an engine for an athlete
    #[must_use]
    pub const fn new(config: SessionCostConfig, athlete: AthleteProfile) -> Self {
        Self { config, athlete }
    }

    /// Create an engine for a program base power using the configured default W'
    #[must_use]
    pub fn for_base_power(config: SessionCostConfig, base_power: f64) -> Self {
        let athlete = AthleteProfile::from_base_power(base_power, config.default_w_prime_joules);
        Self::new(config, athlete)
    }

    /// Active algorithm
    #[must_use]
    pub const fn algorithm(&self) -> SessionCostAlgorithm {
        self.config.algorithm
    }

    /// Athlete capacities
    #[must_use]
    pub const fn athlete(&self) -> &AthleteProfile {
        &self.athlete
    }

    /// Load for one session
    ///
    /// Always finite and non-negative. NaN inputs yield 0; negative power or
    /// duration are treated as 0.
    #[must_use]
    pub fn session_load(&self, input: &SessionLoadInput<'_>) -> f64 {
        let load = match self.config.algorithm {
            SessionCostAlgorithm::CriticalPower => self.critical_power_load(input),
            SessionCostAlgorithm::SessionRpe => Self::session_rpe_load(input),
        };
        sanitize(load)
    }

    fn critical_power_load(&self, input: &SessionLoadInput<'_>) -> f64 {
        match input.style {
            SessionStyle::SteadyState => {
                self.steady_state_cost(input.target_power(), input.duration_minutes)
            }
            SessionStyle::Interval => self.interval_cost(
                input.target_power(),
                input.duration_minutes,
                input.work_rest_ratio,
            ),
            SessionStyle::Custom(blocks) => blocks
                .blocks()
                .iter()
                .map(|block| {
                    let power = input.base_power * block.power_multiplier * input.power_jitter;
                    match block.work_rest_ratio {
                        WorkRestRatio::Steady => {
                            self.steady_state_cost(power, block.duration_minutes)
                        }
                        ratio => self.interval_cost(power, block.duration_minutes, ratio),
                    }
                })
                .sum(),
        }
    }

    /// Steady-state cost: `minutes / 60 x IF^2 x 100`
    ///
    /// Monotonic in power and duration; IF is capped at 3.
    #[must_use]
    pub fn steady_state_cost(&self, power_watts: f64, duration_minutes: f64) -> f64 {
        let minutes = non_negative(duration_minutes);
        let intensity = self.intensity_factor(power_watts);
        sanitize(minutes / 60.0 * intensity * intensity * session_cost::COST_PER_HOUR_AT_CP)
    }

    /// Interval cost: work and rest segments weighted by the ratio, plus the W' surcharge
    #[must_use]
    pub fn interval_cost(
        &self,
        power_watts: f64,
        duration_minutes: f64,
        ratio: WorkRestRatio,
    ) -> f64 {
        let minutes = non_negative(duration_minutes);
        let work_fraction = ratio.work_fraction();
        let work_minutes = minutes * work_fraction;
        let rest_minutes = minutes - work_minutes;

        let critical_power = self.athlete.effective_critical_power();
        let power = non_negative(power_watts);
        let rest_power = critical_power * self.config.rest_power_fraction;

        let aerobic = self.steady_state_cost(power, work_minutes)
            + self.steady_state_cost(rest_power, rest_minutes);

        let depleted = (power - critical_power).max(0.0) * work_minutes * 60.0;
        let reconstituted = (critical_power - rest_power).max(0.0)
            * rest_minutes
            * 60.0
            * self.config.w_prime_recovery_efficiency;
        let fraction = ((depleted - reconstituted) / self.athlete.effective_w_prime())
            .clamp(0.0, session_cost::MAX_W_PRIME_DEPLETION);

        if fraction > 0.0 {
            debug!(
                power_watts = power,
                critical_power,
                w_prime_fraction = fraction,
                "Interval session depletes W'"
            );
        }

        sanitize(
            self.config
                .anaerobic_cost_scale
                .mul_add(fraction.powf(self.config.anaerobic_cost_exponent), aerobic),
        )
    }

    fn intensity_factor(&self, power_watts: f64) -> f64 {
        (non_negative(power_watts) / self.athlete.effective_critical_power())
            .clamp(0.0, session_cost::MAX_INTENSITY_FACTOR)
    }

    fn session_rpe_load(input: &SessionLoadInput<'_>) -> f64 {
        let minutes = non_negative(input.duration_minutes);
        if minutes == 0.0 {
            return 0.0;
        }
        let rpe = if input.rpe.is_finite() {
            input.rpe.clamp(1.0, 10.0)
        } else {
            return 0.0;
        };
        let power_ratio = if input.base_power > 0.0 {
            (input.target_power() / input.base_power)
                .clamp(session_rpe::MIN_POWER_RATIO, session_rpe::MAX_POWER_RATIO)
        } else {
            1.0
        };

        rpe.powf(session_rpe::RPE_EXPONENT)
            * minutes.powf(session_rpe::DURATION_EXPONENT)
            * power_ratio.powf(session_rpe::POWER_RATIO_EXPONENT)
            * session_rpe::LOAD_SCALE
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

fn sanitize(load: f64) -> f64 {
    if load.is_finite() {
        load.max(0.0)
    } else {
        0.0
    }
}
