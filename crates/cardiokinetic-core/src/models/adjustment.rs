// ABOUTME: Adaptive adjustment decision objects and the live reading they are computed from
// ABOUTME: Names the percentile band that triggered each decision
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// How far into the tail of the simulated distribution a reading falls
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentileBand {
    /// Between P35 and P65
    Normal,
    /// Beyond P35 / P65
    Mild,
    /// Beyond P25 / P75
    Moderate,
    /// Beyond P15 / P85
    Extreme,
}

impl PercentileBand {
    /// Numeric severity (0 = normal, 3 = extreme)
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Mild => 1,
            Self::Moderate => 2,
            Self::Extreme => 3,
        }
    }

    /// Band for a numeric severity, saturating at `Extreme`
    #[must_use]
    pub const fn from_severity(severity: u8) -> Self {
        match severity {
            0 => Self::Normal,
            1 => Self::Mild,
            2 => Self::Moderate,
            _ => Self::Extreme,
        }
    }
}

/// Internal state behind an adjustment decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "band", rename_all = "snake_case")]
pub enum AdjustmentState {
    /// Adaptive adjustment disabled by configuration
    Disabled,
    /// No percentile table available for the current week
    NoReferenceData,
    /// Both readings inside the normal band
    NormalRange,
    /// Fatigue above the upper percentiles
    ElevatedFatigue(PercentileBand),
    /// Readiness below the lower percentiles
    SuppressedReadiness(PercentileBand),
    /// Fatigue high and readiness low at the same time
    CompoundStrain(PercentileBand),
    /// Fatigue low and readiness high at the same time
    Fresh(PercentileBand),
}

impl AdjustmentState {
    /// Stable identifier used in logs and messages
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::NoReferenceData => "no_reference_data",
            Self::NormalRange => "normal_range",
            Self::ElevatedFatigue(_) => "elevated_fatigue",
            Self::SuppressedReadiness(_) => "suppressed_readiness",
            Self::CompoundStrain(_) => "compound_strain",
            Self::Fresh(_) => "fresh",
        }
    }

    /// Band that triggered the state, if any
    #[must_use]
    pub const fn band(&self) -> Option<PercentileBand> {
        match self {
            Self::ElevatedFatigue(band)
            | Self::SuppressedReadiness(band)
            | Self::CompoundStrain(band)
            | Self::Fresh(band) => Some(*band),
            Self::Disabled | Self::NoReferenceData | Self::NormalRange => None,
        }
    }
}

/// Decision for one upcoming session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveAdjustment {
    /// Whether the planned session should be modified
    pub active: bool,
    /// Multiplier applied to the planned power
    pub power_multiplier: f64,
    /// Multiplier applied to the planned duration, when the style warrants it
    pub duration_multiplier: Option<f64>,
    /// Human-readable justification (empty when inactive)
    pub message: String,
    /// Internal state that produced the decision
    pub state: AdjustmentState,
}

impl AdaptiveAdjustment {
    /// Inactive decision: planned session runs unchanged
    #[must_use]
    pub const fn inactive(state: AdjustmentState) -> Self {
        Self {
            active: false,
            power_multiplier: 1.0,
            duration_multiplier: None,
            message: String::new(),
            state,
        }
    }

    /// Apply the decision to a planned power in watts
    #[must_use]
    pub fn adjusted_power(&self, planned_power: f64) -> f64 {
        planned_power * self.power_multiplier
    }

    /// Apply the decision to a planned duration in minutes
    #[must_use]
    pub fn adjusted_duration(&self, planned_minutes: f64) -> f64 {
        planned_minutes * self.duration_multiplier.unwrap_or(1.0)
    }
}

/// Live reading supplied per adjustment call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveContext {
    /// Current fatigue score in `[0, 100]`
    pub fatigue: f64,
    /// Current readiness score in `[0, 100]`
    pub readiness: f64,
    /// 1-based current week
    pub week_number: u32,
    /// Total weeks in the program
    pub total_weeks: u32,
    /// Free-text phase label of the current week
    pub phase_label: String,
}

impl LiveContext {
    /// Build a context, clamping scores into `[0, 100]`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the week number is zero or beyond `total_weeks`,
    /// or a score is not finite
    pub fn new(
        fatigue: f64,
        readiness: f64,
        week_number: u32,
        total_weeks: u32,
        phase_label: impl Into<String>,
    ) -> AppResult<Self> {
        if !fatigue.is_finite() || !readiness.is_finite() {
            return Err(AppError::invalid_input("Live scores must be finite"));
        }
        if week_number == 0 || week_number > total_weeks {
            return Err(AppError::invalid_input(format!(
                "Week {week_number} is outside a {total_weeks}-week program"
            )));
        }
        Ok(Self {
            fatigue: fatigue.clamp(0.0, 100.0),
            readiness: readiness.clamp(0.0, 100.0),
            week_number,
            total_weeks,
            phase_label: phase_label.into(),
        })
    }
}
