// ABOUTME: Week plan definition and the resolved program consumed by the simulation engine
// ABOUTME: Structural invariants are checked here so malformed plans fail before any run starts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use super::session::{SessionStyle, WorkRestRatio};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Tolerance in minutes when comparing custom block durations to the week duration
pub const BLOCK_DURATION_TOLERANCE_MINUTES: f64 = 0.01;

/// Lowest accepted target RPE
pub const MIN_RPE: f64 = 1.0;

/// Highest accepted target RPE
pub const MAX_RPE: f64 = 10.0;

/// Primary emphasis of a training week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrainingFocus {
    /// Accumulate time at moderate intensity
    #[default]
    #[serde(alias = "volume")]
    Volume,
    /// Raise power at reduced volume
    #[serde(alias = "intensity")]
    Intensity,
    /// Compress rest between efforts
    #[serde(alias = "density")]
    Density,
    /// Unload to absorb prior training
    #[serde(alias = "recovery")]
    Recovery,
}

impl TrainingFocus {
    /// Display name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Volume => "Volume",
            Self::Intensity => "Intensity",
            Self::Density => "Density",
            Self::Recovery => "Recovery",
        }
    }
}

impl fmt::Display for TrainingFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TrainingFocus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "volume" => Ok(Self::Volume),
            "intensity" => Ok(Self::Intensity),
            "density" => Ok(Self::Density),
            "recovery" => Ok(Self::Recovery),
            other => Err(AppError::invalid_format(format!(
                "Unknown training focus '{other}'. Valid options: volume, intensity, density, recovery"
            ))),
        }
    }
}

/// One planned program week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPlan {
    /// 1-based ordinal position in the program
    pub week_number: u32,
    /// Free-text phase label ("Base", "Build", "Taper", ...)
    pub phase_name: String,
    /// Training emphasis
    pub focus: TrainingFocus,
    /// Power relative to the program's base power
    pub power_multiplier: f64,
    /// Work:rest structure for interval sessions
    pub work_rest_ratio: WorkRestRatio,
    /// Target perceived exertion (1-10)
    pub target_rpe: f64,
    /// Planned session duration in minutes
    pub duration_minutes: f64,
    /// Session structure
    pub session_style: SessionStyle,
}

impl WeekPlan {
    /// Check the week's structural invariants
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for a non-positive power multiplier or duration, an
    /// RPE outside 1-10, invalid blocks, or custom blocks whose durations do not add
    /// up to the week's duration
    pub fn validate(&self) -> AppResult<()> {
        if self.week_number == 0 {
            return Err(AppError::invalid_input("Week numbers are 1-based"));
        }
        if !(self.power_multiplier.is_finite() && self.power_multiplier > 0.0) {
            return Err(AppError::value_out_of_range(format!(
                "Week {}: power multiplier must be positive, got {}",
                self.week_number, self.power_multiplier
            )));
        }
        if !(self.duration_minutes.is_finite() && self.duration_minutes > 0.0) {
            return Err(AppError::value_out_of_range(format!(
                "Week {}: duration must be positive, got {}",
                self.week_number, self.duration_minutes
            )));
        }
        if !(MIN_RPE..=MAX_RPE).contains(&self.target_rpe) {
            return Err(AppError::value_out_of_range(format!(
                "Week {}: target RPE must be between {MIN_RPE} and {MAX_RPE}, got {}",
                self.week_number, self.target_rpe
            )));
        }

        if let SessionStyle::Custom(blocks) = &self.session_style {
            for block in blocks.blocks() {
                block.validate()?;
            }
            let total = blocks.total_duration_minutes();
            if (total - self.duration_minutes).abs() > BLOCK_DURATION_TOLERANCE_MINUTES {
                return Err(AppError::value_out_of_range(format!(
                    "Week {}: custom blocks sum to {total} minutes but the week lasts {} minutes",
                    self.week_number, self.duration_minutes
                ))
                .with_details(json!({
                    "weekNumber": self.week_number,
                    "blockMinutes": total,
                    "durationMinutes": self.duration_minutes,
                })));
            }
        }

        Ok(())
    }

    /// Target power in watts for the given base power
    #[must_use]
    pub fn target_power(&self, base_power: f64) -> f64 {
        base_power * self.power_multiplier
    }
}

/// Fully resolved program: the simulation engine's input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProgram {
    /// Identity of the template the program was resolved from
    pub template_id: String,
    /// Base power in watts
    pub base_power: f64,
    /// Week plans in program order
    pub weeks: Vec<WeekPlan>,
}

impl ResolvedProgram {
    /// Validate the program before simulation
    ///
    /// # Errors
    ///
    /// Returns an error if the program has no weeks, a non-positive base power,
    /// out-of-order week numbers or any invalid week
    pub fn validate(&self) -> AppResult<()> {
        if self.weeks.is_empty() {
            return Err(AppError::invalid_input("Program must contain at least one week"));
        }
        if !(self.base_power.is_finite() && self.base_power > 0.0) {
            return Err(AppError::value_out_of_range(format!(
                "Base power must be positive, got {}",
                self.base_power
            )));
        }

        for (index, week) in self.weeks.iter().enumerate() {
            let expected = u32::try_from(index + 1)
                .map_err(|_| AppError::invalid_input("Program has too many weeks"))?;
            if week.week_number != expected {
                return Err(AppError::invalid_input(format!(
                    "Week at position {expected} is numbered {}",
                    week.week_number
                )));
            }
            week.validate()?;
        }

        Ok(())
    }

    /// Plan for a 1-based week
    ///
    /// # Errors
    ///
    /// Returns `ResourceNotFound` if the program has no such week
    pub fn week(&self, week_number: u32) -> AppResult<&WeekPlan> {
        self.weeks
            .iter()
            .find(|week| week.week_number == week_number)
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "Week {week_number} of a {}-week program",
                    self.weeks.len()
                ))
            })
    }

    /// Number of weeks in the program
    #[must_use]
    pub fn week_count(&self) -> usize {
        self.weeks.len()
    }

    /// Phase labels in program order
    #[must_use]
    pub fn phase_labels(&self) -> Vec<&str> {
        self.weeks.iter().map(|week| week.phase_name.as_str()).collect()
    }
}
