// ABOUTME: Program templates with keyframed weeks resolved by stepped interpolation
// ABOUTME: Positions are absolute week numbers, "first", "last" or a percentage of program length
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use super::session::{CustomBlocks, SessionBlock, SessionStyle, SessionStyleKind, WorkRestRatio};
use super::week_plan::{ResolvedProgram, TrainingFocus, WeekPlan};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Week count used when a template omits a usable week configuration
pub const DEFAULT_PROGRAM_WEEKS: u32 = 8;

/// Session duration used when a template omits one
pub const DEFAULT_SESSION_DURATION_MINUTES: f64 = 15.0;

/// Target RPE for weeks with no keyframe value
pub const DEFAULT_TARGET_RPE: f64 = 6.0;

const fn default_session_duration() -> f64 {
    DEFAULT_SESSION_DURATION_MINUTES
}

/// Where a keyframe sits in the program
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWeekPosition", into = "RawWeekPosition")]
pub enum WeekPosition {
    /// Absolute 1-based week number
    Week(u32),
    /// Week 1
    First,
    /// Final week
    Last,
    /// Percentage of the program length (0-100)
    Percent(f64),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawWeekPosition {
    Number(u32),
    Text(String),
}

impl TryFrom<RawWeekPosition> for WeekPosition {
    type Error = AppError;

    fn try_from(raw: RawWeekPosition) -> Result<Self, Self::Error> {
        match raw {
            RawWeekPosition::Number(week) => Ok(Self::Week(week)),
            RawWeekPosition::Text(text) => text.parse(),
        }
    }
}

impl From<WeekPosition> for RawWeekPosition {
    fn from(position: WeekPosition) -> Self {
        match position {
            WeekPosition::Week(week) => Self::Number(week),
            other => Self::Text(other.to_string()),
        }
    }
}

impl FromStr for WeekPosition {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed {
            "first" => return Ok(Self::First),
            "last" => return Ok(Self::Last),
            _ => {}
        }

        if let Some(percent) = trimmed.strip_suffix('%') {
            let value: f64 = percent.trim().parse().map_err(|_| {
                AppError::invalid_format(format!("Invalid percentage position '{trimmed}'"))
            })?;
            if !(0.0..=100.0).contains(&value) {
                return Err(AppError::value_out_of_range(format!(
                    "Percentage position '{trimmed}' must be between 0% and 100%"
                )));
            }
            return Ok(Self::Percent(value));
        }

        trimmed.parse::<u32>().map(Self::Week).map_err(|_| {
            AppError::invalid_format(format!(
                "Invalid week position '{trimmed}'. Expected a week number, 'first', 'last' or 'N%'"
            ))
        })
    }
}

impl fmt::Display for WeekPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Week(week) => write!(f, "{week}"),
            Self::First => f.write_str("first"),
            Self::Last => f.write_str("last"),
            Self::Percent(value) => write!(f, "{value}%"),
        }
    }
}

impl WeekPosition {
    /// Resolve to a 1-based week number within a program of `total_weeks`
    ///
    /// Percentages map to `round(pct * total) + 1` (ties to even), clamped to the
    /// program; `0%` is always week 1.
    #[must_use]
    pub fn resolve(self, total_weeks: u32) -> u32 {
        let total = total_weeks.max(1);
        match self {
            Self::Week(week) => week.clamp(1, total),
            Self::First => 1,
            Self::Last => total,
            Self::Percent(value) => {
                let fraction = value / 100.0;
                if fraction == 0.0 {
                    return 1;
                }
                let week = (fraction * f64::from(total)).round_ties_even() + 1.0;
                (week.max(1.0) as u32).min(total)
            }
        }
    }
}

/// Range of supported program lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    /// Shortest supported program
    pub min: u32,
    /// Longest supported program
    pub max: u32,
    /// Increment between supported lengths
    #[serde(default = "default_step")]
    pub step: u32,
}

const fn default_step() -> u32 {
    1
}

/// Program length configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WeekConfig {
    /// Exactly one supported length
    Fixed {
        /// Number of weeks
        fixed: u32,
    },
    /// Any length in a stepped range
    Variable {
        /// Supported range
        range: WeekRange,
    },
}

impl Default for WeekConfig {
    fn default() -> Self {
        Self::Fixed {
            fixed: DEFAULT_PROGRAM_WEEKS,
        }
    }
}

impl WeekConfig {
    /// Program length used when the caller does not choose one
    ///
    /// Variable ranges use the midpoint, snapped down to a supported step.
    #[must_use]
    pub const fn default_weeks(&self) -> u32 {
        match self {
            Self::Fixed { fixed } => *fixed,
            Self::Variable { range } => {
                let step = if range.step == 0 { 1 } else { range.step };
                let midpoint = (range.min + range.max) / 2;
                midpoint - midpoint.saturating_sub(range.min) % step
            }
        }
    }

    /// Every supported program length, shortest first
    #[must_use]
    pub fn supported_week_counts(&self) -> Vec<u32> {
        match self {
            Self::Fixed { fixed } => vec![*fixed],
            Self::Variable { range } => (range.min..=range.max)
                .step_by(range.step.max(1) as usize)
                .collect(),
        }
    }

    /// Check the configuration describes at least one positive length
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` for zero lengths, an inverted range or a zero step
    pub fn validate(&self) -> AppResult<()> {
        match self {
            Self::Fixed { fixed } if *fixed == 0 => Err(AppError::value_out_of_range(
                "Fixed week count must be at least 1",
            )),
            Self::Variable { range } if range.min == 0 || range.min > range.max || range.step == 0 => {
                Err(AppError::value_out_of_range(format!(
                    "Invalid week range {}-{} step {}",
                    range.min, range.max, range.step
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Keyframe week; unspecified fields fall back to template defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekKeyframe {
    /// Where the keyframe takes effect
    #[serde(default = "first_position")]
    pub position: WeekPosition,
    /// Phase label
    #[serde(default)]
    pub phase_name: Option<String>,
    /// Training emphasis
    #[serde(default)]
    pub focus: Option<TrainingFocus>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Power relative to base power
    #[serde(default)]
    pub power_multiplier: Option<f64>,
    /// Work:rest structure
    #[serde(default)]
    pub work_rest_ratio: Option<WorkRestRatio>,
    /// Target perceived exertion
    #[serde(default, rename = "targetRPE", alias = "targetRpe")]
    pub target_rpe: Option<f64>,
    /// Session duration in minutes
    #[serde(default)]
    pub duration_minutes: Option<f64>,
    /// Session style override
    #[serde(default)]
    pub session_style: Option<SessionStyleKind>,
    /// Blocks for custom sessions
    #[serde(default)]
    pub blocks: Option<Vec<SessionBlock>>,
}

const fn first_position() -> WeekPosition {
    WeekPosition::First
}

/// Authored program template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramTemplate {
    /// Stable template identity, used as the percentile cache key
    pub id: String,
    /// Display name
    pub name: String,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Template format version
    #[serde(default)]
    pub template_version: Option<String>,
    /// Progression mode label ("power", "duration", "double")
    #[serde(default)]
    pub progression_mode: Option<String>,
    /// Supported program lengths
    #[serde(default)]
    pub week_config: WeekConfig,
    /// Session style for weeks that do not override it
    #[serde(default)]
    pub default_session_style: SessionStyleKind,
    /// Session duration for weeks that do not override it
    #[serde(default = "default_session_duration")]
    pub default_session_duration_minutes: f64,
    /// Keyframe weeks
    #[serde(default)]
    pub weeks: Vec<WeekKeyframe>,
}

impl ProgramTemplate {
    /// Parse a template from JSON
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON, `MissingRequiredField`
    /// for a blank id, or an error for an invalid week config
    pub fn from_json(json: &str) -> AppResult<Self> {
        let template: Self = serde_json::from_str(json)?;
        if template.id.trim().is_empty() {
            return Err(AppError::missing_field("id"));
        }
        template.week_config.validate()?;
        Ok(template)
    }

    /// Program length for an optional caller override
    #[must_use]
    pub fn program_weeks(&self, override_weeks: Option<u32>) -> u32 {
        override_weeks
            .filter(|weeks| *weeks > 0)
            .unwrap_or_else(|| self.week_config.default_weeks())
    }

    /// Expand keyframes into one week plan per program week
    ///
    /// Each keyframe holds until the next one takes effect. Weeks before the
    /// earliest keyframe use that keyframe. Without keyframes every week uses
    /// template defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `total_weeks` is zero, a custom keyframe has no blocks,
    /// or a resolved week violates week-plan invariants
    pub fn resolve(&self, total_weeks: u32, base_power: f64) -> AppResult<ResolvedProgram> {
        if total_weeks == 0 {
            return Err(AppError::invalid_input("Program must contain at least one week"));
        }

        let mut keyframes: Vec<(u32, &WeekKeyframe)> = self
            .weeks
            .iter()
            .map(|keyframe| (keyframe.position.resolve(total_weeks), keyframe))
            .collect();
        keyframes.sort_by_key(|(position, _)| *position);

        let weeks = (1..=total_weeks)
            .map(|week_number| {
                let keyframe = keyframes
                    .iter()
                    .take_while(|(position, _)| *position <= week_number)
                    .last()
                    .or_else(|| keyframes.first())
                    .map(|(_, keyframe)| *keyframe);
                self.build_week(week_number, keyframe)
            })
            .collect::<AppResult<Vec<_>>>()?;

        let program = ResolvedProgram {
            template_id: self.id.clone(),
            base_power,
            weeks,
        };
        program.validate()?;
        Ok(program)
    }

    fn build_week(&self, week_number: u32, keyframe: Option<&WeekKeyframe>) -> AppResult<WeekPlan> {
        let style_kind = keyframe
            .and_then(|frame| frame.session_style)
            .unwrap_or(self.default_session_style);

        let (session_style, block_minutes) = match style_kind {
            SessionStyleKind::SteadyState => (SessionStyle::SteadyState, None),
            SessionStyleKind::Interval => (SessionStyle::Interval, None),
            SessionStyleKind::Custom => {
                let blocks = keyframe
                    .and_then(|frame| frame.blocks.clone())
                    .ok_or_else(|| {
                        AppError::invalid_input(format!(
                            "Week {week_number}: custom session style requires blocks"
                        ))
                    })?;
                let blocks = CustomBlocks::new(blocks)?;
                let minutes = blocks.total_duration_minutes();
                (SessionStyle::Custom(blocks), Some(minutes))
            }
        };

        let duration_minutes = keyframe
            .and_then(|frame| frame.duration_minutes)
            .or(block_minutes)
            .unwrap_or(self.default_session_duration_minutes);

        Ok(WeekPlan {
            week_number,
            phase_name: keyframe
                .and_then(|frame| frame.phase_name.clone())
                .unwrap_or_else(|| format!("Week {week_number}")),
            focus: keyframe.and_then(|frame| frame.focus).unwrap_or_default(),
            power_multiplier: keyframe
                .and_then(|frame| frame.power_multiplier)
                .unwrap_or(1.0),
            work_rest_ratio: keyframe
                .and_then(|frame| frame.work_rest_ratio)
                .unwrap_or_default(),
            target_rpe: keyframe
                .and_then(|frame| frame.target_rpe)
                .unwrap_or(DEFAULT_TARGET_RPE),
            duration_minutes,
            session_style,
        })
    }
}
