// ABOUTME: Session structure types: steady-state, interval and custom block sequences
// ABOUTME: Custom sessions can only be built from a non-empty block list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Work:rest structure of a session or block
///
/// Parsed from template strings: `"steady"` for continuous riding, or
/// `"<work>:<rest>"` such as `"1:1"`, `"2:1"` or `"30:30"` (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum WorkRestRatio {
    /// Continuous effort with no rest segments
    Steady,
    /// Alternating work and rest segments in the given proportion
    Ratio {
        /// Work portion (any positive unit)
        work: f64,
        /// Rest portion (same unit as `work`, may be zero)
        rest: f64,
    },
}

impl WorkRestRatio {
    /// Fraction of total time spent in work segments, in `[0, 1]`
    #[must_use]
    pub fn work_fraction(self) -> f64 {
        match self {
            Self::Steady => 1.0,
            Self::Ratio { work, rest } => {
                let total = work + rest;
                if total > 0.0 && total.is_finite() {
                    (work / total).clamp(0.0, 1.0)
                } else {
                    1.0
                }
            }
        }
    }

    /// Whether this ratio contains rest segments
    #[must_use]
    pub fn has_rest(self) -> bool {
        self.work_fraction() < 1.0
    }
}

impl Default for WorkRestRatio {
    fn default() -> Self {
        Self::Ratio {
            work: 1.0,
            rest: 1.0,
        }
    }
}

impl FromStr for WorkRestRatio {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("steady") {
            return Ok(Self::Steady);
        }

        let (work, rest) = trimmed.split_once(':').ok_or_else(|| {
            AppError::invalid_format(format!(
                "Invalid work:rest ratio '{trimmed}'. Expected 'steady' or '<work>:<rest>'"
            ))
        })?;

        let work: f64 = work.trim().parse().map_err(|_| {
            AppError::invalid_format(format!("Invalid work portion in ratio '{trimmed}'"))
        })?;
        let rest: f64 = rest.trim().parse().map_err(|_| {
            AppError::invalid_format(format!("Invalid rest portion in ratio '{trimmed}'"))
        })?;

        if !work.is_finite() || !rest.is_finite() || work <= 0.0 || rest < 0.0 {
            return Err(AppError::value_out_of_range(format!(
                "Work:rest ratio '{trimmed}' must have positive work and non-negative rest"
            )));
        }

        Ok(Self::Ratio { work, rest })
    }
}

impl TryFrom<String> for WorkRestRatio {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WorkRestRatio> for String {
    fn from(value: WorkRestRatio) -> Self {
        value.to_string()
    }
}

impl fmt::Display for WorkRestRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Steady => write!(f, "steady"),
            Self::Ratio { work, rest } => write!(f, "{work}:{rest}"),
        }
    }
}

/// One segment of a custom session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionBlock {
    /// Block duration in minutes
    pub duration_minutes: f64,
    /// Power multiplier relative to the program's base power
    pub power_multiplier: f64,
    /// Work:rest structure inside the block
    #[serde(default = "steady_ratio")]
    pub work_rest_ratio: WorkRestRatio,
}

const fn steady_ratio() -> WorkRestRatio {
    WorkRestRatio::Steady
}

impl SessionBlock {
    /// Validate the block's structural invariants
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` if the duration or power multiplier is not positive
    pub fn validate(&self) -> AppResult<()> {
        if !(self.duration_minutes.is_finite() && self.duration_minutes > 0.0) {
            return Err(AppError::value_out_of_range(format!(
                "Block duration must be positive, got {}",
                self.duration_minutes
            )));
        }
        if !(self.power_multiplier.is_finite() && self.power_multiplier > 0.0) {
            return Err(AppError::value_out_of_range(format!(
                "Block power multiplier must be positive, got {}",
                self.power_multiplier
            )));
        }
        Ok(())
    }
}

/// Non-empty sequence of custom session blocks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SessionBlock>", into = "Vec<SessionBlock>")]
pub struct CustomBlocks(Vec<SessionBlock>);

impl CustomBlocks {
    /// Build a block sequence
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `blocks` is empty
    pub fn new(blocks: Vec<SessionBlock>) -> AppResult<Self> {
        if blocks.is_empty() {
            return Err(AppError::invalid_input(
                "Custom session style requires at least one block",
            ));
        }
        Ok(Self(blocks))
    }

    /// Borrow the blocks
    #[must_use]
    pub fn blocks(&self) -> &[SessionBlock] {
        &self.0
    }

    /// Sum of block durations in minutes
    #[must_use]
    pub fn total_duration_minutes(&self) -> f64 {
        self.0.iter().map(|block| block.duration_minutes).sum()
    }

    /// Duration-weighted mean power multiplier of the blocks
    #[must_use]
    pub fn mean_power_multiplier(&self) -> f64 {
        let total = self.total_duration_minutes();
        if total <= 0.0 {
            return 1.0;
        }
        self.0
            .iter()
            .map(|block| block.power_multiplier * block.duration_minutes)
            .sum::<f64>()
            / total
    }
}

impl TryFrom<Vec<SessionBlock>> for CustomBlocks {
    type Error = AppError;

    fn try_from(value: Vec<SessionBlock>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CustomBlocks> for Vec<SessionBlock> {
    fn from(value: CustomBlocks) -> Self {
        value.0
    }
}

/// How a session is structured
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "blocks", rename_all = "kebab-case")]
pub enum SessionStyle {
    /// Continuous effort at target power
    SteadyState,
    /// Work/rest intervals following the week's work:rest ratio
    Interval,
    /// Explicit block sequence
    Custom(CustomBlocks),
}

impl SessionStyle {
    /// The style's kind without block data
    #[must_use]
    pub const fn kind(&self) -> SessionStyleKind {
        match self {
            Self::SteadyState => SessionStyleKind::SteadyState,
            Self::Interval => SessionStyleKind::Interval,
            Self::Custom(_) => SessionStyleKind::Custom,
        }
    }

    /// Whether the style is volume-oriented (long continuous or multi-block work)
    #[must_use]
    pub const fn is_volume_oriented(&self) -> bool {
        matches!(self, Self::SteadyState | Self::Custom(_))
    }
}

/// Session style name as written in program templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStyleKind {
    /// Continuous effort
    #[default]
    SteadyState,
    /// Work/rest intervals
    Interval,
    /// Explicit block sequence
    Custom,
}

impl fmt::Display for SessionStyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SteadyState => write!(f, "steady-state"),
            Self::Interval => write!(f, "interval"),
            Self::Custom => write!(f, "custom"),
        }
    }
}
