// ABOUTME: Immutable per-week percentile tables for fatigue and readiness distributions
// ABOUTME: Tables are only constructible through a validating, monotonicity-checking constructor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Percentile breakpoints stored in every table, in ascending order
pub const PERCENTILE_BREAKPOINTS: [f64; 6] = [15.0, 25.0, 35.0, 65.0, 75.0, 85.0];

/// Six-point distribution summary for one metric
///
/// Values are integer scores in `[0, 100]` and never decrease from P15 to P85.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPercentileSet")]
pub struct PercentileSet {
    p15: u8,
    p25: u8,
    p35: u8,
    p65: u8,
    p75: u8,
    p85: u8,
}

#[derive(Deserialize)]
struct RawPercentileSet {
    p15: u8,
    p25: u8,
    p35: u8,
    p65: u8,
    p75: u8,
    p85: u8,
}

impl TryFrom<RawPercentileSet> for PercentileSet {
    type Error = AppError;

    fn try_from(raw: RawPercentileSet) -> Result<Self, Self::Error> {
        Self::new([raw.p15, raw.p25, raw.p35, raw.p65, raw.p75, raw.p85])
    }
}

impl PercentileSet {
    /// Build a set from values ordered as [`PERCENTILE_BREAKPOINTS`]
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` if any value exceeds 100 or the values decrease
    pub fn new(values: [u8; 6]) -> AppResult<Self> {
        if let Some(value) = values.iter().find(|value| **value > 100) {
            return Err(AppError::value_out_of_range(format!(
                "Percentile value {value} is outside [0, 100]"
            )));
        }
        if values.windows(2).any(|pair| pair[0] > pair[1]) {
            return Err(AppError::value_out_of_range(format!(
                "Percentile values must be non-decreasing, got {values:?}"
            )));
        }

        let [p15, p25, p35, p65, p75, p85] = values;
        Ok(Self {
            p15,
            p25,
            p35,
            p65,
            p75,
            p85,
        })
    }

    /// Build a set from raw percentile estimates, rounding and clamping into `[0, 100]`
    ///
    /// Estimates from linear interpolation over sorted samples are already ordered,
    /// so rounding preserves monotonicity; a running maximum guards the rest.
    #[must_use]
    pub fn from_estimates(estimates: [f64; 6]) -> Self {
        let mut values = [0_u8; 6];
        let mut floor = 0_u8;
        for (slot, estimate) in values.iter_mut().zip(estimates) {
            let rounded = if estimate.is_finite() {
                estimate.round().clamp(0.0, 100.0) as u8
            } else {
                floor
            };
            floor = floor.max(rounded);
            *slot = floor;
        }

        let [p15, p25, p35, p65, p75, p85] = values;
        Self {
            p15,
            p25,
            p35,
            p65,
            p75,
            p85,
        }
    }

    /// 15th percentile
    #[must_use]
    pub const fn p15(&self) -> u8 {
        self.p15
    }

    /// 25th percentile
    #[must_use]
    pub const fn p25(&self) -> u8 {
        self.p25
    }

    /// 35th percentile
    #[must_use]
    pub const fn p35(&self) -> u8 {
        self.p35
    }

    /// 65th percentile
    #[must_use]
    pub const fn p65(&self) -> u8 {
        self.p65
    }

    /// 75th percentile
    #[must_use]
    pub const fn p75(&self) -> u8 {
        self.p75
    }

    /// 85th percentile
    #[must_use]
    pub const fn p85(&self) -> u8 {
        self.p85
    }

    /// All six values in breakpoint order
    #[must_use]
    pub const fn values(&self) -> [u8; 6] {
        [self.p15, self.p25, self.p35, self.p65, self.p75, self.p85]
    }

    /// Whether values never decrease across breakpoints
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.values().windows(2).all(|pair| pair[0] <= pair[1])
    }
}

/// Percentile table for one program week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileTable {
    week_number: u32,
    fatigue: PercentileSet,
    readiness: PercentileSet,
}

impl PercentileTable {
    /// Build a table for a 1-based week number
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for week number zero
    pub fn new(week_number: u32, fatigue: PercentileSet, readiness: PercentileSet) -> AppResult<Self> {
        if week_number == 0 {
            return Err(AppError::invalid_input("Percentile tables use 1-based week numbers"));
        }
        Ok(Self {
            week_number,
            fatigue,
            readiness,
        })
    }

    /// 1-based week number
    #[must_use]
    pub const fn week_number(&self) -> u32 {
        self.week_number
    }

    /// Fatigue distribution
    #[must_use]
    pub const fn fatigue(&self) -> &PercentileSet {
        &self.fatigue
    }

    /// Readiness distribution
    #[must_use]
    pub const fn readiness(&self) -> &PercentileSet {
        &self.readiness
    }

    /// Whether both metrics are monotonic
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        self.fatigue.is_monotonic() && self.readiness.is_monotonic()
    }
}
