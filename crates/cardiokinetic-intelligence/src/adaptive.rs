// ABOUTME: Adaptive adjustment engine mapping a live reading onto simulated percentile bands
// ABOUTME: Reduces power and duration under strain, boosts power when fresh, otherwise stays inactive
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

//! # Adaptive Adjustment
//!
//! A live fatigue/readiness reading is compared against the simulated
//! distribution for the current week:
//!
//! | Band     | Fatigue  | Readiness | Strain power | Strain duration | Fresh power |
//! |----------|----------|-----------|--------------|-----------------|-------------|
//! | Mild     | >= P65   | <= P35    | 0.95         | 0.90            | 1.02        |
//! | Moderate | >= P75   | <= P25    | 0.90         | 0.80            | 1.04        |
//! | Extreme  | >= P85   | <= P15    | 0.85         | 0.70            | 1.05        |
//!
//! Strain is flagged by either metric; freshness needs both. Duration is only
//! shortened for volume-oriented session styles.

use crate::config::AdaptiveConfig;
use crate::phase_classifier::{PhaseClassifier, PhasePosition};
use cardiokinetic_core::models::{
    AdaptiveAdjustment, AdjustmentState, LiveContext, PercentileBand, PercentileSet,
    PercentileTable, SessionStyle,
};
use tracing::debug;

/// Upper breakpoints (P65, P75, P85) and lower breakpoints (P35, P25, P15)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Breakpoints {
    upper: [f64; 3],
    lower: [f64; 3],
}

impl Breakpoints {
    fn from_set(set: &PercentileSet) -> Self {
        Self {
            upper: [set.p65(), set.p75(), set.p85()].map(f64::from),
            lower: [set.p35(), set.p25(), set.p15()].map(f64::from),
        }
    }

    fn shifted(self, position: &PhasePosition) -> Self {
        let shift =
            |value: f64| PhaseClassifier::adjust_threshold(value, position.phase, position.ratio);
        Self {
            upper: self.upper.map(shift),
            lower: self.lower.map(shift),
        }
    }

    /// How many upper breakpoints the value reaches
    fn above(&self, value: f64) -> u8 {
        self.upper.iter().filter(|threshold| value >= **threshold).count() as u8
    }

    /// How many lower breakpoints the value reaches
    fn below(&self, value: f64) -> u8 {
        self.lower.iter().filter(|threshold| value <= **threshold).count() as u8
    }
}

/// Per-session adjustment rule
#[derive(Debug, Clone, Default)]
pub struct AdaptiveEngine {
    config: AdaptiveConfig,
}

impl AdaptiveEngine {
    /// Create an engine from validated configuration
    #[must_use]
    pub const fn new(config: AdaptiveConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &AdaptiveConfig {
        &self.config
    }

    /// Decide how to modify the next session
    ///
    /// Pure: the same inputs always produce the same decision. A missing table
    /// produces an inactive decision rather than an error.
    #[must_use]
    pub fn evaluate(
        &self,
        context: &LiveContext,
        table: Option<&PercentileTable>,
        style: &SessionStyle,
        position: Option<&PhasePosition>,
    ) -> AdaptiveAdjustment {
        if !self.config.enabled {
            return AdaptiveAdjustment::inactive(AdjustmentState::Disabled);
        }
        let Some(table) = table else {
            debug!(
                week = context.week_number,
                "No percentile table for week; adjustment inactive"
            );
            return AdaptiveAdjustment::inactive(AdjustmentState::NoReferenceData);
        };

        let mut fatigue_breakpoints = Breakpoints::from_set(table.fatigue());
        if let Some(position) = position.filter(|_| self.config.phase_aware_thresholds) {
            fatigue_breakpoints = fatigue_breakpoints.shifted(position);
        }
        let readiness_breakpoints = Breakpoints::from_set(table.readiness());

        let fatigue_strain = fatigue_breakpoints.above(context.fatigue);
        let readiness_strain = readiness_breakpoints.below(context.readiness);

        let decision = if fatigue_strain > 0 || readiness_strain > 0 {
            self.strain(context, fatigue_strain, readiness_strain, style)
        } else {
            let fatigue_fresh = fatigue_breakpoints.below(context.fatigue);
            let readiness_fresh = readiness_breakpoints.above(context.readiness);
            if fatigue_fresh > 0 && readiness_fresh > 0 {
                self.fresh(context, fatigue_fresh.min(readiness_fresh))
            } else {
                AdaptiveAdjustment::inactive(AdjustmentState::NormalRange)
            }
        };

        debug!(
            week = context.week_number,
            fatigue = context.fatigue,
            readiness = context.readiness,
            state = decision.state.name(),
            power_multiplier = decision.power_multiplier,
            "Adaptive adjustment evaluated"
        );
        decision
    }

    fn strain(
        &self,
        context: &LiveContext,
        fatigue_severity: u8,
        readiness_severity: u8,
        style: &SessionStyle,
    ) -> AdaptiveAdjustment {
        let band = PercentileBand::from_severity(fatigue_severity.max(readiness_severity));
        let index = band_index(band);
        let compound = fatigue_severity > 0 && readiness_severity > 0;

        let mut power_multiplier = self.config.strain_power_multipliers[index];
        let state = if compound {
            power_multiplier -= self.config.compound_strain_reduction;
            AdjustmentState::CompoundStrain(band)
        } else if fatigue_severity > 0 {
            AdjustmentState::ElevatedFatigue(band)
        } else {
            AdjustmentState::SuppressedReadiness(band)
        };

        let duration_multiplier = style
            .is_volume_oriented()
            .then(|| self.config.strain_duration_multipliers[index]);

        let reason = match state {
            AdjustmentState::CompoundStrain(_) => "fatigue is high and readiness is low",
            AdjustmentState::ElevatedFatigue(_) => "fatigue is above the expected range",
            _ => "readiness is below the expected range",
        };
        let mut message = format!(
            "Week {} of {}: {reason} ({}); power reduced to {:.0}%",
            context.week_number,
            context.total_weeks,
            band_description(band),
            power_multiplier * 100.0
        );
        if let Some(duration) = duration_multiplier {
            message.push_str(&format!(", duration to {:.0}%", duration * 100.0));
        }

        AdaptiveAdjustment {
            active: true,
            power_multiplier,
            duration_multiplier,
            message,
            state,
        }
    }

    fn fresh(&self, context: &LiveContext, severity: u8) -> AdaptiveAdjustment {
        let band = PercentileBand::from_severity(severity);
        let power_multiplier = self.config.fresh_power_multipliers[band_index(band)];
        AdaptiveAdjustment {
            active: true,
            power_multiplier,
            duration_multiplier: None,
            message: format!(
                "Week {} of {}: fatigue is low and readiness is high ({}); power raised to {:.0}%",
                context.week_number,
                context.total_weeks,
                band_description(band),
                power_multiplier * 100.0
            ),
            state: AdjustmentState::Fresh(band),
        }
    }
}

/// Index into the severity-ordered multiplier arrays
fn band_index(band: PercentileBand) -> usize {
    usize::from(band.severity().clamp(1, 3) - 1)
}

const fn band_description(band: PercentileBand) -> &'static str {
    match band {
        PercentileBand::Normal => "within P35-P65",
        PercentileBand::Mild => "beyond P35/P65",
        PercentileBand::Moderate => "beyond P25/P75",
        PercentileBand::Extreme => "beyond P15/P85",
    }
}
