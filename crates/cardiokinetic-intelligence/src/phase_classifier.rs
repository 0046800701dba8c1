// ABOUTME: Periodization phase classifier over simulated fatigue trajectories
// ABOUTME: Assigns ascending/peak/descending/trough phases, cycle indices and positions within phases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

//! # Phase Classifier
//!
//! Each week gets one of four phases. Decisions are made in priority order:
//!
//! 1. Declarative week metadata: recovery focus or a "recovery"/"deload" label
//!    means trough, a "taper" label means descending.
//! 2. Local extrema of the smoothed fatigue median.
//! 3. Sign of the smoothed median's velocity outside a dead band.
//! 4. For flat weeks, a change point takes the direction of the acceleration;
//!    otherwise the level decides (upper quartile peak, lower quartile trough)
//!    and anything else inherits the previous week's phase.

use crate::monte_carlo::SimulationReport;
use crate::physiological_constants::phase;
use crate::signal::{Extrema, SignalProcessor};
use cardiokinetic_core::models::{ResolvedProgram, TrainingFocus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position in a periodization cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    /// Load building
    Ascending,
    /// Highest load of the cycle
    Peak,
    /// Load coming off
    Descending,
    /// Lowest load of the cycle
    Trough,
}

impl CyclePhase {
    /// Get phase name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Peak => "peak",
            Self::Descending => "descending",
            Self::Trough => "trough",
        }
    }

    /// Map a free-text phase label to a phase, if it names one
    ///
    /// The label is split into alphanumeric words and each word is compared
    /// whole, so "interest" does not read as "rest".
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let words: Vec<String> = label
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .map(str::to_lowercase)
            .collect();
        let names_any = |vocabulary: &[&str]| {
            words
                .iter()
                .any(|word| vocabulary.contains(&word.as_str()))
        };

        if names_any(&["recovery", "recover", "deload", "rest", "trough", "transition"]) {
            Some(Self::Trough)
        } else if names_any(&["taper", "tapering", "descend", "descending", "unload", "unloading"]) {
            Some(Self::Descending)
        } else if names_any(&["peak", "peaking", "race", "racing", "max"]) {
            Some(Self::Peak)
        } else if names_any(&[
            "build",
            "building",
            "ascend",
            "ascending",
            "base",
            "foundation",
            "progression",
            "progressive",
            "load",
            "loading",
            "overload",
            "intensity",
            "intensification",
            "density",
        ]) {
            Some(Self::Ascending)
        } else {
            None
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coarse position within a phase run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionLabel {
    /// First third of the run
    Early,
    /// Middle of the run
    Mid,
    /// Last third of the run
    Late,
}

impl PositionLabel {
    /// Label for a position ratio in `[0, 1]`
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < phase::EARLY_POSITION_LIMIT {
            Self::Early
        } else if ratio > phase::LATE_POSITION_LIMIT {
            Self::Late
        } else {
            Self::Mid
        }
    }
}

/// Where a week sits inside its contiguous same-phase run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhasePosition {
    /// Phase of the run
    pub phase: CyclePhase,
    /// 0-based index within the run
    pub index_in_run: usize,
    /// Weeks in the run
    pub run_length: usize,
    /// `index / (length - 1)`, or 0.5 for a single-week run
    pub ratio: f64,
    /// Early, mid or late
    pub label: PositionLabel,
}

impl PhasePosition {
    /// Position of `index_in_run` within a run of `run_length` weeks
    #[must_use]
    pub fn new(phase: CyclePhase, index_in_run: usize, run_length: usize) -> Self {
        let ratio = if run_length <= 1 {
            0.5
        } else {
            (index_in_run.min(run_length - 1) as f64) / ((run_length - 1) as f64)
        };
        Self {
            phase,
            index_in_run,
            run_length: run_length.max(1),
            ratio,
            label: PositionLabel::from_ratio(ratio),
        }
    }
}

/// Per-week classifier input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSignal {
    /// 1-based week
    pub week_number: u32,
    /// Median simulated end-of-week fatigue
    pub fatigue_median: f64,
    /// Low extreme (P15) of simulated fatigue
    pub fatigue_low: f64,
    /// High extreme (P85) of simulated fatigue
    pub fatigue_high: f64,
    /// Declared focus
    pub focus: TrainingFocus,
    /// Declared phase label
    pub phase_label: String,
}

/// Classifier output for one week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekAnalysis {
    /// 1-based week
    pub week_number: u32,
    /// Median simulated fatigue
    pub fatigue_median: f64,
    /// P15 of simulated fatigue
    pub fatigue_low: f64,
    /// P85 of simulated fatigue
    pub fatigue_high: f64,
    /// Smoothed median
    pub smoothed_median: f64,
    /// First derivative of the smoothed median
    pub velocity: f64,
    /// Second derivative of the smoothed median
    pub acceleration: f64,
    /// Assigned phase
    pub phase: CyclePhase,
    /// Number of completed descending-to-ascending transitions before this week
    pub cycle_index: u32,
    /// Local peak of the smoothed median
    pub is_local_peak: bool,
    /// Local trough of the smoothed median
    pub is_local_trough: bool,
    /// Trend shift detected at this week
    pub is_change_point: bool,
    /// Position within the week's phase run
    pub position: PhasePosition,
}

/// Phase classification over week signals
pub struct PhaseClassifier;

impl PhaseClassifier {
    /// Build classifier input from a simulation report and the program it simulated
    #[must_use]
    pub fn signals_from_report(program: &ResolvedProgram, report: &SimulationReport) -> Vec<WeekSignal> {
        program
            .weeks
            .iter()
            .zip(report.weeks.iter())
            .map(|(week, simulated)| WeekSignal {
                week_number: week.week_number,
                fatigue_median: simulated.summary.fatigue.p50,
                fatigue_low: f64::from(simulated.table.fatigue().p15()),
                fatigue_high: f64::from(simulated.table.fatigue().p85()),
                focus: week.focus,
                phase_label: week.phase_name.clone(),
            })
            .collect()
    }

    /// Classify every week
    #[must_use]
    pub fn classify(weeks: &[WeekSignal]) -> Vec<WeekAnalysis> {
        if weeks.is_empty() {
            return Vec::new();
        }

        let medians: Vec<f64> = weeks.iter().map(|week| week.fatigue_median).collect();
        let features = SeriesFeatures::extract(&medians);

        let mut phases: Vec<CyclePhase> = Vec::with_capacity(weeks.len());
        for (index, week) in weeks.iter().enumerate() {
            let assigned = declared_phase(week)
                .or_else(|| features.phase_at(index))
                .or_else(|| phases.last().copied())
                .unwrap_or(CyclePhase::Ascending);
            phases.push(assigned);
        }

        let positions = Self::phase_positions(&phases);
        let cycles = cycle_indices(&phases);

        weeks
            .iter()
            .enumerate()
            .map(|(index, week)| WeekAnalysis {
                week_number: week.week_number,
                fatigue_median: week.fatigue_median,
                fatigue_low: week.fatigue_low,
                fatigue_high: week.fatigue_high,
                smoothed_median: features.smoothed[index],
                velocity: features.velocity[index],
                acceleration: features.acceleration[index],
                phase: phases[index],
                cycle_index: cycles[index],
                is_local_peak: features.extrema.is_peak(index),
                is_local_trough: features.extrema.is_trough(index),
                is_change_point: features.change_points.contains(&index),
                position: positions[index],
            })
            .collect()
    }

    /// Positions within contiguous same-phase runs
    ///
    /// The ratio restarts at 0 for every new run; single-week runs sit at 0.5.
    #[must_use]
    pub fn phase_positions(phases: &[CyclePhase]) -> Vec<PhasePosition> {
        let mut positions = Vec::with_capacity(phases.len());
        let mut start = 0;
        while start < phases.len() {
            let current = phases[start];
            let length = phases[start..]
                .iter()
                .take_while(|candidate| **candidate == current)
                .count();
            positions.extend((0..length).map(|index| PhasePosition::new(current, index, length)));
            start += length;
        }
        positions
    }

    /// Shift a percentile breakpoint by phase position
    ///
    /// Ascending weeks move by `(ratio - 0.5) x 15`, clamped to `[5, 95]`: early
    /// weeks get lower thresholds, late weeks higher ones. Other phases are
    /// returned unchanged.
    #[must_use]
    pub fn adjust_threshold(value: f64, phase: CyclePhase, ratio: f64) -> f64 {
        if phase != CyclePhase::Ascending {
            return value;
        }
        let ratio = if ratio.is_finite() { ratio } else { 0.5 };
        let shifted = (ratio - 0.5).mul_add(phase::THRESHOLD_SHIFT_SCALE, value);
        if shifted.is_finite() {
            shifted.clamp(phase::MIN_ADJUSTED_THRESHOLD, phase::MAX_ADJUSTED_THRESHOLD)
        } else {
            phase::MIN_ADJUSTED_THRESHOLD
        }
    }

    /// Expected fatigue late in a rising phase
    ///
    /// Ascending weeks with positive velocity scale the baseline by
    /// `(1 + 0.25 ratio^2)(1 + 0.05 velocity^1.5)`, capped at 100. Anything
    /// else returns the baseline.
    #[must_use]
    pub fn cumulative_fatigue_estimate(
        baseline: f64,
        phase: CyclePhase,
        ratio: f64,
        velocity: f64,
    ) -> f64 {
        if phase != CyclePhase::Ascending || !(velocity.is_finite() && velocity > 0.0) {
            return baseline;
        }
        let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.5 };
        let position_factor = (phase::POSITION_FATIGUE_FACTOR * ratio).mul_add(ratio, 1.0);
        let velocity_factor = phase::VELOCITY_FATIGUE_FACTOR.mul_add(velocity.powf(1.5), 1.0);
        (baseline * position_factor * velocity_factor).min(100.0)
    }
}

/// Derived series used for signal-based phase decisions
struct SeriesFeatures {
    smoothed: Vec<f64>,
    velocity: Vec<f64>,
    acceleration: Vec<f64>,
    extrema: Extrema,
    change_points: Vec<usize>,
    upper_quartile: f64,
    lower_quartile: f64,
}

impl SeriesFeatures {
    fn extract(medians: &[f64]) -> Self {
        let smoothed = SignalProcessor::smooth(medians, SignalProcessor::local_window(medians.len()));
        let velocity = SignalProcessor::derivative(&smoothed);
        let acceleration = SignalProcessor::derivative(&velocity);
        let extrema = SignalProcessor::find_extrema(&smoothed);

        let threshold = (phase::CHANGE_POINT_STD_MULTIPLIER * SignalProcessor::std_dev(&smoothed))
            .max(phase::MIN_CHANGE_POINT_THRESHOLD);
        let change_points = SignalProcessor::detect_change_points(&smoothed, threshold);

        Self {
            upper_quartile: SignalProcessor::percentile(&smoothed, 75.0),
            lower_quartile: SignalProcessor::percentile(&smoothed, 25.0),
            smoothed,
            velocity,
            acceleration,
            extrema,
            change_points,
        }
    }

    /// Phase implied by the signal alone, if any
    fn phase_at(&self, index: usize) -> Option<CyclePhase> {
        if self.extrema.is_peak(index) {
            return Some(CyclePhase::Peak);
        }
        if self.extrema.is_trough(index) {
            return Some(CyclePhase::Trough);
        }
        if let Some(trend) = trend_phase(self.velocity[index]) {
            return Some(trend);
        }
        if self.change_points.contains(&index) {
            if let Some(trend) = trend_phase(self.acceleration[index]) {
                return Some(trend);
            }
        }
        self.level_phase(self.smoothed[index])
    }

    fn level_phase(&self, level: f64) -> Option<CyclePhase> {
        if self.upper_quartile <= self.lower_quartile {
            None
        } else if level >= self.upper_quartile {
            Some(CyclePhase::Peak)
        } else if level <= self.lower_quartile {
            Some(CyclePhase::Trough)
        } else {
            None
        }
    }
}

/// Recovery focus or a label naming a trough or descending phase
///
/// Peak and ascending labels are left to the load signal.
fn declared_phase(week: &WeekSignal) -> Option<CyclePhase> {
    if week.focus == TrainingFocus::Recovery {
        return Some(CyclePhase::Trough);
    }
    CyclePhase::from_label(&week.phase_label)
        .filter(|phase| matches!(phase, CyclePhase::Trough | CyclePhase::Descending))
}

fn trend_phase(slope: f64) -> Option<CyclePhase> {
    if slope > phase::VELOCITY_DEAD_BAND {
        Some(CyclePhase::Ascending)
    } else if slope < -phase::VELOCITY_DEAD_BAND {
        Some(CyclePhase::Descending)
    } else {
        None
    }
}

fn cycle_indices(phases: &[CyclePhase]) -> Vec<u32> {
    let mut cycle = 0_u32;
    let mut last_run_phase: Option<CyclePhase> = None;
    let mut indices = Vec::with_capacity(phases.len());

    for (index, current) in phases.iter().enumerate() {
        let starts_run = index == 0 || phases[index - 1] != *current;
        if starts_run {
            if *current == CyclePhase::Ascending
                && matches!(
                    last_run_phase,
                    Some(CyclePhase::Descending | CyclePhase::Trough)
                )
            {
                cycle += 1;
            }
            last_run_phase = Some(*current);
        }
        indices.push(cycle);
    }

    indices
}
