// ABOUTME: Physiological and statistical constants for the load model, cost engine and controllers
// ABOUTME: Grouped by component; configuration defaults are taken from here
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

//! Physiological constants used throughout the simulation and adaptation engines
//!
//! The dual-compartment decay rates follow the exponentially weighted moving
//! average convention `alpha = 2 / (N + 1)` with the classic 7-day (acute) and
//! 42-day (chronic) windows.

/// Dual-compartment state model
///
/// References:
/// - Banister, E.W. (1991). Modeling elite athletic performance
/// - Coggan, A. (2003). Training and Racing Using a Power Meter
pub mod state_model {
    /// Acute window in days
    pub const ACUTE_WINDOW_DAYS: f64 = 7.0;

    /// Chronic window in days
    pub const CHRONIC_WINDOW_DAYS: f64 = 42.0;

    /// Metabolic decay rate per day, `2 / (7 + 1)`
    pub const METABOLIC_DECAY_RATE: f64 = 2.0 / (ACUTE_WINDOW_DAYS + 1.0);

    /// Structural decay rate per day, `2 / (42 + 1)`
    pub const STRUCTURAL_DECAY_RATE: f64 = 2.0 / (CHRONIC_WINDOW_DAYS + 1.0);

    /// Debt added to the metabolic compartment per unit of load
    pub const METABOLIC_GAIN: f64 = 1.0;

    /// Debt added to the structural compartment per unit of load
    pub const STRUCTURAL_GAIN: f64 = 0.2;

    /// Metabolic compartment capacity (load units)
    pub const METABOLIC_CAPACITY: f64 = 150.0;

    /// Structural compartment capacity (load units)
    pub const STRUCTURAL_CAPACITY: f64 = 200.0;

    /// Capacity used when a configured capacity is zero or negative
    pub const MIN_CAPACITY: f64 = 1.0;

    /// Lowest daily recovery efficiency
    pub const MIN_RECOVERY_EFFICIENCY: f64 = 0.7;

    /// Highest daily recovery efficiency
    pub const MAX_RECOVERY_EFFICIENCY: f64 = 1.3;
}

/// Fatigue and readiness scoring
pub mod scoring {
    /// Metabolic share of the fatigue blend
    pub const FATIGUE_METABOLIC_WEIGHT: f64 = 0.6;

    /// Exponent on metabolic freshness in the readiness curve
    pub const READINESS_METABOLIC_EXPONENT: f64 = 1.5;

    /// Exponent on structural debt in the readiness curve
    pub const READINESS_STRUCTURAL_EXPONENT: f64 = 1.2;

    /// Maximum fraction of readiness removed by structural debt
    pub const READINESS_STRUCTURAL_WEIGHT: f64 = 0.5;

    /// Upper bound for both scores
    pub const MAX_SCORE: f64 = 100.0;
}

/// Detraining penalty applied to readiness
///
/// Reference: Mujika, I. & Padilla, S. (2000). Detraining: loss of training-induced
/// physiological and performance adaptations
pub mod detraining {
    /// Session days remembered for the penalty
    pub const HISTORY_LENGTH: usize = 5;

    /// Days without penalty after a session
    pub const GRACE_DAYS: f64 = 3.0;

    /// Largest readiness reduction in score points
    pub const MAX_PENALTY: f64 = 25.0;

    /// Time constant of the penalty curve in days
    pub const TIME_CONSTANT_DAYS: f64 = 7.0;
}

/// Critical power session cost model
///
/// References:
/// - Monod, H. & Scherrer, J. (1965). The work capacity of a synergic muscular group
/// - Skiba, P.F. et al. (2012). Modeling the expenditure and reconstitution of work capacity above critical power
pub mod session_cost {
    /// Cost of one hour at critical power
    pub const COST_PER_HOUR_AT_CP: f64 = 100.0;

    /// Highest intensity factor used in the cost formula
    pub const MAX_INTENSITY_FACTOR: f64 = 3.0;

    /// Rest segments ride at this fraction of critical power
    pub const REST_POWER_FRACTION: f64 = 0.4;

    /// Fraction of the sub-CP power gap that reconstitutes W' during rest
    pub const W_PRIME_RECOVERY_EFFICIENCY: f64 = 0.5;

    /// Scale of the anaerobic surcharge
    pub const ANAEROBIC_COST_SCALE: f64 = 25.0;

    /// Exponent of the anaerobic surcharge
    pub const ANAEROBIC_COST_EXPONENT: f64 = 1.5;

    /// Largest net W' depletion, in multiples of W'
    pub const MAX_W_PRIME_DEPLETION: f64 = 5.0;

    /// Default anaerobic work capacity in joules
    pub const DEFAULT_W_PRIME_JOULES: f64 = 15_000.0;

    /// Critical power used when the estimate is zero or negative
    pub const MIN_CRITICAL_POWER_WATTS: f64 = 50.0;

    /// W' used when the estimate is zero or negative
    pub const MIN_W_PRIME_JOULES: f64 = 1_000.0;
}

/// Session-RPE load model
///
/// Reference: Foster, C. et al. (2001). A new approach to monitoring exercise training
pub mod session_rpe {
    /// Exponent on RPE
    pub const RPE_EXPONENT: f64 = 1.5;

    /// Exponent on duration in minutes
    pub const DURATION_EXPONENT: f64 = 0.75;

    /// Exponent on the power ratio
    pub const POWER_RATIO_EXPONENT: f64 = 0.5;

    /// Lowest power ratio used
    pub const MIN_POWER_RATIO: f64 = 0.25;

    /// Highest power ratio used
    pub const MAX_POWER_RATIO: f64 = 4.0;

    /// Overall scale
    pub const LOAD_SCALE: f64 = 0.3;
}

/// Monte Carlo simulation defaults
pub mod simulation {
    /// Default number of simulated programs
    pub const DEFAULT_RUNS: usize = 10_000;

    /// Default runs per batch between cooperative yields
    pub const DEFAULT_BATCH_SIZE: usize = 5_000;

    /// Largest accepted run count
    pub const MAX_RUNS: usize = 1_000_000;

    /// Days in a simulated week
    pub const DAYS_PER_WEEK: usize = 7;

    /// Fewest sessions per simulated week
    pub const MIN_SESSIONS_PER_WEEK: usize = 2;

    /// Most sessions per simulated week
    pub const MAX_SESSIONS_PER_WEEK: usize = 4;

    /// Relative power jitter per session
    pub const POWER_JITTER: f64 = 0.05;

    /// Absolute RPE jitter per session
    pub const RPE_JITTER: f64 = 0.5;
}

/// Signal processing parameters
pub mod signal {
    /// Local smoothing window as a fraction of series length
    pub const LOCAL_WINDOW_FRACTION: f64 = 0.20;

    /// Meso smoothing window as a fraction of series length
    pub const MESO_WINDOW_FRACTION: f64 = 0.40;

    /// Smallest local window
    pub const MIN_LOCAL_WINDOW: usize = 2;

    /// Smallest meso window
    pub const MIN_MESO_WINDOW: usize = 3;

    /// CUSUM drift as a fraction of the detection threshold
    pub const CUSUM_DRIFT_FRACTION: f64 = 0.3;

    /// Margin by which an extremum must exceed both neighbours
    pub const EXTREMA_MARGIN: f64 = 2.0;
}

/// Phase classification parameters
pub mod phase {
    /// Velocity magnitude below which a week counts as flat
    pub const VELOCITY_DEAD_BAND: f64 = 0.5;

    /// Lowest change-point threshold
    pub const MIN_CHANGE_POINT_THRESHOLD: f64 = 2.0;

    /// Change-point threshold in standard deviations of the median series
    pub const CHANGE_POINT_STD_MULTIPLIER: f64 = 1.0;

    /// Position ratios below this are "early"
    pub const EARLY_POSITION_LIMIT: f64 = 1.0 / 3.0;

    /// Position ratios above this are "late"
    pub const LATE_POSITION_LIMIT: f64 = 2.0 / 3.0;

    /// Threshold shift per unit of position ratio away from the midpoint
    pub const THRESHOLD_SHIFT_SCALE: f64 = 15.0;

    /// Lowest adjusted threshold
    pub const MIN_ADJUSTED_THRESHOLD: f64 = 5.0;

    /// Highest adjusted threshold
    pub const MAX_ADJUSTED_THRESHOLD: f64 = 95.0;

    /// Fatigue growth per squared position ratio
    pub const POSITION_FATIGUE_FACTOR: f64 = 0.25;

    /// Fatigue growth per velocity^1.5
    pub const VELOCITY_FATIGUE_FACTOR: f64 = 0.05;
}

/// Adaptive adjustment multipliers indexed by severity (mild, moderate, extreme)
pub mod adaptive {
    /// Power multipliers under strain
    pub const STRAIN_POWER_MULTIPLIERS: [f64; 3] = [0.95, 0.90, 0.85];

    /// Extra power reduction when fatigue and readiness both flag
    pub const COMPOUND_STRAIN_REDUCTION: f64 = 0.03;

    /// Duration multipliers for volume-oriented styles under strain
    pub const STRAIN_DURATION_MULTIPLIERS: [f64; 3] = [0.90, 0.80, 0.70];

    /// Power multipliers when fresh
    pub const FRESH_POWER_MULTIPLIERS: [f64; 3] = [1.02, 1.04, 1.05];
}
