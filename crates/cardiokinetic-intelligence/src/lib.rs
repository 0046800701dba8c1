// ABOUTME: Training-load intelligence for CardioKinetic programs
// ABOUTME: State model, session cost, Monte Carlo tables, phase classification and adaptive control
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

#![deny(unsafe_code)]

//! # CardioKinetic Intelligence
//!
//! Simulation and adaptation pipeline for periodized training programs.
//!
//! ## Components
//!
//! - **physiology**: Dual-compartment state model with fatigue and readiness scores
//! - **`session_cost`**: Session load from the critical-power or session-RPE model
//! - **`monte_carlo`**: Batched randomized runs producing per-week percentile tables
//! - **signal**: Smoothing, derivatives, percentiles, change points and extrema
//! - **`phase_classifier`**: Cycle phase and position-within-phase per week
//! - **adaptive**: Live reading plus percentile table to a session adjustment
//!
//! Data flows from session cost into the state model, through the Monte Carlo
//! engine, and from there either into the phase classifier or the adaptive engine.

/// Adaptive adjustment engine
pub mod adaptive;
/// Percentile table store
pub mod cache;
/// Intelligence configuration
pub mod config;
/// Score histograms and distribution summaries
pub mod distribution;
/// Monte Carlo batch engine
pub mod monte_carlo;
/// Signal-based phase classification
pub mod phase_classifier;
/// Model constants with sources
pub mod physiological_constants;
/// Dual-compartment physiological state model
pub mod physiology;
/// Session cost engine
pub mod session_cost;
/// Signal processing toolkit
pub mod signal;

pub use adaptive::AdaptiveEngine;
pub use cache::{InMemoryPercentileStore, PercentileCacheKey, PercentileStore};
pub use config::{
    AdaptiveConfig, ConfigError, IntelligenceConfig, PhysiologyConfig, RandomnessMode,
    SessionCostConfig, SimulationConfig,
};
pub use distribution::{MetricSummary, ScoreHistogram, WeekSummary};
pub use monte_carlo::{
    MonteCarloEngine, OverallStatistics, ProgressCallback, SimulationJob, SimulationReport,
    WeekResult,
};
pub use phase_classifier::{
    CyclePhase, PhaseClassifier, PhasePosition, PositionLabel, WeekAnalysis, WeekSignal,
};
pub use physiology::{PhysiologicalState, PhysiologyModel, SessionHistory};
pub use session_cost::{
    AthleteProfile, SessionCostAlgorithm, SessionCostEngine, SessionLoadInput,
};
pub use signal::{Extrema, SignalProcessor};
