// ABOUTME: Integration tests for adaptive session adjustment against simulated percentile tables
// ABOUTME: Covers strain and normal readings end to end, phase-aware thresholds and decision output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use cardiokinetic::intelligence::{
    AdaptiveConfig, AdaptiveEngine, CyclePhase, MonteCarloEngine, PhasePosition, SimulationReport,
};
use cardiokinetic::models::{
    AdjustmentState, LiveContext, PercentileBand, PercentileSet, PercentileTable, SessionStyle,
};

async fn twelve_week_report() -> SimulationReport {
    let program = common::linear_program(12, 200.0);
    let engine = MonteCarloEngine::new(common::seeded_config(10_000, 2025)).unwrap();
    engine.simulate(&program, None).await.unwrap()
}

fn reference_table() -> PercentileTable {
    PercentileTable::new(
        6,
        PercentileSet::new([30, 35, 40, 50, 55, 60]).unwrap(),
        PercentileSet::new([40, 45, 50, 60, 65, 70]).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_fatigue_at_p85_reduces_power() {
    common::init_test_logging();
    let report = twelve_week_report().await;
    let week = report.week(12).unwrap();

    let context = LiveContext::new(
        f64::from(week.table.fatigue().p85()),
        week.summary.readiness.p50,
        12,
        12,
        "Build",
    )
    .unwrap();
    let decision = AdaptiveEngine::default().evaluate(
        &context,
        Some(&week.table),
        &SessionStyle::SteadyState,
        None,
    );

    assert!(decision.active);
    assert!(decision.power_multiplier < 1.0);
    assert_eq!(decision.state.band(), Some(PercentileBand::Extreme));
    assert!(decision.adjusted_duration(45.0) < 45.0);
    assert!(decision.message.contains("Week 12 of 12"));
}

#[tokio::test]
async fn test_median_reading_is_inactive() {
    let report = twelve_week_report().await;
    let week = report.week(12).unwrap();

    let context = LiveContext::new(
        week.summary.fatigue.p50,
        week.summary.readiness.p50,
        12,
        12,
        "Build",
    )
    .unwrap();
    let decision = AdaptiveEngine::default().evaluate(
        &context,
        Some(&week.table),
        &SessionStyle::SteadyState,
        None,
    );

    assert!(!decision.active, "unexpected decision: {}", decision.message);
    assert_eq!(decision.state, AdjustmentState::NormalRange);
    assert!((decision.adjusted_power(200.0) - 200.0).abs() < f64::EPSILON);
}

#[test]
fn test_decisions_are_repeatable() {
    let engine = AdaptiveEngine::default();
    let table = reference_table();
    let context = LiveContext::new(58.0, 42.0, 6, 12, "Build").unwrap();

    let first = engine.evaluate(&context, Some(&table), &SessionStyle::Interval, None);
    let second = engine.evaluate(&context, Some(&table), &SessionStyle::Interval, None);
    assert_eq!(first, second);
    assert_eq!(first.state, AdjustmentState::CompoundStrain(PercentileBand::Moderate));
    assert!((first.power_multiplier - 0.87).abs() < 1e-9);
}

#[test]
fn test_suppressed_readiness_alone_triggers_strain() {
    let engine = AdaptiveEngine::default();
    let context = LiveContext::new(45.0, 48.0, 6, 12, "Build").unwrap();
    let decision = engine.evaluate(
        &context,
        Some(&reference_table()),
        &SessionStyle::SteadyState,
        None,
    );

    assert_eq!(
        decision.state,
        AdjustmentState::SuppressedReadiness(PercentileBand::Mild)
    );
    assert!((decision.power_multiplier - 0.95).abs() < 1e-9);
    assert_eq!(decision.duration_multiplier, Some(0.90));
}

#[test]
fn test_early_ascending_position_lowers_fatigue_thresholds() {
    let table = reference_table();
    let context = LiveContext::new(47.0, 55.0, 6, 12, "Build").unwrap();
    let early = PhasePosition::new(CyclePhase::Ascending, 0, 5);

    let engine = AdaptiveEngine::default();
    let without_phase = engine.evaluate(&context, Some(&table), &SessionStyle::SteadyState, None);
    assert!(!without_phase.active);

    // P65 moves from 50 to 42.5 at the start of a build
    let with_phase =
        engine.evaluate(&context, Some(&table), &SessionStyle::SteadyState, Some(&early));
    assert_eq!(
        with_phase.state,
        AdjustmentState::ElevatedFatigue(PercentileBand::Mild)
    );

    let phase_blind = AdaptiveEngine::new(AdaptiveConfig {
        phase_aware_thresholds: false,
        ..AdaptiveConfig::default()
    });
    let ignored =
        phase_blind.evaluate(&context, Some(&table), &SessionStyle::SteadyState, Some(&early));
    assert!(!ignored.active);
}

#[test]
fn test_fresh_reading_boosts_power_without_duration_change() {
    let engine = AdaptiveEngine::default();
    let context = LiveContext::new(20.0, 90.0, 6, 12, "Build").unwrap();
    let decision = engine.evaluate(
        &context,
        Some(&reference_table()),
        &SessionStyle::SteadyState,
        None,
    );

    assert_eq!(decision.state, AdjustmentState::Fresh(PercentileBand::Extreme));
    assert!((decision.power_multiplier - 1.05).abs() < 1e-9);
    assert_eq!(decision.duration_multiplier, None);
}

#[test]
fn test_decision_serializes_with_state_and_band() {
    let engine = AdaptiveEngine::default();
    let context = LiveContext::new(58.0, 55.0, 6, 12, "Build").unwrap();
    let decision = engine.evaluate(
        &context,
        Some(&reference_table()),
        &SessionStyle::Interval,
        None,
    );

    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["active"], true);
    assert_eq!(json["state"]["state"], "elevated_fatigue");
    assert_eq!(json["state"]["band"], "moderate");
    assert!(json["durationMultiplier"].is_null());
}

#[test]
fn test_live_context_rejects_week_outside_program() {
    assert!(LiveContext::new(50.0, 50.0, 0, 12, "Build").is_err());
    assert!(LiveContext::new(50.0, 50.0, 13, 12, "Build").is_err());
    assert!(LiveContext::new(f64::NAN, 50.0, 1, 12, "Build").is_err());
}
