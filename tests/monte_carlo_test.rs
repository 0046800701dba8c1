// ABOUTME: Integration tests for the Monte Carlo percentile engine
// ABOUTME: Covers load response, determinism, convergence, progress reporting, cancellation and the store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use cardiokinetic::errors::ErrorCode;
use cardiokinetic::intelligence::{
    InMemoryPercentileStore, MonteCarloEngine, PercentileCacheKey, PercentileStore,
    ProgressCallback, RandomnessMode, SimulationJob, SimulationReport,
};
use cardiokinetic::models::{PercentileSet, PercentileTable};
use std::sync::{Arc, Mutex};

#[tokio::test]
async fn test_rising_load_raises_median_fatigue() {
    common::init_test_logging();
    let program = common::linear_program(12, 200.0);
    let engine = MonteCarloEngine::new(common::config(10_000, RandomnessMode::Stochastic)).unwrap();

    let report = engine.simulate(&program, None).await.unwrap();

    assert_eq!(report.weeks.len(), 12);
    assert_eq!(report.runs, 10_000);
    let first = report.week(1).unwrap();
    let last = report.week(12).unwrap();
    assert!(
        last.summary.fatigue.p50 > first.summary.fatigue.p50,
        "week 12 median {} should exceed week 1 median {}",
        last.summary.fatigue.p50,
        first.summary.fatigue.p50
    );
    assert!(last.summary.readiness.p50 <= first.summary.readiness.p50);
}

#[tokio::test]
async fn test_tables_are_monotonic_and_bounded() {
    let program = common::linear_program(8, 250.0);
    let engine = MonteCarloEngine::new(common::seeded_config(2_000, 5)).unwrap();
    let report = engine.simulate(&program, None).await.unwrap();

    for week in &report.weeks {
        assert!(week.table.is_monotonic());
        let summary = &week.summary;
        assert!(summary.fatigue.min <= summary.fatigue.max);
        assert!(summary.fatigue.max <= 100 && summary.readiness.max <= 100);
        assert!(f64::from(week.table.fatigue().p15()) >= f64::from(summary.fatigue.min));
        assert!(f64::from(week.table.fatigue().p85()) <= f64::from(summary.fatigue.max));
    }
    let week_numbers: Vec<u32> = report.weeks.iter().map(|w| w.table.week_number()).collect();
    assert_eq!(week_numbers, (1..=8).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_deterministic_mode_reproduces_tables() {
    let program = common::linear_program(6, 200.0);
    let engine = MonteCarloEngine::new(common::seeded_config(1_500, 1234)).unwrap();

    let first = engine.simulate(&program, None).await.unwrap();
    let second = engine.simulate(&program, None).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.base_seed, 1234);
    assert_eq!(first.randomness, RandomnessMode::Deterministic { seed: 1234 });

    let other_seed = MonteCarloEngine::new(common::seeded_config(1_500, 4321))
        .unwrap()
        .simulate(&program, None)
        .await
        .unwrap();
    assert_ne!(first.weeks, other_seed.weeks);
}

#[test]
fn test_blocking_matches_async_for_same_seed() {
    let program = common::linear_program(4, 180.0);
    let engine = MonteCarloEngine::new(common::seeded_config(800, 99)).unwrap();

    let blocking = engine.simulate_blocking(&program, None).unwrap();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let awaited = runtime.block_on(engine.simulate(&program, None)).unwrap();
    assert_eq!(blocking, awaited);
}

#[test]
fn test_overall_statistics_track_program_extremes() {
    let engine = MonteCarloEngine::new(common::seeded_config(2_000, 17)).unwrap();
    let report = engine
        .simulate_blocking(&common::linear_program(8, 220.0), None)
        .unwrap();
    let overall = report.overall().unwrap();

    let peak = report.weeks.iter().map(|week| week.summary.fatigue.max).max().unwrap();
    let peak_week = report
        .weeks
        .iter()
        .find(|week| week.summary.fatigue.max == peak)
        .unwrap()
        .summary
        .week_number;
    assert_eq!((overall.peak_fatigue, overall.peak_fatigue_week), (peak, peak_week));

    let lowest = report.weeks.iter().map(|week| week.summary.readiness.min).min().unwrap();
    let lowest_week = report
        .weeks
        .iter()
        .find(|week| week.summary.readiness.min == lowest)
        .unwrap()
        .summary
        .week_number;
    assert_eq!(
        (overall.lowest_readiness, overall.lowest_readiness_week),
        (lowest, lowest_week)
    );

    let mean_fatigue: f64 =
        report.weeks.iter().map(|week| week.summary.fatigue.mean).sum::<f64>() / 8.0;
    assert!((overall.average_fatigue - mean_fatigue).abs() < 1e-9);
    assert!((0.0..=100.0).contains(&overall.average_readiness));

    let empty = SimulationReport {
        weeks: Vec::new(),
        ..report
    };
    assert!(empty.overall().is_none());
}

#[tokio::test]
async fn test_stochastic_runs_converge_with_large_n() {
    let program = common::linear_program(8, 220.0);
    let engine = MonteCarloEngine::new(common::config(20_000, RandomnessMode::Stochastic)).unwrap();

    let first = engine.simulate(&program, None).await.unwrap();
    let second = engine.simulate(&program, None).await.unwrap();
    assert_ne!(first.base_seed, second.base_seed);

    for (a, b) in first.weeks.iter().zip(&second.weeks) {
        assert!((a.summary.fatigue.mean - b.summary.fatigue.mean).abs() < 1.0);
        assert!((a.summary.readiness.mean - b.summary.readiness.mean).abs() < 1.0);
        assert!((a.summary.fatigue.p50 - b.summary.fatigue.p50).abs() <= 2.0);
    }
}

#[tokio::test]
async fn test_progress_is_monotonic_and_completes_once() {
    let program = common::linear_program(4, 200.0);
    let mut config = common::seeded_config(2_500, 3);
    config.simulation.batch_size = 1_000;
    let engine = MonteCarloEngine::new(config).unwrap();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: &ProgressCallback = &move |fraction: f64| sink.lock().unwrap().push(fraction);
    engine.simulate(&program, Some(callback)).await.unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen, vec![0.4, 0.8, 1.0]);
    assert!(seen.windows(2).all(|pair| pair[1] >= pair[0]));
    assert_eq!(seen.iter().filter(|fraction| **fraction >= 1.0).count(), 1);
}

#[test]
fn test_abandoned_job_stops_between_batches() {
    let program = common::linear_program(4, 200.0);
    let mut config = common::seeded_config(3_000, 8);
    config.simulation.batch_size = 1_000;

    let mut job = SimulationJob::new(&program, &config).unwrap();
    assert!((job.run_next_batch() - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(job.completed_runs(), 1_000);
    assert!(!job.is_complete());

    let error = job.finish().unwrap_err();
    assert_eq!(error.code, ErrorCode::InternalError);
}

#[tokio::test]
async fn test_invalid_program_is_rejected() {
    let mut program = common::linear_program(4, 200.0);
    program.weeks[2].power_multiplier = -0.5;
    let engine = MonteCarloEngine::new(common::seeded_config(100, 1)).unwrap();
    assert!(engine.simulate(&program, None).await.is_err());

    let mut no_power = common::linear_program(4, 200.0);
    no_power.base_power = 0.0;
    assert!(engine.simulate(&no_power, None).await.is_err());
}

#[tokio::test]
async fn test_cached_simulation_reuses_stored_tables() {
    let program = common::linear_program(6, 200.0);
    let engine = MonteCarloEngine::new(common::seeded_config(1_000, 21)).unwrap();
    let store = InMemoryPercentileStore::new(8);
    let key = PercentileCacheKey::new(&program.template_id, program.week_count());

    let simulated = engine
        .simulate_cached(&store, &key, &program, None)
        .await
        .unwrap();
    assert_eq!(simulated.len(), 6);
    assert_eq!(store.get(&key).await.unwrap(), Some(simulated.clone()));

    // A second call is served from the store and reports completion once
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: &ProgressCallback = &move |fraction: f64| sink.lock().unwrap().push(fraction);
    let cached = engine
        .simulate_cached(&store, &key, &program, Some(callback))
        .await
        .unwrap();
    assert_eq!(cached, simulated);
    assert_eq!(*seen.lock().unwrap(), vec![1.0]);
}

#[tokio::test]
async fn test_cached_simulation_replaces_unusable_entry() {
    let program = common::linear_program(3, 200.0);
    let engine = MonteCarloEngine::new(common::seeded_config(500, 2)).unwrap();
    let store = InMemoryPercentileStore::new(8);
    let key = PercentileCacheKey::new(&program.template_id, 3);

    let set = PercentileSet::new([10, 20, 30, 40, 50, 60]).unwrap();
    let stale = vec![PercentileTable::new(1, set, set).unwrap()];
    store.put(&key, stale).await.unwrap();

    let tables = engine
        .simulate_cached(&store, &key, &program, None)
        .await
        .unwrap();
    assert_eq!(tables.len(), 3);
    assert_eq!(store.get(&key).await.unwrap().unwrap().len(), 3);

    let wrong_length = PercentileCacheKey::new(&program.template_id, 5);
    let error = engine
        .simulate_cached(&store, &wrong_length, &program, None)
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}
