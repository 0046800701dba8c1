// ABOUTME: Integration tests for signal-based phase classification
// ABOUTME: Covers rising and falling series, declared phases, positions and threshold shifts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use cardiokinetic::intelligence::{
    CyclePhase, MonteCarloEngine, PhaseClassifier, PositionLabel, WeekSignal,
};
use cardiokinetic::models::TrainingFocus;

fn signals(medians: &[f64], labels: &[&str]) -> Vec<WeekSignal> {
    medians
        .iter()
        .zip(labels)
        .enumerate()
        .map(|(index, (median, label))| WeekSignal {
            week_number: index as u32 + 1,
            fatigue_median: *median,
            fatigue_low: median - 10.0,
            fatigue_high: median + 10.0,
            focus: TrainingFocus::Volume,
            phase_label: (*label).to_owned(),
        })
        .collect()
}

#[test]
fn test_rise_and_fall_is_ascending_peak_descending() {
    common::init_test_logging();
    let medians = [10.0, 20.0, 30.0, 40.0, 50.0, 40.0, 30.0, 20.0];
    let analyses = PhaseClassifier::classify(&signals(&medians, &["Block"; 8]));

    let phases: Vec<CyclePhase> = analyses.iter().map(|week| week.phase).collect();
    assert_eq!(
        phases,
        vec![
            CyclePhase::Ascending,
            CyclePhase::Ascending,
            CyclePhase::Ascending,
            CyclePhase::Ascending,
            CyclePhase::Peak,
            CyclePhase::Descending,
            CyclePhase::Descending,
            CyclePhase::Descending,
        ]
    );
    assert!(analyses[4].is_local_peak);
    assert!(analyses[..4].iter().all(|week| week.velocity > 0.0));
    assert!(analyses[5..].iter().all(|week| week.velocity < 0.0));

    // Positions restart for every run
    assert_eq!(analyses[0].position.label, PositionLabel::Early);
    assert_eq!(analyses[3].position.label, PositionLabel::Late);
    assert!((analyses[4].position.ratio - 0.5).abs() < 1e-12);
    assert_eq!(analyses[5].position.index_in_run, 0);
    assert_eq!(analyses[6].position.label, PositionLabel::Mid);
    assert!(analyses.iter().all(|week| week.cycle_index == 0));
}

#[test]
fn test_six_ascending_weeks_split_into_thirds() {
    let positions = PhaseClassifier::phase_positions(&[CyclePhase::Ascending; 6]);

    let labels: Vec<PositionLabel> = positions.iter().map(|position| position.label).collect();
    assert_eq!(
        labels,
        vec![
            PositionLabel::Early,
            PositionLabel::Early,
            PositionLabel::Mid,
            PositionLabel::Mid,
            PositionLabel::Late,
            PositionLabel::Late,
        ]
    );
    for (index, position) in positions.iter().enumerate() {
        assert_eq!(position.index_in_run, index);
        assert_eq!(position.run_length, 6);
        assert!((position.ratio - index as f64 / 5.0).abs() < 1e-12);
    }
}

#[test]
fn test_label_words_are_not_matched_inside_other_words() {
    let medians = [10.0, 20.0, 30.0, 40.0];
    let labels = ["Build", "Points of interest", "Build", "Build"];
    let analyses = PhaseClassifier::classify(&signals(&medians, &labels));
    assert!(analyses.iter().all(|week| week.phase == CyclePhase::Ascending));

    let rest = ["Build", "Active rest", "Build", "Build"];
    let analyses = PhaseClassifier::classify(&signals(&medians, &rest));
    assert_eq!(analyses[1].phase, CyclePhase::Trough);
}

#[test]
fn test_declared_recovery_week_starts_new_cycle() {
    let medians = [10.0, 20.0, 30.0, 15.0, 20.0, 30.0, 40.0];
    let labels = ["Build", "Build", "Build", "Recovery", "Build", "Build", "Build"];
    let analyses = PhaseClassifier::classify(&signals(&medians, &labels));

    assert_eq!(analyses[3].phase, CyclePhase::Trough);
    assert!(analyses[4..]
        .iter()
        .all(|week| week.phase == CyclePhase::Ascending));
    assert_eq!(analyses[3].cycle_index, 0);
    assert_eq!(analyses[6].cycle_index, 1);
}

#[test]
fn test_recovery_focus_and_taper_label_override_signal() {
    let mut weeks = signals(&[10.0, 20.0, 30.0, 40.0, 50.0], &["Build", "Build", "Build", "Taper", "Build"]);
    weeks[4].focus = TrainingFocus::Recovery;
    let analyses = PhaseClassifier::classify(&weeks);

    assert_eq!(analyses[3].phase, CyclePhase::Descending);
    assert_eq!(analyses[4].phase, CyclePhase::Trough);
}

#[test]
fn test_empty_and_flat_inputs() {
    assert!(PhaseClassifier::classify(&[]).is_empty());

    // No trend, extrema or spread: every week falls back to ascending
    let analyses = PhaseClassifier::classify(&signals(&[25.0; 6], &["Block"; 6]));
    assert!(analyses
        .iter()
        .all(|week| week.phase == CyclePhase::Ascending));
}

#[test]
fn test_threshold_shift_follows_ascending_position() {
    let early = PhaseClassifier::adjust_threshold(50.0, CyclePhase::Ascending, 0.0);
    let late = PhaseClassifier::adjust_threshold(50.0, CyclePhase::Ascending, 1.0);
    assert!((early - 42.5).abs() < 1e-12);
    assert!((late - 57.5).abs() < 1e-12);

    assert!((PhaseClassifier::adjust_threshold(3.0, CyclePhase::Ascending, 0.0) - 5.0).abs() < 1e-12);
    assert!((PhaseClassifier::adjust_threshold(90.0, CyclePhase::Ascending, 1.0) - 95.0).abs() < 1e-12);
    assert!((PhaseClassifier::adjust_threshold(50.0, CyclePhase::Peak, 1.0) - 50.0).abs() < 1e-12);
}

#[test]
fn test_cumulative_fatigue_estimate() {
    let estimate = PhaseClassifier::cumulative_fatigue_estimate(40.0, CyclePhase::Ascending, 1.0, 4.0);
    // 40 x 1.25 x (1 + 0.05 x 8)
    assert!((estimate - 70.0).abs() < 1e-9);

    let capped = PhaseClassifier::cumulative_fatigue_estimate(80.0, CyclePhase::Ascending, 1.0, 4.0);
    assert!((capped - 100.0).abs() < 1e-12);

    let falling = PhaseClassifier::cumulative_fatigue_estimate(40.0, CyclePhase::Ascending, 1.0, -2.0);
    assert!((falling - 40.0).abs() < 1e-12);
    let trough = PhaseClassifier::cumulative_fatigue_estimate(40.0, CyclePhase::Trough, 1.0, 4.0);
    assert!((trough - 40.0).abs() < 1e-12);
}

#[tokio::test]
async fn test_simulated_template_classifies_recovery_week() {
    let template = cardiokinetic::models::ProgramTemplate::from_json(common::BUILD_TEMPLATE).unwrap();
    let program = template.resolve(12, 200.0).unwrap();
    let engine = MonteCarloEngine::new(common::seeded_config(1_000, 11)).unwrap();
    let report = engine.simulate(&program, None).await.unwrap();

    let analyses =
        PhaseClassifier::classify(&PhaseClassifier::signals_from_report(&program, &report));
    assert_eq!(analyses.len(), 12);
    assert_eq!(analyses[11].phase, CyclePhase::Trough);
    assert_eq!(analyses[0].week_number, 1);
}

#[test]
fn test_position_ratios_for_short_runs() {
    let three = PhaseClassifier::phase_positions(&[CyclePhase::Peak; 3]);
    let ratios: Vec<f64> = three.iter().map(|position| position.ratio).collect();
    assert_eq!(ratios, vec![0.0, 0.5, 1.0]);

    let single = PhaseClassifier::phase_positions(&[
        CyclePhase::Ascending,
        CyclePhase::Peak,
        CyclePhase::Descending,
    ]);
    assert!(single.iter().all(|position| (position.ratio - 0.5).abs() < f64::EPSILON));
    assert!(single.iter().all(|position| position.run_length == 1));
}

#[test]
fn test_threshold_shift_is_bounded_and_neutral_at_midpoint() {
    for value in [30.0, 70.0] {
        let adjusted = PhaseClassifier::adjust_threshold(value, CyclePhase::Ascending, 0.5);
        assert!((adjusted - value).abs() < 1e-12);
    }

    for value in [-500.0, -1.0, 0.0, 50.0, 100.0, 1e6, f64::INFINITY, f64::NAN] {
        for ratio in [-10.0, 0.0, 0.5, 1.0, 10.0, f64::NAN] {
            let adjusted = PhaseClassifier::adjust_threshold(value, CyclePhase::Ascending, ratio);
            assert!(
                (5.0..=95.0).contains(&adjusted),
                "value {value} ratio {ratio} escaped to {adjusted}"
            );
        }
    }
}
