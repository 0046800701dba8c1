// ABOUTME: Shared test utilities and fixtures for integration tests
// ABOUTME: Provides quiet logging, program builders, templates and engine configurations
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors
#![allow(
    dead_code,
    clippy::wildcard_in_or_patterns,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `cardiokinetic`
//!
//! Common fixtures used across integration tests.

use cardiokinetic::intelligence::config::{IntelligenceConfig, RandomnessMode};
use cardiokinetic::models::{
    ResolvedProgram, SessionStyle, TrainingFocus, WeekPlan, WorkRestRatio,
};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // Check for TEST_LOG environment variable to control test logging level
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN, // Default to WARN for quiet tests
        };

        // Another test binary helper may already have installed a subscriber
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Steady-state week plan
pub fn steady_week(week_number: u32, power_multiplier: f64, phase_name: &str) -> WeekPlan {
    WeekPlan {
        week_number,
        phase_name: phase_name.to_owned(),
        focus: TrainingFocus::Volume,
        power_multiplier,
        work_rest_ratio: WorkRestRatio::Steady,
        target_rpe: 6.0,
        duration_minutes: 45.0,
        session_style: SessionStyle::SteadyState,
    }
}

/// Program whose power rises linearly from 0.85 to 1.15 of base power
pub fn linear_program(weeks: u32, base_power: f64) -> ResolvedProgram {
    let span = f64::from(weeks.saturating_sub(1).max(1));
    ResolvedProgram {
        template_id: format!("linear-{weeks}"),
        base_power,
        weeks: (1..=weeks)
            .map(|week| {
                let multiplier = 0.30f64.mul_add(f64::from(week - 1) / span, 0.85);
                steady_week(week, multiplier, "Build")
            })
            .collect(),
    }
}

/// Engine configuration with a fixed run count and randomness mode
pub fn config(runs: usize, randomness: RandomnessMode) -> IntelligenceConfig {
    let mut config = IntelligenceConfig::default();
    config.simulation.runs = runs;
    config.simulation.batch_size = runs.clamp(1, 5_000);
    config.simulation.randomness = randomness;
    config
}

/// Deterministic engine configuration
pub fn seeded_config(runs: usize, seed: u64) -> IntelligenceConfig {
    config(runs, RandomnessMode::Deterministic { seed })
}

/// Three-phase template with build, peak and recovery keyframes
pub const BUILD_TEMPLATE: &str = r#"{
    "id": "build-peak-recover",
    "name": "Build, Peak, Recover",
    "description": "Linear build into a short peak and a deload week",
    "templateVersion": "1.0",
    "progressionMode": "power",
    "weekConfig": { "type": "variable", "range": { "min": 6, "max": 12, "step": 2 } },
    "defaultSessionStyle": "steady-state",
    "defaultSessionDurationMinutes": 40,
    "weeks": [
        { "position": "first", "phaseName": "Base", "focus": "volume", "powerMultiplier": 0.85, "targetRPE": 5 },
        { "position": "33%", "phaseName": "Build", "focus": "intensity", "powerMultiplier": 1.0, "targetRPE": 6,
          "sessionStyle": "interval", "workRestRatio": "2:1", "durationMinutes": 30 },
        { "position": "75%", "phaseName": "Peak", "focus": "density", "powerMultiplier": 1.1, "targetRPE": 8,
          "sessionStyle": "custom", "blocks": [
              { "durationMinutes": 10, "powerMultiplier": 0.8 },
              { "durationMinutes": 20, "powerMultiplier": 1.15, "workRestRatio": "1:1" },
              { "durationMinutes": 10, "powerMultiplier": 0.7 }
          ] },
        { "position": "last", "phaseName": "Recovery", "focus": "recovery", "powerMultiplier": 0.7, "targetRPE": 4 }
    ]
}"#;
