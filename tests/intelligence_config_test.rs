// ABOUTME: Tests for intelligence and runtime configuration loaded from the environment
// ABOUTME: Validates defaults, CK_* overrides, parse failures, range and finiteness checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use cardiokinetic::config::{RuntimeConfig, DEFAULT_PERCENTILE_STORE_CAPACITY};
use cardiokinetic::errors::ErrorCode;
use cardiokinetic::intelligence::{
    ConfigError, IntelligenceConfig, MonteCarloEngine, RandomnessMode, SessionCostAlgorithm,
};
use serial_test::serial;
use std::env;

const CK_VARS: &[&str] = &[
    "CK_SIMULATION_RUNS",
    "CK_SIMULATION_BATCH_SIZE",
    "CK_SIMULATION_PARALLEL",
    "CK_SIMULATION_POWER_JITTER",
    "CK_SIMULATION_RPE_JITTER",
    "CK_SIMULATION_SEED",
    "CK_SESSION_COST_ALGORITHM",
    "CK_SESSION_COST_W_PRIME",
    "CK_PHYSIOLOGY_METABOLIC_CAPACITY",
    "CK_PHYSIOLOGY_STRUCTURAL_CAPACITY",
    "CK_PHYSIOLOGY_DETRAINING_MAX_PENALTY",
    "CK_ADAPTIVE_ENABLED",
    "CK_ADAPTIVE_PHASE_AWARE",
    "CK_PERCENTILE_STORE_CAPACITY",
];

fn clear_env() {
    for name in CK_VARS {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_defaults_without_overrides() {
    clear_env();
    let config = IntelligenceConfig::load().unwrap();

    assert_eq!(config.simulation.runs, 10_000);
    assert_eq!(config.simulation.batch_size, 5_000);
    assert_eq!(config.simulation.randomness, RandomnessMode::Stochastic);
    assert!(config.simulation.parallel);
    assert_eq!(config.session_cost.algorithm, SessionCostAlgorithm::CriticalPower);
    assert!(config.adaptive.enabled);
    assert!(config.adaptive.phase_aware_thresholds);

    let runtime = RuntimeConfig::from_env().unwrap();
    assert_eq!(runtime.percentile_store_capacity, DEFAULT_PERCENTILE_STORE_CAPACITY);
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_env();
    env::set_var("CK_SIMULATION_RUNS", "2500");
    env::set_var("CK_SIMULATION_SEED", "42");
    env::set_var("CK_SIMULATION_PARALLEL", "false");
    env::set_var("CK_SESSION_COST_ALGORITHM", "srpe");
    env::set_var("CK_ADAPTIVE_PHASE_AWARE", "false");

    let config = IntelligenceConfig::load().unwrap();
    clear_env();

    assert_eq!(config.simulation.runs, 2_500);
    assert_eq!(
        config.simulation.randomness,
        RandomnessMode::Deterministic { seed: 42 }
    );
    assert!(!config.simulation.parallel);
    assert_eq!(config.session_cost.algorithm, SessionCostAlgorithm::SessionRpe);
    assert!(!config.adaptive.phase_aware_thresholds);
}

#[test]
#[serial]
fn test_malformed_values_are_parse_errors() {
    clear_env();
    env::set_var("CK_SIMULATION_RUNS", "lots");
    let result = IntelligenceConfig::load();
    clear_env();
    assert!(matches!(result, Err(ConfigError::Parse(_))));

    env::set_var("CK_SIMULATION_SEED", "-1");
    let result = IntelligenceConfig::load();
    clear_env();
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
#[serial]
fn test_out_of_range_values_fail_validation() {
    clear_env();
    env::set_var("CK_SIMULATION_RUNS", "0");
    let result = IntelligenceConfig::load();
    clear_env();
    assert!(matches!(result, Err(ConfigError::ValueOutOfRange(_))));

    env::set_var("CK_SIMULATION_POWER_JITTER", "1.5");
    let runtime = RuntimeConfig::from_env();
    clear_env();
    assert_eq!(runtime.unwrap_err().code, ErrorCode::ConfigInvalid);
}

#[test]
fn test_non_finite_parameters_are_rejected() {
    let cases: [(&str, fn(&mut IntelligenceConfig)); 8] = [
        ("rpe_jitter NaN", |c| c.simulation.rpe_jitter = f64::NAN),
        ("rpe_jitter inf", |c| c.simulation.rpe_jitter = f64::INFINITY),
        ("power_jitter -inf", |c| c.simulation.power_jitter = f64::NEG_INFINITY),
        ("min efficiency NaN", |c| c.physiology.min_recovery_efficiency = f64::NAN),
        ("max efficiency NaN", |c| c.physiology.max_recovery_efficiency = f64::NAN),
        ("max penalty NaN", |c| c.physiology.detraining.max_penalty = f64::NAN),
        ("structural gain NaN", |c| c.physiology.structural_gain = f64::NAN),
        ("fresh multiplier inf", |c| c.adaptive.fresh_power_multipliers[2] = f64::INFINITY),
    ];

    for (name, mutate) in cases {
        let mut config = IntelligenceConfig::default();
        mutate(&mut config);
        assert!(
            matches!(config.validate(), Err(ConfigError::InvalidValue(_))),
            "{name} should be rejected"
        );
        assert!(MonteCarloEngine::new(config).is_err(), "{name} reached the engine");
    }

    let mut cost = IntelligenceConfig::default();
    cost.session_cost.anaerobic_cost_scale = f64::INFINITY;
    assert!(matches!(cost.validate(), Err(ConfigError::InvalidValue(_))));
}

#[test]
#[serial]
fn test_non_finite_environment_overrides_fail_validation() {
    for value in ["NaN", "inf", "-infinity"] {
        clear_env();
        env::set_var("CK_SIMULATION_RPE_JITTER", value);
        let result = IntelligenceConfig::load();
        clear_env();
        assert!(
            matches!(result, Err(ConfigError::InvalidValue(_))),
            "CK_SIMULATION_RPE_JITTER={value} should be rejected"
        );
    }

    env::set_var("CK_PHYSIOLOGY_DETRAINING_MAX_PENALTY", "NaN");
    let runtime = RuntimeConfig::from_env();
    clear_env();
    assert_eq!(runtime.unwrap_err().code, ErrorCode::ConfigInvalid);
}

#[test]
#[serial]
fn test_percentile_store_capacity_override() {
    clear_env();
    env::set_var("CK_PERCENTILE_STORE_CAPACITY", "16");
    let runtime = RuntimeConfig::from_env().unwrap();
    assert_eq!(runtime.percentile_store_capacity, 16);

    env::set_var("CK_PERCENTILE_STORE_CAPACITY", "0");
    let zero = RuntimeConfig::from_env();
    env::set_var("CK_PERCENTILE_STORE_CAPACITY", "many");
    let malformed = RuntimeConfig::from_env();
    clear_env();

    assert_eq!(zero.unwrap_err().code, ErrorCode::ConfigError);
    assert_eq!(malformed.unwrap_err().code, ErrorCode::ConfigError);
}

#[test]
fn test_config_round_trips_through_json() {
    let mut config = IntelligenceConfig::default();
    config.simulation.randomness = RandomnessMode::Deterministic { seed: 7 };

    let json = serde_json::to_value(&config).unwrap();
    assert_eq!(json["simulation"]["randomness"]["mode"], "deterministic");
    assert_eq!(json["simulation"]["randomness"]["seed"], 7);

    let restored: IntelligenceConfig = serde_json::from_value(json).unwrap();
    assert_eq!(restored.simulation.randomness, config.simulation.randomness);
}
