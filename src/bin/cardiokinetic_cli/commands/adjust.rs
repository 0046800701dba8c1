// ABOUTME: Adjust command for cardiokinetic-cli
// ABOUTME: Evaluates one live reading against the simulated percentiles of its week
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use anyhow::{Context, Result};
use cardiokinetic::config::RuntimeConfig;
use cardiokinetic::intelligence::{AdaptiveEngine, PhaseClassifier};
use cardiokinetic::logging::AppLogger;
use cardiokinetic::models::LiveContext;

use crate::helpers::display::display_adjustment;
use crate::helpers::program::{engine_config, load_program, simulate, ProgramArgs};

/// Live reading supplied on the command line
#[derive(Debug, Clone, Copy)]
pub struct Reading {
    /// 1-based week
    pub week: u32,
    /// Fatigue score
    pub fatigue: f64,
    /// Readiness score
    pub readiness: f64,
    /// Shift fatigue breakpoints by phase position
    pub phase_aware: bool,
}

/// Simulate the program and evaluate the reading
pub async fn run(
    runtime: &RuntimeConfig,
    args: &ProgramArgs,
    reading: &Reading,
    json: bool,
) -> Result<()> {
    let program = load_program(args).await?;
    let total_weeks = u32::try_from(program.week_count()).context("Program is too long")?;
    let plan = program
        .week(reading.week)
        .with_context(|| format!("Week {} is outside the program", reading.week))?;
    let context = LiveContext::new(
        reading.fatigue,
        reading.readiness,
        reading.week,
        total_weeks,
        plan.phase_name.clone(),
    )?;

    let mut config = engine_config(runtime, args)?;
    config.adaptive.phase_aware_thresholds &= reading.phase_aware;
    let report = simulate(config.clone(), &program, args.progress).await?;

    let analyses =
        PhaseClassifier::classify(&PhaseClassifier::signals_from_report(&program, &report));
    let position = analyses
        .iter()
        .find(|analysis| analysis.week_number == reading.week)
        .map(|analysis| analysis.position);
    let table = report.week(reading.week).map(|week| week.table);

    let engine = AdaptiveEngine::new(config.adaptive);
    let decision = engine.evaluate(
        &context,
        table.as_ref(),
        &plan.session_style,
        position.as_ref(),
    );
    AppLogger::log_adjustment(
        reading.week,
        decision.state.name(),
        decision.active,
        decision.power_multiplier,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        display_adjustment(plan, program.base_power, &decision);
    }
    Ok(())
}
