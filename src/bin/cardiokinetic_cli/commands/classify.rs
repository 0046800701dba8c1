// ABOUTME: Classify command for cardiokinetic-cli
// ABOUTME: Simulates the program and labels each week with its cycle phase and position
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use anyhow::Result;
use cardiokinetic::config::RuntimeConfig;
use cardiokinetic::intelligence::PhaseClassifier;
use tracing::info;

use crate::helpers::display::display_analyses;
use crate::helpers::program::{engine_config, load_program, simulate, ProgramArgs};

/// Simulate and classify the program
pub async fn run(runtime: &RuntimeConfig, args: &ProgramArgs, json: bool) -> Result<()> {
    let program = load_program(args).await?;
    let config = engine_config(runtime, args)?;
    let report = simulate(config, &program, args.progress).await?;

    let signals = PhaseClassifier::signals_from_report(&program, &report);
    let analyses = PhaseClassifier::classify(&signals);
    let cycles = analyses.last().map_or(0, |analysis| analysis.cycle_index + 1);
    info!(template_id = %program.template_id, cycles, "Program classified");

    if json {
        println!("{}", serde_json::to_string_pretty(&analyses)?);
    } else {
        display_analyses(&program, &analyses);
    }
    Ok(())
}
