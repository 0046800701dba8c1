// ABOUTME: Simulate command for cardiokinetic-cli
// ABOUTME: Runs the Monte Carlo engine and prints weekly percentiles or the JSON report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use anyhow::Result;
use cardiokinetic::config::RuntimeConfig;

use crate::helpers::display::display_report;
use crate::helpers::program::{engine_config, load_program, simulate, ProgramArgs};

/// Simulate the program and print the result
pub async fn run(runtime: &RuntimeConfig, args: &ProgramArgs, json: bool) -> Result<()> {
    let program = load_program(args).await?;
    let config = engine_config(runtime, args)?;
    let report = simulate(config, &program, args.progress).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_report(&program, &report);
    }
    Ok(())
}
