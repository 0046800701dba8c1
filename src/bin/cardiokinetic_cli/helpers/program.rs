// ABOUTME: Shared program arguments and loading for cardiokinetic-cli commands
// ABOUTME: Reads the template, resolves it to weeks and applies engine overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use anyhow::{Context, Result};
use cardiokinetic::config::RuntimeConfig;
use cardiokinetic::intelligence::config::{IntelligenceConfig, RandomnessMode};
use cardiokinetic::intelligence::session_cost::SessionCostAlgorithm;
use cardiokinetic::intelligence::{MonteCarloEngine, ProgressCallback, SimulationReport};
use cardiokinetic::models::{ProgramTemplate, ResolvedProgram};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

/// Program selection and engine overrides shared by every command
#[derive(Debug, Args)]
pub struct ProgramArgs {
    /// Program template JSON file
    #[arg(long, short = 't')]
    pub template: PathBuf,

    /// Program length in weeks (defaults to the template's default length)
    #[arg(long, short = 'w')]
    pub weeks: Option<u32>,

    /// Base power in watts
    #[arg(long, default_value = "200")]
    pub base_power: f64,

    /// Monte Carlo runs (overrides `CK_SIMULATION_RUNS`)
    #[arg(long)]
    pub runs: Option<usize>,

    /// Seed for reproducible results (overrides `CK_SIMULATION_SEED`)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Session cost algorithm (`critical_power`, `session_rpe`)
    #[arg(long)]
    pub algorithm: Option<SessionCostAlgorithm>,

    /// Print simulation progress to stderr
    #[arg(long)]
    pub progress: bool,
}

/// Read and resolve the template
pub async fn load_program(args: &ProgramArgs) -> Result<ResolvedProgram> {
    let json = tokio::fs::read_to_string(&args.template)
        .await
        .with_context(|| format!("Failed to read template {}", args.template.display()))?;
    let template = ProgramTemplate::from_json(&json)
        .with_context(|| format!("Invalid template {}", args.template.display()))?;

    let weeks = template.program_weeks(args.weeks);
    let supported = template.week_config.supported_week_counts();
    if !supported.contains(&weeks) {
        tracing::warn!(
            template_id = %template.id,
            weeks,
            "Requested length is outside the template's supported week counts"
        );
    }

    let program = template
        .resolve(weeks, args.base_power)
        .with_context(|| format!("Template '{}' cannot be resolved to {weeks} weeks", template.id))?;
    info!(template_id = %template.id, weeks, base_power = args.base_power, "Program resolved");
    Ok(program)
}

/// Engine configuration with command-line overrides applied
pub fn engine_config(runtime: &RuntimeConfig, args: &ProgramArgs) -> Result<IntelligenceConfig> {
    let mut config = runtime.intelligence.clone();
    if let Some(runs) = args.runs {
        config.simulation.runs = runs;
    }
    if let Some(seed) = args.seed {
        config.simulation.randomness = RandomnessMode::Deterministic { seed };
    }
    if let Some(algorithm) = args.algorithm {
        config.session_cost.algorithm = algorithm;
    }
    config.validate().context("Invalid engine configuration")?;
    Ok(config)
}

/// Simulate the resolved program, optionally reporting progress on stderr
pub async fn simulate(
    config: IntelligenceConfig,
    program: &ResolvedProgram,
    show_progress: bool,
) -> Result<SimulationReport> {
    let engine = MonteCarloEngine::new(config)?;
    let started = Instant::now();

    let report = if show_progress {
        let callback: &ProgressCallback = &|fraction: f64| {
            let mut stderr = std::io::stderr().lock();
            // Progress output is best effort
            let _ = write!(stderr, "\rSimulating... {:>3.0}%", fraction * 100.0);
            if fraction >= 1.0 {
                let _ = writeln!(stderr);
            }
        };
        engine.simulate(program, Some(callback)).await?
    } else {
        engine.simulate(program, None).await?
    };

    cardiokinetic::logging::AppLogger::log_simulation(
        &report.template_id,
        report.weeks.len(),
        report.runs,
        started.elapsed().as_millis() as u64,
    );
    Ok(report)
}
