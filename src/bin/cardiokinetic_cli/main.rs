// ABOUTME: CardioKinetic CLI - simulate programs, classify phases and evaluate adaptive adjustments
// ABOUTME: Loads a program template, runs the Monte Carlo engine and prints tables or JSON
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors
//!
//! Usage:
//! ```bash
//! # Weekly percentile summary for a 12-week program at 220 W
//! cardiokinetic-cli simulate --template build.json --weeks 12 --base-power 220
//!
//! # Full JSON report with a reproducible seed
//! cardiokinetic-cli simulate --template build.json --seed 42 --json
//!
//! # Phase classification of the simulated fatigue curve
//! cardiokinetic-cli classify --template build.json
//!
//! # Adjustment for a live reading in week 5
//! cardiokinetic-cli adjust --template build.json --week 5 --fatigue 48 --readiness 41
//! ```

mod commands;
mod helpers;

use anyhow::Result;
use cardiokinetic::config::RuntimeConfig;
use cardiokinetic::logging::{LogFormat, LoggingConfig};
use clap::{Parser, Subcommand};
use helpers::program::ProgramArgs;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "cardiokinetic-cli",
    version,
    about = "CardioKinetic training-load simulation CLI",
    long_about = "Simulate periodized programs, classify their load phases and evaluate adaptive session adjustments."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Log format override (json, pretty, compact)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Run the Monte Carlo engine and print weekly percentiles
    Simulate {
        #[command(flatten)]
        program: ProgramArgs,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Simulate, then classify every week into a cycle phase
    Classify {
        #[command(flatten)]
        program: ProgramArgs,

        /// Print the analyses as JSON
        #[arg(long)]
        json: bool,
    },

    /// Simulate, then evaluate one live reading
    Adjust {
        #[command(flatten)]
        program: ProgramArgs,

        /// 1-based week of the reading
        #[arg(long)]
        week: u32,

        /// Live fatigue score (0-100)
        #[arg(long)]
        fatigue: f64,

        /// Live readiness score (0-100)
        #[arg(long)]
        readiness: f64,

        /// Ignore phase position when banding fatigue
        #[arg(long)]
        no_phase_aware: bool,

        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut runtime = RuntimeConfig::from_env()?;
    runtime.logging = configure_logging(runtime.logging, &cli);
    runtime.logging.init()?;
    runtime.log_summary();

    match cli.command {
        Command::Simulate { program, json } => {
            commands::simulate::run(&runtime, &program, json).await?;
        }
        Command::Classify { program, json } => {
            commands::classify::run(&runtime, &program, json).await?;
        }
        Command::Adjust {
            program,
            week,
            fatigue,
            readiness,
            no_phase_aware,
            json,
        } => {
            let reading = commands::adjust::Reading {
                week,
                fatigue,
                readiness,
                phase_aware: !no_phase_aware,
            };
            commands::adjust::run(&runtime, &program, &reading, json).await?;
        }
    }

    debug!("Command complete");
    Ok(())
}

fn configure_logging(mut logging: LoggingConfig, cli: &Cli) -> LoggingConfig {
    if cli.verbose {
        logging.level = "debug".into();
    }
    if let Some(format) = cli.log_format {
        logging.format = format;
    }
    logging.log_startup = cli.verbose;
    logging
}
