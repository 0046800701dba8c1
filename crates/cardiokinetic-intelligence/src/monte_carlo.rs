// ABOUTME: Batched Monte Carlo engine producing per-week fatigue and readiness percentile tables
// ABOUTME: Rayon-parallel runs with post-batch histogram merge, progress callback and cooperative yield
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

//! # Monte Carlo Batch Engine
//!
//! Each run simulates the whole program day by day:
//!
//! 1. Every week picks 2-4 distinct session days out of 7
//! 2. Session days apply power and RPE jitter and cost the session
//! 3. Every calendar day steps the physiological state with a random recovery efficiency
//! 4. End-of-week fatigue and readiness scores are recorded
//!
//! Runs are independent: each owns its generator, state and session history.
//! Within a batch they run on the rayon pool and fold into per-week histograms
//! that are merged once the batch completes.

use crate::cache::{PercentileCacheKey, PercentileStore};
use crate::config::{IntelligenceConfig, RandomnessMode, SimulationConfig};
use crate::distribution::{ScoreHistogram, WeekSummary};
use crate::physiological_constants::simulation;
use crate::physiology::{PhysiologicalState, PhysiologyModel, SessionHistory};
use crate::session_cost::{SessionCostEngine, SessionLoadInput};
use cardiokinetic_core::errors::{AppError, AppResult};
use cardiokinetic_core::models::{PercentileTable, ResolvedProgram, WeekPlan};
use rand::rngs::OsRng;
use rand::seq::index;
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Progress callback receiving the completed fraction in `[0, 1]`
pub type ProgressCallback = dyn Fn(f64) + Send + Sync;

/// Per-week outcome of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekResult {
    /// Six-point percentile table
    pub table: PercentileTable,
    /// Distribution summary
    pub summary: WeekSummary,
}

/// Outcome of a complete simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationReport {
    /// Template the program was resolved from
    pub template_id: String,
    /// Program base power in watts
    pub base_power: f64,
    /// Completed runs
    pub runs: usize,
    /// Randomness mode used
    pub randomness: RandomnessMode,
    /// Base seed every run derived its generator from
    pub base_seed: u64,
    /// Results in week order
    pub weeks: Vec<WeekResult>,
}

/// Program-wide statistics across every simulated week
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStatistics {
    /// Mean of the weekly mean fatigue scores
    pub average_fatigue: f64,
    /// Mean of the weekly mean readiness scores
    pub average_readiness: f64,
    /// Highest fatigue seen in any run
    pub peak_fatigue: u8,
    /// First week reaching the peak fatigue
    pub peak_fatigue_week: u32,
    /// Lowest readiness seen in any run
    pub lowest_readiness: u8,
    /// First week reaching the lowest readiness
    pub lowest_readiness_week: u32,
}

impl SimulationReport {
    /// Percentile tables in week order
    #[must_use]
    pub fn tables(&self) -> Vec<PercentileTable> {
        self.weeks.iter().map(|week| week.table).collect()
    }

    /// Result for a 1-based week
    #[must_use]
    pub fn week(&self, week_number: u32) -> Option<&WeekResult> {
        self.weeks
            .iter()
            .find(|week| week.table.week_number() == week_number)
    }

    /// Averages and extremes over the whole program, `None` for an empty report
    #[must_use]
    pub fn overall(&self) -> Option<OverallStatistics> {
        let (first, rest) = self.weeks.split_first()?;
        let week_count = self.weeks.len() as f64;
        let mut overall = OverallStatistics {
            average_fatigue: self
                .weeks
                .iter()
                .map(|week| week.summary.fatigue.mean)
                .sum::<f64>()
                / week_count,
            average_readiness: self
                .weeks
                .iter()
                .map(|week| week.summary.readiness.mean)
                .sum::<f64>()
                / week_count,
            peak_fatigue: first.summary.fatigue.max,
            peak_fatigue_week: first.summary.week_number,
            lowest_readiness: first.summary.readiness.min,
            lowest_readiness_week: first.summary.week_number,
        };

        for week in rest {
            let summary = &week.summary;
            if summary.fatigue.max > overall.peak_fatigue {
                overall.peak_fatigue = summary.fatigue.max;
                overall.peak_fatigue_week = summary.week_number;
            }
            if summary.readiness.min < overall.lowest_readiness {
                overall.lowest_readiness = summary.readiness.min;
                overall.lowest_readiness_week = summary.week_number;
            }
        }
        Some(overall)
    }

    /// Median fatigue per week
    #[must_use]
    pub fn fatigue_medians(&self) -> Vec<f64> {
        self.weeks
            .iter()
            .map(|week| week.summary.fatigue.p50)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
struct WeekAccumulator {
    fatigue: ScoreHistogram,
    readiness: ScoreHistogram,
}

impl WeekAccumulator {
    fn merge(&mut self, other: &Self) {
        self.fatigue.merge(&other.fatigue);
        self.readiness.merge(&other.readiness);
    }
}

fn merge_weeks(mut into: Vec<WeekAccumulator>, from: &[WeekAccumulator]) -> Vec<WeekAccumulator> {
    for (target, source) in into.iter_mut().zip(from) {
        target.merge(source);
    }
    into
}

/// End-of-week scores for one run
#[derive(Debug, Clone, Copy)]
struct WeekOutcome {
    fatigue: u8,
    readiness: u8,
}

/// Incremental simulation of one program
///
/// Each call to [`SimulationJob::run_next_batch`] executes at most one batch.
/// Callers decide whether to continue, which makes every batch boundary a
/// cancellation point.
#[derive(Debug)]
pub struct SimulationJob {
    program: ResolvedProgram,
    config: SimulationConfig,
    model: PhysiologyModel,
    cost: SessionCostEngine,
    base_seed: u64,
    completed_runs: usize,
    weeks: Vec<WeekAccumulator>,
}

impl SimulationJob {
    /// Validate inputs and prepare a job
    ///
    /// # Errors
    ///
    /// Returns an error if the program or configuration is invalid
    pub fn new(program: &ResolvedProgram, config: &IntelligenceConfig) -> AppResult<Self> {
        program.validate()?;
        config.validate()?;

        let base_seed = match config.simulation.randomness {
            RandomnessMode::Deterministic { seed } => seed,
            RandomnessMode::Stochastic => OsRng.next_u64(),
        };

        Ok(Self {
            program: program.clone(),
            config: config.simulation.clone(),
            model: PhysiologyModel::new(config.physiology.clone()),
            cost: SessionCostEngine::for_base_power(
                config.session_cost.clone(),
                program.base_power,
            ),
            base_seed,
            completed_runs: 0,
            weeks: vec![WeekAccumulator::default(); program.weeks.len()],
        })
    }

    /// Runs requested
    #[must_use]
    pub const fn total_runs(&self) -> usize {
        self.config.runs
    }

    /// Runs finished so far
    #[must_use]
    pub const fn completed_runs(&self) -> usize {
        self.completed_runs
    }

    /// Whether every run has finished
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed_runs >= self.config.runs
    }

    /// Completed fraction in `[0, 1]`
    #[must_use]
    pub fn progress(&self) -> f64 {
        (self.completed_runs as f64 / self.config.runs as f64).min(1.0)
    }

    /// Base seed in use
    #[must_use]
    pub const fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Execute the next batch and return the progress after it
    ///
    /// A complete job is left unchanged.
    pub fn run_next_batch(&mut self) -> f64 {
        if self.is_complete() {
            return 1.0;
        }

        let start = self.completed_runs;
        let end = (start + self.config.batch_size).min(self.config.runs);
        let started = Instant::now();

        let batch = self.run_batch(start, end);
        self.weeks = merge_weeks(std::mem::take(&mut self.weeks), &batch);
        self.completed_runs = end;

        debug!(
            template_id = %self.program.template_id,
            batch_start = start,
            batch_end = end,
            elapsed_ms = started.elapsed().as_millis() as u64,
            progress = self.progress(),
            "Monte Carlo batch complete"
        );

        self.progress()
    }

    fn run_batch(&self, start: usize, end: usize) -> Vec<WeekAccumulator> {
        let week_count = self.program.weeks.len();
        let empty = || vec![WeekAccumulator::default(); week_count];
        let record = |mut accumulators: Vec<WeekAccumulator>, run_index: usize| {
            for (accumulator, outcome) in accumulators.iter_mut().zip(self.simulate_run(run_index)) {
                accumulator.fatigue.record(outcome.fatigue);
                accumulator.readiness.record(outcome.readiness);
            }
            accumulators
        };

        if self.config.parallel {
            (start..end)
                .into_par_iter()
                .fold(empty, record)
                .reduce(empty, |left, right| merge_weeks(left, &right))
        } else {
            (start..end).fold(empty(), record)
        }
    }

    /// Simulate one complete program
    ///
    /// The generator is seeded from the base seed with the run index as its
    /// stream, so a run's outcome does not depend on scheduling.
    fn simulate_run(&self, run_index: usize) -> Vec<WeekOutcome> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.base_seed);
        rng.set_stream(run_index as u64);

        let mut state = PhysiologicalState::fresh();
        let mut history = SessionHistory::new();
        let days_per_week = simulation::DAYS_PER_WEEK as u32;
        let physiology = self.model.config();

        self.program
            .weeks
            .iter()
            .enumerate()
            .map(|(week_index, week)| {
                let session_days = self.pick_session_days(&mut rng);
                let week_start = week_index as u32 * days_per_week;

                for day in 0..days_per_week {
                    let absolute_day = week_start + day;
                    let load = if session_days[day as usize] {
                        history.record(absolute_day);
                        self.session_load(week, &mut rng)
                    } else {
                        0.0
                    };
                    let efficiency = rng.gen_range(
                        physiology.min_recovery_efficiency..=physiology.max_recovery_efficiency,
                    );
                    state = self.model.step(state, load, efficiency);
                }

                let end_of_week = week_start + days_per_week - 1;
                WeekOutcome {
                    fatigue: self.model.fatigue_score(&state),
                    readiness: self.model.readiness_score(&state, &history, end_of_week),
                }
            })
            .collect()
    }

    fn pick_session_days(&self, rng: &mut ChaCha8Rng) -> [bool; simulation::DAYS_PER_WEEK] {
        let count = rng.gen_range(self.config.min_sessions_per_week..=self.config.max_sessions_per_week);
        let mut days = [false; simulation::DAYS_PER_WEEK];
        for day in index::sample(rng, simulation::DAYS_PER_WEEK, count) {
            days[day] = true;
        }
        days
    }

    fn session_load(&self, week: &WeekPlan, rng: &mut ChaCha8Rng) -> f64 {
        let power_jitter = self.config.power_jitter;
        let rpe_jitter = self.config.rpe_jitter;
        let power_factor = 1.0 + rng.gen_range(-power_jitter..=power_jitter);
        let rpe = (week.target_rpe + rng.gen_range(-rpe_jitter..=rpe_jitter)).clamp(1.0, 10.0);

        let input = SessionLoadInput::planned(week, self.program.base_power)
            .with_jitter(power_factor, rpe);
        self.cost.session_load(&input)
    }

    /// Build the report from a complete job
    ///
    /// # Errors
    ///
    /// Returns an error if runs remain
    pub fn finish(self) -> AppResult<SimulationReport> {
        if !self.is_complete() {
            return Err(AppError::internal(format!(
                "Simulation finished early: {} of {} runs complete",
                self.completed_runs, self.config.runs
            )));
        }

        let weeks = self
            .program
            .weeks
            .iter()
            .zip(&self.weeks)
            .map(|(plan, accumulator)| {
                let table = PercentileTable::new(
                    plan.week_number,
                    accumulator.fatigue.percentile_set(),
                    accumulator.readiness.percentile_set(),
                )?;
                Ok(WeekResult {
                    table,
                    summary: WeekSummary {
                        week_number: plan.week_number,
                        fatigue: accumulator.fatigue.summary(),
                        readiness: accumulator.readiness.summary(),
                    },
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(SimulationReport {
            template_id: self.program.template_id,
            base_power: self.program.base_power,
            runs: self.completed_runs,
            randomness: self.config.randomness,
            base_seed: self.base_seed,
            weeks,
        })
    }
}

/// Drives simulation jobs to completion
#[derive(Debug, Clone, Default)]
pub struct MonteCarloEngine {
    config: IntelligenceConfig,
}

impl MonteCarloEngine {
    /// Create an engine
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: IntelligenceConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &IntelligenceConfig {
        &self.config
    }

    /// Simulate a program, yielding to the runtime between batches
    ///
    /// Dropping the returned future at a yield point stops further batches.
    ///
    /// # Errors
    ///
    /// Returns an error if the program is invalid
    pub async fn simulate(
        &self,
        program: &ResolvedProgram,
        progress: Option<&ProgressCallback>,
    ) -> AppResult<SimulationReport> {
        let mut job = self.start(program)?;
        while !job.is_complete() {
            let fraction = job.run_next_batch();
            if let Some(callback) = progress {
                callback(fraction);
            }
            if !job.is_complete() {
                tokio::task::yield_now().await;
            }
        }
        self.complete(job)
    }

    /// Simulate a program on the current thread without yielding
    ///
    /// # Errors
    ///
    /// Returns an error if the program is invalid
    pub fn simulate_blocking(
        &self,
        program: &ResolvedProgram,
        progress: Option<&ProgressCallback>,
    ) -> AppResult<SimulationReport> {
        let mut job = self.start(program)?;
        while !job.is_complete() {
            let fraction = job.run_next_batch();
            if let Some(callback) = progress {
                callback(fraction);
            }
        }
        self.complete(job)
    }

    /// Percentile tables from the store when present and usable, otherwise simulated and stored
    ///
    /// # Errors
    ///
    /// Returns an error if the key does not match the program, the program is
    /// invalid, or the store fails
    pub async fn simulate_cached<S: PercentileStore + ?Sized>(
        &self,
        store: &S,
        key: &PercentileCacheKey,
        program: &ResolvedProgram,
        progress: Option<&ProgressCallback>,
    ) -> AppResult<Vec<PercentileTable>> {
        if key.week_count != program.week_count() {
            return Err(AppError::invalid_input(format!(
                "Cache key {key} does not match a {}-week program",
                program.week_count()
            )));
        }

        if let Some(tables) = store.get(key).await? {
            if tables.len() == key.week_count
                && tables.iter().all(PercentileTable::is_monotonic)
            {
                debug!(key = %key, "Percentile tables served from store");
                if let Some(callback) = progress {
                    callback(1.0);
                }
                return Ok(tables);
            }
            warn!(key = %key, stored = tables.len(), "Discarding unusable stored percentile tables");
            store.invalidate(key).await?;
        }

        let tables = self.simulate(program, progress).await?.tables();
        store.put(key, tables.clone()).await?;
        Ok(tables)
    }

    fn start(&self, program: &ResolvedProgram) -> AppResult<SimulationJob> {
        let job = SimulationJob::new(program, &self.config)?;
        info!(
            template_id = %program.template_id,
            weeks = program.week_count(),
            runs = job.total_runs(),
            batch_size = self.config.simulation.batch_size,
            randomness = %self.config.simulation.randomness,
            "Starting Monte Carlo simulation"
        );
        Ok(job)
    }

    fn complete(&self, job: SimulationJob) -> AppResult<SimulationReport> {
        let report = job.finish()?;
        info!(
            template_id = %report.template_id,
            runs = report.runs,
            parallel = self.config.simulation.parallel,
            "Monte Carlo simulation complete"
        );
        Ok(report)
    }
}
