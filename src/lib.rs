// ABOUTME: Main library entry point for the CardioKinetic training-load platform
// ABOUTME: Re-exports the core and intelligence crates alongside logging and runtime configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

#![deny(unsafe_code)]

//! # CardioKinetic
//!
//! Training-load simulation and adaptive session control for periodized
//! cycling programs.
//!
//! ## Features
//!
//! - **Program templates**: keyframed JSON templates resolved to concrete week plans
//! - **Monte Carlo tables**: per-week fatigue and readiness percentiles
//! - **Phase classification**: signal-based cycle phases and positions
//! - **Adaptive adjustment**: live readings mapped to power and duration multipliers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cardiokinetic::intelligence::{IntelligenceConfig, MonteCarloEngine};
//! use cardiokinetic::models::ProgramTemplate;
//! # async fn example() -> Result<(), cardiokinetic::errors::AppError> {
//! let template = ProgramTemplate::from_json(r#"{"id": "base", "name": "Base"}"#)?;
//! let program = template.resolve(8, 200.0)?;
//! let engine = MonteCarloEngine::new(IntelligenceConfig::load()?)?;
//! let report = engine.simulate(&program, None).await?;
//! println!("{} weeks simulated", report.weeks.len());
//! # Ok(())
//! # }
//! ```

/// Runtime configuration loaded from the environment
pub mod config;
/// Structured logging setup
pub mod logging;

pub use cardiokinetic_core::errors;
pub use cardiokinetic_core::models;
pub use cardiokinetic_intelligence as intelligence;

pub use cardiokinetic_core::errors::{AppError, AppResult, ErrorCode};
