// ABOUTME: Core data models shared by the simulation, classification and adaptation engines
// ABOUTME: Re-exports week plans, session styles, percentile tables, adjustments and templates
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

/// Live-session adjustment decisions and the context they are computed from
pub mod adjustment;
/// Per-week percentile tables produced by the Monte Carlo engine
pub mod percentile;
/// Session styles, work:rest ratios and custom blocks
pub mod session;
/// Program templates with keyframed weeks and stepped interpolation
pub mod template;
/// Week plans and resolved programs
pub mod week_plan;

pub use adjustment::{AdaptiveAdjustment, AdjustmentState, LiveContext, PercentileBand};
pub use percentile::{PercentileSet, PercentileTable, PERCENTILE_BREAKPOINTS};
pub use session::{CustomBlocks, SessionBlock, SessionStyle, SessionStyleKind, WorkRestRatio};
pub use template::{ProgramTemplate, WeekConfig, WeekKeyframe, WeekPosition, WeekRange};
pub use week_plan::{ResolvedProgram, TrainingFocus, WeekPlan};
