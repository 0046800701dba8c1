// ABOUTME: Core types for the CardioKinetic training-load platform
// ABOUTME: Foundation crate with error handling and the shared domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

#![deny(unsafe_code)]

//! # CardioKinetic Core
//!
//! Foundation crate providing shared types for the CardioKinetic simulation and
//! adaptation engine. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and `AppResult`
//! - **models**: Week plans, session styles, percentile tables, adjustments and program templates

/// Unified error handling system with standard error codes
pub mod errors;

/// Core data models (week plans, session styles, percentile tables, templates)
pub mod models;
