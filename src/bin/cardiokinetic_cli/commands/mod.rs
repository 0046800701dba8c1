// ABOUTME: Re-exports command modules for cardiokinetic-cli
// ABOUTME: Provides the simulate, classify and adjust commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

pub mod adjust;
pub mod classify;
pub mod simulate;
