// ABOUTME: Re-exports helper modules for cardiokinetic-cli
// ABOUTME: Provides program loading and display formatting utilities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

pub mod display;
pub mod program;
