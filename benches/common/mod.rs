// ABOUTME: Common benchmark utilities and pose fixtures for performance testing
// ABOUTME: Provides reusable pose generators and setup functions for Criterion benchmarks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Common benchmark utilities and pose fixtures.
//!
//! Provides reusable pose generators and setup functions for Criterion benchmarks.

pub mod fixtures;

// Each benchmark imports only what it needs to avoid unused import warnings
