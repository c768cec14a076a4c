// ABOUTME: Core types and constants for the clinical range-of-motion engine
// ABOUTME: Foundation crate with error taxonomy, data model, configuration and clinical constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # ROM Core
//!
//! Foundation crate providing the shared value types of the clinical ROM engine. This crate
//! holds no behaviour beyond construction, validation and small accessors, so downstream
//! crates (UI bridges, reporting) can depend on it without pulling in the geometry engine.
//!
//! ## Modules
//!
//! - **errors**: `PreconditionError`, `ConfigError`, `EngineError` and `DegradedInputWarning`
//! - **constants**: clinically sourced defaults (AAOS normal ROM, compensation cut points)
//! - **models**: landmarks, skeleton schemas, vectors, frames, measurements, temporal results
//! - **config**: validated configuration structs for every engine component

/// Error taxonomy shared by all engine components
pub mod errors;

/// Named clinical and engine constants organized by domain
pub mod constants;

/// Data model: landmarks, frames, measurements and temporal results
pub mod models;

/// Validated configuration for goniometer, cache, compensation, clinical and temporal stages
pub mod config;

pub use errors::{ConfigError, DegradedInputWarning, EngineError, EngineResult, PreconditionError};
