// ABOUTME: Main library entry point for the clinical range-of-motion engine
// ABOUTME: Goniometry, anatomical frames, compensation detection and temporal validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # ROM Engine
//!
//! Turns 2D/3D pose landmarks into clinically graded joint measurements.
//!
//! ## Features
//!
//! - **Goniometry**: interior joint angles with a confidence gate and optional smoothing
//! - **Anatomical frames**: ISB-style global, thorax, pelvis, humerus and forearm frames,
//!   memoized through an injected frame cache
//! - **Clinical measurement**: shoulder flexion/abduction/rotation, elbow and knee flexion
//!   graded against normal ROM with secondary-joint validation and gating
//! - **Compensation detection**: trunk lean and rotation, shoulder hiking, elbow drift,
//!   hip hike and contralateral lean on configurable severity scales
//! - **Temporal validation**: frame-to-frame consistency, trajectory shape, compensation
//!   persistence and quality degradation across a repetition
//!
//! ## Architecture
//!
//! Value types, configuration and constants live in [`rom_core`]. This crate holds the
//! behaviour. Every service is a per-session value; nothing is global.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use rom_engine::clinical::ClinicalMeasurementService;
//! use rom_engine::temporal::TemporalConsistencyAnalyzer;
//! use rom_core::models::{
//!     BodySide, MovementType, ProcessedPoseData, TemporalMeasurementSequence,
//! };
//!
//! # fn run(poses: Vec<ProcessedPoseData>) -> anyhow::Result<()> {
//! rom_engine::logging::init_from_env()?;
//!
//! let mut service = ClinicalMeasurementService::new();
//! let mut measurements = Vec::new();
//! for pose in &poses {
//!     let pose = service.prepare_frames(pose)?;
//!     measurements.push(service.measure(&pose, MovementType::ShoulderFlexion, BodySide::Right)?);
//! }
//!
//! let sequence = TemporalMeasurementSequence::new(measurements, 30.0);
//! let report = TemporalConsistencyAnalyzer::default().analyze(&sequence, None, None)?;
//! println!("repetition valid: {}", report.passed);
//! # Ok(())
//! # }
//! ```

/// Anatomical reference frames, planes and the frame cache
pub mod anatomical;

/// Clinical measurement service
pub mod clinical;

/// Compensation pattern detectors
pub mod compensation;

/// Vector helpers over `Vector3D`
pub mod geometry;

/// Interior joint angles from landmark triples
pub mod goniometer;

/// Tracing subscriber setup for host applications
pub mod logging;

/// Temporal consistency analysis of measurement sequences
pub mod temporal;

pub use anatomical::{AnatomicalFrameCache, AnatomicalReferenceService, FrameCacheProvider};
pub use clinical::ClinicalMeasurementService;
pub use compensation::CompensationDetector;
pub use goniometer::Goniometer;
pub use rom_core;
pub use temporal::TemporalConsistencyAnalyzer;
