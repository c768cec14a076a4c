// ABOUTME: Data model for the clinical ROM engine
// ABOUTME: Re-exports landmarks, pose input, frames, measurements, compensations and temporal results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! Plain serializable values. Inputs (`ProcessedPoseData`, `Landmark`) are read-only snapshots
//! supplied by the pose detector; outputs (`ClinicalJointMeasurement`,
//! `TemporalValidationResult`) are created once per call and never mutated.
//!
//! ## Design Principles
//!
//! - **Model Agnostic**: landmark indices resolve through a `SkeletonSchema` table
//! - **Serializable**: every output supports JSON serialization for hosts and reporting
//! - **Type Safe**: joints, movements and frames are enums, never free-form strings

// Domain modules
mod compensation;
mod frame;
mod landmark;
mod measurement;
mod pose;
mod temporal;
mod vector;

// Geometry primitives
pub use vector::Vector3D;

// Landmarks and skeleton schemas
pub use landmark::{
    BodySide, Landmark, LandmarkId, PoseLandmarks, SkeletonKind, SkeletonSchema, MEDIAPIPE_POSE,
    MOVENET,
};

// Pose input
pub use pose::{ProcessedPoseData, ViewOrientation};

// Reference frames and planes
pub use frame::{
    AnatomicalPlane, AnatomicalReferenceFrame, CachedAnatomicalFrames, FrameSlot, FrameType,
    PlaneName,
};

// Measurements
pub use measurement::{
    AngleType, ClinicalGrade, ClinicalJointMeasurement, JointAngle, JointName,
    MeasurementComponents, MeasurementQuality, MovementType, PrimaryJointMeasurement,
    QualityRating, SecondaryJointMeasurement, SecondaryPurpose,
};

// Compensations
pub use compensation::{CompensationPattern, CompensationType, Severity, SeverityScale};

// Temporal analysis
pub use temporal::{
    CompensationTracking, ConsistencyResult, QualityDegradationResult,
    TemporalMeasurementSequence, TemporalValidationResult, TrajectoryPattern, TrajectoryResult,
};
