// ABOUTME: Error taxonomy for the clinical ROM engine
// ABOUTME: Precondition and configuration errors plus non-fatal degraded-input warnings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Engine Error Types
//!
//! Three categories:
//! - `PreconditionError` - the geometry would be meaningless (wrong view, no frames,
//!   missing required landmarks). Always surfaced to the caller.
//! - `ConfigError` - invalid configuration, raised when configuration is applied.
//! - `DegradedInputWarning` - not an error; attached to a best-effort measurement.

use crate::models::{FrameType, LandmarkId, MovementType, ViewOrientation};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Geometric or input prerequisites for a computation are not met
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreconditionError {
    /// A landmark the frame cannot be built without is absent or occluded
    #[error("Missing required landmark {landmark} for {frame_type} frame")]
    MissingLandmark {
        /// The absent landmark
        landmark: LandmarkId,
        /// Frame that needed it
        frame_type: FrameType,
    },

    /// A landmark the movement cannot be measured without is absent or occluded
    #[error("Missing required landmark {landmark} for {movement} measurement")]
    MissingMeasurementLandmark {
        /// The absent landmark
        landmark: LandmarkId,
        /// Movement being measured
        movement: MovementType,
    },

    /// Pose data carries no view orientation
    #[error("View orientation required for {movement} measurement")]
    MissingViewOrientation {
        /// Movement being measured
        movement: MovementType,
    },

    /// The camera view cannot observe this movement
    #[error("{movement} cannot be measured from a {actual} view (expected one of: {expected})")]
    InvalidViewOrientation {
        /// Movement being measured
        movement: MovementType,
        /// View reported by the pose detector
        actual: ViewOrientation,
        /// Comma separated list of accepted views
        expected: String,
    },

    /// `prepare_frames` was not run before measuring
    #[error("Anatomical frames not computed before {movement} measurement")]
    MissingAnatomicalFrames {
        /// Movement being measured
        movement: MovementType,
    },

    /// A specific frame is absent from the cached frame set
    #[error("{frame_type} frame unavailable for {movement} measurement")]
    MissingFrame {
        /// Frame that was needed
        frame_type: FrameType,
        /// Movement being measured
        movement: MovementType,
    },

    /// Landmarks coincide so an axis has no direction
    #[error("Degenerate geometry while building {frame_type} frame: {reason}")]
    DegenerateGeometry {
        /// Frame being built
        frame_type: FrameType,
        /// Which axis collapsed
        reason: &'static str,
    },

    /// Temporal analysis needs at least `required` measurements
    #[error("Temporal analysis requires at least {required} frames, got {actual}")]
    InsufficientFrames {
        /// Minimum number of frames
        required: usize,
        /// Frames supplied
        actual: usize,
    },

    /// Sequence frame rate must be positive and finite
    #[error("Invalid sequence frame rate: {0}")]
    InvalidFrameRate(f64),
}

/// Configuration-related errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Value outside acceptable range (e.g., confidence not between 0 and 1)
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Cache bucketing precision outside the supported decimal places
    #[error("Invalid cache precision: {0} decimal places (supported: 0-6)")]
    InvalidPrecision(u32),

    /// Severity cut points are not non-decreasing
    #[error("Severity cut points for {0} must be non-negative and non-decreasing")]
    NonMonotonicCutPoints(&'static str),

    /// Weights don't sum to required total
    #[error("Invalid weights: {0}")]
    InvalidWeights(&'static str),

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),

    /// Failed to parse a configuration override
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Umbrella error returned by engine operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Geometric prerequisites missing
    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    /// Configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Whether the host should prompt the user to re-orient the camera
    #[must_use]
    pub const fn is_orientation_problem(&self) -> bool {
        matches!(
            self,
            Self::Precondition(
                PreconditionError::MissingViewOrientation { .. }
                    | PreconditionError::InvalidViewOrientation { .. }
            )
        )
    }
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Non-fatal input problems that reduce measurement quality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegradedInputWarning {
    /// Secondary landmark occluded, a default angle was assumed
    SecondaryLandmarkOccluded {
        /// Secondary joint name
        joint: String,
        /// Angle assumed in its place
        assumed_angle: f64,
    },
    /// Elbow outside the gating tolerance for shoulder rotation
    ElbowGatingExceeded {
        /// Measured elbow angle
        elbow_angle: f64,
        /// Required elbow angle
        target: f64,
        /// Allowed deviation
        tolerance: f64,
    },
    /// Secondary joint failed its validation check
    SecondaryValidationFailed {
        /// Secondary joint name
        joint: String,
        /// Deviation from the expected angle
        deviation: f64,
    },
    /// A frame axis used a fallback reference
    FrameFallback {
        /// Frame built with a fallback
        frame_type: FrameType,
    },
    /// Limb projection onto the anatomical plane collapsed
    OutOfPlaneMovement {
        /// Plane the limb was projected onto
        plane: String,
    },
    /// Overall landmark visibility low
    LowVisibility {
        /// Mean visibility of landmarks used
        visibility: f64,
    },
}

impl fmt::Display for DegradedInputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SecondaryLandmarkOccluded {
                joint,
                assumed_angle,
            } => write!(
                f,
                "{joint} not visible; assumed {assumed_angle:.0}° for secondary check"
            ),
            Self::ElbowGatingExceeded {
                elbow_angle,
                target,
                tolerance,
            } => write!(
                f,
                "Elbow at {elbow_angle:.1}° is outside {target:.0}° ± {tolerance:.0}°; rotation value is low confidence"
            ),
            Self::SecondaryValidationFailed { joint, deviation } => {
                write!(f, "{joint} deviates {deviation:.1}° from expected position")
            }
            Self::FrameFallback { frame_type } => write!(
                f,
                "{frame_type} frame used a fallback axis; orientation may be imprecise"
            ),
            Self::OutOfPlaneMovement { plane } => write!(
                f,
                "Limb is nearly perpendicular to the {plane} plane; angle estimated without projection"
            ),
            Self::LowVisibility { visibility } => write!(
                f,
                "Landmark visibility {visibility:.2} is low; quality capped at fair"
            ),
        }
    }
}
