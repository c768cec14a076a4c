// ABOUTME: Measurement sequences and temporal validation results
// ABOUTME: Consistency, trajectory, compensation persistence and quality degradation outputs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{ClinicalJointMeasurement, CompensationType, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Ordered measurements of one exercise repetition or session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalMeasurementSequence {
    /// Unique sequence identifier
    pub sequence_id: Uuid,
    /// Measurements in capture order
    pub measurements: Vec<ClinicalJointMeasurement>,
    /// Capture rate (frames per second)
    pub frame_rate: f64,
    /// Sequence duration in seconds
    pub duration: f64,
}

impl TemporalMeasurementSequence {
    /// Build a sequence with a fresh id and a duration derived from the frame rate
    #[must_use]
    pub fn new(measurements: Vec<ClinicalJointMeasurement>, frame_rate: f64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let intervals = measurements.len().saturating_sub(1) as f64;
        let duration = if frame_rate > 0.0 {
            intervals / frame_rate
        } else {
            0.0
        };
        Self {
            sequence_id: Uuid::new_v4(),
            measurements,
            frame_rate,
            duration,
        }
    }
}

/// Shape of an angle trajectory over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrajectoryPattern {
    /// Angle rises through the sequence
    Increasing,
    /// Angle falls through the sequence
    Decreasing,
    /// Range of motion below the static threshold
    Static,
    /// Repeated balanced direction reversals
    Oscillating,
    /// None of the above
    Erratic,
}

impl fmt::Display for TrajectoryPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Static => "static",
            Self::Oscillating => "oscillating",
            Self::Erratic => "erratic",
        })
    }
}

/// Frame-to-frame consistency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyResult {
    /// No sudden jumps and smoothness at or above threshold
    pub passed: bool,
    /// Mean absolute frame-to-frame change (degrees)
    pub mean_delta: f64,
    /// Largest absolute frame-to-frame change (degrees)
    pub max_delta: f64,
    /// Standard deviation of the changes (degrees)
    pub std_dev_delta: f64,
    /// Jump events above the maximum frame delta
    pub sudden_jumps: usize,
    /// `1 - min(std_dev_delta / 10, 1)`
    pub smoothness_score: f64,
}

/// Trajectory classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryResult {
    /// Classified pattern
    pub pattern: TrajectoryPattern,
    /// Pattern the caller expected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_pattern: Option<TrajectoryPattern>,
    /// True when no expectation was supplied or it matched
    pub matches_expected: bool,
    /// Max minus min angle (degrees)
    pub range_of_motion: f64,
    /// Largest absolute angular velocity (degrees per second)
    pub peak_velocity: f64,
    /// Mean absolute angular velocity (degrees per second)
    pub mean_velocity: f64,
    /// Direction reversals between significant velocities
    pub direction_reversals: usize,
    /// Whether the series was smoothed before classification
    pub smoothed: bool,
    /// Human-readable notes on mismatches
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

/// Persistence of one compensation type across the sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationTracking {
    /// Compensation tracked
    pub compensation_type: CompensationType,
    /// Frames where it was reported
    pub frames_detected: usize,
    /// Frames in the sequence
    pub total_frames: usize,
    /// `frames_detected / total_frames * 100`
    pub persistence_rate: f64,
    /// Persistence above the configured threshold
    pub is_persistent: bool,
    /// Severity in the last third exceeds the first third
    pub is_progressive: bool,
    /// Mean severity level across all frames (absence counts 0)
    pub mean_severity_level: f64,
    /// Worst severity observed
    pub peak_severity: Severity,
}

/// Per-frame quality over the sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityDegradationResult {
    /// No frame below the floor and dropouts within the maximum
    pub passed: bool,
    /// First frame quality
    pub initial_quality: f64,
    /// Last frame quality
    pub final_quality: f64,
    /// Mean quality
    pub mean_quality: f64,
    /// Lowest quality
    pub min_quality: f64,
    /// `(initial - final) / duration`, quality units per second
    pub degradation_rate: f64,
    /// Frames below the quality floor
    pub frames_below_threshold: usize,
    /// Frame-to-frame drops above the dropout delta
    pub dropouts: usize,
}

/// Temporal validation of one sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalValidationResult {
    /// Sequence analysed
    pub sequence_id: Uuid,
    /// Consistency, quality and expected pattern all passed
    pub passed: bool,
    /// Frame-to-frame consistency
    pub consistency: ConsistencyResult,
    /// Trajectory classification
    pub trajectory: TrajectoryResult,
    /// Compensation persistence, ordered by type
    pub compensations: Vec<CompensationTracking>,
    /// Quality degradation
    pub quality: QualityDegradationResult,
}
