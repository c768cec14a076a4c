// ABOUTME: Goniometer output and clinical joint measurement values
// ABOUTME: Movements, joints, grades, secondary-joint checks and measurement quality
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{
    AnatomicalReferenceFrame, BodySide, CompensationPattern, LandmarkId, Vector3D, ViewOrientation,
};
use crate::errors::DegradedInputWarning;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Movements the clinical measurement service can grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Forward elevation of the arm in the sagittal plane
    ShoulderFlexion,
    /// Sideways elevation of the arm in the coronal plane
    ShoulderAbduction,
    /// External (+) or internal (-) rotation with the elbow at 90°
    ShoulderRotation,
    /// Bending of the elbow
    ElbowFlexion,
    /// Bending of the knee
    KneeFlexion,
}

const FLEXION_VIEWS: &[ViewOrientation] = &[
    ViewOrientation::Sagittal,
    ViewOrientation::Lateral,
    ViewOrientation::Frontal,
];
const CORONAL_VIEWS: &[ViewOrientation] = &[ViewOrientation::Frontal, ViewOrientation::Posterior];
const SIDE_VIEWS: &[ViewOrientation] = &[ViewOrientation::Sagittal, ViewOrientation::Lateral];

impl MovementType {
    /// Camera views from which the movement is geometrically observable, preferred first
    #[must_use]
    pub const fn allowed_views(self) -> &'static [ViewOrientation] {
        match self {
            Self::ShoulderFlexion | Self::ElbowFlexion => FLEXION_VIEWS,
            Self::ShoulderAbduction | Self::ShoulderRotation => CORONAL_VIEWS,
            Self::KneeFlexion => SIDE_VIEWS,
        }
    }

    /// Whether this is a shoulder movement (elbow expected extended or gated)
    #[must_use]
    pub const fn is_shoulder(self) -> bool {
        matches!(
            self,
            Self::ShoulderFlexion | Self::ShoulderAbduction | Self::ShoulderRotation
        )
    }

    /// Joint the movement is measured at
    #[must_use]
    pub const fn joint(self, side: BodySide) -> JointName {
        match self {
            Self::ShoulderFlexion | Self::ShoulderAbduction | Self::ShoulderRotation => {
                JointName::shoulder(side)
            }
            Self::ElbowFlexion => JointName::elbow(side),
            Self::KneeFlexion => JointName::knee(side),
        }
    }

    /// Snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShoulderFlexion => "shoulder_flexion",
            Self::ShoulderAbduction => "shoulder_abduction",
            Self::ShoulderRotation => "shoulder_rotation",
            Self::ElbowFlexion => "elbow_flexion",
            Self::KneeFlexion => "knee_flexion",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joints tracked by the goniometer, used as fixed history indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointName {
    /// Left shoulder (hip - shoulder - elbow)
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left elbow (shoulder - elbow - wrist)
    LeftElbow,
    /// Right elbow
    RightElbow,
    /// Left hip (shoulder - hip - knee)
    LeftHip,
    /// Right hip
    RightHip,
    /// Left knee (hip - knee - ankle)
    LeftKnee,
    /// Right knee
    RightKnee,
}

impl JointName {
    /// Number of tracked joints
    pub const COUNT: usize = 8;

    /// Every tracked joint in index order
    pub const ALL: [Self; Self::COUNT] = [
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
    ];

    /// Shoulder on a side
    #[must_use]
    pub const fn shoulder(side: BodySide) -> Self {
        match side {
            BodySide::Left => Self::LeftShoulder,
            BodySide::Right => Self::RightShoulder,
        }
    }

    /// Elbow on a side
    #[must_use]
    pub const fn elbow(side: BodySide) -> Self {
        match side {
            BodySide::Left => Self::LeftElbow,
            BodySide::Right => Self::RightElbow,
        }
    }

    /// Hip on a side
    #[must_use]
    pub const fn hip(side: BodySide) -> Self {
        match side {
            BodySide::Left => Self::LeftHip,
            BodySide::Right => Self::RightHip,
        }
    }

    /// Knee on a side
    #[must_use]
    pub const fn knee(side: BodySide) -> Self {
        match side {
            BodySide::Left => Self::LeftKnee,
            BodySide::Right => Self::RightKnee,
        }
    }

    /// Position in `ALL`
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Body side
    #[must_use]
    pub const fn side(self) -> BodySide {
        match self {
            Self::LeftShoulder | Self::LeftElbow | Self::LeftHip | Self::LeftKnee => {
                BodySide::Left
            }
            Self::RightShoulder | Self::RightElbow | Self::RightHip | Self::RightKnee => {
                BodySide::Right
            }
        }
    }

    /// Proximal landmark, vertex and distal landmark of the interior angle
    #[must_use]
    pub const fn landmarks(self) -> (LandmarkId, LandmarkId, LandmarkId) {
        let side = self.side();
        match self {
            Self::LeftShoulder | Self::RightShoulder => (
                LandmarkId::hip(side),
                LandmarkId::shoulder(side),
                LandmarkId::elbow(side),
            ),
            Self::LeftElbow | Self::RightElbow => (
                LandmarkId::shoulder(side),
                LandmarkId::elbow(side),
                LandmarkId::wrist(side),
            ),
            Self::LeftHip | Self::RightHip => (
                LandmarkId::shoulder(side),
                LandmarkId::hip(side),
                LandmarkId::knee(side),
            ),
            Self::LeftKnee | Self::RightKnee => (
                LandmarkId::hip(side),
                LandmarkId::knee(side),
                LandmarkId::ankle(side),
            ),
        }
    }

    /// Snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
        }
    }
}

impl fmt::Display for JointName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw interior angle from the goniometer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointAngle {
    /// Joint the angle was measured at
    pub joint_name: JointName,
    /// Interior angle in degrees (0-180), smoothed when smoothing is enabled
    pub angle: f64,
    /// Lowest visibility of the three landmarks
    pub confidence: f64,
    /// Whether every landmark passed the confidence gate
    pub is_valid: bool,
    /// Vertex-to-proximal and vertex-to-distal vectors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vectors: Option<[Vector3D; 2]>,
}

impl JointAngle {
    /// Result for landmarks that failed the confidence gate
    #[must_use]
    pub const fn invalid(joint_name: JointName, confidence: f64) -> Self {
        Self {
            joint_name,
            angle: 0.0,
            confidence,
            is_valid: false,
            vectors: None,
        }
    }
}

/// Clinical grade relative to the normal range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicalGrade {
    /// At or above the functional target
    Excellent,
    /// At or above the minimum acceptable angle
    Good,
    /// Within 75% of the minimum acceptable angle
    Fair,
    /// Below that
    Limited,
}

/// Clinical convention the primary angle is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AngleType {
    /// 0° at the neutral position, increasing with flexion
    Flexion,
    /// 0° arm at side, 180° overhead
    Abduction,
    /// Rotation away from the body (positive signed angle)
    ExternalRotation,
    /// Rotation toward the body (negative signed angle)
    InternalRotation,
}

/// Abduction decomposition into glenohumeral and scapulothoracic motion
///
/// Every value is `None` when the rhythm is indeterminate (setting phase or no measurable tilt).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MeasurementComponents {
    /// Glenohumeral contribution (degrees)
    pub glenohumeral: Option<f64>,
    /// Scapulothoracic contribution (degrees)
    pub scapulothoracic: Option<f64>,
    /// Glenohumeral : scapulothoracic ratio
    pub rhythm_ratio: Option<f64>,
}

/// Primary joint result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryJointMeasurement {
    /// Joint measured
    pub name: JointName,
    /// Movement measured
    #[serde(rename = "type")]
    pub movement: MovementType,
    /// Clinical angle in degrees (magnitude for rotation)
    pub angle: f64,
    /// Clinical convention of `angle`
    pub angle_type: AngleType,
    /// Functional target for this movement
    pub target_angle: f64,
    /// `angle / target_angle * 100`
    pub percent_of_target: f64,
    /// Grade against the clinical thresholds
    pub clinical_grade: ClinicalGrade,
    /// Signed angle for rotation (+ external)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_angle: Option<f64>,
    /// Abduction components
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<MeasurementComponents>,
}

/// Role of a secondary joint check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryPurpose {
    /// Failing degrades quality but the primary value stands
    Validation,
    /// Failing makes the primary value low confidence
    Gating,
}

/// Secondary joint check result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryJointMeasurement {
    /// Measured (or assumed) angle in degrees
    pub angle: f64,
    /// Whether `deviation` is within `tolerance`
    pub within_tolerance: bool,
    /// Allowed deviation (degrees)
    pub tolerance: f64,
    /// Validation or gating
    pub purpose: SecondaryPurpose,
    /// Absolute deviation from the expected angle
    pub deviation: f64,
    /// Whether `angle` is a default because the landmarks were occluded
    #[serde(default)]
    pub assumed: bool,
    /// Human-readable problem description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Overall quality rating, ordered worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityRating {
    /// Unreliable
    Poor,
    /// Usable with caution
    Fair,
    /// Reliable
    Good,
    /// Highly reliable
    Excellent,
}

impl QualityRating {
    /// This rating, lowered to `ceiling` when above it
    #[must_use]
    pub fn capped_at(self, ceiling: Self) -> Self {
        self.min(ceiling)
    }
}

/// Measurement quality assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementQuality {
    /// Rating after caps
    pub overall: QualityRating,
    /// Blended 0-1 score before caps
    pub score: f64,
    /// Depth reliability (reported, not blended)
    pub depth_reliability: f64,
    /// Mean visibility of the landmarks used
    pub landmark_visibility: f64,
    /// Mean confidence of the frames used
    pub frame_stability: f64,
    /// How well the camera view suits the movement
    pub orientation_match: f64,
    /// Actionable suggestions for the user
    pub recommendations: Vec<String>,
    /// Rendered degraded-input warnings
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Complete clinical result for one movement on one pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalJointMeasurement {
    /// Primary joint result
    pub primary_joint: PrimaryJointMeasurement,
    /// Secondary checks keyed by joint
    pub secondary_joints: BTreeMap<JointName, SecondaryJointMeasurement>,
    /// Frames the measurement was computed in
    pub reference_frames: Vec<AnatomicalReferenceFrame>,
    /// Graded compensations
    pub compensations: Vec<CompensationPattern>,
    /// Quality assessment
    pub quality: MeasurementQuality,
    /// Typed degraded-input warnings behind `quality.warnings`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded_inputs: Vec<DegradedInputWarning>,
    /// Side measured
    pub side: BodySide,
    /// Capture time of the pose
    pub timestamp: DateTime<Utc>,
}
