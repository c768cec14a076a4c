// ABOUTME: Body landmarks, anatomical landmark identifiers and pluggable skeleton schemas
// ABOUTME: Schema tables map anatomical landmarks to pose-model indices so new models are data changes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::Vector3D;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One detected body landmark in normalized image coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Model-specific landmark name
    pub name: String,
    /// Horizontal position (0 = left edge, 1 = right edge)
    pub x: f64,
    /// Vertical position (0 = top edge, 1 = bottom edge)
    pub y: f64,
    /// Relative depth when the model provides it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Detection confidence (0.0-1.0)
    pub visibility: f64,
}

impl Landmark {
    /// Create a 2D landmark
    #[must_use]
    pub fn new(name: impl Into<String>, x: f64, y: f64, visibility: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            z: None,
            visibility,
        }
    }

    /// Attach a depth value
    #[must_use]
    pub const fn with_depth(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Position as a vector, with missing depth read as zero
    #[must_use]
    pub fn position(&self) -> Vector3D {
        Vector3D::new(self.x, self.y, self.z.unwrap_or(0.0))
    }

    /// Position with depth discarded
    #[must_use]
    pub const fn position_2d(&self) -> Vector3D {
        Vector3D::new(self.x, self.y, 0.0)
    }
}

/// Side of the body, from the subject's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodySide {
    /// Subject's left
    Left,
    /// Subject's right
    Right,
}

impl BodySide {
    /// The other side
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for BodySide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anatomical landmarks the engine consumes, independent of the pose model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkId {
    /// Nose tip
    Nose,
    /// Left shoulder (glenohumeral joint centre)
    LeftShoulder,
    /// Right shoulder
    RightShoulder,
    /// Left elbow
    LeftElbow,
    /// Right elbow
    RightElbow,
    /// Left wrist
    LeftWrist,
    /// Right wrist
    RightWrist,
    /// Left hip
    LeftHip,
    /// Right hip
    RightHip,
    /// Left knee
    LeftKnee,
    /// Right knee
    RightKnee,
    /// Left ankle
    LeftAnkle,
    /// Right ankle
    RightAnkle,
}

impl LandmarkId {
    /// Shoulder on the given side
    #[must_use]
    pub const fn shoulder(side: BodySide) -> Self {
        match side {
            BodySide::Left => Self::LeftShoulder,
            BodySide::Right => Self::RightShoulder,
        }
    }

    /// Elbow on the given side
    #[must_use]
    pub const fn elbow(side: BodySide) -> Self {
        match side {
            BodySide::Left => Self::LeftElbow,
            BodySide::Right => Self::RightElbow,
        }
    }

    /// Wrist on the given side
    #[must_use]
    pub const fn wrist(side: BodySide) -> Self {
        match side {
            BodySide::Left => Self::LeftWrist,
            BodySide::Right => Self::RightWrist,
        }
    }

    /// Hip on the given side
    #[must_use]
    pub const fn hip(side: BodySide) -> Self {
        match side {
            BodySide::Left => Self::LeftHip,
            BodySide::Right => Self::RightHip,
        }
    }

    /// Knee on the given side
    #[must_use]
    pub const fn knee(side: BodySide) -> Self {
        match side {
            BodySide::Left => Self::LeftKnee,
            BodySide::Right => Self::RightKnee,
        }
    }

    /// Ankle on the given side
    #[must_use]
    pub const fn ankle(side: BodySide) -> Self {
        match side {
            BodySide::Left => Self::LeftAnkle,
            BodySide::Right => Self::RightAnkle,
        }
    }

    /// Snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for LandmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup table from anatomical landmark to pose-model index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkeletonSchema {
    /// Schema name
    pub name: &'static str,
    /// Landmarks the model emits per pose
    pub landmark_count: usize,
    /// Index of each supported landmark
    pub indices: &'static [(LandmarkId, usize)],
}

impl SkeletonSchema {
    /// Model index of a landmark, if this schema provides it
    #[must_use]
    pub fn index_of(&self, id: LandmarkId) -> Option<usize> {
        self.indices
            .iter()
            .find_map(|(candidate, index)| (*candidate == id).then_some(*index))
    }
}

/// `MediaPipe` Pose (33 landmarks)
pub const MEDIAPIPE_POSE: SkeletonSchema = SkeletonSchema {
    name: "mediapipe_pose",
    landmark_count: 33,
    indices: &[
        (LandmarkId::Nose, 0),
        (LandmarkId::LeftShoulder, 11),
        (LandmarkId::RightShoulder, 12),
        (LandmarkId::LeftElbow, 13),
        (LandmarkId::RightElbow, 14),
        (LandmarkId::LeftWrist, 15),
        (LandmarkId::RightWrist, 16),
        (LandmarkId::LeftHip, 23),
        (LandmarkId::RightHip, 24),
        (LandmarkId::LeftKnee, 25),
        (LandmarkId::RightKnee, 26),
        (LandmarkId::LeftAnkle, 27),
        (LandmarkId::RightAnkle, 28),
    ],
};

/// `MoveNet` / COCO keypoints (17 landmarks)
pub const MOVENET: SkeletonSchema = SkeletonSchema {
    name: "movenet",
    landmark_count: 17,
    indices: &[
        (LandmarkId::Nose, 0),
        (LandmarkId::LeftShoulder, 5),
        (LandmarkId::RightShoulder, 6),
        (LandmarkId::LeftElbow, 7),
        (LandmarkId::RightElbow, 8),
        (LandmarkId::LeftWrist, 9),
        (LandmarkId::RightWrist, 10),
        (LandmarkId::LeftHip, 11),
        (LandmarkId::RightHip, 12),
        (LandmarkId::LeftKnee, 13),
        (LandmarkId::RightKnee, 14),
        (LandmarkId::LeftAnkle, 15),
        (LandmarkId::RightAnkle, 16),
    ],
};

/// Skeleton schema a pose was produced with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkeletonKind {
    /// `MediaPipe` Pose topology
    #[default]
    MediapipePose,
    /// `MoveNet` / COCO topology
    Movenet,
}

impl SkeletonKind {
    /// Lookup table for this topology
    #[must_use]
    pub const fn schema(self) -> &'static SkeletonSchema {
        match self {
            Self::MediapipePose => &MEDIAPIPE_POSE,
            Self::Movenet => &MOVENET,
        }
    }
}

/// Borrowed view of a landmark array resolved through a skeleton schema
#[derive(Debug, Clone, Copy)]
pub struct PoseLandmarks<'a> {
    landmarks: &'a [Landmark],
    schema: &'a SkeletonSchema,
}

impl<'a> PoseLandmarks<'a> {
    /// Wrap a landmark array
    #[must_use]
    pub const fn new(landmarks: &'a [Landmark], schema: &'a SkeletonSchema) -> Self {
        Self { landmarks, schema }
    }

    /// Schema used for lookups
    #[must_use]
    pub const fn schema(&self) -> &'a SkeletonSchema {
        self.schema
    }

    /// Landmark by anatomical id, regardless of visibility
    #[must_use]
    pub fn get(&self, id: LandmarkId) -> Option<&'a Landmark> {
        self.schema
            .index_of(id)
            .and_then(|index| self.landmarks.get(index))
    }

    /// Landmark by anatomical id, only when visibility reaches `min_visibility`
    #[must_use]
    pub fn visible(&self, id: LandmarkId, min_visibility: f64) -> Option<&'a Landmark> {
        self.get(id)
            .filter(|landmark| landmark.visibility >= min_visibility)
    }

    /// Visibility of a landmark, zero when absent
    #[must_use]
    pub fn visibility(&self, id: LandmarkId) -> f64 {
        self.get(id).map_or(0.0, |landmark| landmark.visibility)
    }
}
