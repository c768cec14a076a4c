// ABOUTME: Pose input contract supplied by the upstream pose detector
// ABOUTME: Landmarks plus skeleton schema, camera view, precomputed frames and depth flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{CachedAnatomicalFrames, Landmark, PoseLandmarks, SkeletonKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Camera position relative to the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewOrientation {
    /// Camera faces the subject's front
    Frontal,
    /// Camera sees the subject's side
    Sagittal,
    /// Side view as reported by some detectors
    Lateral,
    /// Camera faces the subject's back
    Posterior,
}

impl ViewOrientation {
    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Frontal => "frontal",
            Self::Sagittal => "sagittal",
            Self::Lateral => "lateral",
            Self::Posterior => "posterior",
        }
    }

    /// Whether the camera sees the subject from the side
    #[must_use]
    pub const fn is_side_view(self) -> bool {
        matches!(self, Self::Sagittal | Self::Lateral)
    }
}

impl fmt::Display for ViewOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One frame of pose-detector output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedPoseData {
    /// Landmarks in the skeleton's index order
    pub landmarks: Vec<Landmark>,
    /// Topology the landmarks follow
    #[serde(default)]
    pub skeleton: SkeletonKind,
    /// Camera view, when the detector classified it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_orientation: Option<ViewOrientation>,
    /// Frames computed by the anatomical reference service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_anatomical_frames: Option<CachedAnatomicalFrames>,
    /// Whether z values come from real depth sensing
    #[serde(default)]
    pub has_depth: bool,
    /// Detector's overall pose quality (0.0-1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    /// Capture time
    pub timestamp: DateTime<Utc>,
}

impl ProcessedPoseData {
    /// Pose without frames or view, stamped now
    #[must_use]
    pub fn new(landmarks: Vec<Landmark>, skeleton: SkeletonKind) -> Self {
        Self {
            landmarks,
            skeleton,
            view_orientation: None,
            cached_anatomical_frames: None,
            has_depth: false,
            quality_score: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the camera view
    #[must_use]
    pub const fn with_view(mut self, view: ViewOrientation) -> Self {
        self.view_orientation = Some(view);
        self
    }

    /// Mark z values as real depth
    #[must_use]
    pub const fn with_depth(mut self, has_depth: bool) -> Self {
        self.has_depth = has_depth;
        self
    }

    /// Set the capture time
    #[must_use]
    pub const fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Landmark accessor bound to this pose's schema
    #[must_use]
    pub fn pose_landmarks(&self) -> PoseLandmarks<'_> {
        PoseLandmarks::new(&self.landmarks, self.skeleton.schema())
    }
}
