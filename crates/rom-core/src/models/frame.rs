// ABOUTME: ISB-style anatomical reference frames and the planes derived from them
// ABOUTME: Frame identifiers, cache slots and the per-pose set of computed frames
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{BodySide, Vector3D};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body segment a reference frame is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameType {
    /// Whole-body frame anchored at the hips
    Global,
    /// Upper trunk anchored at the shoulders
    Thorax,
    /// Pelvis anchored at the hips
    Pelvis,
    /// Upper arm
    Humerus,
    /// Lower arm
    Forearm,
}

impl FrameType {
    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Thorax => "thorax",
            Self::Pelvis => "pelvis",
            Self::Humerus => "humerus",
            Self::Forearm => "forearm",
        }
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame type plus side, identifying one frame within a pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSlot {
    /// Global frame
    Global,
    /// Thorax frame
    Thorax,
    /// Pelvis frame
    Pelvis,
    /// Humerus frame on one side
    Humerus(BodySide),
    /// Forearm frame on one side
    Forearm(BodySide),
}

impl FrameSlot {
    /// Segment type of this slot
    #[must_use]
    pub const fn frame_type(self) -> FrameType {
        match self {
            Self::Global => FrameType::Global,
            Self::Thorax => FrameType::Thorax,
            Self::Pelvis => FrameType::Pelvis,
            Self::Humerus(_) => FrameType::Humerus,
            Self::Forearm(_) => FrameType::Forearm,
        }
    }

    /// Side of a limb slot
    #[must_use]
    pub const fn side(self) -> Option<BodySide> {
        match self {
            Self::Humerus(side) | Self::Forearm(side) => Some(side),
            Self::Global | Self::Thorax | Self::Pelvis => None,
        }
    }
}

/// Orthonormal segment coordinate system
///
/// X anterior, Y superior (proximal for limbs), Z toward the subject's right, `X = Y × Z`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnatomicalReferenceFrame {
    /// Frame origin in landmark space
    pub origin: Vector3D,
    /// Anterior unit axis
    pub x_axis: Vector3D,
    /// Superior / proximal unit axis
    pub y_axis: Vector3D,
    /// Lateral (subject right) unit axis
    pub z_axis: Vector3D,
    /// Segment this frame belongs to
    pub frame_type: FrameType,
    /// Mean visibility of the landmarks used, halved when an axis fell back
    pub confidence: f64,
}

/// Anatomical plane identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaneName {
    /// Splits left from right (normal = frame Z)
    Sagittal,
    /// Splits front from back (normal = frame X)
    Coronal,
    /// Splits top from bottom (normal = frame Y)
    Transverse,
    /// Coronal plane rotated anteriorly about Y
    Scapular,
}

impl PlaneName {
    /// Lowercase label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sagittal => "sagittal",
            Self::Coronal => "coronal",
            Self::Transverse => "transverse",
            Self::Scapular => "scapular",
        }
    }
}

impl fmt::Display for PlaneName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A plane through a frame origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnatomicalPlane {
    /// Plane identifier
    pub name: PlaneName,
    /// Unit normal
    pub normal: Vector3D,
    /// A point on the plane
    pub point: Vector3D,
    /// Rotation from the cardinal plane it was derived from (degrees)
    pub rotation: f64,
}

/// Every frame computed for one pose
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedAnatomicalFrames {
    /// Global frame
    pub global: AnatomicalReferenceFrame,
    /// Thorax frame
    pub thorax: AnatomicalReferenceFrame,
    /// Pelvis frame, absent when a hip is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pelvis: Option<AnatomicalReferenceFrame>,
    /// Left humerus frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_humerus: Option<AnatomicalReferenceFrame>,
    /// Right humerus frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_humerus: Option<AnatomicalReferenceFrame>,
    /// Left forearm frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_forearm: Option<AnatomicalReferenceFrame>,
    /// Right forearm frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_forearm: Option<AnatomicalReferenceFrame>,
}

impl CachedAnatomicalFrames {
    /// Humerus frame on a side
    #[must_use]
    pub const fn humerus(&self, side: BodySide) -> Option<&AnatomicalReferenceFrame> {
        match side {
            BodySide::Left => self.left_humerus.as_ref(),
            BodySide::Right => self.right_humerus.as_ref(),
        }
    }

    /// Forearm frame on a side
    #[must_use]
    pub const fn forearm(&self, side: BodySide) -> Option<&AnatomicalReferenceFrame> {
        match side {
            BodySide::Left => self.left_forearm.as_ref(),
            BodySide::Right => self.right_forearm.as_ref(),
        }
    }

    /// Frame stored in a slot
    #[must_use]
    pub const fn get(&self, slot: FrameSlot) -> Option<&AnatomicalReferenceFrame> {
        match slot {
            FrameSlot::Global => Some(&self.global),
            FrameSlot::Thorax => Some(&self.thorax),
            FrameSlot::Pelvis => self.pelvis.as_ref(),
            FrameSlot::Humerus(side) => self.humerus(side),
            FrameSlot::Forearm(side) => self.forearm(side),
        }
    }
}
