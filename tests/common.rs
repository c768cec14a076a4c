// ABOUTME: Shared test utilities and pose fixtures for integration tests
// ABOUTME: Quiet tracing setup plus frontal and side-view pose fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::similar_names
)]
//! Shared test utilities for `rom_engine`
//!
//! Poses are in normalized image coordinates (x right, y down). Frontal poses face the
//! camera, so the subject's right side appears at smaller x.

use rom_core::models::{
    Landmark, LandmarkId, ProcessedPoseData, SkeletonKind, ViewOrientation,
};
use std::env;
use std::sync::Once;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG controls the level; default to WARN for quiet tests
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            Ok("WARN" | "ERROR") | _ => Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Visibility given to fixture landmarks
pub const VISIBLE: f64 = 0.95;

/// Upper arm length in fixture units
pub const UPPER_ARM: f64 = 0.15;

/// Forearm length in fixture units
pub const FOREARM: f64 = 0.13;

/// Point placed at `angle` degrees from straight down, swinging toward the subject's right
/// for the right arm and toward the subject's left for the left arm
pub fn arm_point(origin: (f64, f64), length: f64, angle: f64, right: bool) -> (f64, f64) {
    let (sin, cos) = angle.to_radians().sin_cos();
    let outward = if right { -1.0 } else { 1.0 };
    (origin.0 + outward * length * sin, origin.1 + length * cos)
}

/// Mutable fixture pose keyed by anatomical landmark
#[derive(Debug, Clone)]
pub struct PoseBuilder {
    points: Vec<(LandmarkId, f64, f64, f64)>,
    view: ViewOrientation,
}

impl PoseBuilder {
    /// Standing upright facing the camera, arms hanging, elbows straight
    pub fn standing_frontal() -> Self {
        Self {
            points: vec![
                (LandmarkId::Nose, 0.50, 0.15, VISIBLE),
                (LandmarkId::RightShoulder, 0.40, 0.30, VISIBLE),
                (LandmarkId::LeftShoulder, 0.60, 0.30, VISIBLE),
                (LandmarkId::RightElbow, 0.40, 0.45, VISIBLE),
                (LandmarkId::LeftElbow, 0.60, 0.45, VISIBLE),
                (LandmarkId::RightWrist, 0.40, 0.58, VISIBLE),
                (LandmarkId::LeftWrist, 0.60, 0.58, VISIBLE),
                (LandmarkId::RightHip, 0.43, 0.60, VISIBLE),
                (LandmarkId::LeftHip, 0.57, 0.60, VISIBLE),
                (LandmarkId::RightKnee, 0.43, 0.78, VISIBLE),
                (LandmarkId::LeftKnee, 0.57, 0.78, VISIBLE),
                (LandmarkId::RightAnkle, 0.43, 0.95, VISIBLE),
                (LandmarkId::LeftAnkle, 0.57, 0.95, VISIBLE),
            ],
            view: ViewOrientation::Frontal,
        }
    }

    /// Right arm straight overhead
    pub fn overhead_flexion() -> Self {
        Self::standing_frontal()
            .with(LandmarkId::RightElbow, 0.40, 0.15)
            .with(LandmarkId::RightWrist, 0.40, 0.02)
    }

    /// Both arms abducted to `angle` with straight elbows
    pub fn bilateral_abduction(angle: f64) -> Self {
        let mut pose = Self::standing_frontal();
        for (right, shoulder, elbow, wrist) in [
            (true, (0.40, 0.30), LandmarkId::RightElbow, LandmarkId::RightWrist),
            (false, (0.60, 0.30), LandmarkId::LeftElbow, LandmarkId::LeftWrist),
        ] {
            let elbow_at = arm_point(shoulder, UPPER_ARM, angle, right);
            let wrist_at = arm_point(elbow_at, FOREARM, angle, right);
            pose = pose
                .with(elbow, elbow_at.0, elbow_at.1)
                .with(wrist, wrist_at.0, wrist_at.1);
        }
        pose
    }

    /// Right upper arm at the side with the forearm rotated `rotation` degrees outward
    ///
    /// `elbow_angle` is the interior elbow angle seen in the image; 90° keeps the wrist level
    /// with the elbow. The visible forearm length follows the expected foreshortening.
    pub fn right_rotation(rotation: f64, elbow_angle: f64) -> Self {
        let elbow = (0.40, 0.30 + UPPER_ARM);
        let visible = UPPER_ARM * 0.79 * rotation.to_radians().sin();
        let (sin, cos) = elbow_angle.to_radians().sin_cos();
        // Direction measured from the upper arm (pointing up toward the shoulder)
        let wrist = (elbow.0 - visible * sin, elbow.1 - visible * cos);
        Self::standing_frontal()
            .with(LandmarkId::RightElbow, elbow.0, elbow.1)
            .with(LandmarkId::RightWrist, wrist.0, wrist.1)
    }

    /// Side view with the right knee bent to 90°
    pub fn seated_knee_side() -> Self {
        Self {
            points: vec![
                (LandmarkId::Nose, 0.50, 0.15, VISIBLE),
                (LandmarkId::RightShoulder, 0.50, 0.30, VISIBLE),
                (LandmarkId::LeftShoulder, 0.50, 0.30, VISIBLE),
                (LandmarkId::RightElbow, 0.50, 0.45, VISIBLE),
                (LandmarkId::LeftElbow, 0.50, 0.45, VISIBLE),
                (LandmarkId::RightWrist, 0.50, 0.58, VISIBLE),
                (LandmarkId::LeftWrist, 0.50, 0.58, VISIBLE),
                (LandmarkId::RightHip, 0.50, 0.60, VISIBLE),
                (LandmarkId::LeftHip, 0.50, 0.60, VISIBLE),
                (LandmarkId::RightKnee, 0.50, 0.78, VISIBLE),
                (LandmarkId::LeftKnee, 0.50, 0.78, VISIBLE),
                (LandmarkId::RightAnkle, 0.68, 0.78, VISIBLE),
                (LandmarkId::LeftAnkle, 0.68, 0.78, VISIBLE),
            ],
            view: ViewOrientation::Sagittal,
        }
    }

    /// Side view, right arm raised `angle` degrees forward with a straight elbow
    ///
    /// The far (left) shoulder and hip sit `offset` further along image x, as they do when
    /// the subject is not perfectly side-on.
    pub fn side_flexion(angle: f64, offset: f64) -> Self {
        let shoulder = (0.50, 0.30);
        // Forward is image right, which `arm_point` uses for the left arm
        let elbow = arm_point(shoulder, UPPER_ARM, angle, false);
        let wrist = arm_point(elbow, FOREARM, angle, false);
        Self {
            points: vec![
                (LandmarkId::Nose, 0.53, 0.15, VISIBLE),
                (LandmarkId::RightShoulder, shoulder.0, shoulder.1, VISIBLE),
                (LandmarkId::LeftShoulder, shoulder.0 + offset, shoulder.1, VISIBLE),
                (LandmarkId::RightElbow, elbow.0, elbow.1, VISIBLE),
                (LandmarkId::LeftElbow, 0.50 + offset, 0.45, VISIBLE),
                (LandmarkId::RightWrist, wrist.0, wrist.1, VISIBLE),
                (LandmarkId::LeftWrist, 0.50 + offset, 0.58, VISIBLE),
                (LandmarkId::RightHip, 0.50, 0.60, VISIBLE),
                (LandmarkId::LeftHip, 0.50 + offset, 0.60, VISIBLE),
                (LandmarkId::RightKnee, 0.50, 0.78, VISIBLE),
                (LandmarkId::LeftKnee, 0.50 + offset, 0.78, VISIBLE),
                (LandmarkId::RightAnkle, 0.50, 0.95, VISIBLE),
                (LandmarkId::LeftAnkle, 0.50 + offset, 0.95, VISIBLE),
            ],
            view: ViewOrientation::Sagittal,
        }
    }

    /// Move a landmark
    pub fn with(mut self, id: LandmarkId, x: f64, y: f64) -> Self {
        for point in &mut self.points {
            if point.0 == id {
                point.1 = x;
                point.2 = y;
            }
        }
        self
    }

    /// Change a landmark's visibility
    pub fn visibility(mut self, id: LandmarkId, visibility: f64) -> Self {
        for point in &mut self.points {
            if point.0 == id {
                point.3 = visibility;
            }
        }
        self
    }

    /// Change the camera view
    pub const fn view(mut self, view: ViewOrientation) -> Self {
        self.view = view;
        self
    }

    /// `MediaPipe` landmark array; unused indices are invisible
    pub fn landmarks(&self) -> Vec<Landmark> {
        let schema = SkeletonKind::MediapipePose.schema();
        let mut landmarks: Vec<Landmark> = (0..schema.landmark_count)
            .map(|i| Landmark::new(format!("unused_{i}"), 0.0, 0.0, 0.0))
            .collect();
        for &(id, x, y, visibility) in &self.points {
            if let Some(index) = schema.index_of(id) {
                landmarks[index] = Landmark::new(id.as_str(), x, y, visibility);
            }
        }
        landmarks
    }

    /// Pose with the view set and no frames
    pub fn build(&self) -> ProcessedPoseData {
        ProcessedPoseData::new(self.landmarks(), SkeletonKind::MediapipePose).with_view(self.view)
    }
}
