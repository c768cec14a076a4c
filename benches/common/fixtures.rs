// ABOUTME: Benchmark pose fixtures for generating repetitions of clinical movements
// ABOUTME: Provides deterministic pose generation for reproducible performance measurements
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Benchmark pose fixtures.
//!
//! Poses are in normalized image coordinates (x right, y down) for a camera facing the
//! subject. Generation is deterministic so runs are comparable.

use rom_core::models::{Landmark, LandmarkId, ProcessedPoseData, SkeletonKind, ViewOrientation};

const VISIBLE: f64 = 0.95;
const UPPER_ARM: f64 = 0.15;
const FOREARM: f64 = 0.13;

/// Predefined repetition lengths for benchmark scenarios
#[derive(Debug, Clone, Copy)]
pub enum RepetitionLength {
    /// One second at 30 fps
    Short,
    /// Four seconds at 30 fps, a typical slow repetition
    Typical,
}

impl RepetitionLength {
    #[must_use]
    pub const fn frames(self) -> usize {
        match self {
            Self::Short => 30,
            Self::Typical => 120,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Short => "30_frames",
            Self::Typical => "120_frames",
        }
    }
}

fn arm_point(origin: (f64, f64), length: f64, angle: f64, right: bool) -> (f64, f64) {
    let (sin, cos) = angle.to_radians().sin_cos();
    let outward = if right { -1.0 } else { 1.0 };
    (origin.0 + outward * length * sin, origin.1 + length * cos)
}

/// Frontal pose with both arms abducted to `angle` degrees
///
/// `jitter` shifts every landmark by a small deterministic offset to imitate detector noise.
#[must_use]
pub fn abduction_pose(angle: f64, jitter: f64) -> ProcessedPoseData {
    let right_elbow = arm_point((0.40, 0.30), UPPER_ARM, angle, true);
    let right_wrist = arm_point(right_elbow, FOREARM, angle, true);
    let left_elbow = arm_point((0.60, 0.30), UPPER_ARM, angle, false);
    let left_wrist = arm_point(left_elbow, FOREARM, angle, false);

    let points = [
        (LandmarkId::Nose, (0.50, 0.15)),
        (LandmarkId::RightShoulder, (0.40, 0.30)),
        (LandmarkId::LeftShoulder, (0.60, 0.30)),
        (LandmarkId::RightElbow, right_elbow),
        (LandmarkId::LeftElbow, left_elbow),
        (LandmarkId::RightWrist, right_wrist),
        (LandmarkId::LeftWrist, left_wrist),
        (LandmarkId::RightHip, (0.43, 0.60)),
        (LandmarkId::LeftHip, (0.57, 0.60)),
        (LandmarkId::RightKnee, (0.43, 0.78)),
        (LandmarkId::LeftKnee, (0.57, 0.78)),
        (LandmarkId::RightAnkle, (0.43, 0.95)),
        (LandmarkId::LeftAnkle, (0.57, 0.95)),
    ];

    let schema = SkeletonKind::MediapipePose.schema();
    let mut landmarks: Vec<Landmark> = (0..schema.landmark_count)
        .map(|i| Landmark::new(format!("unused_{i}"), 0.0, 0.0, 0.0))
        .collect();
    for (i, (id, (x, y))) in points.into_iter().enumerate() {
        let offset = if i % 2 == 0 { jitter } else { -jitter };
        if let Some(index) = schema.index_of(id) {
            landmarks[index] = Landmark::new(id.as_str(), x + offset, y - offset, VISIBLE);
        }
    }

    ProcessedPoseData::new(landmarks, SkeletonKind::MediapipePose)
        .with_view(ViewOrientation::Frontal)
}

/// One abduction repetition from the side up to `peak` degrees and back down
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn abduction_repetition(length: RepetitionLength, peak: f64) -> Vec<ProcessedPoseData> {
    let frames = length.frames();
    let half = (frames / 2).max(1) as f64;
    (0..frames)
        .map(|i| {
            let phase = i as f64 / half;
            let fraction = if phase <= 1.0 { phase } else { 2.0 - phase };
            abduction_pose(peak * fraction, 0.0)
        })
        .collect()
}
