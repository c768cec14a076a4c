// ABOUTME: Detectors for six compensatory movement patterns graded on configurable severity scales
// ABOUTME: Trunk lean/rotation, shoulder hiking, elbow flexion drift, hip hike, contralateral lean
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Compensation detection
//!
//! Each detector has a raw form (`measure_*`) returning an ungraded [`CompensationFinding`]
//! and a graded form (`detect_*`) that applies the pattern's [`SeverityScale`]. Every
//! detector returns `None` when a landmark it consumes is below the visibility gate.

use crate::geometry::{angle_between, dot, midpoint, normalize, project_onto_plane};
use rom_core::config::{CompensationDetectionConfig, EngineConfig};
use rom_core::constants::compensation::SHOULDER_TILT_RANGE_DEG;
use rom_core::constants::geometry::{DEGENERATE_LENGTH, MIN_PROJECTED_LENGTH};
use rom_core::models::{
    BodySide, CachedAnatomicalFrames, CompensationPattern, CompensationType, Landmark, LandmarkId,
    MovementType, PoseLandmarks, Severity, SeverityScale, Vector3D, ViewOrientation,
};
use rom_core::ConfigError;

/// Everything a detector may look at for one pose
#[derive(Debug, Clone, Copy)]
pub struct CompensationContext<'a> {
    /// Landmarks of the pose
    pub landmarks: PoseLandmarks<'a>,
    /// Frames computed for the pose
    pub frames: &'a CachedAnatomicalFrames,
    /// Camera view
    pub view: ViewOrientation,
    /// Movement being measured
    pub movement: MovementType,
    /// Side being measured
    pub side: BodySide,
    /// Whether landmark z carries real depth
    pub has_depth: bool,
}

/// An ungraded detector measurement
#[derive(Debug, Clone, PartialEq)]
pub struct CompensationFinding {
    /// Pattern measured
    pub compensation_type: CompensationType,
    /// Raw magnitude in the pattern's unit
    pub magnitude: f64,
    /// Body region affected
    pub affects_joint: String,
    /// Elevated or leaning side
    pub side: Option<BodySide>,
    /// Centimetre estimate
    pub displacement_cm: Option<f64>,
    /// Clinician-facing description
    pub clinical_note: String,
}

impl CompensationFinding {
    pub(crate) fn new(
        compensation_type: CompensationType,
        magnitude: f64,
        affects_joint: impl Into<String>,
        clinical_note: String,
    ) -> Self {
        Self {
            compensation_type,
            magnitude,
            affects_joint: affects_joint.into(),
            side: None,
            displacement_cm: None,
            clinical_note,
        }
    }

    pub(crate) const fn on_side(mut self, side: Option<BodySide>) -> Self {
        self.side = side;
        self
    }

    const fn displaced(mut self, displacement_cm: Option<f64>) -> Self {
        self.displacement_cm = displacement_cm;
        self
    }

    /// Grade against a scale, `None` below its reporting cut point
    #[must_use]
    pub fn grade(self, scale: &SeverityScale) -> Option<CompensationPattern> {
        let severity = scale.grade(self.magnitude)?;
        Some(self.into_pattern(severity))
    }

    /// Pattern with an explicit severity
    #[must_use]
    pub fn into_pattern(self, severity: Severity) -> CompensationPattern {
        CompensationPattern {
            compensation_type: self.compensation_type,
            severity,
            magnitude: self.magnitude,
            affects_joint: self.affects_joint,
            clinical_note: self.clinical_note,
            side: self.side,
            displacement_cm: self.displacement_cm,
        }
    }
}

/// Runs the compensation detectors
#[derive(Debug, Clone, Default)]
pub struct CompensationDetector {
    config: CompensationDetectionConfig,
}

impl CompensationDetector {
    /// Detector with a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: CompensationDetectionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &CompensationDetectionConfig {
        &self.config
    }

    /// Replace the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid; the current one is kept
    pub fn set_config(&mut self, config: CompensationDetectionConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Grade a finding with this detector's scale for its pattern
    #[must_use]
    pub fn grade(&self, finding: CompensationFinding) -> Option<CompensationPattern> {
        let scale = *self.config.scale(finding.compensation_type);
        finding.grade(&scale)
    }

    fn visible<'a>(&self, ctx: &CompensationContext<'a>, id: LandmarkId) -> Option<&'a Landmark> {
        ctx.landmarks.visible(id, self.config.min_visibility)
    }

    /// Shoulders then hips, left before right
    fn trunk<'a>(&self, ctx: &CompensationContext<'a>) -> Option<[&'a Landmark; 4]> {
        Some([
            self.visible(ctx, LandmarkId::LeftShoulder)?,
            self.visible(ctx, LandmarkId::RightShoulder)?,
            self.visible(ctx, LandmarkId::LeftHip)?,
            self.visible(ctx, LandmarkId::RightHip)?,
        ])
    }

    /// Centimetres per normalized unit, from the visible torso height
    fn cm_per_unit(&self, trunk: [&Landmark; 4]) -> Option<f64> {
        let [ls, rs, lh, rh] = trunk;
        let shoulder_mid = midpoint(ls.position_2d(), rs.position_2d());
        let hip_mid = midpoint(lh.position_2d(), rh.position_2d());
        let torso_height = (hip_mid.y - shoulder_mid.y).abs();
        (torso_height > MIN_PROJECTED_LENGTH).then(|| {
            self.config.body_height_cm * self.config.torso_height_ratio / torso_height
        })
    }

    /// Trunk angle from vertical in degrees
    ///
    /// A sagittal view with real depth reads the out-of-image component of the thorax axis.
    /// Every other case projects the axis onto the image plane and compares it with true
    /// vertical.
    #[must_use]
    pub fn measure_trunk_lean(&self, ctx: &CompensationContext<'_>) -> Option<CompensationFinding> {
        let trunk = self.trunk(ctx)?;
        let thorax_y = ctx.frames.thorax.y_axis;
        let (magnitude, side) = if ctx.view == ViewOrientation::Sagittal {
            let tilt = if ctx.has_depth {
                thorax_y.z.abs().clamp(0.0, 1.0).asin().to_degrees()
            } else {
                // Flat landmarks: forward or backward lean shows as tilt in the image
                angle_between(project_onto_plane(thorax_y, Vector3D::depth()), Vector3D::up())
            };
            (tilt, None)
        } else {
            let projected = project_onto_plane(thorax_y, Vector3D::depth());
            (
                angle_between(projected, Vector3D::up()),
                lean_side(projected, trunk),
            )
        };
        Some(
            CompensationFinding::new(
                CompensationType::TrunkLean,
                magnitude,
                "trunk",
                format!("Trunk leaning {magnitude:.1}° from vertical"),
            )
            .on_side(side),
        )
    }

    /// Graded trunk lean
    #[must_use]
    pub fn detect_trunk_lean(&self, ctx: &CompensationContext<'_>) -> Option<CompensationPattern> {
        self.measure_trunk_lean(ctx)
            .and_then(|finding| self.grade(finding))
    }

    /// Thorax twist in degrees away from the anterior direction implied by the view
    #[must_use]
    pub fn measure_trunk_rotation(
        &self,
        ctx: &CompensationContext<'_>,
    ) -> Option<CompensationFinding> {
        self.trunk(ctx)?;
        let anterior = project_onto_plane(ctx.frames.thorax.x_axis, Vector3D::up());
        if anterior.length() < MIN_PROJECTED_LENGTH {
            return None;
        }
        let magnitude = match ctx.view {
            ViewOrientation::Frontal => angle_between(anterior, Vector3D::new(0.0, 0.0, -1.0)),
            ViewOrientation::Posterior => angle_between(anterior, Vector3D::depth()),
            ViewOrientation::Sagittal | ViewOrientation::Lateral => {
                let image_right = Vector3D::new(1.0, 0.0, 0.0);
                angle_between(anterior, image_right).min(angle_between(anterior, -image_right))
            }
        };
        Some(CompensationFinding::new(
            CompensationType::TrunkRotation,
            magnitude,
            "trunk",
            format!("Trunk rotated {magnitude:.1}° from facing the camera plane"),
        ))
    }

    /// Graded trunk rotation
    #[must_use]
    pub fn detect_trunk_rotation(
        &self,
        ctx: &CompensationContext<'_>,
    ) -> Option<CompensationPattern> {
        self.measure_trunk_rotation(ctx)
            .and_then(|finding| self.grade(finding))
    }

    /// Shoulder-line tilt as a percentage of 90°, reported only when the measured side is
    /// the higher one
    #[must_use]
    pub fn measure_shoulder_hiking(
        &self,
        ctx: &CompensationContext<'_>,
    ) -> Option<CompensationFinding> {
        let trunk = self.trunk(ctx)?;
        let [ls, rs, _, _] = trunk;
        let (measured, other) = match ctx.side {
            BodySide::Left => (ls, rs),
            BodySide::Right => (rs, ls),
        };
        // Image y grows downward
        if measured.y >= other.y {
            return None;
        }

        let line = ls.position_2d() - rs.position_2d();
        let width = line.length();
        if width <= DEGENERATE_LENGTH {
            return None;
        }
        let tilt = line.y.abs().atan2(line.x.abs()).to_degrees();
        let percent = tilt / SHOULDER_TILT_RANGE_DEG * 100.0;
        let displacement_cm = self
            .cm_per_unit(trunk)
            .map(|scale| width * tilt.to_radians().sin() * scale);

        Some(
            CompensationFinding::new(
                CompensationType::ShoulderHiking,
                percent,
                format!("{}_shoulder", ctx.side),
                format!("{} shoulder elevated ({tilt:.1}° shoulder-line tilt)", ctx.side),
            )
            .on_side(Some(ctx.side))
            .displaced(displacement_cm),
        )
    }

    /// Graded shoulder hiking
    #[must_use]
    pub fn detect_shoulder_hiking(
        &self,
        ctx: &CompensationContext<'_>,
    ) -> Option<CompensationPattern> {
        self.measure_shoulder_hiking(ctx)
            .and_then(|finding| self.grade(finding))
    }

    /// Elbow bend in degrees away from full extension during shoulder elevation
    #[must_use]
    pub fn measure_elbow_flexion(
        &self,
        ctx: &CompensationContext<'_>,
    ) -> Option<CompensationFinding> {
        if !ctx.movement.is_shoulder() || ctx.movement == MovementType::ShoulderRotation {
            return None;
        }
        let shoulder = self.visible(ctx, LandmarkId::shoulder(ctx.side))?;
        let elbow = self.visible(ctx, LandmarkId::elbow(ctx.side))?;
        let wrist = self.visible(ctx, LandmarkId::wrist(ctx.side))?;

        let upper_arm = elbow.position_2d() - shoulder.position_2d();
        let forearm = wrist.position_2d() - elbow.position_2d();
        let magnitude = angle_between(upper_arm, forearm);
        Some(
            CompensationFinding::new(
                CompensationType::ElbowFlexion,
                magnitude,
                format!("{}_elbow", ctx.side),
                format!("Elbow bent {magnitude:.1}° during shoulder movement"),
            )
            .on_side(Some(ctx.side)),
        )
    }

    /// Graded elbow flexion drift
    #[must_use]
    pub fn detect_elbow_flexion(
        &self,
        ctx: &CompensationContext<'_>,
    ) -> Option<CompensationPattern> {
        self.measure_elbow_flexion(ctx)
            .and_then(|finding| self.grade(finding))
    }

    /// Vertical hip offset in centimetres, reporting the elevated side
    #[must_use]
    pub fn measure_hip_hike(&self, ctx: &CompensationContext<'_>) -> Option<CompensationFinding> {
        let trunk = self.trunk(ctx)?;
        let [_, _, lh, rh] = trunk;
        let offset = lh.y - rh.y;
        let magnitude = offset.abs() * self.cm_per_unit(trunk)?;
        let elevated = if offset < 0.0 {
            BodySide::Left
        } else {
            BodySide::Right
        };
        Some(
            CompensationFinding::new(
                CompensationType::HipHike,
                magnitude,
                format!("{elevated}_hip"),
                format!("{elevated} hip raised {magnitude:.1} cm"),
            )
            .on_side(Some(elevated))
            .displaced(Some(magnitude)),
        )
    }

    /// Graded hip hike
    #[must_use]
    pub fn detect_hip_hike(&self, ctx: &CompensationContext<'_>) -> Option<CompensationPattern> {
        self.measure_hip_hike(ctx)
            .and_then(|finding| self.grade(finding))
    }

    /// Lateral trunk tilt in degrees, reported only when leaning away from the moving side
    #[must_use]
    pub fn measure_contralateral_lean(
        &self,
        ctx: &CompensationContext<'_>,
    ) -> Option<CompensationFinding> {
        if ctx.view.is_side_view() {
            return None;
        }
        let trunk = self.trunk(ctx)?;
        let projected = project_onto_plane(ctx.frames.thorax.y_axis, Vector3D::depth());
        let leaning_toward = lean_side(projected, trunk)?;
        if leaning_toward == ctx.side {
            return None;
        }
        let magnitude = angle_between(projected, Vector3D::up());
        Some(
            CompensationFinding::new(
                CompensationType::ContralateralLean,
                magnitude,
                "trunk",
                format!(
                    "Trunk leaning {magnitude:.1}° toward the {leaning_toward} side, \
                     away from the moving arm"
                ),
            )
            .on_side(Some(leaning_toward)),
        )
    }

    /// Graded contralateral lean
    #[must_use]
    pub fn detect_contralateral_lean(
        &self,
        ctx: &CompensationContext<'_>,
    ) -> Option<CompensationPattern> {
        self.measure_contralateral_lean(ctx)
            .and_then(|finding| self.grade(finding))
    }

    /// Run every detector relevant to the movement, in a fixed order
    #[must_use]
    pub fn detect_all(&self, ctx: &CompensationContext<'_>) -> Vec<CompensationPattern> {
        let mut patterns = vec![
            self.detect_trunk_lean(ctx),
            self.detect_trunk_rotation(ctx),
        ];
        if ctx.movement.is_shoulder() {
            patterns.extend([
                self.detect_shoulder_hiking(ctx),
                self.detect_elbow_flexion(ctx),
                self.detect_contralateral_lean(ctx),
            ]);
        }
        patterns.push(self.detect_hip_hike(ctx));
        patterns.into_iter().flatten().collect()
    }
}

/// Subject side a tilted image-plane axis leans toward, from the hip line
fn lean_side(tilted: Vector3D, trunk: [&Landmark; 4]) -> Option<BodySide> {
    let [_, _, lh, rh] = trunk;
    let toward_right = normalize(project_onto_plane(
        rh.position_2d() - lh.position_2d(),
        Vector3D::depth(),
    ))?;
    let lateral = dot(tilted, toward_right);
    if lateral > DEGENERATE_LENGTH {
        Some(BodySide::Right)
    } else if lateral < -DEGENERATE_LENGTH {
        Some(BodySide::Left)
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::anatomical::{AnatomicalReferenceService, UncachedFrames};
    use rom_core::models::MEDIAPIPE_POSE;

    fn pose(adjust: &[(LandmarkId, f64, f64)]) -> Vec<Landmark> {
        let mut landmarks: Vec<Landmark> = (0..MEDIAPIPE_POSE.landmark_count)
            .map(|i| Landmark::new(format!("lm_{i}"), 0.5, 0.5, 0.0))
            .collect();
        let placed = [
            (LandmarkId::LeftShoulder, 0.60, 0.30),
            (LandmarkId::RightShoulder, 0.40, 0.30),
            (LandmarkId::LeftElbow, 0.62, 0.45),
            (LandmarkId::RightElbow, 0.38, 0.45),
            (LandmarkId::LeftWrist, 0.63, 0.58),
            (LandmarkId::RightWrist, 0.37, 0.58),
            (LandmarkId::LeftHip, 0.57, 0.60),
            (LandmarkId::RightHip, 0.43, 0.60),
        ];
        for (id, x, y) in placed {
            let index = MEDIAPIPE_POSE.index_of(id).unwrap();
            landmarks[index] = Landmark::new(id.as_str(), x, y, 0.9);
        }
        for (id, dx, dy) in adjust {
            let index = MEDIAPIPE_POSE.index_of(*id).unwrap();
            landmarks[index].x += dx;
            landmarks[index].y += dy;
        }
        landmarks
    }

    fn detect(
        landmarks: &[Landmark],
        movement: MovementType,
        side: BodySide,
    ) -> Vec<CompensationPattern> {
        let lm = PoseLandmarks::new(landmarks, &MEDIAPIPE_POSE);
        let frames = AnatomicalReferenceService::default()
            .compute_frames(&lm, &mut UncachedFrames::default())
            .unwrap();
        let ctx = CompensationContext {
            landmarks: lm,
            frames: &frames,
            view: ViewOrientation::Frontal,
            movement,
            side,
            has_depth: false,
        };
        CompensationDetector::default().detect_all(&ctx)
    }

    #[test]
    fn test_symmetric_pose_has_no_compensations() {
        let landmarks = pose(&[]);
        let found = detect(&landmarks, MovementType::ShoulderAbduction, BodySide::Left);
        assert!(found.is_empty(), "{found:?}");
    }

    #[test]
    fn test_hip_hike_reports_elevated_side() {
        // 0.02 of a 0.30 torso is ~3.4 cm at 170 cm
        let landmarks = pose(&[(LandmarkId::RightHip, 0.0, -0.02)]);
        let found = detect(&landmarks, MovementType::KneeFlexion, BodySide::Right);
        let hike = found
            .iter()
            .find(|p| p.compensation_type == CompensationType::HipHike)
            .unwrap();
        assert_eq!(hike.side, Some(BodySide::Right));
        assert!(hike.magnitude > 3.0 && hike.magnitude < 4.0, "{hike:?}");
        assert!(hike.displacement_cm.is_some());
    }

    #[test]
    fn test_shoulder_hiking_only_on_measured_higher_side() {
        let landmarks = pose(&[(LandmarkId::LeftShoulder, 0.0, -0.04)]);
        let left = detect(&landmarks, MovementType::ShoulderAbduction, BodySide::Left);
        let right = detect(&landmarks, MovementType::ShoulderAbduction, BodySide::Right);

        let hiking = left
            .iter()
            .find(|p| p.compensation_type == CompensationType::ShoulderHiking)
            .unwrap();
        assert_eq!(hiking.severity, Severity::Moderate);
        assert!(right
            .iter()
            .all(|p| p.compensation_type != CompensationType::ShoulderHiking));
    }

    #[test]
    fn test_bent_elbow_during_flexion() {
        let landmarks = pose(&[(LandmarkId::LeftWrist, 0.10, -0.05)]);
        let found = detect(&landmarks, MovementType::ShoulderFlexion, BodySide::Left);
        assert!(found
            .iter()
            .any(|p| p.compensation_type == CompensationType::ElbowFlexion));

        let knee = detect(&landmarks, MovementType::KneeFlexion, BodySide::Left);
        assert!(knee
            .iter()
            .all(|p| p.compensation_type != CompensationType::ElbowFlexion));
    }

    #[test]
    fn test_contralateral_lean_only_away_from_moving_side() {
        // Shoulders shifted toward image left: subject leans to their right
        let shift = [
            (LandmarkId::LeftShoulder, -0.06, 0.0),
            (LandmarkId::RightShoulder, -0.06, 0.0),
        ];
        let landmarks = pose(&shift);

        let moving_left = detect(&landmarks, MovementType::ShoulderAbduction, BodySide::Left);
        let lean = moving_left
            .iter()
            .find(|p| p.compensation_type == CompensationType::ContralateralLean)
            .unwrap();
        assert_eq!(lean.side, Some(BodySide::Right));

        let moving_right = detect(&landmarks, MovementType::ShoulderAbduction, BodySide::Right);
        assert!(moving_right
            .iter()
            .all(|p| p.compensation_type != CompensationType::ContralateralLean));
    }

    #[test]
    fn test_forward_lean_seen_from_the_side() {
        // Side-on trunk with the shoulders 0.08 ahead of the hips
        let landmarks = pose(&[
            (LandmarkId::LeftShoulder, 0.0, 0.0),
            (LandmarkId::RightShoulder, 0.18, 0.0),
            (LandmarkId::LeftHip, -0.05, 0.0),
            (LandmarkId::RightHip, 0.07, 0.0),
        ]);
        let lm = PoseLandmarks::new(&landmarks, &MEDIAPIPE_POSE);
        let frames = AnatomicalReferenceService::default()
            .compute_frames(&lm, &mut UncachedFrames::default())
            .unwrap();
        let ctx = CompensationContext {
            landmarks: lm,
            frames: &frames,
            view: ViewOrientation::Sagittal,
            movement: MovementType::ShoulderFlexion,
            side: BodySide::Right,
            has_depth: false,
        };

        let lean = CompensationDetector::default().measure_trunk_lean(&ctx).unwrap();
        let expected = 0.08_f64.atan2(0.30).to_degrees();
        assert!((lean.magnitude - expected).abs() < 1e-6, "{lean:?}");
        assert_eq!(lean.side, None);
    }

    #[test]
    fn test_occluded_landmarks_suppress_detector() {
        let mut landmarks = pose(&[(LandmarkId::RightHip, 0.0, -0.05)]);
        let index = MEDIAPIPE_POSE.index_of(LandmarkId::RightHip).unwrap();
        landmarks[index].visibility = 0.4;
        let lm = PoseLandmarks::new(&landmarks, &MEDIAPIPE_POSE);
        let healthy = pose(&[]);
        let frames = AnatomicalReferenceService::default()
            .compute_frames(
                &PoseLandmarks::new(&healthy, &MEDIAPIPE_POSE),
                &mut UncachedFrames::default(),
            )
            .unwrap();
        let ctx = CompensationContext {
            landmarks: lm,
            frames: &frames,
            view: ViewOrientation::Frontal,
            movement: MovementType::KneeFlexion,
            side: BodySide::Left,
            has_depth: false,
        };
        assert!(CompensationDetector::default().measure_hip_hike(&ctx).is_none());
    }
}
