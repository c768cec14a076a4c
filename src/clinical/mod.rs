// ABOUTME: Clinical measurement service turning a pose into a graded joint measurement
// ABOUTME: View checks, primary angle, secondary checks, compensations and quality in one pass
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Clinical measurement
//!
//! [`ClinicalMeasurementService`] is the single entry point for grading a movement. A session
//! calls [`prepare_frames`](ClinicalMeasurementService::prepare_frames) on each pose, then
//! [`measure`](ClinicalMeasurementService::measure) for the movement of interest.
//!
//! # Example
//!
//! ```rust,no_run
//! use rom_engine::clinical::ClinicalMeasurementService;
//! use rom_core::models::{BodySide, MovementType, ProcessedPoseData};
//!
//! # fn example(pose: ProcessedPoseData) -> Result<(), Box<dyn std::error::Error>> {
//! let mut service = ClinicalMeasurementService::new();
//! let pose = service.prepare_frames(&pose)?;
//! let result = service.measure(&pose, MovementType::ShoulderAbduction, BodySide::Right)?;
//! println!("{:.1}° {:?}", result.primary_joint.angle, result.quality.overall);
//! # Ok(())
//! # }
//! ```

mod primary;
mod quality;
mod rhythm;
mod secondary;

use crate::anatomical::{
    AnatomicalFrameCache, AnatomicalReferenceService, FrameCacheProvider, FrameCacheStats,
};
use crate::compensation::{CompensationContext, CompensationDetector, CompensationFinding};
use crate::goniometer::Goniometer;
use primary::PrimaryAngle;
use quality::{
    assess, compensation_advice, orientation_match, used_fallback, QualityInputs, QualityNotes,
};
use rom_core::config::{
    ClinicalThresholds, CompensationDetectionConfig, EngineConfig, GoniometerConfig,
    MeasurementQualityConfig,
};
use rom_core::models::{
    AnatomicalReferenceFrame, BodySide, CachedAnatomicalFrames, ClinicalJointMeasurement,
    CompensationPattern, CompensationType, FrameType, JointName, Landmark, LandmarkId,
    MeasurementComponents, MovementType, PoseLandmarks, PrimaryJointMeasurement,
    ProcessedPoseData, QualityRating, SecondaryJointMeasurement, SecondaryPurpose, Severity,
    ViewOrientation,
};
use rom_core::{ConfigError, DegradedInputWarning, EngineResult, PreconditionError};
use secondary::SecondaryCheck;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Trunk landmarks that contribute to every measurement's visibility score
const TRUNK_LANDMARKS: [LandmarkId; 4] = [
    LandmarkId::LeftShoulder,
    LandmarkId::RightShoulder,
    LandmarkId::LeftHip,
    LandmarkId::RightHip,
];

/// Landmarks without which a movement cannot be measured
fn required_landmarks(movement: MovementType, side: BodySide) -> &'static [LandmarkId] {
    const LEFT_ARM: [LandmarkId; 3] = [
        LandmarkId::LeftShoulder,
        LandmarkId::LeftElbow,
        LandmarkId::LeftWrist,
    ];
    const RIGHT_ARM: [LandmarkId; 3] = [
        LandmarkId::RightShoulder,
        LandmarkId::RightElbow,
        LandmarkId::RightWrist,
    ];
    const LEFT_LEG: [LandmarkId; 3] = [
        LandmarkId::LeftHip,
        LandmarkId::LeftKnee,
        LandmarkId::LeftAnkle,
    ];
    const RIGHT_LEG: [LandmarkId; 3] = [
        LandmarkId::RightHip,
        LandmarkId::RightKnee,
        LandmarkId::RightAnkle,
    ];

    let (arm, leg): (&'static [LandmarkId], &'static [LandmarkId]) = match side {
        BodySide::Left => (&LEFT_ARM, &LEFT_LEG),
        BodySide::Right => (&RIGHT_ARM, &RIGHT_LEG),
    };
    match movement {
        MovementType::ShoulderFlexion | MovementType::ShoulderAbduction => &arm[..2],
        MovementType::ShoulderRotation | MovementType::ElbowFlexion => arm,
        MovementType::KneeFlexion => leg,
    }
}

/// The view if the movement can be observed from it
fn check_view(
    view: Option<ViewOrientation>,
    movement: MovementType,
) -> Result<ViewOrientation, PreconditionError> {
    let view = view.ok_or(PreconditionError::MissingViewOrientation { movement })?;
    let allowed = movement.allowed_views();
    if allowed.contains(&view) {
        Ok(view)
    } else {
        Err(PreconditionError::InvalidViewOrientation {
            movement,
            actual: view,
            expected: allowed
                .iter()
                .map(|view| view.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        })
    }
}

fn require_frame(
    frame: Option<&AnatomicalReferenceFrame>,
    frame_type: FrameType,
    movement: MovementType,
) -> Result<&AnatomicalReferenceFrame, PreconditionError> {
    frame.ok_or(PreconditionError::MissingFrame {
        frame_type,
        movement,
    })
}

#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0_usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Primary angle plus the frames it was computed in
struct PrimaryResult {
    angle: PrimaryAngle,
    frames: Vec<AnatomicalReferenceFrame>,
}

/// Grades clinical movements for one session
///
/// Generic over the frame cache so a session can run with the TTL/LRU cache (default) or
/// [`UncachedFrames`](crate::anatomical::UncachedFrames).
pub struct ClinicalMeasurementService<C: FrameCacheProvider = AnatomicalFrameCache> {
    thresholds: ClinicalThresholds,
    detector: CompensationDetector,
    quality_config: MeasurementQualityConfig,
    goniometer: Goniometer,
    reference: AnatomicalReferenceService,
    cache: C,
}

impl ClinicalMeasurementService<AnatomicalFrameCache> {
    /// Service with default configuration and the default frame cache
    #[must_use]
    pub fn new() -> Self {
        Self::with_cache(AnatomicalFrameCache::default())
    }
}

impl Default for ClinicalMeasurementService<AnatomicalFrameCache> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: FrameCacheProvider> ClinicalMeasurementService<C> {
    /// Service with default configuration over an injected frame cache
    pub fn with_cache(cache: C) -> Self {
        Self {
            thresholds: ClinicalThresholds::default(),
            detector: CompensationDetector::default(),
            quality_config: MeasurementQualityConfig::default(),
            goniometer: Goniometer::default(),
            reference: AnatomicalReferenceService::default(),
            cache,
        }
    }

    /// Active clinical thresholds
    #[must_use]
    pub const fn thresholds(&self) -> &ClinicalThresholds {
        &self.thresholds
    }

    /// Replace the clinical thresholds
    ///
    /// # Errors
    ///
    /// Returns an error if the thresholds are invalid; the current ones are kept
    pub fn set_thresholds(&mut self, thresholds: ClinicalThresholds) -> Result<(), ConfigError> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(())
    }

    /// Replace the compensation severity configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid; the current one is kept
    pub fn set_compensation_config(
        &mut self,
        config: CompensationDetectionConfig,
    ) -> Result<(), ConfigError> {
        self.detector.set_config(config)
    }

    /// Replace the quality blending configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid; the current one is kept
    pub fn set_quality_config(
        &mut self,
        config: MeasurementQualityConfig,
    ) -> Result<(), ConfigError> {
        config.validate()?;
        self.quality_config = config;
        Ok(())
    }

    /// Replace the goniometer configuration used for secondary joints
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid; the current one is kept
    pub fn set_goniometer_config(&mut self, config: GoniometerConfig) -> Result<(), ConfigError> {
        self.goniometer.set_config(config)
    }

    /// Compensation detector used by this service
    #[must_use]
    pub const fn detector(&self) -> &CompensationDetector {
        &self.detector
    }

    /// Frame cache statistics
    #[must_use]
    pub fn cache_stats(&self) -> FrameCacheStats {
        self.cache.stats()
    }

    /// Clear the frame cache and goniometer history at a session boundary
    pub fn reset_session(&mut self) {
        let stats = self.cache.stats();
        self.cache.clear();
        self.goniometer.reset();
        info!(
            hits = stats.hits,
            misses = stats.misses,
            evictions = stats.evictions,
            "Measurement session reset"
        );
    }

    /// Copy of the pose with its anatomical frames computed through the cache
    ///
    /// # Errors
    ///
    /// Returns an error if the global or thorax frame cannot be built
    pub fn prepare_frames(&mut self, pose: &ProcessedPoseData) -> EngineResult<ProcessedPoseData> {
        let frames = self
            .reference
            .compute_frames(&pose.pose_landmarks(), &mut self.cache)?;
        let mut prepared = pose.clone();
        prepared.cached_anatomical_frames = Some(frames);
        Ok(prepared)
    }

    /// Measure one movement on one side of a prepared pose
    ///
    /// # Errors
    ///
    /// Returns a precondition error when the view cannot observe the movement, frames were
    /// not prepared, or a required landmark or frame is missing
    pub fn measure(
        &mut self,
        pose: &ProcessedPoseData,
        movement: MovementType,
        side: BodySide,
    ) -> EngineResult<ClinicalJointMeasurement> {
        self.try_measure(pose, movement, side).inspect_err(|err| {
            warn!(
                movement = movement.as_str(),
                side = side.as_str(),
                error = %err,
                "Measurement rejected"
            );
        })
    }

    fn try_measure(
        &mut self,
        pose: &ProcessedPoseData,
        movement: MovementType,
        side: BodySide,
    ) -> EngineResult<ClinicalJointMeasurement> {
        let view = check_view(pose.view_orientation, movement)?;
        let frames = pose
            .cached_anatomical_frames
            .as_ref()
            .ok_or(PreconditionError::MissingAnatomicalFrames { movement })?;
        let landmarks = pose.pose_landmarks();
        let min_visibility = self.goniometer.config().min_confidence;
        for &id in required_landmarks(movement, side) {
            if landmarks.visible(id, min_visibility).is_none() {
                return Err(PreconditionError::MissingMeasurementLandmark {
                    landmark: id,
                    movement,
                }
                .into());
            }
        }

        let primary = self.primary_angle(pose, frames, movement, side)?;
        let threshold = self
            .thresholds
            .for_movement(movement, primary.angle.angle_type);
        let components = (movement == MovementType::ShoulderAbduction).then(|| {
            rhythm::decompose(
                &self.thresholds,
                primary.angle.angle,
                rhythm::shoulder_tilt(&landmarks, self.detector.config().min_visibility),
            )
        });

        let mut notes = QualityNotes::default();
        if let Some(plane) = primary.angle.out_of_plane {
            notes.warn(DegradedInputWarning::OutOfPlaneMovement {
                plane: plane.as_str().to_owned(),
            });
            notes.recommend("Keep the limb moving within the measured plane");
        }

        let ctx = CompensationContext {
            landmarks,
            frames,
            view,
            movement,
            side,
            has_depth: pose.has_depth,
        };
        let mut compensations = self.detector.detect_all(&ctx);
        if let Some(pattern) = components.and_then(|c| self.rhythm_compensation(&c, side)) {
            compensations.push(pattern);
        }

        let mut secondary_joints = BTreeMap::new();
        if let Some(check) = SecondaryCheck::for_movement(movement, side, &self.thresholds) {
            let measured = self.goniometer.measure(&landmarks, check.joint);
            let result = check.evaluate(&measured);
            self.apply_secondary(&check, &result, side, &mut notes, &mut compensations);
            secondary_joints.insert(check.joint, result);
        }
        for pattern in &compensations {
            notes.recommend(compensation_advice(pattern.compensation_type));
        }

        let landmark_visibility = mean(
            required_landmarks(movement, side)
                .iter()
                .chain(TRUNK_LANDMARKS.iter())
                .map(|&id| landmarks.visibility(id)),
        );
        for frame in &primary.frames {
            if used_fallback(frame, landmark_visibility) {
                debug!(
                    frame_type = %frame.frame_type,
                    confidence = frame.confidence,
                    "Frame built with fallback axis"
                );
                notes.warn(DegradedInputWarning::FrameFallback {
                    frame_type: frame.frame_type,
                });
            }
        }

        let orientation = orientation_match(&self.quality_config, movement, view);
        if orientation < self.quality_config.preferred_view_match {
            if let Some(preferred) = movement.allowed_views().first() {
                notes.recommend(format!(
                    "A {preferred} view gives the most reliable {movement} measurement"
                ));
            }
        }
        let inputs = QualityInputs {
            landmark_visibility,
            frame_stability: mean(primary.frames.iter().map(|frame| frame.confidence)),
            orientation_match: orientation,
            has_depth: pose.has_depth,
        };
        let (quality, degraded_inputs) = assess(&self.quality_config, &inputs, notes);

        debug!(
            movement = movement.as_str(),
            side = side.as_str(),
            angle = primary.angle.angle,
            quality = ?quality.overall,
            compensations = compensations.len(),
            "Measurement complete"
        );

        Ok(ClinicalJointMeasurement {
            primary_joint: PrimaryJointMeasurement {
                name: movement.joint(side),
                movement,
                angle: primary.angle.angle,
                angle_type: primary.angle.angle_type,
                target_angle: threshold.target,
                percent_of_target: threshold.percent_of_target(primary.angle.angle),
                clinical_grade: threshold
                    .grade(primary.angle.angle, self.thresholds.fair_fraction),
                signed_angle: primary.angle.signed_angle,
                components,
            },
            secondary_joints,
            reference_frames: primary.frames,
            compensations,
            quality,
            degraded_inputs,
            side,
            timestamp: pose.timestamp,
        })
    }

    fn primary_angle(
        &self,
        pose: &ProcessedPoseData,
        frames: &CachedAnatomicalFrames,
        movement: MovementType,
        side: BodySide,
    ) -> Result<PrimaryResult, PreconditionError> {
        let thorax = &frames.thorax;
        let humerus = || require_frame(frames.humerus(side), FrameType::Humerus, movement);
        let forearm = || require_frame(frames.forearm(side), FrameType::Forearm, movement);

        let result = match movement {
            MovementType::ShoulderFlexion | MovementType::ShoulderAbduction => {
                let humerus = humerus()?;
                PrimaryResult {
                    angle: primary::shoulder_elevation(movement, thorax, humerus),
                    frames: vec![thorax.clone(), humerus.clone()],
                }
            }
            MovementType::ShoulderRotation if pose.has_depth => {
                let forearm = forearm()?;
                PrimaryResult {
                    angle: primary::shoulder_rotation_3d(side, thorax, forearm),
                    frames: vec![thorax.clone(), forearm.clone()],
                }
            }
            MovementType::ShoulderRotation => {
                let landmarks = pose.pose_landmarks();
                PrimaryResult {
                    angle: primary::shoulder_rotation_2d(
                        side,
                        thorax,
                        self.landmark(&landmarks, LandmarkId::shoulder(side), movement)?,
                        self.landmark(&landmarks, LandmarkId::elbow(side), movement)?,
                        self.landmark(&landmarks, LandmarkId::wrist(side), movement)?,
                    ),
                    frames: vec![thorax.clone()],
                }
            }
            MovementType::ElbowFlexion => {
                let (humerus, forearm) = (humerus()?, forearm()?);
                PrimaryResult {
                    angle: primary::elbow_flexion(humerus, forearm),
                    frames: vec![humerus.clone(), forearm.clone()],
                }
            }
            MovementType::KneeFlexion => {
                let pelvis = require_frame(frames.pelvis.as_ref(), FrameType::Pelvis, movement)?;
                let landmarks = pose.pose_landmarks();
                PrimaryResult {
                    angle: primary::knee_flexion(
                        pelvis,
                        self.landmark(&landmarks, LandmarkId::hip(side), movement)?,
                        self.landmark(&landmarks, LandmarkId::knee(side), movement)?,
                        self.landmark(&landmarks, LandmarkId::ankle(side), movement)?,
                    ),
                    frames: vec![pelvis.clone()],
                }
            }
        };
        Ok(result)
    }

    fn landmark<'a>(
        &self,
        landmarks: &PoseLandmarks<'a>,
        id: LandmarkId,
        movement: MovementType,
    ) -> Result<&'a Landmark, PreconditionError> {
        landmarks
            .visible(id, self.goniometer.config().min_confidence)
            .ok_or(PreconditionError::MissingMeasurementLandmark {
                landmark: id,
                movement,
            })
    }

    fn rhythm_compensation(
        &self,
        components: &MeasurementComponents,
        side: BodySide,
    ) -> Option<CompensationPattern> {
        let ratio = components.rhythm_ratio?;
        let deviation = rhythm::ratio_deviation(&self.thresholds, ratio)?;
        let finding = CompensationFinding::new(
            CompensationType::AbnormalScapulohumeralRhythm,
            deviation,
            JointName::shoulder(side).as_str(),
            format!(
                "Glenohumeral to scapulothoracic ratio {ratio:.2}:1 outside {:.1}-{:.1}:1",
                self.thresholds.rhythm_min_ratio,
                self.thresholds.rhythm_max_ratio
            ),
        )
        .on_side(Some(side));
        self.detector.grade(finding)
    }

    fn apply_secondary(
        &self,
        check: &SecondaryCheck,
        result: &SecondaryJointMeasurement,
        side: BodySide,
        notes: &mut QualityNotes,
        compensations: &mut Vec<CompensationPattern>,
    ) {
        if result.assumed {
            notes.warn(DegradedInputWarning::SecondaryLandmarkOccluded {
                joint: check.joint.as_str().to_owned(),
                assumed_angle: check.expected,
            });
            notes.cap(QualityRating::Fair);
            return;
        }
        if result.within_tolerance {
            return;
        }

        notes.recommend(check.advice);
        match check.purpose {
            SecondaryPurpose::Validation => {
                notes.warn(DegradedInputWarning::SecondaryValidationFailed {
                    joint: check.joint.as_str().to_owned(),
                    deviation: result.deviation,
                });
                notes.cap(QualityRating::Fair);
            }
            SecondaryPurpose::Gating => {
                warn!(
                    joint = check.joint.as_str(),
                    elbow_angle = result.angle,
                    target = check.expected,
                    tolerance = check.tolerance,
                    "Elbow gating exceeded; rotation is low confidence"
                );
                let finding = CompensationFinding::new(
                    CompensationType::ElbowPositionDeviation,
                    result.deviation,
                    check.joint.as_str(),
                    format!(
                        "Elbow at {:.0}° instead of {:.0}°; rotation value is unreliable",
                        result.angle, check.expected
                    ),
                )
                .on_side(Some(side));
                // A failed gate is always reported, even under the scale's reporting cut
                let severity = self
                    .detector
                    .config()
                    .scale(CompensationType::ElbowPositionDeviation)
                    .grade(result.deviation)
                    .unwrap_or(Severity::Minimal);
                compensations.push(finding.into_pattern(severity));
                notes.warn(DegradedInputWarning::ElbowGatingExceeded {
                    elbow_angle: result.angle,
                    target: check.expected,
                    tolerance: check.tolerance,
                });
                notes.cap(QualityRating::Poor);
            }
        }
    }
}
