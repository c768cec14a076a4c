// ABOUTME: Clinical threshold configuration
// ABOUTME: Per-movement targets, grading, scapulohumeral rhythm band and secondary-joint tolerances
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{check_non_negative, check_positive, EngineConfig};
use crate::constants::clinical::{
    ELBOW_EXTENDED_DEG, ELBOW_EXTENSION_TOLERANCE_DEG, ELBOW_FLEXION_MIN_ACCEPTABLE_DEG,
    ELBOW_FLEXION_TARGET_DEG, FAIR_GRADE_FRACTION, KNEE_FLEXION_MIN_ACCEPTABLE_DEG,
    KNEE_FLEXION_TARGET_DEG, MIN_MEASURABLE_SHOULDER_TILT_DEG, ROTATION_ELBOW_TARGET_DEG,
    ROTATION_ELBOW_TOLERANCE_DEG, SCAPULAR_PLANE_ANGLE_DEG, SCAPULAR_ROTATION_PER_TILT_DEG,
    SCAPULOHUMERAL_RHYTHM_MAX_RATIO, SCAPULOHUMERAL_RHYTHM_MIN_RATIO,
    SCAPULOHUMERAL_SETTING_PHASE_DEG, SHOULDER_ABDUCTION_MIN_ACCEPTABLE_DEG,
    SHOULDER_ABDUCTION_TARGET_DEG, SHOULDER_EXTERNAL_ROTATION_MIN_ACCEPTABLE_DEG,
    SHOULDER_EXTERNAL_ROTATION_TARGET_DEG, SHOULDER_FLEXION_MIN_ACCEPTABLE_DEG,
    SHOULDER_FLEXION_TARGET_DEG, SHOULDER_INTERNAL_ROTATION_MIN_ACCEPTABLE_DEG,
    SHOULDER_INTERNAL_ROTATION_TARGET_DEG, UPPER_ARM_AT_SIDE_DEG,
    UPPER_ARM_STABILITY_TOLERANCE_DEG,
};
use crate::errors::ConfigError;
use crate::models::{AngleType, ClinicalGrade, MovementType};
use serde::{Deserialize, Serialize};

/// Target and minimum acceptable angle for one movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointThreshold {
    /// Functional target (degrees)
    pub target: f64,
    /// Minimum acceptable (degrees)
    pub min_acceptable: f64,
}

impl JointThreshold {
    /// Build a threshold pair
    #[must_use]
    pub const fn new(target: f64, min_acceptable: f64) -> Self {
        Self {
            target,
            min_acceptable,
        }
    }

    /// `angle / target * 100`
    #[must_use]
    pub fn percent_of_target(&self, angle: f64) -> f64 {
        angle / self.target * 100.0
    }

    /// Four-level grade
    #[must_use]
    pub fn grade(&self, angle: f64, fair_fraction: f64) -> ClinicalGrade {
        if angle >= self.target {
            ClinicalGrade::Excellent
        } else if angle >= self.min_acceptable {
            ClinicalGrade::Good
        } else if angle >= fair_fraction * self.min_acceptable {
            ClinicalGrade::Fair
        } else {
            ClinicalGrade::Limited
        }
    }

    fn validate(&self, message: &'static str) -> Result<(), ConfigError> {
        check_positive(self.target, message)?;
        check_positive(self.min_acceptable, message)?;
        if self.min_acceptable > self.target {
            return Err(ConfigError::InvalidRange(message));
        }
        Ok(())
    }
}

/// Clinical thresholds for grading and secondary-joint checks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicalThresholds {
    /// Shoulder flexion
    pub shoulder_flexion: JointThreshold,
    /// Shoulder abduction
    pub shoulder_abduction: JointThreshold,
    /// Shoulder external rotation
    pub shoulder_external_rotation: JointThreshold,
    /// Shoulder internal rotation
    pub shoulder_internal_rotation: JointThreshold,
    /// Elbow flexion
    pub elbow_flexion: JointThreshold,
    /// Knee flexion
    pub knee_flexion: JointThreshold,
    /// Fraction of the minimum acceptable angle still graded fair
    pub fair_fraction: f64,
    /// Lower bound of normal glenohumeral:scapulothoracic ratio
    pub rhythm_min_ratio: f64,
    /// Upper bound of normal glenohumeral:scapulothoracic ratio
    pub rhythm_max_ratio: f64,
    /// Abduction below which rhythm is not assessed (degrees)
    pub rhythm_setting_phase_deg: f64,
    /// Scapular rotation per degree of shoulder-line tilt
    pub scapular_rotation_per_tilt: f64,
    /// Shoulder-line tilt below which scapular motion is indeterminate (degrees)
    pub min_measurable_tilt_deg: f64,
    /// Elbow angle required for rotation measurement (interior degrees)
    pub rotation_elbow_target: f64,
    /// Allowed elbow deviation for rotation measurement (degrees)
    pub rotation_elbow_tolerance: f64,
    /// Elbow interior angle expected during shoulder elevation
    pub elbow_extended: f64,
    /// Allowed elbow deviation during shoulder elevation (degrees)
    pub elbow_extension_tolerance: f64,
    /// Upper-arm angle from the trunk expected during elbow flexion
    pub upper_arm_at_side: f64,
    /// Allowed upper-arm deviation during elbow flexion (degrees)
    pub upper_arm_tolerance: f64,
    /// Scapular plane angle anterior to the coronal plane (degrees)
    pub scapular_plane_angle: f64,
}

impl Default for ClinicalThresholds {
    fn default() -> Self {
        Self {
            shoulder_flexion: JointThreshold::new(
                SHOULDER_FLEXION_TARGET_DEG,
                SHOULDER_FLEXION_MIN_ACCEPTABLE_DEG,
            ),
            shoulder_abduction: JointThreshold::new(
                SHOULDER_ABDUCTION_TARGET_DEG,
                SHOULDER_ABDUCTION_MIN_ACCEPTABLE_DEG,
            ),
            shoulder_external_rotation: JointThreshold::new(
                SHOULDER_EXTERNAL_ROTATION_TARGET_DEG,
                SHOULDER_EXTERNAL_ROTATION_MIN_ACCEPTABLE_DEG,
            ),
            shoulder_internal_rotation: JointThreshold::new(
                SHOULDER_INTERNAL_ROTATION_TARGET_DEG,
                SHOULDER_INTERNAL_ROTATION_MIN_ACCEPTABLE_DEG,
            ),
            elbow_flexion: JointThreshold::new(
                ELBOW_FLEXION_TARGET_DEG,
                ELBOW_FLEXION_MIN_ACCEPTABLE_DEG,
            ),
            knee_flexion: JointThreshold::new(
                KNEE_FLEXION_TARGET_DEG,
                KNEE_FLEXION_MIN_ACCEPTABLE_DEG,
            ),
            fair_fraction: FAIR_GRADE_FRACTION,
            rhythm_min_ratio: SCAPULOHUMERAL_RHYTHM_MIN_RATIO,
            rhythm_max_ratio: SCAPULOHUMERAL_RHYTHM_MAX_RATIO,
            rhythm_setting_phase_deg: SCAPULOHUMERAL_SETTING_PHASE_DEG,
            scapular_rotation_per_tilt: SCAPULAR_ROTATION_PER_TILT_DEG,
            min_measurable_tilt_deg: MIN_MEASURABLE_SHOULDER_TILT_DEG,
            rotation_elbow_target: ROTATION_ELBOW_TARGET_DEG,
            rotation_elbow_tolerance: ROTATION_ELBOW_TOLERANCE_DEG,
            elbow_extended: ELBOW_EXTENDED_DEG,
            elbow_extension_tolerance: ELBOW_EXTENSION_TOLERANCE_DEG,
            upper_arm_at_side: UPPER_ARM_AT_SIDE_DEG,
            upper_arm_tolerance: UPPER_ARM_STABILITY_TOLERANCE_DEG,
            scapular_plane_angle: SCAPULAR_PLANE_ANGLE_DEG,
        }
    }
}

impl ClinicalThresholds {
    /// Threshold pair for a movement expressed in a clinical convention
    #[must_use]
    pub const fn for_movement(
        &self,
        movement: MovementType,
        angle_type: AngleType,
    ) -> &JointThreshold {
        match (movement, angle_type) {
            (MovementType::ShoulderFlexion, _) => &self.shoulder_flexion,
            (MovementType::ShoulderAbduction, _) => &self.shoulder_abduction,
            (MovementType::ShoulderRotation, AngleType::InternalRotation) => {
                &self.shoulder_internal_rotation
            }
            (MovementType::ShoulderRotation, _) => &self.shoulder_external_rotation,
            (MovementType::ElbowFlexion, _) => &self.elbow_flexion,
            (MovementType::KneeFlexion, _) => &self.knee_flexion,
        }
    }
}

impl EngineConfig for ClinicalThresholds {
    fn validate(&self) -> Result<(), ConfigError> {
        self.shoulder_flexion
            .validate("shoulder_flexion min_acceptable must be > 0 and <= target")?;
        self.shoulder_abduction
            .validate("shoulder_abduction min_acceptable must be > 0 and <= target")?;
        self.shoulder_external_rotation
            .validate("shoulder_external_rotation min_acceptable must be > 0 and <= target")?;
        self.shoulder_internal_rotation
            .validate("shoulder_internal_rotation min_acceptable must be > 0 and <= target")?;
        self.elbow_flexion
            .validate("elbow_flexion min_acceptable must be > 0 and <= target")?;
        self.knee_flexion
            .validate("knee_flexion min_acceptable must be > 0 and <= target")?;

        if !(self.fair_fraction > 0.0 && self.fair_fraction <= 1.0) {
            return Err(ConfigError::InvalidRange("fair_fraction must be in (0, 1]"));
        }
        check_positive(self.rhythm_min_ratio, "rhythm_min_ratio must be > 0")?;
        if self.rhythm_max_ratio <= self.rhythm_min_ratio {
            return Err(ConfigError::InvalidRange(
                "rhythm_max_ratio must exceed rhythm_min_ratio",
            ));
        }
        check_non_negative(
            self.rhythm_setting_phase_deg,
            "rhythm_setting_phase_deg must be >= 0",
        )?;
        check_positive(
            self.scapular_rotation_per_tilt,
            "scapular_rotation_per_tilt must be > 0",
        )?;
        check_non_negative(
            self.min_measurable_tilt_deg,
            "min_measurable_tilt_deg must be >= 0",
        )?;
        check_non_negative(
            self.rotation_elbow_tolerance,
            "rotation_elbow_tolerance must be >= 0",
        )?;
        check_non_negative(
            self.elbow_extension_tolerance,
            "elbow_extension_tolerance must be >= 0",
        )?;
        check_non_negative(self.upper_arm_tolerance, "upper_arm_tolerance must be >= 0")?;
        if !(0.0..=180.0).contains(&self.rotation_elbow_target)
            || !(0.0..=180.0).contains(&self.elbow_extended)
            || !(0.0..=180.0).contains(&self.upper_arm_at_side)
        {
            return Err(ConfigError::InvalidRange(
                "secondary joint targets must be 0-180 degrees",
            ));
        }
        if !(0.0..=90.0).contains(&self.scapular_plane_angle) {
            return Err(ConfigError::InvalidRange(
                "scapular_plane_angle must be 0-90 degrees",
            ));
        }
        Ok(())
    }
}
