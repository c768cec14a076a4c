// ABOUTME: Compensation detection configuration
// ABOUTME: Per-pattern severity scales, detector visibility gate and anthropometric scale
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{check_positive, check_unit_interval, EngineConfig};
use crate::constants::anthropometry::{ASSUMED_BODY_HEIGHT_CM, TORSO_TO_BODY_HEIGHT_RATIO};
use crate::constants::compensation::{
    CONTRALATERAL_LEAN_CUTS_DEG, ELBOW_FLEXION_CUTS_DEG, ELBOW_POSITION_CUTS_DEG,
    HIP_HIKE_CUTS_CM, MIN_DETECTOR_VISIBILITY, RHYTHM_DEVIATION_CUTS, SHOULDER_HIKING_CUTS_PCT,
    TRUNK_LEAN_CUTS_DEG, TRUNK_ROTATION_CUTS_DEG,
};
use crate::errors::ConfigError;
use crate::models::{CompensationType, SeverityScale};
use serde::{Deserialize, Serialize};

/// Compensation thresholds and severity cut points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompensationDetectionConfig {
    /// Minimum visibility of every landmark a detector consumes
    pub min_visibility: f64,
    /// Assumed standing height for centimetre conversions
    pub body_height_cm: f64,
    /// Torso height as a fraction of standing height
    pub torso_height_ratio: f64,
    /// Trunk lean scale (degrees)
    pub trunk_lean: SeverityScale,
    /// Trunk rotation scale (degrees)
    pub trunk_rotation: SeverityScale,
    /// Shoulder hiking scale (percent of a 90° tilt)
    pub shoulder_hiking: SeverityScale,
    /// Elbow flexion drift scale (degrees)
    pub elbow_flexion: SeverityScale,
    /// Hip hike scale (centimetres)
    pub hip_hike: SeverityScale,
    /// Contralateral lean scale (degrees)
    pub contralateral_lean: SeverityScale,
    /// Elbow gating deviation scale (degrees)
    pub elbow_position: SeverityScale,
    /// Rhythm ratio deviation scale
    pub scapulohumeral_rhythm: SeverityScale,
}

impl Default for CompensationDetectionConfig {
    fn default() -> Self {
        Self {
            min_visibility: MIN_DETECTOR_VISIBILITY,
            body_height_cm: ASSUMED_BODY_HEIGHT_CM,
            torso_height_ratio: TORSO_TO_BODY_HEIGHT_RATIO,
            trunk_lean: SeverityScale::from_cuts(TRUNK_LEAN_CUTS_DEG),
            trunk_rotation: SeverityScale::from_cuts(TRUNK_ROTATION_CUTS_DEG),
            shoulder_hiking: SeverityScale::from_cuts(SHOULDER_HIKING_CUTS_PCT),
            elbow_flexion: SeverityScale::from_cuts(ELBOW_FLEXION_CUTS_DEG),
            hip_hike: SeverityScale::from_cuts(HIP_HIKE_CUTS_CM),
            contralateral_lean: SeverityScale::from_cuts(CONTRALATERAL_LEAN_CUTS_DEG),
            elbow_position: SeverityScale::from_cuts(ELBOW_POSITION_CUTS_DEG),
            scapulohumeral_rhythm: SeverityScale::from_cuts(RHYTHM_DEVIATION_CUTS),
        }
    }
}

impl CompensationDetectionConfig {
    /// Severity scale for a pattern
    #[must_use]
    pub const fn scale(&self, compensation_type: CompensationType) -> &SeverityScale {
        match compensation_type {
            CompensationType::TrunkLean => &self.trunk_lean,
            CompensationType::TrunkRotation => &self.trunk_rotation,
            CompensationType::ShoulderHiking => &self.shoulder_hiking,
            CompensationType::ElbowFlexion => &self.elbow_flexion,
            CompensationType::HipHike => &self.hip_hike,
            CompensationType::ContralateralLean => &self.contralateral_lean,
            CompensationType::ElbowPositionDeviation => &self.elbow_position,
            CompensationType::AbnormalScapulohumeralRhythm => &self.scapulohumeral_rhythm,
        }
    }

    /// Replace the severity scale of one pattern
    ///
    /// # Errors
    ///
    /// Returns an error if the cut points are not non-negative and non-decreasing
    pub fn set_scale(
        &mut self,
        compensation_type: CompensationType,
        scale: SeverityScale,
    ) -> Result<(), ConfigError> {
        if !scale.is_monotonic() {
            return Err(ConfigError::NonMonotonicCutPoints(compensation_type.as_str()));
        }
        let slot = match compensation_type {
            CompensationType::TrunkLean => &mut self.trunk_lean,
            CompensationType::TrunkRotation => &mut self.trunk_rotation,
            CompensationType::ShoulderHiking => &mut self.shoulder_hiking,
            CompensationType::ElbowFlexion => &mut self.elbow_flexion,
            CompensationType::HipHike => &mut self.hip_hike,
            CompensationType::ContralateralLean => &mut self.contralateral_lean,
            CompensationType::ElbowPositionDeviation => &mut self.elbow_position,
            CompensationType::AbnormalScapulohumeralRhythm => &mut self.scapulohumeral_rhythm,
        };
        *slot = scale;
        Ok(())
    }
}

const ALL_TYPES: [CompensationType; 8] = [
    CompensationType::TrunkLean,
    CompensationType::TrunkRotation,
    CompensationType::ShoulderHiking,
    CompensationType::ElbowFlexion,
    CompensationType::HipHike,
    CompensationType::ContralateralLean,
    CompensationType::ElbowPositionDeviation,
    CompensationType::AbnormalScapulohumeralRhythm,
];

impl EngineConfig for CompensationDetectionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_unit_interval(self.min_visibility, "compensation min_visibility must be 0-1")?;
        check_positive(self.body_height_cm, "body_height_cm must be > 0")?;
        check_positive(self.torso_height_ratio, "torso_height_ratio must be > 0")?;
        for compensation_type in ALL_TYPES {
            if !self.scale(compensation_type).is_monotonic() {
                return Err(ConfigError::NonMonotonicCutPoints(compensation_type.as_str()));
            }
        }
        Ok(())
    }
}
