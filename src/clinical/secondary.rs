// ABOUTME: Secondary joint checks that validate or gate a primary measurement
// ABOUTME: Elbow extended for elevation, upper arm at side for elbow flexion, elbow gate for rotation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use rom_core::config::ClinicalThresholds;
use rom_core::models::{
    BodySide, JointAngle, JointName, MovementType, SecondaryJointMeasurement, SecondaryPurpose,
};

/// Expected angle of a secondary joint for one movement
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct SecondaryCheck {
    pub joint: JointName,
    pub expected: f64,
    pub tolerance: f64,
    pub purpose: SecondaryPurpose,
    pub advice: &'static str,
}

impl SecondaryCheck {
    /// Check that applies to a movement, if any
    pub fn for_movement(
        movement: MovementType,
        side: BodySide,
        thresholds: &ClinicalThresholds,
    ) -> Option<Self> {
        match movement {
            MovementType::ShoulderFlexion | MovementType::ShoulderAbduction => Some(Self {
                joint: JointName::elbow(side),
                expected: thresholds.elbow_extended,
                tolerance: thresholds.elbow_extension_tolerance,
                purpose: SecondaryPurpose::Validation,
                advice: "Keep the elbow straight",
            }),
            MovementType::ElbowFlexion => Some(Self {
                joint: JointName::shoulder(side),
                expected: thresholds.upper_arm_at_side,
                tolerance: thresholds.upper_arm_tolerance,
                purpose: SecondaryPurpose::Validation,
                advice: "Keep the upper arm against the side",
            }),
            MovementType::ShoulderRotation => Some(Self {
                joint: JointName::elbow(side),
                expected: thresholds.rotation_elbow_target,
                tolerance: thresholds.rotation_elbow_tolerance,
                purpose: SecondaryPurpose::Gating,
                advice: "Keep the elbow bent at 90° against the side",
            }),
            MovementType::KneeFlexion => None,
        }
    }

    /// Compare a goniometer reading with the expected angle
    ///
    /// An invalid reading assumes the expected angle and is marked `assumed`.
    pub fn evaluate(&self, measured: &JointAngle) -> SecondaryJointMeasurement {
        if !measured.is_valid {
            return SecondaryJointMeasurement {
                angle: self.expected,
                within_tolerance: true,
                tolerance: self.tolerance,
                purpose: self.purpose,
                deviation: 0.0,
                assumed: true,
                warning: Some(format!(
                    "{} occluded, assumed {:.0}°",
                    self.joint, self.expected
                )),
            };
        }

        let deviation = (measured.angle - self.expected).abs();
        let within_tolerance = deviation <= self.tolerance;
        let warning = (!within_tolerance).then(|| {
            format!(
                "{} at {:.1}° is {deviation:.1}° from the expected {:.0}° (tolerance {:.0}°)",
                self.joint, measured.angle, self.expected, self.tolerance
            )
        });
        SecondaryJointMeasurement {
            angle: measured.angle,
            within_tolerance,
            tolerance: self.tolerance,
            purpose: self.purpose,
            deviation,
            assumed: false,
            warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(joint: JointName, angle: f64) -> JointAngle {
        JointAngle {
            joint_name: joint,
            angle,
            confidence: 0.9,
            is_valid: true,
            vectors: None,
        }
    }

    #[test]
    fn test_gating_boundary_is_inclusive() {
        let thresholds = ClinicalThresholds::default();
        let check = SecondaryCheck::for_movement(
            MovementType::ShoulderRotation,
            BodySide::Right,
            &thresholds,
        );
        let Some(check) = check else {
            unreachable!("rotation always has an elbow gate");
        };
        assert_eq!(check.purpose, SecondaryPurpose::Gating);

        let at_edge = check.evaluate(&reading(JointName::RightElbow, 100.0));
        let beyond = check.evaluate(&reading(JointName::RightElbow, 100.01));
        assert!(at_edge.within_tolerance);
        assert!(!beyond.within_tolerance);
        assert!(beyond.warning.is_some());
    }

    #[test]
    fn test_occluded_secondary_assumes_expected_angle() {
        let thresholds = ClinicalThresholds::default();
        let check = SecondaryCheck::for_movement(
            MovementType::ShoulderFlexion,
            BodySide::Left,
            &thresholds,
        );
        let Some(check) = check else {
            unreachable!("flexion always validates the elbow");
        };
        let result = check.evaluate(&JointAngle::invalid(JointName::LeftElbow, 0.2));
        assert!(result.assumed);
        assert!((result.angle - thresholds.elbow_extended).abs() < f64::EPSILON);
    }

    #[test]
    fn test_knee_has_no_secondary() {
        assert!(SecondaryCheck::for_movement(
            MovementType::KneeFlexion,
            BodySide::Left,
            &ClinicalThresholds::default()
        )
        .is_none());
    }
}
