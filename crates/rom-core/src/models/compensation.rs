// ABOUTME: Compensation pattern values and severity grading scales
// ABOUTME: A severity scale maps a raw magnitude onto minimal/mild/moderate/severe cut points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::BodySide;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compensatory movement patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompensationType {
    /// Trunk tilted away from vertical
    TrunkLean,
    /// Trunk twisted away from the camera-implied anterior
    TrunkRotation,
    /// Shoulder girdle elevated on the measured side
    ShoulderHiking,
    /// Elbow bending during a shoulder movement
    ElbowFlexion,
    /// One hip raised relative to the other
    HipHike,
    /// Trunk leaning away from the moving arm
    ContralateralLean,
    /// Glenohumeral to scapulothoracic ratio outside the normal band
    AbnormalScapulohumeralRhythm,
    /// Elbow outside the gating window for shoulder rotation
    ElbowPositionDeviation,
}

impl CompensationType {
    /// Snake-case name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TrunkLean => "trunk_lean",
            Self::TrunkRotation => "trunk_rotation",
            Self::ShoulderHiking => "shoulder_hiking",
            Self::ElbowFlexion => "elbow_flexion",
            Self::HipHike => "hip_hike",
            Self::ContralateralLean => "contralateral_lean",
            Self::AbnormalScapulohumeralRhythm => "abnormal_scapulohumeral_rhythm",
            Self::ElbowPositionDeviation => "elbow_position_deviation",
        }
    }
}

impl fmt::Display for CompensationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a reported compensation, ordered least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Below the mild cut point
    Minimal,
    /// Mild
    Mild,
    /// Moderate
    Moderate,
    /// Severe
    Severe,
}

impl Severity {
    /// Numeric level (minimal 1 through severe 4; absence is 0)
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Minimal => 1,
            Self::Mild => 2,
            Self::Moderate => 3,
            Self::Severe => 4,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Minimal => "minimal",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
        })
    }
}

/// Cut points for grading a magnitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityScale {
    /// Magnitudes below this are not reported
    pub report: f64,
    /// Lower bound of mild
    pub mild: f64,
    /// Lower bound of moderate
    pub moderate: f64,
    /// Lower bound of severe
    pub severe: f64,
}

impl SeverityScale {
    /// Scale from `[report, mild, moderate, severe]`
    #[must_use]
    pub const fn from_cuts(cuts: [f64; 4]) -> Self {
        Self {
            report: cuts[0],
            mild: cuts[1],
            moderate: cuts[2],
            severe: cuts[3],
        }
    }

    /// Whether cut points are finite, non-negative and non-decreasing
    #[must_use]
    pub fn is_monotonic(&self) -> bool {
        let cuts = [self.report, self.mild, self.moderate, self.severe];
        cuts.iter().all(|cut| cut.is_finite() && *cut >= 0.0)
            && cuts.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Grade a magnitude, `None` when below the reporting cut point
    #[must_use]
    pub fn grade(&self, magnitude: f64) -> Option<Severity> {
        if !magnitude.is_finite() || magnitude < self.report {
            None
        } else if magnitude < self.mild {
            Some(Severity::Minimal)
        } else if magnitude < self.moderate {
            Some(Severity::Mild)
        } else if magnitude < self.severe {
            Some(Severity::Moderate)
        } else {
            Some(Severity::Severe)
        }
    }
}

/// A graded compensation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompensationPattern {
    /// Pattern detected
    #[serde(rename = "type")]
    pub compensation_type: CompensationType,
    /// Graded severity
    pub severity: Severity,
    /// Raw magnitude in the pattern's unit (degrees, percent, centimetres or ratio deviation)
    pub magnitude: f64,
    /// Body region affected (e.g. `trunk`, `left_shoulder`)
    pub affects_joint: String,
    /// Human-readable description for clinicians
    pub clinical_note: String,
    /// Elevated or leaning side, when the detector determines one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<BodySide>,
    /// Centimetre estimate for hiking and hip hike
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub displacement_cm: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_is_none_below_report_cut() {
        let scale = SeverityScale::from_cuts([5.0, 5.0, 10.0, 15.0]);
        assert_eq!(scale.grade(4.99), None);
        assert_eq!(scale.grade(5.0), Some(Severity::Mild));
        assert_eq!(scale.grade(10.0), Some(Severity::Moderate));
        assert_eq!(scale.grade(15.0), Some(Severity::Severe));
        assert_eq!(scale.grade(f64::NAN), None);
    }

    #[test]
    fn test_minimal_band_between_report_and_mild() {
        let scale = SeverityScale::from_cuts([0.0, 0.5, 1.0, 2.0]);
        assert_eq!(scale.grade(0.2), Some(Severity::Minimal));
        assert_eq!(scale.grade(0.5), Some(Severity::Mild));
    }

    #[test]
    fn test_grade_monotonic_in_magnitude() {
        let scale = SeverityScale::from_cuts([3.0, 3.0, 5.0, 8.0]);
        let mut previous = None;
        for step in 0..200 {
            let magnitude = f64::from(step) * 0.1;
            let severity = scale.grade(magnitude);
            assert!(severity >= previous, "severity dropped at {magnitude}");
            previous = severity;
        }
    }

    #[test]
    fn test_non_monotonic_scale_detected() {
        assert!(!SeverityScale::from_cuts([5.0, 10.0, 8.0, 15.0]).is_monotonic());
        assert!(!SeverityScale::from_cuts([-1.0, 5.0, 10.0, 15.0]).is_monotonic());
        assert!(SeverityScale::from_cuts([5.0, 5.0, 10.0, 15.0]).is_monotonic());
    }
}
