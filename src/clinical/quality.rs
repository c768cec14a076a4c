// ABOUTME: Measurement quality scoring from visibility, frame stability and view orientation
// ABOUTME: Collects degraded-input warnings, rating caps and recommendations during a measurement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use rom_core::config::MeasurementQualityConfig;
use rom_core::constants::quality::{
    DEPTH_RELIABILITY_WITHOUT_DEPTH, DEPTH_RELIABILITY_WITH_DEPTH, FALLBACK_CONFIDENCE_FACTOR,
};
use rom_core::models::{
    AnatomicalReferenceFrame, CompensationType, MeasurementQuality, MovementType, QualityRating,
    ViewOrientation,
};
use rom_core::DegradedInputWarning;

/// Warnings, caps and advice gathered while measuring
#[derive(Debug)]
pub(super) struct QualityNotes {
    pub degraded: Vec<DegradedInputWarning>,
    pub ceiling: QualityRating,
    pub recommendations: Vec<String>,
}

impl Default for QualityNotes {
    fn default() -> Self {
        Self {
            degraded: Vec::new(),
            ceiling: QualityRating::Excellent,
            recommendations: Vec::new(),
        }
    }
}

impl QualityNotes {
    pub fn cap(&mut self, ceiling: QualityRating) {
        self.ceiling = self.ceiling.capped_at(ceiling);
    }

    pub fn warn(&mut self, warning: DegradedInputWarning) {
        if !self.degraded.contains(&warning) {
            self.degraded.push(warning);
        }
    }

    pub fn recommend(&mut self, advice: impl Into<String>) {
        let advice = advice.into();
        if !self.recommendations.contains(&advice) {
            self.recommendations.push(advice);
        }
    }
}

/// Orientation match for a view, treating the two side-view labels alike
pub(super) fn orientation_match(
    config: &MeasurementQualityConfig,
    movement: MovementType,
    view: ViewOrientation,
) -> f64 {
    let preferred = movement.allowed_views().first().copied();
    let is_preferred = preferred.is_some_and(|preferred| {
        preferred == view || (preferred.is_side_view() && view.is_side_view())
    });
    if is_preferred {
        config.preferred_view_match
    } else {
        config.accepted_view_match
    }
}

/// Whether a frame's confidence shows a fallback axis was used
pub(super) fn used_fallback(frame: &AnatomicalReferenceFrame, landmark_visibility: f64) -> bool {
    // Fallbacks scale confidence by FALLBACK_CONFIDENCE_FACTOR; the midpoint separates the cases
    let threshold = landmark_visibility * (1.0 + FALLBACK_CONFIDENCE_FACTOR) / 2.0;
    frame.confidence < threshold
}

/// Advice shown to the user for a detected compensation
pub(super) const fn compensation_advice(compensation_type: CompensationType) -> &'static str {
    match compensation_type {
        CompensationType::TrunkLean => "Keep the trunk upright",
        CompensationType::TrunkRotation => "Keep the chest facing forward",
        CompensationType::ShoulderHiking => "Relax the shoulder down while lifting",
        CompensationType::ElbowFlexion => "Keep the elbow straight",
        CompensationType::HipHike => "Keep both hips level",
        CompensationType::ContralateralLean => "Avoid leaning away from the moving arm",
        CompensationType::AbnormalScapulohumeralRhythm => {
            "Move slowly and let the shoulder blade glide with the arm"
        }
        CompensationType::ElbowPositionDeviation => "Keep the elbow bent at 90° against the side",
    }
}

/// Inputs to the blended quality score
pub(super) struct QualityInputs {
    pub landmark_visibility: f64,
    pub frame_stability: f64,
    pub orientation_match: f64,
    pub has_depth: bool,
}

/// Blend, band and cap the quality of one measurement
pub(super) fn assess(
    config: &MeasurementQualityConfig,
    inputs: &QualityInputs,
    mut notes: QualityNotes,
) -> (MeasurementQuality, Vec<DegradedInputWarning>) {
    if inputs.landmark_visibility < config.visibility_floor {
        notes.cap(QualityRating::Fair);
        notes.warn(DegradedInputWarning::LowVisibility {
            visibility: inputs.landmark_visibility,
        });
        notes.recommend("Improve lighting and keep the whole body in frame");
    }

    let score = config.blend(
        inputs.landmark_visibility,
        inputs.frame_stability,
        inputs.orientation_match,
    );
    let overall = config.rate(score).capped_at(notes.ceiling);
    let depth_reliability = if inputs.has_depth {
        DEPTH_RELIABILITY_WITH_DEPTH
    } else {
        DEPTH_RELIABILITY_WITHOUT_DEPTH
    };

    let quality = MeasurementQuality {
        overall,
        score,
        depth_reliability,
        landmark_visibility: inputs.landmark_visibility,
        frame_stability: inputs.frame_stability,
        orientation_match: inputs.orientation_match,
        recommendations: notes.recommendations,
        warnings: notes.degraded.iter().map(ToString::to_string).collect(),
    };
    (quality, notes.degraded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(visibility: f64) -> QualityInputs {
        QualityInputs {
            landmark_visibility: visibility,
            frame_stability: 0.9,
            orientation_match: 1.0,
            has_depth: false,
        }
    }

    #[test]
    fn test_high_inputs_rate_excellent() {
        let (quality, degraded) = assess(
            &MeasurementQualityConfig::default(),
            &inputs(0.95),
            QualityNotes::default(),
        );
        assert_eq!(quality.overall, QualityRating::Excellent);
        assert!((quality.depth_reliability - 0.6).abs() < f64::EPSILON);
        assert!(degraded.is_empty());
    }

    #[test]
    fn test_low_visibility_caps_at_fair() {
        let config = MeasurementQualityConfig::default();
        let (quality, degraded) = assess(&config, &inputs(0.55), QualityNotes::default());
        assert!(quality.overall <= QualityRating::Fair);
        assert_eq!(degraded.len(), 1);
        assert_eq!(quality.warnings.len(), 1);
    }

    #[test]
    fn test_notes_ceiling_applies() {
        let mut notes = QualityNotes::default();
        notes.cap(QualityRating::Poor);
        notes.cap(QualityRating::Fair);
        let (quality, _) = assess(&MeasurementQualityConfig::default(), &inputs(0.95), notes);
        assert_eq!(quality.overall, QualityRating::Poor);
    }

    #[test]
    fn test_side_views_share_preference() {
        let config = MeasurementQualityConfig::default();
        let flexion = MovementType::ShoulderFlexion;
        let lateral = orientation_match(&config, flexion, ViewOrientation::Lateral);
        let frontal = orientation_match(&config, flexion, ViewOrientation::Frontal);
        assert!((lateral - 1.0).abs() < f64::EPSILON);
        assert!((frontal - 0.7).abs() < f64::EPSILON);
    }
}
