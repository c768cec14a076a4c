// ABOUTME: Scapulohumeral rhythm estimated from inter-shoulder tilt during abduction
// ABOUTME: Splits abduction into glenohumeral and scapulothoracic parts and checks the ratio band
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use rom_core::config::ClinicalThresholds;
use rom_core::models::{BodySide, LandmarkId, MeasurementComponents, PoseLandmarks};

/// Inter-shoulder line tilt from horizontal in the image (degrees)
pub(super) fn shoulder_tilt(landmarks: &PoseLandmarks<'_>, min_visibility: f64) -> Option<f64> {
    let left = landmarks.visible(LandmarkId::shoulder(BodySide::Left), min_visibility)?;
    let right = landmarks.visible(LandmarkId::shoulder(BodySide::Right), min_visibility)?;
    let dx = (right.x - left.x).abs();
    let dy = (right.y - left.y).abs();
    Some(dy.atan2(dx).to_degrees())
}

/// Decompose an abduction angle
///
/// Scapular upward rotation is approximated as a fixed multiple of shoulder-line tilt. The
/// components are indeterminate during the setting phase or without measurable tilt.
pub(super) fn decompose(
    thresholds: &ClinicalThresholds,
    abduction: f64,
    tilt: Option<f64>,
) -> MeasurementComponents {
    let Some(tilt) = tilt.filter(|tilt| {
        abduction >= thresholds.rhythm_setting_phase_deg
            && *tilt >= thresholds.min_measurable_tilt_deg
    }) else {
        return MeasurementComponents::default();
    };

    let scapulothoracic = (tilt * thresholds.scapular_rotation_per_tilt).min(abduction);
    let glenohumeral = abduction - scapulothoracic;
    MeasurementComponents {
        glenohumeral: Some(glenohumeral),
        scapulothoracic: Some(scapulothoracic),
        rhythm_ratio: Some(glenohumeral / scapulothoracic),
    }
}

/// Distance of a ratio outside the normal band, `None` inside it
pub(super) fn ratio_deviation(thresholds: &ClinicalThresholds, ratio: f64) -> Option<f64> {
    if ratio < thresholds.rhythm_min_ratio {
        Some(thresholds.rhythm_min_ratio - ratio)
    } else if ratio > thresholds.rhythm_max_ratio {
        Some(ratio - thresholds.rhythm_max_ratio)
    } else {
        None
    }
}
