// ABOUTME: Measurement quality blending configuration
// ABOUTME: Component weights, rating bands and the visibility cap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{check_unit_interval, EngineConfig};
use crate::constants::quality::{
    ACCEPTED_VIEW_MATCH, EXCELLENT_THRESHOLD, FAIR_THRESHOLD, FRAME_STABILITY_WEIGHT,
    GOOD_THRESHOLD, ORIENTATION_WEIGHT, PREFERRED_VIEW_MATCH, VISIBILITY_FLOOR, VISIBILITY_WEIGHT,
};
use crate::errors::ConfigError;
use crate::models::QualityRating;
use serde::{Deserialize, Serialize};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Quality blending settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementQualityConfig {
    /// Weight of landmark visibility
    pub visibility_weight: f64,
    /// Weight of frame stability
    pub frame_stability_weight: f64,
    /// Weight of orientation match
    pub orientation_weight: f64,
    /// Score for an excellent rating
    pub excellent_threshold: f64,
    /// Score for a good rating
    pub good_threshold: f64,
    /// Score for a fair rating
    pub fair_threshold: f64,
    /// Visibility below which the rating is capped at fair
    pub visibility_floor: f64,
    /// Orientation match for the preferred view
    pub preferred_view_match: f64,
    /// Orientation match for other accepted views
    pub accepted_view_match: f64,
}

impl Default for MeasurementQualityConfig {
    fn default() -> Self {
        Self {
            visibility_weight: VISIBILITY_WEIGHT,
            frame_stability_weight: FRAME_STABILITY_WEIGHT,
            orientation_weight: ORIENTATION_WEIGHT,
            excellent_threshold: EXCELLENT_THRESHOLD,
            good_threshold: GOOD_THRESHOLD,
            fair_threshold: FAIR_THRESHOLD,
            visibility_floor: VISIBILITY_FLOOR,
            preferred_view_match: PREFERRED_VIEW_MATCH,
            accepted_view_match: ACCEPTED_VIEW_MATCH,
        }
    }
}

impl MeasurementQualityConfig {
    /// Weighted blend of the three components
    #[must_use]
    pub fn blend(&self, visibility: f64, frame_stability: f64, orientation_match: f64) -> f64 {
        self.orientation_weight.mul_add(
            orientation_match,
            self.visibility_weight
                .mul_add(visibility, self.frame_stability_weight * frame_stability),
        )
    }

    /// Band a blended score
    #[must_use]
    pub fn rate(&self, score: f64) -> QualityRating {
        if score >= self.excellent_threshold {
            QualityRating::Excellent
        } else if score >= self.good_threshold {
            QualityRating::Good
        } else if score >= self.fair_threshold {
            QualityRating::Fair
        } else {
            QualityRating::Poor
        }
    }
}

impl EngineConfig for MeasurementQualityConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        for weight in [
            self.visibility_weight,
            self.frame_stability_weight,
            self.orientation_weight,
        ] {
            check_unit_interval(weight, "quality weights must be 0-1")?;
        }
        let sum = self.visibility_weight + self.frame_stability_weight + self.orientation_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::InvalidWeights("quality weights must sum to 1.0"));
        }
        if !(self.fair_threshold <= self.good_threshold
            && self.good_threshold <= self.excellent_threshold)
        {
            return Err(ConfigError::InvalidRange(
                "quality thresholds must be fair <= good <= excellent",
            ));
        }
        check_unit_interval(self.excellent_threshold, "quality thresholds must be 0-1")?;
        check_unit_interval(self.fair_threshold, "quality thresholds must be 0-1")?;
        check_unit_interval(self.visibility_floor, "visibility_floor must be 0-1")?;
        check_unit_interval(self.preferred_view_match, "preferred_view_match must be 0-1")?;
        check_unit_interval(self.accepted_view_match, "accepted_view_match must be 0-1")
    }
}
