// ABOUTME: Configuration module for every engine stage
// ABOUTME: Serde structs with constant-backed defaults, validation and JSON overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Engine Configuration Module
//!
//! Every struct defaults from `crate::constants` and validates on application. Partial JSON
//! overrides fill omitted fields from the defaults, then validate.

use crate::errors::ConfigError;
use serde::de::DeserializeOwned;

mod cache;
mod clinical;
mod compensation;
mod goniometer;
mod quality;
mod temporal;

pub use cache::FrameCacheConfig;
pub use clinical::{ClinicalThresholds, JointThreshold};
pub use compensation::CompensationDetectionConfig;
pub use goniometer::GoniometerConfig;
pub use quality::MeasurementQualityConfig;
pub use temporal::TemporalAnalysisConfig;

/// Shared behaviour of engine configuration structs
pub trait EngineConfig: Sized + DeserializeOwned {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid
    fn validate(&self) -> Result<(), ConfigError>;

    /// Parse a (possibly partial) JSON override and validate it
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the resulting values are invalid
    fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// Reject values outside `[0, 1]`
pub(crate) fn check_unit_interval(value: f64, message: &'static str) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange(message))
    }
}

/// Reject negative or non-finite values
pub(crate) fn check_non_negative(value: f64, message: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange(message))
    }
}

/// Reject zero, negative or non-finite values
pub(crate) fn check_positive(value: f64, message: &'static str) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::ValueOutOfRange(message))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{CompensationType, SeverityScale};

    #[test]
    fn test_defaults_validate() {
        assert!(GoniometerConfig::default().validate().is_ok());
        assert!(FrameCacheConfig::default().validate().is_ok());
        assert!(CompensationDetectionConfig::default().validate().is_ok());
        assert!(ClinicalThresholds::default().validate().is_ok());
        assert!(MeasurementQualityConfig::default().validate().is_ok());
        assert!(TemporalAnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_cache_precision_rejected() {
        let config = FrameCacheConfig {
            precision: 9,
            ..FrameCacheConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidPrecision(9)));
    }

    #[test]
    fn test_partial_json_override_keeps_defaults() {
        let config = TemporalAnalysisConfig::from_json(r#"{"max_frame_delta": 30.0}"#).unwrap();
        assert!((config.max_frame_delta - 30.0).abs() < f64::EPSILON);
        assert_eq!(config.max_dropouts, TemporalAnalysisConfig::default().max_dropouts);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = ClinicalThresholds::from_json("{not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_non_monotonic_override_rejected() {
        let json = r#"{"hip_hike": {"report": 3.0, "mild": 6.0, "moderate": 5.0, "severe": 8.0}}"#;
        let result = CompensationDetectionConfig::from_json(json);
        assert_eq!(result, Err(ConfigError::NonMonotonicCutPoints("hip_hike")));

        let mut config = CompensationDetectionConfig::default();
        let bad = SeverityScale::from_cuts([5.0, 4.0, 10.0, 15.0]);
        assert!(config.set_scale(CompensationType::TrunkLean, bad).is_err());
        assert_eq!(config.trunk_lean, CompensationDetectionConfig::default().trunk_lean);
    }

    #[test]
    fn test_quality_weights_must_sum_to_one() {
        let config = MeasurementQualityConfig {
            visibility_weight: 0.6,
            ..MeasurementQualityConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWeights(_))));
    }
}
