// ABOUTME: Temporal consistency analyzer configuration
// ABOUTME: Jump, smoothness, trajectory, persistence and quality-degradation thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{check_non_negative, check_positive, check_unit_interval, EngineConfig};
use crate::constants::temporal::{
    DEFAULT_MAX_DROPOUTS, DEFAULT_MAX_FRAME_DELTA_DEG, DEFAULT_MIN_FRAME_QUALITY,
    DEFAULT_MIN_SMOOTHNESS, DEFAULT_PERSISTENCE_THRESHOLD_PCT, DIRECTIONAL_CONSISTENCY,
    ERRATIC_VELOCITY_SPREAD, MAX_OSCILLATION_REVERSAL_RATE, MIN_OSCILLATION_REVERSALS,
    PROGRESSION_SEVERITY_DELTA, QUALITY_DROPOUT_DELTA, SMOOTHNESS_STDDEV_SCALE_DEG,
    STATIC_ROM_THRESHOLD_DEG, VELOCITY_NOISE_THRESHOLD_DEG_S,
};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Temporal analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalAnalysisConfig {
    /// Frame-to-frame change counted as a sudden jump (degrees)
    pub max_frame_delta: f64,
    /// Delta standard deviation that drives smoothness to zero (degrees)
    pub smoothness_scale: f64,
    /// Minimum smoothness for consistency to pass
    pub min_smoothness: f64,
    /// Apply a 3-point moving average before classifying (skipped when oscillation is expected)
    pub smooth_trajectory: bool,
    /// Range of motion below which the trajectory is static (degrees)
    pub static_rom_threshold: f64,
    /// Share of significant velocities needed for a monotonic trajectory
    pub directional_consistency: f64,
    /// Velocities below this are jitter (degrees per second)
    pub velocity_noise_threshold: f64,
    /// Significant reversals needed for oscillation
    pub min_oscillation_reversals: usize,
    /// Reversals per significant velocity above which motion is jitter
    pub max_reversal_rate: f64,
    /// Velocity stddev / mean magnitude above which motion is erratic
    pub erratic_velocity_spread: f64,
    /// Persistence above which a compensation is persistent (percent)
    pub persistence_threshold: f64,
    /// Severity increase between thirds marking progression (levels)
    pub progression_delta: f64,
    /// Per-frame quality floor
    pub min_frame_quality: f64,
    /// Frame-to-frame quality drop counted as a dropout
    pub dropout_delta: f64,
    /// Dropouts tolerated
    pub max_dropouts: usize,
}

impl Default for TemporalAnalysisConfig {
    fn default() -> Self {
        Self {
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA_DEG,
            smoothness_scale: SMOOTHNESS_STDDEV_SCALE_DEG,
            min_smoothness: DEFAULT_MIN_SMOOTHNESS,
            smooth_trajectory: true,
            static_rom_threshold: STATIC_ROM_THRESHOLD_DEG,
            directional_consistency: DIRECTIONAL_CONSISTENCY,
            velocity_noise_threshold: VELOCITY_NOISE_THRESHOLD_DEG_S,
            min_oscillation_reversals: MIN_OSCILLATION_REVERSALS,
            max_reversal_rate: MAX_OSCILLATION_REVERSAL_RATE,
            erratic_velocity_spread: ERRATIC_VELOCITY_SPREAD,
            persistence_threshold: DEFAULT_PERSISTENCE_THRESHOLD_PCT,
            progression_delta: PROGRESSION_SEVERITY_DELTA,
            min_frame_quality: DEFAULT_MIN_FRAME_QUALITY,
            dropout_delta: QUALITY_DROPOUT_DELTA,
            max_dropouts: DEFAULT_MAX_DROPOUTS,
        }
    }
}

impl EngineConfig for TemporalAnalysisConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_positive(self.max_frame_delta, "max_frame_delta must be > 0")?;
        check_positive(self.smoothness_scale, "smoothness_scale must be > 0")?;
        check_unit_interval(self.min_smoothness, "min_smoothness must be 0-1")?;
        check_non_negative(self.static_rom_threshold, "static_rom_threshold must be >= 0")?;
        if !(self.directional_consistency > 0.5 && self.directional_consistency <= 1.0) {
            return Err(ConfigError::InvalidRange(
                "directional_consistency must be in (0.5, 1]",
            ));
        }
        check_non_negative(
            self.velocity_noise_threshold,
            "velocity_noise_threshold must be >= 0",
        )?;
        check_unit_interval(self.max_reversal_rate, "max_reversal_rate must be 0-1")?;
        check_positive(
            self.erratic_velocity_spread,
            "erratic_velocity_spread must be > 0",
        )?;
        if !(0.0..=100.0).contains(&self.persistence_threshold) {
            return Err(ConfigError::InvalidRange(
                "persistence_threshold must be 0-100",
            ));
        }
        check_non_negative(self.progression_delta, "progression_delta must be >= 0")?;
        check_unit_interval(self.min_frame_quality, "min_frame_quality must be 0-1")?;
        check_unit_interval(self.dropout_delta, "dropout_delta must be 0-1")
    }
}
