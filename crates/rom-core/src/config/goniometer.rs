// ABOUTME: Goniometer configuration
// ABOUTME: Confidence gate, smoothing window and 2D/3D vector mode
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{check_unit_interval, EngineConfig};
use crate::constants::goniometer::{
    DEFAULT_MIN_CONFIDENCE, DEFAULT_SMOOTHING_WINDOW, MAX_SMOOTHING_WINDOW,
};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Goniometer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoniometerConfig {
    /// Minimum visibility for each of the three landmarks
    pub min_confidence: f64,
    /// Trailing moving-average window; 0 or 1 disables smoothing
    pub smoothing_window: usize,
    /// Use depth when computing angles (2D is the default because depth is often unreliable)
    pub use_3d: bool,
}

impl Default for GoniometerConfig {
    fn default() -> Self {
        Self {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            smoothing_window: DEFAULT_SMOOTHING_WINDOW,
            use_3d: false,
        }
    }
}

impl GoniometerConfig {
    /// Whether smoothing is active
    #[must_use]
    pub const fn smoothing_enabled(&self) -> bool {
        self.smoothing_window > 1
    }
}

impl EngineConfig for GoniometerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        check_unit_interval(self.min_confidence, "goniometer min_confidence must be 0-1")?;
        if self.smoothing_window > MAX_SMOOTHING_WINDOW {
            return Err(ConfigError::ValueOutOfRange(
                "goniometer smoothing_window must be <= 64",
            ));
        }
        Ok(())
    }
}
