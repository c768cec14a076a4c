// ABOUTME: Anatomical frame cache configuration
// ABOUTME: Bucketing precision, capacity and TTL with environment variable overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{check_unit_interval, EngineConfig};
use crate::constants::cache::{
    DEFAULT_BUCKET_PRECISION, DEFAULT_MAX_ENTRIES, DEFAULT_TTL_MS, MAX_BUCKET_PRECISION,
    MIN_KEY_VISIBILITY,
};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Frame cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameCacheConfig {
    /// Decimal places kept when bucketing coordinates
    pub precision: u32,
    /// Entries kept before eviction
    pub max_entries: usize,
    /// Entry lifetime in milliseconds
    pub ttl_ms: u64,
    /// Minimum visibility for a landmark to join a spatial key
    pub min_key_visibility: f64,
}

impl Default for FrameCacheConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_BUCKET_PRECISION,
            max_entries: DEFAULT_MAX_ENTRIES,
            ttl_ms: DEFAULT_TTL_MS,
            min_key_visibility: MIN_KEY_VISIBILITY,
        }
    }
}

impl FrameCacheConfig {
    /// Load defaults with `ROM_CACHE_*` environment overrides
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        Self::apply_env_var("ROM_CACHE_PRECISION", &mut config.precision)?;
        Self::apply_env_var("ROM_CACHE_MAX_ENTRIES", &mut config.max_entries)?;
        Self::apply_env_var("ROM_CACHE_TTL_MS", &mut config.ttl_ms)?;
        config.validate()?;
        Ok(config)
    }

    /// Entry lifetime
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// `10^precision`
    #[must_use]
    pub fn bucket_scale(&self) -> f64 {
        10_f64.powf(f64::from(self.precision))
    }

    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }
}

impl EngineConfig for FrameCacheConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.precision > MAX_BUCKET_PRECISION {
            return Err(ConfigError::InvalidPrecision(self.precision));
        }
        if self.max_entries == 0 {
            return Err(ConfigError::ValueOutOfRange("cache max_entries must be > 0"));
        }
        check_unit_interval(self.min_key_visibility, "cache min_key_visibility must be 0-1")
    }
}
