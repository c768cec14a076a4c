// ABOUTME: Subscriber setup for hosts that embed the engine without their own tracing stack
// ABOUTME: Level, output format and source locations read from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Structured logging setup
//!
//! The engine itself only emits `tracing` events. Hosts that do not install their own
//! subscriber can call [`init_from_env`] once at startup.
//!
//! | Variable | Effect | Default |
//! |---|---|---|
//! | `RUST_LOG` | filter directive | `info` |
//! | `LOG_FORMAT` | `json`, `pretty` or `compact` | `pretty` |
//! | `ENVIRONMENT` | `production` turns on source locations | `development` |
//! | `LOG_INCLUDE_LOCATION` | source locations in any environment | unset |
//! | `SERVICE_NAME` | name in the startup event | `rom-engine` |

use anyhow::{anyhow, Result};
use std::env;
use std::io;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name reported in the startup event
pub const SERVICE_NAME: &str = "rom-engine";

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_ENVIRONMENT: &str = "development";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per event
    Json,
    /// Human-readable output with targets
    #[default]
    Pretty,
    /// Single-line output without targets
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value; anything unrecognised is pretty
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `rom_engine=debug`
    pub level: String,
    /// Output format
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Service name for the startup event
    pub service_name: String,
    /// Deployment environment
    pub environment: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL.to_owned(),
            format: LogFormat::default(),
            include_location: false,
            service_name: SERVICE_NAME.to_owned(),
            environment: DEFAULT_ENVIRONMENT.to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Configuration from process environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    /// Configuration from any variable source
    ///
    /// `lookup` returns the value of a variable, or `None` when it is unset.
    #[must_use]
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_owned());
        Self {
            level: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LEVEL.to_owned()),
            format: lookup("LOG_FORMAT").map_or_else(LogFormat::default, |v| LogFormat::parse(&v)),
            include_location: environment == "production"
                || lookup("LOG_INCLUDE_LOCATION").is_some(),
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| SERVICE_NAME.to_owned()),
            environment,
        }
    }

    /// Filter built from the configured level
    ///
    /// # Errors
    ///
    /// Returns an error if the level is not a valid filter directive
    pub fn env_filter(&self) -> Result<EnvFilter> {
        EnvFilter::try_new(&self.level)
            .map_err(|e| anyhow!("Invalid log filter '{}': {e}", self.level))
    }

    /// Install the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if the level is invalid or a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter()?);
        let layer = fmt::layer()
            .with_file(self.include_location)
            .with_line_number(self.include_location)
            .with_writer(io::stdout);

        let installed = match self.format {
            LogFormat::Json => registry.with(layer.json()).try_init(),
            LogFormat::Pretty => registry.with(layer).try_init(),
            LogFormat::Compact => registry.with(layer.compact().with_target(false)).try_init(),
        };
        installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

        info!(
            service.name = %self.service_name,
            service.version = env!("CARGO_PKG_VERSION"),
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "ROM engine logging initialized"
        );
        Ok(())
    }
}

/// Install a subscriber configured from the environment
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a subscriber is already installed
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}
