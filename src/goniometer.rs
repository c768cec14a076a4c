// ABOUTME: Raw interior joint angles from three landmarks with a confidence gate
// ABOUTME: Optional per-joint trailing moving average held in fixed ring buffers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::geometry::{angle_between, subtract};
use rom_core::config::{EngineConfig, GoniometerConfig};
use rom_core::models::{JointAngle, JointName, Landmark, PoseLandmarks};
use rom_core::ConfigError;
use std::collections::VecDeque;

/// Interior angle calculator
///
/// Holds one bounded history per [`JointName`] for smoothing; create one per session.
#[derive(Debug, Clone)]
pub struct Goniometer {
    config: GoniometerConfig,
    history: [VecDeque<f64>; JointName::COUNT],
}

impl Default for Goniometer {
    fn default() -> Self {
        Self {
            config: GoniometerConfig::default(),
            history: Default::default(),
        }
    }
}

impl Goniometer {
    /// Goniometer with a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: GoniometerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            history: Default::default(),
        })
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &GoniometerConfig {
        &self.config
    }

    /// Replace the configuration, clearing history when smoothing changes
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid; the current one is kept
    pub fn set_config(&mut self, config: GoniometerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if config.smoothing_window != self.config.smoothing_window {
            self.reset();
        }
        self.config = config;
        Ok(())
    }

    /// Angle at `vertex` between `proximal` and `distal`
    ///
    /// Returns an invalid angle (0°) when any landmark is below the confidence gate.
    pub fn angle(
        &mut self,
        proximal: &Landmark,
        vertex: &Landmark,
        distal: &Landmark,
        joint: JointName,
    ) -> JointAngle {
        let confidence = proximal
            .visibility
            .min(vertex.visibility)
            .min(distal.visibility);
        if confidence < self.config.min_confidence {
            return JointAngle::invalid(joint, confidence);
        }

        let (a, b, c) = if self.config.use_3d {
            (proximal.position(), vertex.position(), distal.position())
        } else {
            (proximal.position_2d(), vertex.position_2d(), distal.position_2d())
        };
        let to_proximal = subtract(a, b);
        let to_distal = subtract(c, b);
        let raw = angle_between(to_proximal, to_distal);

        JointAngle {
            joint_name: joint,
            angle: self.smooth(joint, raw),
            confidence,
            is_valid: true,
            vectors: Some([to_proximal, to_distal]),
        }
    }

    /// Resolve a named joint through the pose's skeleton and measure it
    pub fn measure(&mut self, landmarks: &PoseLandmarks<'_>, joint: JointName) -> JointAngle {
        let (proximal, vertex, distal) = joint.landmarks();
        match (
            landmarks.get(proximal),
            landmarks.get(vertex),
            landmarks.get(distal),
        ) {
            (Some(a), Some(b), Some(c)) => self.angle(a, b, c, joint),
            _ => JointAngle::invalid(joint, 0.0),
        }
    }

    /// Drop the smoothing history of one joint
    pub fn reset_joint(&mut self, joint: JointName) {
        self.history[joint.index()].clear();
    }

    /// Drop every smoothing history
    pub fn reset(&mut self) {
        self.history.iter_mut().for_each(VecDeque::clear);
    }

    fn smooth(&mut self, joint: JointName, raw: f64) -> f64 {
        if !self.config.smoothing_enabled() {
            return raw;
        }
        let window = self.config.smoothing_window;
        let history = &mut self.history[joint.index()];
        while history.len() >= window {
            history.pop_front();
        }
        history.push_back(raw);
        history.iter().sum::<f64>() / history.len() as f64
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn unsmoothed() -> Goniometer {
        Goniometer::new(GoniometerConfig {
            smoothing_window: 0,
            ..GoniometerConfig::default()
        })
        .unwrap()
    }

    fn lm(x: f64, y: f64) -> Landmark {
        Landmark::new("p", x, y, 0.9)
    }

    #[test]
    fn test_collinear_is_straight() {
        let mut goniometer = unsmoothed();
        let angle = goniometer.angle(
            &lm(0.5, 0.2),
            &lm(0.5, 0.4),
            &lm(0.5, 0.6),
            JointName::LeftElbow,
        );
        assert!(angle.is_valid);
        assert!((angle.angle - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_right_angle() {
        let mut goniometer = unsmoothed();
        let angle = goniometer.angle(
            &lm(0.5, 0.2),
            &lm(0.5, 0.4),
            &lm(0.7, 0.4),
            JointName::RightElbow,
        );
        assert!((angle.angle - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_low_confidence_is_invalid() {
        let mut goniometer = unsmoothed();
        let faint = Landmark::new("wrist", 0.7, 0.4, 0.3);
        let angle = goniometer.angle(&lm(0.5, 0.2), &lm(0.5, 0.4), &faint, JointName::LeftElbow);
        assert!(!angle.is_valid);
        assert!(angle.angle.abs() < f64::EPSILON);
        assert!((angle.confidence - 0.3).abs() < f64::EPSILON);
    }

    #[test]
    fn test_coincident_landmarks_are_finite() {
        let mut goniometer = unsmoothed();
        let angle = goniometer.angle(
            &lm(0.5, 0.4),
            &lm(0.5, 0.4),
            &lm(0.7, 0.4),
            JointName::LeftKnee,
        );
        assert!(angle.angle.is_finite());
        assert!(angle.angle.abs() < f64::EPSILON);
    }

    #[test]
    fn test_smoothing_averages_trailing_window() {
        let mut goniometer = Goniometer::new(GoniometerConfig {
            smoothing_window: 2,
            ..GoniometerConfig::default()
        })
        .unwrap();
        let straight = goniometer.angle(
            &lm(0.5, 0.2),
            &lm(0.5, 0.4),
            &lm(0.5, 0.6),
            JointName::LeftElbow,
        );
        let bent = goniometer.angle(
            &lm(0.5, 0.2),
            &lm(0.5, 0.4),
            &lm(0.7, 0.4),
            JointName::LeftElbow,
        );
        assert!((straight.angle - 180.0).abs() < 1e-6);
        assert!((bent.angle - 135.0).abs() < 1e-6);

        goniometer.reset_joint(JointName::LeftElbow);
        let fresh = goniometer.angle(
            &lm(0.5, 0.2),
            &lm(0.5, 0.4),
            &lm(0.7, 0.4),
            JointName::LeftElbow,
        );
        assert!((fresh.angle - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut goniometer = Goniometer::default();
        let result = goniometer.set_config(GoniometerConfig {
            min_confidence: 1.5,
            ..GoniometerConfig::default()
        });
        assert!(result.is_err());
        assert!((goniometer.config().min_confidence - 0.5).abs() < f64::EPSILON);
    }
}
