// ABOUTME: Temporal validation of measurement sequences across frames
// ABOUTME: Consistency, trajectory shape, compensation persistence and quality degradation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Temporal consistency
//!
//! A [`TemporalMeasurementSequence`] holds the per-frame measurements of one repetition.
//! [`TemporalConsistencyAnalyzer::analyze`] checks that the primary angle moves plausibly
//! between frames, classifies the trajectory, tracks how compensations persist and whether
//! measurement quality held up.

use rom_core::config::{EngineConfig, TemporalAnalysisConfig};
use rom_core::constants::temporal::MIN_SEQUENCE_FRAMES;
use rom_core::models::{
    ClinicalJointMeasurement, CompensationTracking, CompensationType, ConsistencyResult,
    QualityDegradationResult, Severity, TemporalMeasurementSequence, TemporalValidationResult,
    TrajectoryPattern, TrajectoryResult,
};
use rom_core::{ConfigError, EngineResult, PreconditionError};
use std::collections::BTreeMap;
use tracing::debug;

/// Mean and population standard deviation
#[allow(clippy::cast_precision_loss)]
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[allow(clippy::cast_precision_loss)]
fn share(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Angle tracked over time; signed for rotation so crossings through neutral are kept
fn tracked_angle(measurement: &ClinicalJointMeasurement) -> f64 {
    measurement
        .primary_joint
        .signed_angle
        .unwrap_or(measurement.primary_joint.angle)
}

/// Centered 3-point moving average with the endpoints kept
fn smooth3(angles: &[f64]) -> Vec<f64> {
    if angles.len() < 3 {
        return angles.to_vec();
    }
    let mut smoothed = Vec::with_capacity(angles.len());
    smoothed.push(angles[0]);
    smoothed.extend(angles.windows(3).map(|w| (w[0] + w[1] + w[2]) / 3.0));
    smoothed.push(angles[angles.len() - 1]);
    smoothed
}

fn sign_changes(values: &[f64]) -> usize {
    values
        .windows(2)
        .filter(|pair| pair[0].signum() != pair[1].signum())
        .count()
}

/// Validates measurement sequences
#[derive(Debug, Clone, Default)]
pub struct TemporalConsistencyAnalyzer {
    config: TemporalAnalysisConfig,
}

impl TemporalConsistencyAnalyzer {
    /// Analyzer with a validated configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: TemporalAnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &TemporalAnalysisConfig {
        &self.config
    }

    /// Replace the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid; the current one is kept
    pub fn set_config(&mut self, config: TemporalAnalysisConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Validate a sequence
    ///
    /// `quality_scores` overrides the per-frame quality when it has one score per
    /// measurement; otherwise each measurement's blended `quality.score` is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence has fewer than two measurements or a frame rate
    /// that is not positive and finite
    pub fn analyze(
        &self,
        sequence: &TemporalMeasurementSequence,
        quality_scores: Option<&[f64]>,
        expected: Option<TrajectoryPattern>,
    ) -> EngineResult<TemporalValidationResult> {
        let measurements = &sequence.measurements;
        if measurements.len() < MIN_SEQUENCE_FRAMES {
            return Err(PreconditionError::InsufficientFrames {
                required: MIN_SEQUENCE_FRAMES,
                actual: measurements.len(),
            }
            .into());
        }
        if !(sequence.frame_rate.is_finite() && sequence.frame_rate > 0.0) {
            return Err(PreconditionError::InvalidFrameRate(sequence.frame_rate).into());
        }

        let angles: Vec<f64> = measurements.iter().map(tracked_angle).collect();
        let consistency = self.consistency(&angles);
        let trajectory = self.trajectory(&angles, sequence.frame_rate, expected);
        let compensations = self.track_compensations(measurements);

        let scores: Vec<f64> = match quality_scores {
            Some(scores) if scores.len() == measurements.len() => scores.to_vec(),
            _ => measurements.iter().map(|m| m.quality.score).collect(),
        };
        let quality = self.quality_degradation(&scores, sequence.duration);

        let passed = consistency.passed && quality.passed && trajectory.matches_expected;
        debug!(
            sequence_id = %sequence.sequence_id,
            frames = measurements.len(),
            pattern = %trajectory.pattern,
            sudden_jumps = consistency.sudden_jumps,
            dropouts = quality.dropouts,
            passed,
            "Temporal analysis complete"
        );

        Ok(TemporalValidationResult {
            sequence_id: sequence.sequence_id,
            passed,
            consistency,
            trajectory,
            compensations,
            quality,
        })
    }

    /// Frame-to-frame change statistics
    ///
    /// A jump that immediately returns (a single-frame spike) counts as one event.
    #[must_use]
    pub fn consistency(&self, angles: &[f64]) -> ConsistencyResult {
        let steps: Vec<f64> = angles.windows(2).map(|w| w[1] - w[0]).collect();
        let deltas: Vec<f64> = steps.iter().map(|d| d.abs()).collect();
        let (mean_delta, std_dev_delta) = mean_std(&deltas);
        let max_delta = deltas.iter().copied().fold(0.0, f64::max);

        let limit = self.config.max_frame_delta;
        let mut sudden_jumps = 0;
        let mut i = 0;
        while i < steps.len() {
            if steps[i].abs() > limit {
                sudden_jumps += 1;
                let returns = steps
                    .get(i + 1)
                    .is_some_and(|next| next.abs() > limit && next.signum() != steps[i].signum());
                if returns {
                    i += 1;
                }
            }
            i += 1;
        }

        let smoothness_score = 1.0 - (std_dev_delta / self.config.smoothness_scale).min(1.0);
        ConsistencyResult {
            passed: sudden_jumps == 0 && smoothness_score >= self.config.min_smoothness,
            mean_delta,
            max_delta,
            std_dev_delta,
            sudden_jumps,
            smoothness_score,
        }
    }

    /// Classify the shape of an angle series sampled at `frame_rate`
    #[must_use]
    pub fn trajectory(
        &self,
        angles: &[f64],
        frame_rate: f64,
        expected: Option<TrajectoryPattern>,
    ) -> TrajectoryResult {
        let smoothed =
            self.config.smooth_trajectory && expected != Some(TrajectoryPattern::Oscillating);
        let series = if smoothed {
            smooth3(angles)
        } else {
            angles.to_vec()
        };

        let (min, max) = series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &a| {
                (lo.min(a), hi.max(a))
            });
        let range_of_motion = if series.is_empty() { 0.0 } else { max - min };
        let velocities: Vec<f64> = series
            .windows(2)
            .map(|w| (w[1] - w[0]) * frame_rate)
            .collect();
        let magnitudes: Vec<f64> = velocities.iter().map(|v| v.abs()).collect();
        let peak_velocity = magnitudes.iter().copied().fold(0.0, f64::max);
        let (mean_velocity, _) = mean_std(&magnitudes);

        let mut significant: Vec<f64> = velocities
            .iter()
            .copied()
            .filter(|v| v.abs() > self.config.velocity_noise_threshold)
            .collect();
        if significant.is_empty() {
            // Slow drift: fall back to every non-zero velocity
            significant = velocities.iter().copied().filter(|v| *v != 0.0).collect();
        }
        let direction_reversals = sign_changes(&significant);
        let pattern = self.classify(range_of_motion, &significant, direction_reversals);

        let matches_expected = expected.is_none_or(|expected| expected == pattern);
        let notes = expected
            .filter(|_| !matches_expected)
            .map(|expected| {
                vec![format!(
                    "Expected {expected} trajectory, observed {pattern} \
                     (range {range_of_motion:.1}°, {direction_reversals} reversals)"
                )]
            })
            .unwrap_or_default();

        TrajectoryResult {
            pattern,
            expected_pattern: expected,
            matches_expected,
            range_of_motion,
            peak_velocity,
            mean_velocity,
            direction_reversals,
            smoothed,
            notes,
        }
    }

    fn classify(
        &self,
        range_of_motion: f64,
        significant: &[f64],
        reversals: usize,
    ) -> TrajectoryPattern {
        if range_of_motion < self.config.static_rom_threshold || significant.is_empty() {
            return TrajectoryPattern::Static;
        }

        let rising = significant.iter().filter(|v| **v > 0.0).count();
        let falling = significant.len() - rising;
        if share(rising, significant.len()) > self.config.directional_consistency {
            return TrajectoryPattern::Increasing;
        }
        if share(falling, significant.len()) > self.config.directional_consistency {
            return TrajectoryPattern::Decreasing;
        }

        let (_, spread) = mean_std(significant);
        let magnitudes: Vec<f64> = significant.iter().map(|v| v.abs()).collect();
        let (mean_magnitude, _) = mean_std(&magnitudes);
        let balanced = reversals >= self.config.min_oscillation_reversals
            && share(reversals, significant.len()) <= self.config.max_reversal_rate
            && spread <= self.config.erratic_velocity_spread * mean_magnitude;
        if balanced {
            TrajectoryPattern::Oscillating
        } else {
            TrajectoryPattern::Erratic
        }
    }

    /// Persistence of each compensation type seen in the sequence, ordered by type
    #[must_use]
    pub fn track_compensations(
        &self,
        measurements: &[ClinicalJointMeasurement],
    ) -> Vec<CompensationTracking> {
        let total = measurements.len();
        let mut worst: BTreeMap<CompensationType, Vec<Option<Severity>>> = BTreeMap::new();
        for (frame, measurement) in measurements.iter().enumerate() {
            for pattern in &measurement.compensations {
                let levels = worst
                    .entry(pattern.compensation_type)
                    .or_insert_with(|| vec![None; total]);
                levels[frame] = levels[frame].max(Some(pattern.severity));
            }
        }

        worst
            .into_iter()
            .filter_map(|(compensation_type, severities)| {
                let peak_severity = severities.iter().copied().max().flatten()?;
                let levels: Vec<f64> = severities
                    .iter()
                    .map(|s| s.map_or(0.0, |s| f64::from(s.level())))
                    .collect();
                let frames_detected = severities.iter().filter(|s| s.is_some()).count();
                let persistence_rate = share(frames_detected, total) * 100.0;
                let (mean_severity_level, _) = mean_std(&levels);

                let third = total / 3;
                let is_progressive = third > 0 && {
                    let (early, _) = mean_std(&levels[..third]);
                    let (late, _) = mean_std(&levels[total - third..]);
                    late - early > self.config.progression_delta
                };

                Some(CompensationTracking {
                    compensation_type,
                    frames_detected,
                    total_frames: total,
                    persistence_rate,
                    is_persistent: persistence_rate > self.config.persistence_threshold,
                    is_progressive,
                    mean_severity_level,
                    peak_severity,
                })
            })
            .collect()
    }

    /// Quality trend over per-frame scores
    #[must_use]
    pub fn quality_degradation(&self, scores: &[f64], duration: f64) -> QualityDegradationResult {
        let initial_quality = scores.first().copied().unwrap_or_default();
        let final_quality = scores.last().copied().unwrap_or_default();
        let (mean_quality, _) = mean_std(scores);
        let min_quality = scores.iter().copied().fold(f64::INFINITY, f64::min);
        let min_quality = if scores.is_empty() { 0.0 } else { min_quality };
        let degradation_rate = if duration > 0.0 {
            (initial_quality - final_quality) / duration
        } else {
            0.0
        };
        let frames_below_threshold = scores
            .iter()
            .filter(|s| **s < self.config.min_frame_quality)
            .count();
        let dropouts = scores
            .windows(2)
            .filter(|w| w[0] - w[1] > self.config.dropout_delta)
            .count();

        QualityDegradationResult {
            passed: frames_below_threshold == 0 && dropouts <= self.config.max_dropouts,
            initial_quality,
            final_quality,
            mean_quality,
            min_quality,
            degradation_rate,
            frames_below_threshold,
            dropouts,
        }
    }
}
