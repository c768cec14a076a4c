// ABOUTME: Clinically sourced normal range-of-motion targets and secondary-joint tolerances
// ABOUTME: AAOS-style reference values used as the default ClinicalThresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Clinical reference values
//!
//! References:
//! - American Academy of Orthopaedic Surgeons (AAOS), Joint Motion: Method of Measuring and Recording
//! - Norkin, C.C. & White, D.J. (2016). Measurement of Joint Motion: A Guide to Goniometry, 5th Edition

/// Shoulder flexion functional target (degrees)
/// AAOS normal is 180°; 160° is the functional overhead-reach threshold used for grading
pub const SHOULDER_FLEXION_TARGET_DEG: f64 = 160.0;

/// Minimum acceptable shoulder flexion (degrees)
pub const SHOULDER_FLEXION_MIN_ACCEPTABLE_DEG: f64 = 120.0;

/// Shoulder abduction functional target (degrees)
pub const SHOULDER_ABDUCTION_TARGET_DEG: f64 = 160.0;

/// Minimum acceptable shoulder abduction (degrees)
pub const SHOULDER_ABDUCTION_MIN_ACCEPTABLE_DEG: f64 = 120.0;

/// Shoulder external rotation target at 90° elbow flexion (degrees, AAOS 90°)
pub const SHOULDER_EXTERNAL_ROTATION_TARGET_DEG: f64 = 90.0;

/// Minimum acceptable shoulder external rotation (degrees)
pub const SHOULDER_EXTERNAL_ROTATION_MIN_ACCEPTABLE_DEG: f64 = 60.0;

/// Shoulder internal rotation target (degrees, AAOS 70°)
pub const SHOULDER_INTERNAL_ROTATION_TARGET_DEG: f64 = 70.0;

/// Minimum acceptable shoulder internal rotation (degrees)
pub const SHOULDER_INTERNAL_ROTATION_MIN_ACCEPTABLE_DEG: f64 = 50.0;

/// Elbow flexion target (degrees, AAOS 150°)
pub const ELBOW_FLEXION_TARGET_DEG: f64 = 150.0;

/// Minimum acceptable elbow flexion (degrees)
pub const ELBOW_FLEXION_MIN_ACCEPTABLE_DEG: f64 = 120.0;

/// Knee flexion target (degrees, AAOS 135°)
pub const KNEE_FLEXION_TARGET_DEG: f64 = 135.0;

/// Minimum acceptable knee flexion (degrees)
pub const KNEE_FLEXION_MIN_ACCEPTABLE_DEG: f64 = 110.0;

/// Fraction of the minimum acceptable angle still graded fair
pub const FAIR_GRADE_FRACTION: f64 = 0.75;

/// Lower bound of normal glenohumeral:scapulothoracic ratio
/// Reference: Inman, V.T. et al. (1944). Observations on the function of the shoulder joint
pub const SCAPULOHUMERAL_RHYTHM_MIN_RATIO: f64 = 2.0;

/// Upper bound of normal glenohumeral:scapulothoracic ratio
pub const SCAPULOHUMERAL_RHYTHM_MAX_RATIO: f64 = 3.0;

/// Abduction below which the scapula is in its setting phase and rhythm is not assessed
pub const SCAPULOHUMERAL_SETTING_PHASE_DEG: f64 = 30.0;

/// Scapular upward rotation per degree of inter-shoulder tilt
pub const SCAPULAR_ROTATION_PER_TILT_DEG: f64 = 4.0;

/// Inter-shoulder tilt below which scapular contribution is indeterminate
pub const MIN_MEASURABLE_SHOULDER_TILT_DEG: f64 = 1.0;

/// Elbow angle required for shoulder rotation measurement (degrees)
pub const ROTATION_ELBOW_TARGET_DEG: f64 = 90.0;

/// Allowed elbow deviation for shoulder rotation measurement (degrees)
pub const ROTATION_ELBOW_TOLERANCE_DEG: f64 = 10.0;

/// Elbow interior angle expected during shoulder flexion/abduction (fully extended)
pub const ELBOW_EXTENDED_DEG: f64 = 180.0;

/// Allowed elbow deviation from full extension during shoulder elevation (degrees)
pub const ELBOW_EXTENSION_TOLERANCE_DEG: f64 = 15.0;

/// Expected upper-arm angle from the trunk during elbow flexion (arm at side)
pub const UPPER_ARM_AT_SIDE_DEG: f64 = 0.0;

/// Allowed upper-arm elevation during elbow flexion (degrees)
pub const UPPER_ARM_STABILITY_TOLERANCE_DEG: f64 = 30.0;

/// Typical scapular plane angle anterior to the coronal plane (degrees, clinically 30-40°)
pub const SCAPULAR_PLANE_ANGLE_DEG: f64 = 35.0;
