// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Named defaults for goniometry, caching, compensation grading, quality and temporal analysis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Every default shipped by the engine lives here so configuration structs never carry
//! inline magic numbers.

/// Normal range-of-motion targets and secondary-joint tolerances
pub mod clinical;

/// Goniometer defaults
pub mod goniometer {
    /// Minimum landmark visibility accepted by the goniometer
    pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;
    /// Trailing moving-average window (samples)
    pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;
    /// Largest smoothing window a ring buffer will hold
    pub const MAX_SMOOTHING_WINDOW: usize = 64;
}

/// Anatomical frame cache defaults
pub mod cache {
    /// Decimal places kept when bucketing landmark coordinates (~1 cm at normalized scale)
    pub const DEFAULT_BUCKET_PRECISION: u32 = 2;
    /// Largest supported bucketing precision
    pub const MAX_BUCKET_PRECISION: u32 = 6;
    /// Maximum cached frames before eviction
    pub const DEFAULT_MAX_ENTRIES: usize = 60;
    /// Entry time-to-live in milliseconds (one frame at 60 fps)
    pub const DEFAULT_TTL_MS: u64 = 16;
    /// Minimum visibility for a landmark to contribute to a spatial key
    pub const MIN_KEY_VISIBILITY: f64 = 0.5;
}

/// Compensation severity cut points
///
/// Each scale is `report`, `mild`, `moderate`, `severe`: magnitudes below `report` are not
/// reported, below `mild` are minimal.
pub mod compensation {
    /// Minimum landmark visibility consumed by any detector
    pub const MIN_DETECTOR_VISIBILITY: f64 = 0.5;

    /// Trunk lean cut points (degrees)
    pub const TRUNK_LEAN_CUTS_DEG: [f64; 4] = [5.0, 5.0, 10.0, 15.0];
    /// Trunk rotation cut points (degrees)
    pub const TRUNK_ROTATION_CUTS_DEG: [f64; 4] = [5.0, 5.0, 10.0, 15.0];
    /// Shoulder hiking cut points (percent of a 90° tilt range)
    pub const SHOULDER_HIKING_CUTS_PCT: [f64; 4] = [5.0, 5.0, 10.0, 15.0];
    /// Elbow flexion drift cut points (degrees from full extension)
    pub const ELBOW_FLEXION_CUTS_DEG: [f64; 4] = [5.0, 5.0, 15.0, 30.0];
    /// Hip hike cut points (centimetres)
    pub const HIP_HIKE_CUTS_CM: [f64; 4] = [3.0, 3.0, 5.0, 8.0];
    /// Contralateral lean cut points (degrees)
    pub const CONTRALATERAL_LEAN_CUTS_DEG: [f64; 4] = [5.0, 5.0, 10.0, 15.0];
    /// Elbow gating deviation cut points (degrees beyond tolerance window centre)
    pub const ELBOW_POSITION_CUTS_DEG: [f64; 4] = [10.0, 10.0, 20.0, 30.0];
    /// Scapulohumeral rhythm deviation cut points (ratio units outside the normal band)
    pub const RHYTHM_DEVIATION_CUTS: [f64; 4] = [0.0, 0.5, 1.0, 2.0];

    /// Tilt range that shoulder hiking percentages are expressed against
    pub const SHOULDER_TILT_RANGE_DEG: f64 = 90.0;
}

/// Anthropometric scale assumptions
///
/// Reference: Winter, D.A. (2009). Biomechanics and Motor Control of Human Movement, 4th Edition
pub mod anthropometry {
    /// Assumed standing height used to convert normalized distances to centimetres
    pub const ASSUMED_BODY_HEIGHT_CM: f64 = 170.0;
    /// Shoulder-to-hip (torso) height as a fraction of standing height
    pub const TORSO_TO_BODY_HEIGHT_RATIO: f64 = 0.30;
    /// Forearm length as a fraction of upper-arm length
    pub const FOREARM_TO_UPPER_ARM_RATIO: f64 = 0.79;
}

/// Measurement quality blending
pub mod quality {
    /// Weight of landmark visibility in the blended score
    pub const VISIBILITY_WEIGHT: f64 = 0.5;
    /// Weight of frame stability in the blended score
    pub const FRAME_STABILITY_WEIGHT: f64 = 0.3;
    /// Weight of view orientation match in the blended score
    pub const ORIENTATION_WEIGHT: f64 = 0.2;
    /// Blended score for an excellent rating
    pub const EXCELLENT_THRESHOLD: f64 = 0.85;
    /// Blended score for a good rating
    pub const GOOD_THRESHOLD: f64 = 0.70;
    /// Blended score for a fair rating
    pub const FAIR_THRESHOLD: f64 = 0.50;
    /// Visibility below which quality cannot exceed fair
    pub const VISIBILITY_FLOOR: f64 = 0.60;
    /// Depth reliability with a depth-capable sensor
    pub const DEPTH_RELIABILITY_WITH_DEPTH: f64 = 0.9;
    /// Depth reliability from monocular estimation
    pub const DEPTH_RELIABILITY_WITHOUT_DEPTH: f64 = 0.6;
    /// Orientation match for the preferred camera view
    pub const PREFERRED_VIEW_MATCH: f64 = 1.0;
    /// Orientation match for an accepted but non-preferred view
    pub const ACCEPTED_VIEW_MATCH: f64 = 0.7;
    /// Confidence multiplier applied when a frame axis used a fallback
    pub const FALLBACK_CONFIDENCE_FACTOR: f64 = 0.5;
}

/// Temporal consistency defaults
pub mod temporal {
    /// Largest frame-to-frame change before a sudden jump is counted (degrees)
    pub const DEFAULT_MAX_FRAME_DELTA_DEG: f64 = 25.0;
    /// Delta standard deviation that drives smoothness to zero (degrees)
    pub const SMOOTHNESS_STDDEV_SCALE_DEG: f64 = 10.0;
    /// Minimum smoothness for consistency to pass
    pub const DEFAULT_MIN_SMOOTHNESS: f64 = 0.7;
    /// Range of motion below which a trajectory is static (degrees)
    pub const STATIC_ROM_THRESHOLD_DEG: f64 = 5.0;
    /// Fraction of velocities sharing a sign for a monotonic trajectory
    pub const DIRECTIONAL_CONSISTENCY: f64 = 0.7;
    /// Angular velocity below which motion is treated as jitter (degrees/second)
    pub const VELOCITY_NOISE_THRESHOLD_DEG_S: f64 = 10.0;
    /// Significant direction reversals required for an oscillating trajectory
    pub const MIN_OSCILLATION_REVERSALS: usize = 2;
    /// Reversal rate above which direction changes are jitter rather than oscillation
    pub const MAX_OSCILLATION_REVERSAL_RATE: f64 = 0.5;
    /// Velocity spread (stddev / mean magnitude) above which motion is erratic
    pub const ERRATIC_VELOCITY_SPREAD: f64 = 1.5;
    /// Persistence rate above which a compensation is persistent (percent)
    pub const DEFAULT_PERSISTENCE_THRESHOLD_PCT: f64 = 50.0;
    /// Severity level increase marking a compensation as progressive
    pub const PROGRESSION_SEVERITY_DELTA: f64 = 0.5;
    /// Per-frame quality floor
    pub const DEFAULT_MIN_FRAME_QUALITY: f64 = 0.5;
    /// Frame-to-frame quality drop counted as a dropout
    pub const QUALITY_DROPOUT_DELTA: f64 = 0.2;
    /// Dropouts tolerated before quality fails
    pub const DEFAULT_MAX_DROPOUTS: usize = 2;
    /// Minimum measurements for temporal analysis
    pub const MIN_SEQUENCE_FRAMES: usize = 2;
}

/// Numeric tolerances for geometry
pub mod geometry {
    /// Vector length below which a direction is undefined
    pub const DEGENERATE_LENGTH: f64 = 1e-9;
    /// Projected length below which a limb is treated as out of plane
    pub const MIN_PROJECTED_LENGTH: f64 = 1e-3;
    /// Apparent shoulder or hip width, as a fraction of torso height, below which the trunk
    /// is seen side-on and its lateral axis points along the camera depth axis
    ///
    /// Frontal views give roughly 0.45 (hips) to 0.8 (shoulders); a side view with the far
    /// shoulder a few centimetres off gives under 0.1.
    pub const MIN_TRUNK_WIDTH_RATIO: f64 = 0.25;
}
