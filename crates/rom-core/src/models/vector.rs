// ABOUTME: Three-component vector value type used by all geometry in the engine
// ABOUTME: Copy semantics with arithmetic operators; higher-level vector math lives in the engine crate
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A point or direction in normalized landmark space
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3D {
    /// Image-right component
    pub x: f64,
    /// Image-down component
    pub y: f64,
    /// Depth component (smaller is closer to the camera)
    pub z: f64,
}

impl Vector3D {
    /// Build a vector from components
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// True vertical (up) in image coordinates
    #[must_use]
    pub const fn up() -> Self {
        Self::new(0.0, -1.0, 0.0)
    }

    /// Camera depth axis (away from the camera)
    #[must_use]
    pub const fn depth() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    /// Euclidean length
    #[must_use]
    pub fn length(self) -> f64 {
        self.z.mul_add(self.z, self.x.mul_add(self.x, self.y * self.y)).sqrt()
    }

    /// Copy with the depth component dropped
    #[must_use]
    pub const fn flatten(self) -> Self {
        Self::new(self.x, self.y, 0.0)
    }

    /// Whether every component is finite
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector3D {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3D {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}
