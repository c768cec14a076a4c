// ABOUTME: Pure vector math for landmark geometry
// ABOUTME: Midpoint, normalize, dot/cross products, plane projection and inter-vector angles
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Vector math
//!
//! Stateless helpers over [`Vector3D`]. Degenerate inputs never produce NaN: normalization
//! returns `None` and angles involving a zero-length vector are 0°.

use rom_core::constants::geometry::DEGENERATE_LENGTH;
use rom_core::models::Vector3D;

/// Midpoint of two points
#[must_use]
pub fn midpoint(a: Vector3D, b: Vector3D) -> Vector3D {
    (a + b) * 0.5
}

/// `a - b`
#[must_use]
pub fn subtract(a: Vector3D, b: Vector3D) -> Vector3D {
    a - b
}

/// Dot product
#[must_use]
pub fn dot(a: Vector3D, b: Vector3D) -> f64 {
    a.z.mul_add(b.z, a.x.mul_add(b.x, a.y * b.y))
}

/// Right-handed cross product
#[must_use]
pub fn cross(a: Vector3D, b: Vector3D) -> Vector3D {
    Vector3D::new(
        a.y.mul_add(b.z, -(a.z * b.y)),
        a.z.mul_add(b.x, -(a.x * b.z)),
        a.x.mul_add(b.y, -(a.y * b.x)),
    )
}

/// Unit vector in the direction of `v`, `None` when `v` has no direction
#[must_use]
pub fn normalize(v: Vector3D) -> Option<Vector3D> {
    let length = v.length();
    (length > DEGENERATE_LENGTH && length.is_finite()).then(|| v * (1.0 / length))
}

/// Component of `v` lying in the plane with unit normal `normal`
#[must_use]
pub fn project_onto_plane(v: Vector3D, normal: Vector3D) -> Vector3D {
    v - normal * dot(v, normal)
}

/// Angle between two vectors in degrees (0-180), 0 when either has no direction
#[must_use]
pub fn angle_between(a: Vector3D, b: Vector3D) -> f64 {
    let denominator = a.length() * b.length();
    if denominator <= DEGENERATE_LENGTH || !denominator.is_finite() {
        return 0.0;
    }
    (dot(a, b) / denominator).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Signed angle from `from` to `to` about `axis` in degrees (-180, 180]
///
/// Positive when `from × to` points along `axis`.
#[must_use]
pub fn signed_angle_about(from: Vector3D, to: Vector3D, axis: Vector3D) -> f64 {
    let magnitude = angle_between(from, to);
    if dot(cross(from, to), axis) < 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Rotate `v` about the unit `axis` by `degrees` (Rodrigues' formula)
#[must_use]
pub fn rotate_about_axis(v: Vector3D, axis: Vector3D, degrees: f64) -> Vector3D {
    let (sin, cos) = degrees.to_radians().sin_cos();
    v * cos + cross(axis, v) * sin + axis * (dot(axis, v) * (1.0 - cos))
}

/// Gram-Schmidt style completion of a right-handed orthonormal basis
///
/// Takes a primary superior axis `y` and a lateral hint `z`, returns `(x, y, z)` with
/// `x = y × z` and `z` re-derived as `x × y`.
#[must_use]
pub fn orthonormal_basis(y: Vector3D, z_hint: Vector3D) -> Option<(Vector3D, Vector3D, Vector3D)> {
    let y = normalize(y)?;
    let x = normalize(cross(y, z_hint))?;
    let z = normalize(cross(x, y))?;
    Some((x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_cross_follows_right_hand_rule() {
        let x = Vector3D::new(1.0, 0.0, 0.0);
        let y = Vector3D::new(0.0, 1.0, 0.0);
        let z = cross(x, y);
        assert!((z.z - 1.0).abs() < EPS);
        assert!(z.x.abs() < EPS && z.y.abs() < EPS);
    }

    #[test]
    fn test_normalize_rejects_zero_vector() {
        assert!(normalize(Vector3D::zero()).is_none());
        let unit = normalize(Vector3D::new(3.0, 4.0, 0.0));
        assert!(unit.is_some_and(|v| (v.length() - 1.0).abs() < EPS));
    }

    #[test]
    fn test_angle_between_degenerate_is_zero() {
        let angle = angle_between(Vector3D::zero(), Vector3D::new(1.0, 0.0, 0.0));
        assert!(angle.abs() < EPS);
        assert!(angle.is_finite());
    }

    #[test]
    fn test_angle_between_opposite_is_straight() {
        let angle = angle_between(Vector3D::new(1.0, 0.0, 0.0), Vector3D::new(-2.0, 0.0, 0.0));
        assert!((angle - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_removes_normal_component() {
        let projected = project_onto_plane(Vector3D::new(1.0, 2.0, 3.0), Vector3D::depth());
        assert!(projected.z.abs() < EPS);
        assert!((projected.x - 1.0).abs() < EPS && (projected.y - 2.0).abs() < EPS);
    }

    #[test]
    fn test_signed_angle_sign_follows_axis() {
        let from = Vector3D::new(1.0, 0.0, 0.0);
        let to = Vector3D::new(0.0, 1.0, 0.0);
        assert!((signed_angle_about(from, to, Vector3D::depth()) - 90.0).abs() < 1e-6);
        assert!((signed_angle_about(from, to, -Vector3D::depth()) + 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_about_y_matches_rotation_matrix() {
        let axis = Vector3D::new(0.0, 1.0, 0.0);
        let rotated = rotate_about_axis(Vector3D::new(1.0, 0.0, 0.0), axis, 90.0);
        assert!(rotated.x.abs() < 1e-9);
        assert!((rotated.z + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_orthonormal_basis_is_orthonormal() {
        let basis = orthonormal_basis(Vector3D::new(0.1, -1.0, 0.05), Vector3D::new(1.0, 0.1, 0.2));
        let Some((x, y, z)) = basis else {
            unreachable!("basis should exist for non-parallel inputs");
        };
        for axis in [x, y, z] {
            assert!((axis.length() - 1.0).abs() < 1e-6);
        }
        assert!(dot(x, y).abs() < 1e-6);
        assert!(dot(y, z).abs() < 1e-6);
        assert!(dot(x, z).abs() < 1e-6);
        let x_check = cross(y, z);
        assert!((dot(x, x_check) - 1.0).abs() < 1e-6);
    }
}
