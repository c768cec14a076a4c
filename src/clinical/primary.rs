// ABOUTME: Primary joint angles in clinical convention from anatomical frames
// ABOUTME: Shoulder elevation, rotation (depth or foreshortening), elbow and knee flexion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::anatomical::{coronal_plane, sagittal_plane, transverse_plane};
use crate::geometry::{angle_between, dot, normalize, project_onto_plane, signed_angle_about};
use rom_core::constants::anthropometry::FOREARM_TO_UPPER_ARM_RATIO;
use rom_core::constants::geometry::{DEGENERATE_LENGTH, MIN_PROJECTED_LENGTH};
use rom_core::models::{
    AnatomicalPlane, AnatomicalReferenceFrame, AngleType, BodySide, Landmark, MovementType,
    PlaneName, Vector3D,
};

/// A primary angle before grading
#[derive(Debug, Clone)]
pub(super) struct PrimaryAngle {
    pub angle: f64,
    pub angle_type: AngleType,
    pub signed_angle: Option<f64>,
    /// Plane whose projection collapsed, when the raw vector was used instead
    pub out_of_plane: Option<PlaneName>,
}

impl PrimaryAngle {
    const fn new(angle: f64, angle_type: AngleType) -> Self {
        Self {
            angle,
            angle_type,
            signed_angle: None,
            out_of_plane: None,
        }
    }
}

/// Projection onto a plane, or the vector itself when the projection collapses
fn project_or_raw(v: Vector3D, plane: &AnatomicalPlane) -> (Vector3D, Option<PlaneName>) {
    let projected = project_onto_plane(v, plane.normal);
    if projected.length() < MIN_PROJECTED_LENGTH {
        (v, Some(plane.name))
    } else {
        (projected, None)
    }
}

/// Flexion (sagittal) or abduction (coronal) as `180 - angle from thorax up`
pub(super) fn shoulder_elevation(
    movement: MovementType,
    thorax: &AnatomicalReferenceFrame,
    humerus: &AnatomicalReferenceFrame,
) -> PrimaryAngle {
    let (plane, angle_type) = if movement == MovementType::ShoulderAbduction {
        (coronal_plane(thorax), AngleType::Abduction)
    } else {
        (sagittal_plane(thorax), AngleType::Flexion)
    };
    let (arm, out_of_plane) = project_or_raw(-humerus.y_axis, &plane);
    let clinical = 180.0 - angle_between(arm, thorax.y_axis);
    PrimaryAngle {
        out_of_plane,
        ..PrimaryAngle::new(clinical, angle_type)
    }
}

/// External (+) / internal (-) rotation from real depth
///
/// The forearm is projected onto the thorax transverse plane and compared with the thorax
/// anterior axis; 0° is the forearm pointing straight ahead.
pub(super) fn shoulder_rotation_3d(
    side: BodySide,
    thorax: &AnatomicalReferenceFrame,
    forearm: &AnatomicalReferenceFrame,
) -> PrimaryAngle {
    let (direction, out_of_plane) =
        project_or_raw(-forearm.y_axis, &transverse_plane(thorax));
    let about_superior = signed_angle_about(thorax.x_axis, direction, thorax.y_axis);
    let signed = match side {
        BodySide::Left => about_superior,
        BodySide::Right => -about_superior,
    };
    rotation_result(signed, out_of_plane)
}

/// Rotation estimated from 2D forearm foreshortening
///
/// With the elbow at 90° and the forearm pointing at the camera, the lateral image offset of
/// the wrist relative to the expected forearm length gives `sin(rotation)`.
pub(super) fn shoulder_rotation_2d(
    side: BodySide,
    thorax: &AnatomicalReferenceFrame,
    shoulder: &Landmark,
    elbow: &Landmark,
    wrist: &Landmark,
) -> PrimaryAngle {
    let upper_arm_length = (elbow.position_2d() - shoulder.position_2d()).length();
    let Some(toward_right) = normalize(project_onto_plane(thorax.z_axis, Vector3D::depth()))
        .filter(|_| upper_arm_length > DEGENERATE_LENGTH)
    else {
        return rotation_result(0.0, Some(PlaneName::Transverse));
    };

    let expected_forearm = upper_arm_length * FOREARM_TO_UPPER_ARM_RATIO;
    let lateral = dot(wrist.position_2d() - elbow.position_2d(), toward_right);
    let outward = match side {
        BodySide::Left => -lateral,
        BodySide::Right => lateral,
    };
    let signed = (outward / expected_forearm).clamp(-1.0, 1.0).asin().to_degrees();
    rotation_result(signed, None)
}

fn rotation_result(signed: f64, out_of_plane: Option<PlaneName>) -> PrimaryAngle {
    let angle_type = if signed >= 0.0 {
        AngleType::ExternalRotation
    } else {
        AngleType::InternalRotation
    };
    PrimaryAngle {
        signed_angle: Some(signed),
        out_of_plane,
        ..PrimaryAngle::new(signed.abs(), angle_type)
    }
}

/// Elbow flexion, 0° straight
pub(super) fn elbow_flexion(
    humerus: &AnatomicalReferenceFrame,
    forearm: &AnatomicalReferenceFrame,
) -> PrimaryAngle {
    PrimaryAngle::new(
        angle_between(-humerus.y_axis, -forearm.y_axis),
        AngleType::Flexion,
    )
}

/// Knee flexion in the pelvis sagittal plane, 0° straight
pub(super) fn knee_flexion(
    pelvis: &AnatomicalReferenceFrame,
    hip: &Landmark,
    knee: &Landmark,
    ankle: &Landmark,
) -> PrimaryAngle {
    let plane = sagittal_plane(pelvis);
    let (thigh, thigh_out) = project_or_raw(knee.position() - hip.position(), &plane);
    let (shank, shank_out) = project_or_raw(ankle.position() - knee.position(), &plane);
    PrimaryAngle {
        out_of_plane: thigh_out.or(shank_out),
        ..PrimaryAngle::new(angle_between(thigh, shank), AngleType::Flexion)
    }
}
