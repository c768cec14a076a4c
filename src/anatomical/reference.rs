// ABOUTME: ISB-style anatomical reference frames and planes built from landmark subsets
// ABOUTME: Global, thorax, pelvis, humerus and forearm frames with fallbacks for degenerate input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Anatomical reference service
//!
//! Axes follow the ISB convention: X anterior, Y superior (proximal for limb segments),
//! Z toward the subject's right, with `X = Y × Z`. Every frame is re-orthogonalized by two
//! cross products so the three axes are unit length and mutually perpendicular.

use super::cache::FrameCacheProvider;
use crate::geometry::{
    cross, midpoint, normalize, orthonormal_basis, project_onto_plane, rotate_about_axis,
};
use rom_core::constants::geometry::{MIN_PROJECTED_LENGTH, MIN_TRUNK_WIDTH_RATIO};
use rom_core::constants::goniometer::DEFAULT_MIN_CONFIDENCE;
use rom_core::constants::quality::FALLBACK_CONFIDENCE_FACTOR;
use rom_core::models::{
    AnatomicalPlane, AnatomicalReferenceFrame, BodySide, CachedAnatomicalFrames, FrameSlot,
    FrameType, Landmark, LandmarkId, PlaneName, PoseLandmarks, Vector3D,
};
use rom_core::{EngineResult, PreconditionError};
use tracing::debug;

/// Builds reference frames and planes
#[derive(Debug, Clone, Copy)]
pub struct AnatomicalReferenceService {
    min_visibility: f64,
}

impl Default for AnatomicalReferenceService {
    fn default() -> Self {
        Self {
            min_visibility: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl AnatomicalReferenceService {
    /// Service treating landmarks below `min_visibility` as missing
    #[must_use]
    pub const fn new(min_visibility: f64) -> Self {
        Self { min_visibility }
    }

    fn required<'a>(
        &self,
        landmarks: &PoseLandmarks<'a>,
        id: LandmarkId,
        frame_type: FrameType,
    ) -> Result<&'a Landmark, PreconditionError> {
        landmarks
            .visible(id, self.min_visibility)
            .ok_or(PreconditionError::MissingLandmark {
                landmark: id,
                frame_type,
            })
    }

    fn trunk_landmarks<'a>(
        &self,
        landmarks: &PoseLandmarks<'a>,
        frame_type: FrameType,
    ) -> Result<[&'a Landmark; 4], PreconditionError> {
        Ok([
            self.required(landmarks, LandmarkId::LeftShoulder, frame_type)?,
            self.required(landmarks, LandmarkId::RightShoulder, frame_type)?,
            self.required(landmarks, LandmarkId::LeftHip, frame_type)?,
            self.required(landmarks, LandmarkId::RightHip, frame_type)?,
        ])
    }

    /// Whole-body frame at the hip midpoint
    ///
    /// # Errors
    ///
    /// Returns an error if a shoulder or hip is missing or the trunk has no length
    pub fn global_frame(
        &self,
        landmarks: &PoseLandmarks<'_>,
    ) -> EngineResult<AnatomicalReferenceFrame> {
        let [ls, rs, lh, rh] = self.trunk_landmarks(landmarks, FrameType::Global)?;
        let shoulder_mid = midpoint(ls.position(), rs.position());
        let hip_mid = midpoint(lh.position(), rh.position());
        trunk_frame(
            FrameType::Global,
            hip_mid,
            shoulder_mid - hip_mid,
            rh.position() - lh.position(),
            mean_visibility(&[ls, rs, lh, rh]),
        )
    }

    /// Upper trunk frame at the shoulder midpoint
    ///
    /// # Errors
    ///
    /// Returns an error if a shoulder or hip is missing or the trunk has no length
    pub fn thorax_frame(
        &self,
        landmarks: &PoseLandmarks<'_>,
    ) -> EngineResult<AnatomicalReferenceFrame> {
        let [ls, rs, lh, rh] = self.trunk_landmarks(landmarks, FrameType::Thorax)?;
        let shoulder_mid = midpoint(ls.position(), rs.position());
        let hip_mid = midpoint(lh.position(), rh.position());
        trunk_frame(
            FrameType::Thorax,
            shoulder_mid,
            shoulder_mid - hip_mid,
            rs.position() - ls.position(),
            mean_visibility(&[ls, rs, lh, rh]),
        )
    }

    /// Pelvis frame at the hip midpoint
    ///
    /// The hips define Z. Y comes from the shoulders when both are visible, otherwise from
    /// true vertical.
    ///
    /// # Errors
    ///
    /// Returns an error if a hip is missing
    pub fn pelvis_frame(
        &self,
        landmarks: &PoseLandmarks<'_>,
    ) -> EngineResult<AnatomicalReferenceFrame> {
        let lh = self.required(landmarks, LandmarkId::LeftHip, FrameType::Pelvis)?;
        let rh = self.required(landmarks, LandmarkId::RightHip, FrameType::Pelvis)?;
        let hip_mid = midpoint(lh.position(), rh.position());

        let shoulders = (
            landmarks.visible(LandmarkId::LeftShoulder, self.min_visibility),
            landmarks.visible(LandmarkId::RightShoulder, self.min_visibility),
        );
        let (superior_hint, torso_height, confidence) = match shoulders {
            (Some(ls), Some(rs)) => {
                let superior = midpoint(ls.position(), rs.position()) - hip_mid;
                (
                    superior,
                    superior.length(),
                    mean_visibility(&[lh, rh, ls, rs]),
                )
            }
            _ => {
                debug!("Pelvis frame using true vertical; shoulders not visible");
                // No torso to compare the hip width against
                (Vector3D::up(), 0.0, mean_visibility(&[lh, rh]))
            }
        };

        let (z_axis, confidence) = lateral_or_depth(
            FrameType::Pelvis,
            rh.position() - lh.position(),
            superior_hint,
            torso_height * MIN_TRUNK_WIDTH_RATIO,
            confidence,
        );
        let x_axis = normalize(cross(superior_hint, z_axis)).ok_or(
            PreconditionError::DegenerateGeometry {
                frame_type: FrameType::Pelvis,
                reason: "superior reference parallel to hip line",
            },
        )?;
        let y_axis = cross(z_axis, x_axis);

        Ok(AnatomicalReferenceFrame {
            origin: hip_mid,
            x_axis,
            y_axis,
            z_axis,
            frame_type: FrameType::Pelvis,
            confidence,
        })
    }

    /// Upper-arm frame at the shoulder, Y pointing from elbow to shoulder
    ///
    /// # Errors
    ///
    /// Returns an error if the shoulder or elbow is missing or they coincide
    pub fn humerus_frame(
        &self,
        landmarks: &PoseLandmarks<'_>,
        side: BodySide,
        thorax: &AnatomicalReferenceFrame,
    ) -> EngineResult<AnatomicalReferenceFrame> {
        let shoulder = self.required(landmarks, LandmarkId::shoulder(side), FrameType::Humerus)?;
        let elbow = self.required(landmarks, LandmarkId::elbow(side), FrameType::Humerus)?;
        limb_frame(FrameType::Humerus, shoulder, elbow, thorax)
    }

    /// Forearm frame at the elbow, Y pointing from wrist to elbow
    ///
    /// # Errors
    ///
    /// Returns an error if the elbow or wrist is missing or they coincide
    pub fn forearm_frame(
        &self,
        landmarks: &PoseLandmarks<'_>,
        side: BodySide,
        humerus: &AnatomicalReferenceFrame,
    ) -> EngineResult<AnatomicalReferenceFrame> {
        let elbow = self.required(landmarks, LandmarkId::elbow(side), FrameType::Forearm)?;
        let wrist = self.required(landmarks, LandmarkId::wrist(side), FrameType::Forearm)?;
        limb_frame(FrameType::Forearm, elbow, wrist, humerus)
    }

    /// Build every frame the pose supports through a cache
    ///
    /// Global and thorax frames are required; pelvis and limb frames are left empty when
    /// their landmarks are unavailable.
    ///
    /// # Errors
    ///
    /// Returns an error if the global or thorax frame cannot be built
    pub fn compute_frames<C: FrameCacheProvider>(
        &self,
        landmarks: &PoseLandmarks<'_>,
        cache: &mut C,
    ) -> EngineResult<CachedAnatomicalFrames> {
        let global = cache.get(FrameSlot::Global, landmarks, || self.global_frame(landmarks))?;
        let thorax = cache.get(FrameSlot::Thorax, landmarks, || self.thorax_frame(landmarks))?;
        let pelvis = optional(
            FrameType::Pelvis,
            cache.get(FrameSlot::Pelvis, landmarks, || self.pelvis_frame(landmarks)),
        );

        let mut frames = CachedAnatomicalFrames {
            global,
            thorax,
            pelvis,
            left_humerus: None,
            right_humerus: None,
            left_forearm: None,
            right_forearm: None,
        };

        for side in [BodySide::Left, BodySide::Right] {
            let humerus = optional(
                FrameType::Humerus,
                cache.get(FrameSlot::Humerus(side), landmarks, || {
                    self.humerus_frame(landmarks, side, &thorax)
                }),
            );
            let forearm = humerus.and_then(|humerus| {
                optional(
                    FrameType::Forearm,
                    cache.get(FrameSlot::Forearm(side), landmarks, || {
                        self.forearm_frame(landmarks, side, &humerus)
                    }),
                )
            });
            match side {
                BodySide::Left => {
                    frames.left_humerus = humerus;
                    frames.left_forearm = forearm;
                }
                BodySide::Right => {
                    frames.right_humerus = humerus;
                    frames.right_forearm = forearm;
                }
            }
        }

        Ok(frames)
    }
}

fn optional(
    frame_type: FrameType,
    result: EngineResult<AnatomicalReferenceFrame>,
) -> Option<AnatomicalReferenceFrame> {
    result
        .inspect_err(|err| {
            debug!(frame_type = %frame_type, error = %err, "Optional frame unavailable");
        })
        .ok()
}

#[allow(clippy::cast_precision_loss)]
fn mean_visibility(landmarks: &[&Landmark]) -> f64 {
    if landmarks.is_empty() {
        return 0.0;
    }
    landmarks.iter().map(|lm| lm.visibility).sum::<f64>() / landmarks.len() as f64
}

/// Unit lateral axis perpendicular to `superior`, `None` when the hint's perpendicular part
/// is shorter than `min_length`
fn lateral_axis(hint: Vector3D, superior: Vector3D, min_length: f64) -> Option<Vector3D> {
    let superior = normalize(superior)?;
    let perpendicular = project_onto_plane(hint, superior);
    if perpendicular.length() < min_length.max(MIN_PROJECTED_LENGTH) {
        return None;
    }
    normalize(perpendicular)
}

/// Trunk lateral axis, or the camera depth axis at reduced confidence when the trunk is
/// seen side-on (apparent width under `min_width`)
fn lateral_or_depth(
    frame_type: FrameType,
    hint: Vector3D,
    superior: Vector3D,
    min_width: f64,
    confidence: f64,
) -> (Vector3D, f64) {
    lateral_axis(hint, superior, min_width).map_or_else(
        || {
            debug!(frame_type = %frame_type, "Lateral axis degenerate, using camera depth");
            (Vector3D::depth(), confidence * FALLBACK_CONFIDENCE_FACTOR)
        },
        |lateral| (lateral, confidence),
    )
}

fn trunk_frame(
    frame_type: FrameType,
    origin: Vector3D,
    superior: Vector3D,
    lateral_hint: Vector3D,
    confidence: f64,
) -> EngineResult<AnatomicalReferenceFrame> {
    let degenerate = PreconditionError::DegenerateGeometry {
        frame_type,
        reason: "shoulder and hip midpoints coincide",
    };
    normalize(superior).ok_or_else(|| degenerate.clone())?;

    let (lateral, confidence) = lateral_or_depth(
        frame_type,
        lateral_hint,
        superior,
        superior.length() * MIN_TRUNK_WIDTH_RATIO,
        confidence,
    );
    let (x_axis, y_axis, z_axis) = orthonormal_basis(superior, lateral).ok_or(degenerate)?;

    Ok(AnatomicalReferenceFrame {
        origin,
        x_axis,
        y_axis,
        z_axis,
        frame_type,
        confidence,
    })
}

fn limb_frame(
    frame_type: FrameType,
    proximal: &Landmark,
    distal: &Landmark,
    parent: &AnatomicalReferenceFrame,
) -> EngineResult<AnatomicalReferenceFrame> {
    let origin = proximal.position();
    let y_axis = normalize(origin - distal.position()).ok_or(
        PreconditionError::DegenerateGeometry {
            frame_type,
            reason: "segment endpoints coincide",
        },
    )?;
    let confidence = mean_visibility(&[proximal, distal]);

    let lateral = lateral_axis(parent.z_axis, y_axis, MIN_PROJECTED_LENGTH);
    let (x_axis, z_axis, confidence) = if let Some(z_hint) = lateral {
        let x_axis = cross(y_axis, z_hint);
        (x_axis, cross(x_axis, y_axis), confidence)
    } else {
        // Limb runs along the parent lateral axis; take anterior from the parent instead
        let x_hint = lateral_axis(parent.x_axis, y_axis, MIN_PROJECTED_LENGTH).ok_or(
            PreconditionError::DegenerateGeometry {
                frame_type,
                reason: "segment parallel to both parent reference axes",
            },
        )?;
        debug!(
            frame_type = %frame_type,
            "Limb lateral axis degenerate, using parent anterior axis"
        );
        let z_axis = cross(x_hint, y_axis);
        (
            cross(y_axis, z_axis),
            z_axis,
            confidence * FALLBACK_CONFIDENCE_FACTOR,
        )
    };

    Ok(AnatomicalReferenceFrame {
        origin,
        x_axis,
        y_axis,
        z_axis,
        frame_type,
        confidence,
    })
}

/// Plane dividing left from right
#[must_use]
pub const fn sagittal_plane(frame: &AnatomicalReferenceFrame) -> AnatomicalPlane {
    AnatomicalPlane {
        name: PlaneName::Sagittal,
        normal: frame.z_axis,
        point: frame.origin,
        rotation: 0.0,
    }
}

/// Plane dividing front from back
#[must_use]
pub const fn coronal_plane(frame: &AnatomicalReferenceFrame) -> AnatomicalPlane {
    AnatomicalPlane {
        name: PlaneName::Coronal,
        normal: frame.x_axis,
        point: frame.origin,
        rotation: 0.0,
    }
}

/// Plane dividing top from bottom
#[must_use]
pub const fn transverse_plane(frame: &AnatomicalReferenceFrame) -> AnatomicalPlane {
    AnatomicalPlane {
        name: PlaneName::Transverse,
        normal: frame.y_axis,
        point: frame.origin,
        rotation: 0.0,
    }
}

/// Coronal plane rotated about the thorax Y axis by `angle` degrees
///
/// Positive angles bring the subject's right side forward; pass a negative angle for the
/// left scapula.
#[must_use]
pub fn scapular_plane(thorax: &AnatomicalReferenceFrame, angle: f64) -> AnatomicalPlane {
    AnatomicalPlane {
        name: PlaneName::Scapular,
        normal: rotate_about_axis(thorax.x_axis, thorax.y_axis, angle),
        point: thorax.origin,
        rotation: angle,
    }
}

/// Sagittal, coronal and transverse planes of a frame
#[must_use]
pub const fn anatomical_planes(frame: &AnatomicalReferenceFrame) -> [AnatomicalPlane; 3] {
    [
        sagittal_plane(frame),
        coronal_plane(frame),
        transverse_plane(frame),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::anatomical::cache::UncachedFrames;
    use crate::geometry::dot;
    use rom_core::models::MEDIAPIPE_POSE;
    use rom_core::EngineError;

    fn frontal_pose() -> Vec<Landmark> {
        let mut landmarks: Vec<Landmark> = (0..MEDIAPIPE_POSE.landmark_count)
            .map(|i| Landmark::new(format!("lm_{i}"), 0.5, 0.5, 0.0))
            .collect();
        // Subject faces the camera, so their right appears on the image left
        let placed = [
            (LandmarkId::LeftShoulder, 0.60, 0.30),
            (LandmarkId::RightShoulder, 0.40, 0.30),
            (LandmarkId::LeftElbow, 0.62, 0.45),
            (LandmarkId::RightElbow, 0.38, 0.45),
            (LandmarkId::LeftWrist, 0.63, 0.58),
            (LandmarkId::RightWrist, 0.37, 0.58),
            (LandmarkId::LeftHip, 0.57, 0.60),
            (LandmarkId::RightHip, 0.43, 0.60),
        ];
        for (id, x, y) in placed {
            let index = MEDIAPIPE_POSE.index_of(id).unwrap();
            landmarks[index] = Landmark::new(id.as_str(), x, y, 0.9);
        }
        landmarks
    }

    fn assert_orthonormal(frame: &AnatomicalReferenceFrame) {
        for axis in [frame.x_axis, frame.y_axis, frame.z_axis] {
            assert!((axis.length() - 1.0).abs() < 1e-6, "{frame:?}");
        }
        assert!(dot(frame.x_axis, frame.y_axis).abs() < 1e-6);
        assert!(dot(frame.y_axis, frame.z_axis).abs() < 1e-6);
        assert!(dot(frame.x_axis, frame.z_axis).abs() < 1e-6);
        assert!(dot(cross(frame.y_axis, frame.z_axis), frame.x_axis) > 0.999);
    }

    #[test]
    fn test_frontal_global_frame_faces_camera() {
        let landmarks = frontal_pose();
        let lm = PoseLandmarks::new(&landmarks, &MEDIAPIPE_POSE);
        let frame = AnatomicalReferenceService::default().global_frame(&lm).unwrap();

        assert_orthonormal(&frame);
        assert!(frame.y_axis.y < -0.99);
        assert!(frame.z_axis.x < -0.99);
        assert!(frame.x_axis.z < -0.99);
        assert!((frame.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_all_frames_orthonormal() {
        let landmarks = frontal_pose();
        let lm = PoseLandmarks::new(&landmarks, &MEDIAPIPE_POSE);
        let frames = AnatomicalReferenceService::default()
            .compute_frames(&lm, &mut UncachedFrames::default())
            .unwrap();

        for slot in [
            FrameSlot::Global,
            FrameSlot::Thorax,
            FrameSlot::Pelvis,
            FrameSlot::Humerus(BodySide::Left),
            FrameSlot::Humerus(BodySide::Right),
            FrameSlot::Forearm(BodySide::Left),
            FrameSlot::Forearm(BodySide::Right),
        ] {
            assert_orthonormal(frames.get(slot).unwrap());
        }
    }

    #[test]
    fn test_missing_hip_is_precondition_error() {
        let mut landmarks = frontal_pose();
        let index = MEDIAPIPE_POSE.index_of(LandmarkId::LeftHip).unwrap();
        landmarks[index].visibility = 0.1;
        let lm = PoseLandmarks::new(&landmarks, &MEDIAPIPE_POSE);

        let err = AnatomicalReferenceService::default().thorax_frame(&lm).unwrap_err();
        assert_eq!(
            err,
            EngineError::Precondition(PreconditionError::MissingLandmark {
                landmark: LandmarkId::LeftHip,
                frame_type: FrameType::Thorax,
            })
        );
    }

    #[test]
    fn test_side_view_hips_fall_back_to_depth() {
        let mut landmarks = frontal_pose();
        for id in [LandmarkId::LeftHip, LandmarkId::RightHip] {
            let index = MEDIAPIPE_POSE.index_of(id).unwrap();
            landmarks[index].x = 0.5;
        }
        let lm = PoseLandmarks::new(&landmarks, &MEDIAPIPE_POSE);

        let frame = AnatomicalReferenceService::default().pelvis_frame(&lm).unwrap();
        assert_orthonormal(&frame);
        assert!((frame.confidence - 0.45).abs() < 1e-9);
    }

    #[test]
    fn test_narrow_side_view_trunk_uses_depth() {
        let mut landmarks = frontal_pose();
        // Side-on: far shoulder and hip sit 0.02 behind the near ones
        for (id, x) in [
            (LandmarkId::RightShoulder, 0.50),
            (LandmarkId::LeftShoulder, 0.52),
            (LandmarkId::RightHip, 0.50),
            (LandmarkId::LeftHip, 0.52),
        ] {
            let index = MEDIAPIPE_POSE.index_of(id).unwrap();
            landmarks[index].x = x;
        }
        let lm = PoseLandmarks::new(&landmarks, &MEDIAPIPE_POSE);
        let service = AnatomicalReferenceService::default();

        for frame in [
            service.thorax_frame(&lm).unwrap(),
            service.pelvis_frame(&lm).unwrap(),
        ] {
            assert_orthonormal(&frame);
            assert!(frame.z_axis.z.abs() > 0.999, "{frame:?}");
            assert!((frame.confidence - 0.45).abs() < 1e-9);
        }
    }

    #[test]
    fn test_scapular_plane_rotates_coronal_normal() {
        let landmarks = frontal_pose();
        let lm = PoseLandmarks::new(&landmarks, &MEDIAPIPE_POSE);
        let thorax = AnatomicalReferenceService::default().thorax_frame(&lm).unwrap();

        let plane = scapular_plane(&thorax, 35.0);
        let cos = dot(plane.normal, thorax.x_axis);
        assert!((cos - 35.0_f64.to_radians().cos()).abs() < 1e-6);
        assert!(dot(plane.normal, thorax.z_axis) < 0.0);
        assert!((plane.rotation - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cardinal_plane_normals() {
        let landmarks = frontal_pose();
        let lm = PoseLandmarks::new(&landmarks, &MEDIAPIPE_POSE);
        let frame = AnatomicalReferenceService::default().global_frame(&lm).unwrap();
        let [sagittal, coronal, transverse] = anatomical_planes(&frame);
        assert_eq!(sagittal.normal, frame.z_axis);
        assert_eq!(coronal.normal, frame.x_axis);
        assert_eq!(transverse.normal, frame.y_axis);
    }
}
