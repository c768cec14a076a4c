// ABOUTME: Integration tests for anatomical frame construction and the frame cache
// ABOUTME: Orthonormality, frontal-view axes, cache hits, TTL misses and serialization
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use anyhow::Result;
use common::{init_test_logging, PoseBuilder};
use rom_core::config::FrameCacheConfig;
use rom_core::models::{
    AnatomicalReferenceFrame, CachedAnatomicalFrames, FrameType, LandmarkId, Vector3D,
    ViewOrientation,
};
use rom_engine::anatomical::{
    AnatomicalFrameCache, AnatomicalReferenceService, FrameCacheProvider, ManualClock,
    UncachedFrames,
};
use rom_engine::geometry::{cross, dot};
use std::time::Duration;

const TOLERANCE: f64 = 1e-9;

fn assert_orthonormal(frame: &AnatomicalReferenceFrame) {
    for axis in [frame.x_axis, frame.y_axis, frame.z_axis] {
        assert!(
            (axis.length() - 1.0).abs() < TOLERANCE,
            "{} axis not unit: {axis:?}",
            frame.frame_type
        );
    }
    assert!(dot(frame.x_axis, frame.y_axis).abs() < TOLERANCE);
    assert!(dot(frame.y_axis, frame.z_axis).abs() < TOLERANCE);
    assert!(dot(frame.z_axis, frame.x_axis).abs() < TOLERANCE);
    let x = cross(frame.y_axis, frame.z_axis);
    assert!(
        (x - frame.x_axis).length() < TOLERANCE,
        "{} is not right-handed",
        frame.frame_type
    );
}

fn all_frames(frames: &CachedAnatomicalFrames) -> Vec<&AnatomicalReferenceFrame> {
    [
        Some(&frames.global),
        Some(&frames.thorax),
        frames.pelvis.as_ref(),
        frames.left_humerus.as_ref(),
        frames.right_humerus.as_ref(),
        frames.left_forearm.as_ref(),
        frames.right_forearm.as_ref(),
    ]
    .into_iter()
    .flatten()
    .collect()
}

fn approx_eq(a: Vector3D, b: Vector3D) -> bool {
    (a - b).length() < TOLERANCE
}

#[test]
fn test_every_frame_is_orthonormal() -> Result<()> {
    init_test_logging();
    let service = AnatomicalReferenceService::default();
    for fixture in [
        PoseBuilder::standing_frontal(),
        PoseBuilder::overhead_flexion(),
        PoseBuilder::bilateral_abduction(150.0),
        PoseBuilder::right_rotation(45.0, 90.0),
        PoseBuilder::seated_knee_side(),
    ] {
        let pose = fixture.build();
        let frames =
            service.compute_frames(&pose.pose_landmarks(), &mut UncachedFrames::default())?;
        let built = all_frames(&frames);
        assert_eq!(built.len(), 7);
        for frame in built {
            assert_orthonormal(frame);
        }
    }
    Ok(())
}

#[test]
fn test_frontal_thorax_axes() -> Result<()> {
    let pose = PoseBuilder::standing_frontal().build();
    let thorax = AnatomicalReferenceService::default().thorax_frame(&pose.pose_landmarks())?;

    assert!(approx_eq(thorax.y_axis, Vector3D::up()));
    // Subject's right is image left when facing the camera
    assert!(approx_eq(thorax.z_axis, Vector3D::new(-1.0, 0.0, 0.0)));
    // Anterior points at the camera
    assert!(approx_eq(thorax.x_axis, Vector3D::new(0.0, 0.0, -1.0)));
    assert!((thorax.confidence - common::VISIBLE).abs() < TOLERANCE);
    Ok(())
}

#[test]
fn test_side_view_pelvis_falls_back_to_depth() -> Result<()> {
    let pose = PoseBuilder::seated_knee_side().build();
    let pelvis = AnatomicalReferenceService::default().pelvis_frame(&pose.pose_landmarks())?;
    assert!(approx_eq(pelvis.z_axis, Vector3D::depth()));
    assert!((pelvis.confidence - common::VISIBLE * 0.5).abs() < TOLERANCE);
    Ok(())
}

#[test]
fn test_missing_hip_fails_trunk_frames() {
    let pose = PoseBuilder::standing_frontal()
        .visibility(LandmarkId::LeftHip, 0.1)
        .build();
    let result = AnatomicalReferenceService::default()
        .compute_frames(&pose.pose_landmarks(), &mut UncachedFrames::default());
    assert!(result.is_err());
}

#[test]
fn test_occluded_wrist_leaves_forearm_empty() -> Result<()> {
    let pose = PoseBuilder::standing_frontal()
        .visibility(LandmarkId::RightWrist, 0.1)
        .build();
    let frames = AnatomicalReferenceService::default()
        .compute_frames(&pose.pose_landmarks(), &mut UncachedFrames::default())?;
    assert!(frames.right_forearm.is_none());
    assert!(frames.right_humerus.is_some());
    assert!(frames.left_forearm.is_some());
    Ok(())
}

#[test]
fn test_cache_hits_same_pose_and_misses_after_ttl() -> Result<()> {
    init_test_logging();
    let clock = ManualClock::new();
    let mut cache = AnatomicalFrameCache::with_clock(FrameCacheConfig::default(), clock.clone())?;
    let service = AnatomicalReferenceService::default();
    let pose = PoseBuilder::standing_frontal().build();

    let first = service.compute_frames(&pose.pose_landmarks(), &mut cache)?;
    assert_eq!(cache.stats().misses, 7);
    assert_eq!(cache.stats().hits, 0);

    clock.advance(Duration::from_millis(5));
    let second = service.compute_frames(&pose.pose_landmarks(), &mut cache)?;
    assert_eq!(cache.stats().hits, 7);
    assert_eq!(first, second);

    clock.advance(Duration::from_millis(100));
    service.compute_frames(&pose.pose_landmarks(), &mut cache)?;
    let stats = cache.stats();
    assert_eq!(stats.hits, 7);
    assert_eq!(stats.misses, 14);
    assert!((stats.hit_rate - 1.0 / 3.0).abs() < TOLERANCE);
    Ok(())
}

#[test]
fn test_jitter_within_bucket_still_hits() -> Result<()> {
    let mut cache =
        AnatomicalFrameCache::with_clock(FrameCacheConfig::default(), ManualClock::new())?;
    let service = AnatomicalReferenceService::default();

    let pose = PoseBuilder::standing_frontal().build();
    service.compute_frames(&pose.pose_landmarks(), &mut cache)?;

    let jittered = PoseBuilder::standing_frontal()
        .with(LandmarkId::RightShoulder, 0.403, 0.302)
        .build();
    service.compute_frames(&jittered.pose_landmarks(), &mut cache)?;
    assert_eq!(cache.stats().hits, 7);

    let moved = PoseBuilder::standing_frontal()
        .with(LandmarkId::RightShoulder, 0.45, 0.30)
        .build();
    service.compute_frames(&moved.pose_landmarks(), &mut cache)?;
    // Every slot keys on both shoulders
    assert_eq!(cache.stats().misses, 14);
    Ok(())
}

#[test]
fn test_clear_resets_cache() -> Result<()> {
    let mut cache =
        AnatomicalFrameCache::with_clock(FrameCacheConfig::default(), ManualClock::new())?;
    let pose = PoseBuilder::standing_frontal().build();
    AnatomicalReferenceService::default().compute_frames(&pose.pose_landmarks(), &mut cache)?;
    assert!(!cache.is_empty());

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.stats().misses, 0);
    Ok(())
}

#[test]
fn test_invalid_cache_config_rejected() {
    let config = FrameCacheConfig {
        precision: 9,
        ..FrameCacheConfig::default()
    };
    assert!(AnatomicalFrameCache::new(config).is_err());
}

#[test]
fn test_frame_serialization_is_deterministic() -> Result<()> {
    let pose = PoseBuilder::bilateral_abduction(120.0)
        .view(ViewOrientation::Frontal)
        .build();
    let service = AnatomicalReferenceService::default();
    let frames = service.compute_frames(&pose.pose_landmarks(), &mut UncachedFrames::default())?;

    // Rebuilt from the same landmarks in a fresh pose and cache
    let rebuilt_pose = PoseBuilder::bilateral_abduction(120.0)
        .view(ViewOrientation::Frontal)
        .build();
    let rebuilt = service.compute_frames(
        &rebuilt_pose.pose_landmarks(),
        &mut AnatomicalFrameCache::with_clock(FrameCacheConfig::default(), ManualClock::new())?,
    )?;
    assert_eq!(frames, rebuilt);

    let json = serde_json::to_string(&frames)?;
    assert_eq!(json, serde_json::to_string(&rebuilt)?);

    let restored: CachedAnatomicalFrames = serde_json::from_str(&json)?;
    for (original, back) in all_frames(&frames).into_iter().zip(all_frames(&restored)) {
        assert_eq!(original.frame_type, back.frame_type);
        assert!(approx_eq(original.x_axis, back.x_axis));
        assert!(approx_eq(original.y_axis, back.y_axis));
        assert!(approx_eq(original.z_axis, back.z_axis));
        assert!(approx_eq(original.origin, back.origin));
    }
    assert_eq!(restored.thorax.frame_type, FrameType::Thorax);
    Ok(())
}
