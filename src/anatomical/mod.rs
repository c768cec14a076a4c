// ABOUTME: Anatomical reference frames, planes and the frame cache capability
// ABOUTME: Re-exports the reference service and cache providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Anatomical frames
//!
//! [`AnatomicalReferenceService`] builds ISB frames from landmarks and derives planes from
//! them. [`FrameCacheProvider`] memoizes frame construction between consecutive poses.
//!
//! # Example
//!
//! ```rust,no_run
//! use rom_engine::anatomical::{AnatomicalFrameCache, AnatomicalReferenceService};
//! use rom_core::config::FrameCacheConfig;
//! use rom_core::models::{Landmark, ProcessedPoseData, SkeletonKind};
//!
//! # fn example(landmarks: Vec<Landmark>) -> anyhow::Result<()> {
//! let pose = ProcessedPoseData::new(landmarks, SkeletonKind::MediapipePose);
//! let mut cache = AnatomicalFrameCache::new(FrameCacheConfig::default())?;
//! let frames = AnatomicalReferenceService::default()
//!     .compute_frames(&pose.pose_landmarks(), &mut cache)?;
//! println!("thorax confidence {}", frames.thorax.confidence);
//! # Ok(())
//! # }
//! ```

mod cache;
mod reference;

pub use cache::{
    AnatomicalFrameCache, Clock, FrameCacheProvider, FrameCacheStats, ManualClock, SystemClock,
    UncachedFrames,
};
pub use reference::{
    anatomical_planes, coronal_plane, sagittal_plane, scapular_plane, transverse_plane,
    AnatomicalReferenceService,
};
