// ABOUTME: Criterion benchmarks for anatomical frame construction and the frame cache
// ABOUTME: Compares uncached computation with cache hits and jittered lookups
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for anatomical frames.
//!
//! Measures full frame-set computation without a cache, with a warm cache, and with
//! detector jitter that stays inside or crosses the spatial buckets.

#![allow(
    clippy::missing_docs_in_private_items,
    clippy::unwrap_used,
    missing_docs
)]

mod common;

use common::fixtures::abduction_pose;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rom_core::config::FrameCacheConfig;
use rom_engine::anatomical::{
    AnatomicalFrameCache, AnatomicalReferenceService, ManualClock, UncachedFrames,
};

/// Benchmark frame-set computation with no memoization
fn bench_uncached(c: &mut Criterion) {
    let service = AnatomicalReferenceService::default();
    let mut group = c.benchmark_group("frames_uncached");

    for angle in [30.0, 90.0, 150.0] {
        let pose = abduction_pose(angle, 0.0);
        group.bench_with_input(BenchmarkId::new("abduction", angle), &pose, |b, pose| {
            let mut cache = UncachedFrames::default();
            b.iter(|| {
                service
                    .compute_frames(black_box(&pose.pose_landmarks()), &mut cache)
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark lookups served from a warm cache
fn bench_cache_hits(c: &mut Criterion) {
    let service = AnatomicalReferenceService::default();
    let mut group = c.benchmark_group("frames_cached");

    // A manual clock never advances, so entries stay live for the whole run
    let mut cache =
        AnatomicalFrameCache::with_clock(FrameCacheConfig::default(), ManualClock::new()).unwrap();
    let pose = abduction_pose(120.0, 0.0);
    service
        .compute_frames(&pose.pose_landmarks(), &mut cache)
        .unwrap();

    group.bench_function("hit", |b| {
        b.iter(|| {
            service
                .compute_frames(black_box(&pose.pose_landmarks()), &mut cache)
                .unwrap()
        });
    });

    // Sub-bucket jitter still hits; larger jitter lands in new buckets and evicts
    for (name, jitter) in [("jitter_within_bucket", 0.001), ("jitter_across_buckets", 0.02)] {
        let poses = [abduction_pose(120.0, 0.0), abduction_pose(120.0, jitter)];
        group.bench_function(name, |b| {
            let mut index = 0_usize;
            b.iter(|| {
                let pose = &poses[index % poses.len()];
                index = index.wrapping_add(1);
                service
                    .compute_frames(black_box(&pose.pose_landmarks()), &mut cache)
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_uncached, bench_cache_hits);
criterion_main!(benches);
