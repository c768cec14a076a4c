// ABOUTME: Spatially bucketed memoization of anatomical reference frames with TTL and eviction
// ABOUTME: FrameCacheProvider capability with an LRU-backed cache and a pass-through variant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Anatomical frame cache
//!
//! Frames change slowly between consecutive video frames, so a frame is keyed by its slot
//! plus the bucketed positions of the landmarks it is built from. Two poses whose key
//! landmarks fall in the same buckets share a frame until the entry's TTL runs out.
//!
//! The store is an unbounded [`LruCache`]; overflow eviction removes the entry with the
//! lowest access count, breaking ties by least-recent use.

use lru::LruCache;
use rom_core::config::{EngineConfig, FrameCacheConfig};
use rom_core::models::{AnatomicalReferenceFrame, BodySide, FrameSlot, LandmarkId, PoseLandmarks};
use rom_core::{ConfigError, EngineResult};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::VecDeque;
use std::mem;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Lookups kept for the rolling latency average
const LATENCY_WINDOW: usize = 128;

/// Source of monotonic time for TTL checks
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`]
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Clock starting at zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get().saturating_add(by));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.elapsed.get()
    }
}

/// Cache monitoring counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameCacheStats {
    /// Lookups served from a live entry
    pub hits: u64,
    /// Lookups that computed a frame (including stale entries)
    pub misses: u64,
    /// Entries removed to stay within capacity
    pub evictions: u64,
    /// Entries currently stored
    pub entries: usize,
    /// `hits / (hits + misses)`, zero before the first lookup
    pub hit_rate: f64,
    /// Rolling mean lookup latency in microseconds
    pub average_lookup_micros: f64,
    /// Rough memory footprint of stored entries
    pub estimated_memory_bytes: usize,
}

/// Capability to memoize frame computation
///
/// The measurement service is generic over this trait so sessions can choose the
/// TTL/LRU cache or run uncached.
pub trait FrameCacheProvider {
    /// Return the frame for `slot`, computing it with `compute` on a miss
    ///
    /// # Errors
    ///
    /// Propagates errors from `compute`; failed computations are not stored
    fn get<F>(
        &mut self,
        slot: FrameSlot,
        landmarks: &PoseLandmarks<'_>,
        compute: F,
    ) -> EngineResult<AnatomicalReferenceFrame>
    where
        F: FnOnce() -> EngineResult<AnatomicalReferenceFrame>;

    /// Drop every entry and reset counters
    fn clear(&mut self);

    /// Monitoring snapshot
    fn stats(&self) -> FrameCacheStats;
}

/// Key of a cached frame
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    /// Slot plus bucketed coordinates of its key landmarks
    Spatial { slot: FrameSlot, buckets: Vec<i64> },
    /// Key landmark missing or occluded; never matches another lookup
    Unique(u64),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    frame: AnatomicalReferenceFrame,
    timestamp: Duration,
    access_count: u32,
}

impl CacheEntry {
    const fn new(frame: AnatomicalReferenceFrame, timestamp: Duration) -> Self {
        Self {
            frame,
            timestamp,
            access_count: 0,
        }
    }

    fn is_live(&self, now: Duration, ttl: Duration) -> bool {
        now.saturating_sub(self.timestamp) < ttl
    }

    fn touch(&mut self, now: Duration) {
        self.access_count = self.access_count.saturating_add(1);
        self.timestamp = now;
    }
}

/// Landmarks whose positions identify a slot's frame
fn key_landmarks(slot: FrameSlot) -> Vec<LandmarkId> {
    let mut ids = vec![
        LandmarkId::shoulder(BodySide::Left),
        LandmarkId::shoulder(BodySide::Right),
    ];
    match slot {
        FrameSlot::Global | FrameSlot::Thorax | FrameSlot::Pelvis => {
            ids.extend([
                LandmarkId::hip(BodySide::Left),
                LandmarkId::hip(BodySide::Right),
            ]);
        }
        FrameSlot::Humerus(side) => ids.push(LandmarkId::elbow(side)),
        FrameSlot::Forearm(side) => {
            ids.extend([LandmarkId::elbow(side), LandmarkId::wrist(side)]);
        }
    }
    ids
}

/// TTL + access-count/LRU cache of anatomical frames
pub struct AnatomicalFrameCache<K: Clock = SystemClock> {
    config: FrameCacheConfig,
    store: LruCache<CacheKey, CacheEntry>,
    clock: K,
    next_fallback_key: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
    latencies: VecDeque<Duration>,
}

impl AnatomicalFrameCache<SystemClock> {
    /// Cache on the system clock
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: FrameCacheConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock::default())
    }
}

impl Default for AnatomicalFrameCache<SystemClock> {
    fn default() -> Self {
        Self::build(FrameCacheConfig::default(), SystemClock::default())
    }
}

impl<K: Clock> AnatomicalFrameCache<K> {
    /// Cache on an explicit clock
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn with_clock(config: FrameCacheConfig, clock: K) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, clock))
    }

    fn build(config: FrameCacheConfig, clock: K) -> Self {
        Self {
            config,
            store: LruCache::unbounded(),
            clock,
            next_fallback_key: 0,
            hits: 0,
            misses: 0,
            evictions: 0,
            latencies: VecDeque::with_capacity(LATENCY_WINDOW),
        }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &FrameCacheConfig {
        &self.config
    }

    /// Entries currently stored
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether no entries are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn key_for(&mut self, slot: FrameSlot, landmarks: &PoseLandmarks<'_>) -> CacheKey {
        let scale = self.config.bucket_scale();
        let mut buckets = Vec::with_capacity(12);
        for id in key_landmarks(slot) {
            let Some(landmark) = landmarks.visible(id, self.config.min_key_visibility) else {
                self.next_fallback_key = self.next_fallback_key.wrapping_add(1);
                return CacheKey::Unique(self.next_fallback_key);
            };
            let position = landmark.position();
            buckets.extend(
                [position.x, position.y, position.z].map(|v| (v * scale).floor() as i64),
            );
        }
        CacheKey::Spatial { slot, buckets }
    }

    /// Drop expired entries, as a periodic sweep would
    fn purge_expired(&mut self, now: Duration, ttl: Duration) {
        let expired: Vec<CacheKey> = self
            .store
            .iter()
            .filter(|(_, entry)| !entry.is_live(now, ttl))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.store.pop(key);
        }
        if !expired.is_empty() {
            debug!(
                removed = expired.len(),
                entries = self.store.len(),
                "Purged expired anatomical frame cache entries"
            );
        }
    }

    /// Bring the store back within capacity, never evicting `inserted`
    fn evict_overflow(&mut self, inserted: &CacheKey, now: Duration, ttl: Duration) {
        if self.store.len() <= self.config.max_entries {
            return;
        }
        self.purge_expired(now, ttl);

        while self.store.len() > self.config.max_entries {
            // Reverse iteration visits least-recent first, so min_by_key keeps the LRU among ties
            let victim = self
                .store
                .iter()
                .rev()
                .filter(|(key, _)| *key != inserted)
                .min_by_key(|(_, entry)| entry.access_count)
                .map(|(key, _)| key.clone());
            let Some(victim) = victim else {
                break;
            };
            self.store.pop(&victim);
            self.evictions += 1;
            debug!(entries = self.store.len(), "Evicted anatomical frame cache entry");
        }
    }

    fn record_latency(&mut self, started: Instant) {
        if self.latencies.len() == LATENCY_WINDOW {
            self.latencies.pop_front();
        }
        self.latencies.push_back(started.elapsed());
    }
}

impl<K: Clock> FrameCacheProvider for AnatomicalFrameCache<K> {
    fn get<F>(
        &mut self,
        slot: FrameSlot,
        landmarks: &PoseLandmarks<'_>,
        compute: F,
    ) -> EngineResult<AnatomicalReferenceFrame>
    where
        F: FnOnce() -> EngineResult<AnatomicalReferenceFrame>,
    {
        let started = Instant::now();
        let key = self.key_for(slot, landmarks);
        let now = self.clock.now();
        let ttl = self.config.ttl();

        let mut stale = false;
        if let Some(entry) = self.store.get_mut(&key) {
            if entry.is_live(now, ttl) {
                entry.touch(now);
                let frame = entry.frame;
                self.hits += 1;
                self.record_latency(started);
                debug!(frame_type = %slot.frame_type(), "Frame cache hit");
                return Ok(frame);
            }
            stale = true;
        }
        if stale {
            self.store.pop(&key);
            debug!(frame_type = %slot.frame_type(), "Dropped stale frame cache entry");
        }

        self.misses += 1;
        debug!(frame_type = %slot.frame_type(), "Frame cache miss");
        let frame = compute()?;
        if matches!(key, CacheKey::Spatial { .. }) {
            self.store.put(key.clone(), CacheEntry::new(frame, now));
            self.evict_overflow(&key, now, ttl);
        }
        self.record_latency(started);
        Ok(frame)
    }

    fn clear(&mut self) {
        self.store.clear();
        self.hits = 0;
        self.misses = 0;
        self.evictions = 0;
        self.latencies.clear();
        debug!("Anatomical frame cache cleared");
    }

    fn stats(&self) -> FrameCacheStats {
        let lookups = self.hits + self.misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        };
        let average_lookup_micros = if self.latencies.is_empty() {
            0.0
        } else {
            let total: Duration = self.latencies.iter().sum();
            total.as_secs_f64() * 1e6 / self.latencies.len() as f64
        };
        let estimated_memory_bytes = self
            .store
            .iter()
            .map(|(key, _)| {
                let buckets = match key {
                    CacheKey::Spatial { buckets, .. } => buckets.len() * mem::size_of::<i64>(),
                    CacheKey::Unique(_) => 0,
                };
                mem::size_of::<CacheKey>() + mem::size_of::<CacheEntry>() + buckets
            })
            .sum();

        FrameCacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            entries: self.store.len(),
            hit_rate,
            average_lookup_micros,
            estimated_memory_bytes,
        }
    }
}

/// Pass-through provider that always computes
#[derive(Debug, Default)]
pub struct UncachedFrames {
    computed: u64,
}

impl FrameCacheProvider for UncachedFrames {
    fn get<F>(
        &mut self,
        _slot: FrameSlot,
        _landmarks: &PoseLandmarks<'_>,
        compute: F,
    ) -> EngineResult<AnatomicalReferenceFrame>
    where
        F: FnOnce() -> EngineResult<AnatomicalReferenceFrame>,
    {
        self.computed += 1;
        compute()
    }

    fn clear(&mut self) {
        self.computed = 0;
    }

    fn stats(&self) -> FrameCacheStats {
        FrameCacheStats {
            misses: self.computed,
            ..FrameCacheStats::default()
        }
    }
}
