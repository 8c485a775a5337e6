//! Exercise Store Module
//!
//! Type-partitioned exercise collection with TTL filtering on reads and a
//! per-type capacity enforced on inserts.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::cache::codec::{read_collection, write_collection};
use crate::cache::{
    CacheSettings, CachedExercise, Clock, Exercise, ExerciseType, EXERCISE_STORE_KEY,
};
use crate::error::Result;
use crate::storage::KeyValueStore;

// == Write Outcome ==
/// What an [`ExerciseStore::upsert`] did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// An exercise with the same id was replaced in place
    Replaced,
    /// A new exercise was appended to its type partition
    Inserted {
        /// Expired records of the same type dropped by the write
        expired: usize,
        /// Oldest records of the same type dropped to respect capacity
        evicted: usize,
    },
}

// == Exercise Store ==
/// Exercise collection persisted as a single blob.
pub struct ExerciseStore {
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    settings: CacheSettings,
}

impl ExerciseStore {
    // == Constructor ==
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            storage,
            clock,
            settings,
        }
    }

    // == Load ==
    /// Returns the full, unfiltered collection.
    ///
    /// Storage faults and malformed blobs are logged and read as empty.
    pub fn load(&self) -> Vec<CachedExercise> {
        match self.try_load() {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to load cached exercises, treating as empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Returns the full collection, or the fault that prevented reading it.
    pub fn try_load(&self) -> Result<Vec<CachedExercise>> {
        read_collection(self.storage.as_ref(), EXERCISE_STORE_KEY)
    }

    /// Returns non-expired exercises of `kind`, in collection order.
    fn live_of_kind(&self, kind: ExerciseType) -> Vec<CachedExercise> {
        let now = self.clock.now_ms();
        self.load()
            .into_iter()
            .filter(|r| !r.is_expired(now, self.settings.ttl_ms))
            .filter(|r| r.kind() == kind)
            .collect()
    }

    // == Sample ==
    /// Returns up to `count` live exercises of `kind` in shuffled order.
    ///
    /// Fewer than `count` (including none) is a normal result.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        kind: ExerciseType,
        count: usize,
        rng: &mut R,
    ) -> Vec<CachedExercise> {
        let mut matching = self.live_of_kind(kind);

        matching.sort_by(|a, b| b.cached_at.cmp(&a.cached_at));
        matching.shuffle(rng);
        matching.truncate(count);
        matching
    }

    // == Live Count ==
    /// Number of non-expired exercises of `kind`.
    pub fn live_count(&self, kind: ExerciseType) -> usize {
        self.live_of_kind(kind).len()
    }

    /// Number of non-expired exercises per type. Types with none are omitted.
    ///
    /// Load faults are returned, not logged.
    pub fn live_counts(&self) -> Result<BTreeMap<ExerciseType, usize>> {
        let now = self.clock.now_ms();
        let mut counts = BTreeMap::new();

        for record in self.try_load()? {
            if !record.is_expired(now, self.settings.ttl_ms) {
                *counts.entry(record.kind()).or_insert(0) += 1;
            }
        }

        Ok(counts)
    }

    // == Upsert ==
    /// Stamps `exercise` with the current time and writes it.
    ///
    /// An existing record with the same id is replaced in place without a
    /// capacity pass. Otherwise the record is appended, expired records of
    /// its type are dropped and the type partition is trimmed to capacity,
    /// oldest first. Other types are never touched.
    ///
    /// An unreadable collection is replaced by one holding only `exercise`.
    /// That load fault is logged only if the write then succeeds; a failed
    /// write is returned for the caller to report.
    pub fn upsert(&self, exercise: Exercise) -> Result<WriteOutcome> {
        let now = self.clock.now_ms();
        let (mut records, load_fault) = match self.try_load() {
            Ok(records) => (records, None),
            Err(e) => (Vec::new(), Some(e)),
        };
        let cached = CachedExercise::new(exercise, now);

        if let Some(index) = records.iter().position(|r| r.id() == cached.id()) {
            records[index] = cached;
            write_collection(self.storage.as_ref(), EXERCISE_STORE_KEY, &records)?;
            return Ok(WriteOutcome::Replaced);
        }

        let kind = cached.kind();
        records.push(cached);

        let expired = drop_expired(&mut records, kind, now, self.settings.ttl_ms);
        let evicted = enforce_capacity(&mut records, kind, self.settings.max_per_type);
        if expired + evicted > 0 {
            debug!(
                "Trimmed {} partition: {} expired, {} over capacity",
                kind, expired, evicted
            );
        }

        write_collection(self.storage.as_ref(), EXERCISE_STORE_KEY, &records)?;
        if let Some(e) = load_fault {
            warn!("Overwrote unreadable exercise collection: {}", e);
        }
        Ok(WriteOutcome::Inserted { expired, evicted })
    }

    // == Clear ==
    /// Deletes the persisted collection.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(EXERCISE_STORE_KEY)
    }
}

/// Drops expired records of `kind`. Returns how many were removed.
fn drop_expired(
    records: &mut Vec<CachedExercise>,
    kind: ExerciseType,
    now: u64,
    ttl_ms: u64,
) -> usize {
    let before = records.len();
    records.retain(|r| r.kind() != kind || !r.is_expired(now, ttl_ms));
    before - records.len()
}

/// Removes the oldest records of `kind` until at most `max` remain.
///
/// Ties on `cached_at` go to collection order. Returns how many were removed.
fn enforce_capacity(records: &mut Vec<CachedExercise>, kind: ExerciseType, max: usize) -> usize {
    let mut partition: Vec<(u64, usize)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| r.kind() == kind)
        .map(|(index, r)| (r.cached_at, index))
        .collect();

    if partition.len() <= max {
        return 0;
    }

    partition.sort_unstable();
    let excess = partition.len() - max;
    let doomed: HashSet<usize> = partition[..excess].iter().map(|&(_, index)| index).collect();

    let mut index = 0;
    records.retain(|_| {
        let keep = !doomed.contains(&index);
        index += 1;
        keep
    });

    excess
}
