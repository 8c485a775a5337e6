//! Cache Module
//!
//! Bounded, TTL-based cache for generated exercises and their evaluations,
//! persisted through a [`KeyValueStore`](crate::storage::KeyValueStore).

mod clock;
mod codec;
mod exercises;
mod facade;
mod feedback;
mod record;
mod stats;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use codec::{decode, encode, FORMAT_VERSION};
pub use exercises::{ExerciseStore, WriteOutcome};
pub use facade::ExerciseCache;
pub use feedback::FeedbackStore;
pub use record::{is_expired, CachedExercise, CachedFeedback, Exercise, ExerciseType, Question};
pub use stats::CacheStats;

// == Public Constants ==
/// Maximum age of a cached record before reads ignore it (24 hours)
pub const DEFAULT_TTL_MS: u64 = 24 * 60 * 60 * 1000;

/// Maximum number of cached exercises kept per exercise type
pub const MAX_EXERCISES_PER_TYPE: usize = 100;

/// Storage key of the exercise collection
pub const EXERCISE_STORE_KEY: &str = "exercise_cache";

/// Storage key of the feedback collection
pub const FEEDBACK_STORE_KEY: &str = "feedback_cache";

// == Cache Settings ==
/// Tunable limits shared by both stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Records older than this are ignored by reads
    pub ttl_ms: u64,
    /// Capacity of each exercise type partition
    pub max_per_type: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_TTL_MS,
            max_per_type: MAX_EXERCISES_PER_TYPE,
        }
    }
}
