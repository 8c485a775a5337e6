//! Exercise Cache Facade
//!
//! The entry point application code uses. Coordinates the exercise and
//! feedback stores over one storage adapter and one clock. No method here
//! returns an error: storage faults are logged and the caller sees a miss.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{
    CacheSettings, CacheStats, CachedExercise, Clock, Exercise, ExerciseStore, ExerciseType,
    FeedbackStore, SystemClock, WriteOutcome,
};
use crate::error::CacheError;
use crate::storage::KeyValueStore;

// == Exercise Cache ==
/// Bounded, TTL-based cache in front of exercise generation and evaluation.
pub struct ExerciseCache {
    exercises: ExerciseStore,
    feedback: FeedbackStore,
    /// Shuffles read order
    rng: StdRng,
    settings: CacheSettings,
}

impl ExerciseCache {
    // == Constructors ==
    /// Creates a cache over `storage` with wall-clock time and an
    /// entropy-seeded shuffle.
    pub fn new(storage: Arc<dyn KeyValueStore>, settings: CacheSettings) -> Self {
        Self::with_parts(
            storage,
            Arc::new(SystemClock),
            StdRng::from_entropy(),
            settings,
        )
    }

    /// Creates a cache from explicit collaborators.
    ///
    /// `clock` is shared by both stores, so TTL checks and capacity eviction
    /// within one call observe the same time source.
    pub fn with_parts(
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        rng: StdRng,
        settings: CacheSettings,
    ) -> Self {
        Self {
            exercises: ExerciseStore::new(storage.clone(), clock.clone(), settings),
            feedback: FeedbackStore::new(storage, clock, settings),
            rng,
            settings,
        }
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    // == Exercises ==
    /// Returns up to `count` live exercises of `kind` in random order.
    pub fn get_exercises_by_type(&mut self, kind: ExerciseType, count: usize) -> Vec<CachedExercise> {
        let exercises = self.exercises.sample(kind, count, &mut self.rng);
        debug!(
            "Serving {} cached {} exercise(s) of {} requested",
            exercises.len(),
            kind,
            count
        );
        exercises
    }

    /// Caches a generated exercise, replacing any record with the same id.
    pub fn add_exercise(&self, exercise: Exercise) {
        let id = exercise.id.clone();
        match self.exercises.upsert(exercise) {
            Ok(WriteOutcome::Replaced) => debug!("Replaced cached exercise {}", id),
            Ok(WriteOutcome::Inserted { evicted, .. }) => {
                debug!("Cached exercise {} ({} evicted)", id, evicted)
            }
            Err(e) => warn!("Failed to cache exercise {}: {}", id, e),
        }
    }

    /// Returns true if fewer than `required` live exercises of `kind` are cached.
    pub fn needs_more_exercises(&self, kind: ExerciseType, required: usize) -> bool {
        self.exercises.live_count(kind) < required
    }

    // == Feedback ==
    /// Returns cached feedback for this exact exercise and input, if any.
    pub fn get_feedback(&self, exercise_id: &str, user_input: &str) -> Option<Value> {
        self.feedback.lookup(exercise_id, user_input)
    }

    /// Caches an evaluation result for this exact exercise and input.
    pub fn add_feedback(&self, exercise_id: &str, user_input: &str, feedback: Value) {
        match self.feedback.upsert(exercise_id, user_input, feedback) {
            Ok(replaced) => debug!(
                "Cached feedback for exercise {} (replaced: {})",
                exercise_id, replaced
            ),
            Err(e) => warn!("Failed to cache feedback for exercise {}: {}", exercise_id, e),
        }
    }

    // == Stats ==
    /// Counts of live records in each store.
    ///
    /// A store that cannot be read counts as empty. Faults from both stores
    /// are reported in a single warning.
    pub fn stats(&self) -> CacheStats {
        let by_type = self.exercises.live_counts();
        let feedback_count = self.feedback.live_count();

        let faults = join_faults(&[by_type.as_ref().err(), feedback_count.as_ref().err()]);
        if let Some(faults) = faults {
            warn!("Failed to load cache for stats, counting as empty: {}", faults);
        }

        CacheStats::new(by_type.unwrap_or_default(), feedback_count.unwrap_or_default())
    }

    // == Clear ==
    /// Deletes both persisted collections.
    pub fn clear(&self) {
        let exercises = self.exercises.clear();
        let feedback = self.feedback.clear();

        if let Some(faults) = join_faults(&[exercises.as_ref().err(), feedback.as_ref().err()]) {
            warn!("Failed to clear cache: {}", faults);
        }
    }
}

/// Joins the present errors into one message, or None if there are none.
fn join_faults(errors: &[Option<&CacheError>]) -> Option<String> {
    let messages: Vec<String> = errors.iter().flatten().map(|e| e.to_string()).collect();
    if messages.is_empty() {
        None
    } else {
        Some(messages.join("; "))
    }
}
