//! Cache Statistics Module
//!
//! Snapshot of how many live records each store holds.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::ExerciseType;

// == Cache Stats ==
/// Counts of non-expired records, computed with the same TTL filter as reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Live exercises across all types
    pub exercise_count: usize,
    /// Live feedback records
    pub feedback_count: usize,
    /// Live exercises per type; types with none are omitted
    pub exercises_by_type: BTreeMap<ExerciseType, usize>,
}

impl CacheStats {
    // == Constructor ==
    /// Builds stats from a per-type breakdown and a feedback count.
    pub fn new(exercises_by_type: BTreeMap<ExerciseType, usize>, feedback_count: usize) -> Self {
        Self {
            exercise_count: exercises_by_type.values().sum(),
            feedback_count,
            exercises_by_type,
        }
    }

    /// Live exercises of one type.
    pub fn exercises_of(&self, kind: ExerciseType) -> usize {
        self.exercises_by_type.get(&kind).copied().unwrap_or(0)
    }

    /// Returns true if neither store holds a live record.
    pub fn is_empty(&self) -> bool {
        self.exercise_count == 0 && self.feedback_count == 0
    }
}
