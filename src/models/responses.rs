//! Response DTOs for the cache service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheSettings, CacheStats, CachedExercise, ExerciseType};

/// Response body for sampling exercises (GET /exercises/:type)
#[derive(Debug, Clone, Serialize)]
pub struct ExercisesResponse {
    #[serde(rename = "type")]
    pub kind: ExerciseType,
    /// Number of exercises returned
    pub count: usize,
    pub exercises: Vec<CachedExercise>,
}

impl ExercisesResponse {
    pub fn new(kind: ExerciseType, exercises: Vec<CachedExercise>) -> Self {
        Self {
            kind,
            count: exercises.len(),
            exercises,
        }
    }
}

/// Response body for the refill check (GET /exercises/:type/needs-more)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeedsMoreResponse {
    #[serde(rename = "type")]
    pub kind: ExerciseType,
    pub required: usize,
    pub needs_more: bool,
}

/// Response body for caching an exercise (PUT /exercises)
#[derive(Debug, Clone, Serialize)]
pub struct AddExerciseResponse {
    /// Success message
    pub message: String,
    /// Id of the cached exercise
    pub id: String,
}

impl AddExerciseResponse {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            message: format!("Exercise '{}' cached", id),
            id,
        }
    }
}

/// Response body for a feedback hit (POST /feedback/lookup)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub exercise_id: String,
    pub feedback: Value,
}

/// Response body for caching an evaluation (PUT /feedback)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFeedbackResponse {
    pub message: String,
    pub exercise_id: String,
}

impl AddFeedbackResponse {
    pub fn new(exercise_id: impl Into<String>) -> Self {
        let exercise_id = exercise_id.into();
        Self {
            message: format!("Feedback for exercise '{}' cached", exercise_id),
            exercise_id,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Configured record TTL in seconds
    pub ttl_secs: u64,
    /// Configured per-type capacity
    pub max_per_type: usize,
}

impl StatsResponse {
    pub fn new(stats: CacheStats, settings: CacheSettings) -> Self {
        Self {
            stats,
            ttl_secs: settings.ttl_ms / 1000,
            max_per_type: settings.max_per_type,
        }
    }
}

/// Response body for clearing the cache (DELETE /cache)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
}

impl ClearResponse {
    pub fn cleared() -> Self {
        Self {
            message: "Cache cleared".to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
