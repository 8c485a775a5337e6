//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::Exercise;

/// Request body for caching an exercise (PUT /exercises)
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct AddExerciseRequest(pub Exercise);

impl AddExerciseRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let exercise = &self.0;
        if exercise.id.trim().is_empty() {
            return Some("Exercise id cannot be empty".to_string());
        }
        if exercise.title.trim().is_empty() {
            return Some("Exercise title cannot be empty".to_string());
        }
        if let (Some(min), Some(max)) = (exercise.min_words, exercise.max_words) {
            if min > max {
                return Some(format!("minWords ({}) exceeds maxWords ({})", min, max));
            }
        }
        None
    }
}

/// Query string for sampling exercises (GET /exercises/:type)
#[derive(Debug, Clone, Deserialize)]
pub struct SampleQuery {
    /// How many exercises to return at most
    #[serde(default = "default_count")]
    pub count: usize,
}

fn default_count() -> usize {
    1
}

/// Query string for the refill check (GET /exercises/:type/needs-more)
#[derive(Debug, Clone, Deserialize)]
pub struct NeedsMoreQuery {
    pub required: usize,
}

/// Request body for a feedback lookup (POST /feedback/lookup)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackLookupRequest {
    pub exercise_id: String,
    /// Exact learner submission; compared byte for byte
    pub user_input: String,
}

/// Request body for caching an evaluation (PUT /feedback)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFeedbackRequest {
    pub exercise_id: String,
    pub user_input: String,
    pub feedback: Value,
}

impl AddFeedbackRequest {
    /// Validates the request data
    pub fn validate(&self) -> Option<String> {
        if self.exercise_id.trim().is_empty() {
            return Some("exerciseId cannot be empty".to_string());
        }
        None
    }
}
