//! Cache Record Module
//!
//! Defines the exercise and feedback records held by the cache, plus the
//! age/expiry checks shared by both stores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CacheError;

// == Exercise Type ==
/// Skill category an exercise practices. Partition key of the exercise store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseType {
    Listening,
    Reading,
    Writing,
    Speaking,
}

impl ExerciseType {
    /// Every exercise type, in display order.
    pub const ALL: [ExerciseType; 4] = [
        ExerciseType::Listening,
        ExerciseType::Reading,
        ExerciseType::Writing,
        ExerciseType::Speaking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseType::Listening => "listening",
            ExerciseType::Reading => "reading",
            ExerciseType::Writing => "writing",
            ExerciseType::Speaking => "speaking",
        }
    }
}

impl fmt::Display for ExerciseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExerciseType {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "listening" => Ok(ExerciseType::Listening),
            "reading" => Ok(ExerciseType::Reading),
            "writing" => Ok(ExerciseType::Writing),
            "speaking" => Ok(ExerciseType::Speaking),
            other => Err(CacheError::InvalidRequest(format!(
                "Unknown exercise type '{}'",
                other
            ))),
        }
    }
}

// == Question ==
/// A single multiple-choice question inside an exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
}

// == Exercise ==
/// An exam-practice item as produced by generation, before it is cached.
///
/// The insertion timestamp is stamped by the store at write time; see
/// [`CachedExercise`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ExerciseType,
    pub title: String,
    pub prompt_text: String,
    /// Reading passage (reading exercises only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_text: Option<String>,
    /// URI or data URI of the recording (listening exercises only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Text the recording was synthesized from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_script: Option<String>,
    pub timer_seconds: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_words: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_words: Option<u32>,
}

// == Cached Exercise ==
/// An exercise as persisted, with its insertion timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedExercise {
    #[serde(flatten)]
    pub exercise: Exercise,
    /// Insertion timestamp (Unix milliseconds)
    pub cached_at: u64,
}

impl CachedExercise {
    pub fn new(exercise: Exercise, cached_at: u64) -> Self {
        Self {
            exercise,
            cached_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.exercise.id
    }

    pub fn kind(&self) -> ExerciseType {
        self.exercise.kind
    }

    pub fn is_expired(&self, now_ms: u64, ttl_ms: u64) -> bool {
        is_expired(self.cached_at, now_ms, ttl_ms)
    }
}

// == Cached Feedback ==
/// A memoized evaluation result for one exact (exercise, input) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedFeedback {
    pub exercise_id: String,
    pub user_input: String,
    /// Evaluation payload, owned by the evaluation caller
    pub feedback: Value,
    /// Insertion timestamp (Unix milliseconds)
    pub cached_at: u64,
}

impl CachedFeedback {
    pub fn matches(&self, exercise_id: &str, user_input: &str) -> bool {
        self.exercise_id == exercise_id && self.user_input == user_input
    }

    pub fn is_expired(&self, now_ms: u64, ttl_ms: u64) -> bool {
        is_expired(self.cached_at, now_ms, ttl_ms)
    }
}

// == Expiry ==
/// A record is expired once its age strictly exceeds the TTL.
///
/// Records dated in the future (clock skew) have age zero.
pub fn is_expired(cached_at: u64, now_ms: u64, ttl_ms: u64) -> bool {
    now_ms.saturating_sub(cached_at) > ttl_ms
}
