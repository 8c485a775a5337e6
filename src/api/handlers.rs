//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::cache::{ExerciseCache, ExerciseType};
use crate::error::{CacheError, Result};
use crate::models::{
    AddExerciseRequest, AddExerciseResponse, AddFeedbackRequest, AddFeedbackResponse,
    ClearResponse, ExercisesResponse, FeedbackLookupRequest, FeedbackResponse, HealthResponse,
    NeedsMoreQuery, NeedsMoreResponse, SampleQuery, StatsResponse,
};
use crate::storage::FileStore;

/// Application state shared across all handlers.
///
/// The cache sits behind one lock so every read-modify-write of a persisted
/// collection runs to completion before the next one starts.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RwLock<ExerciseCache>>,
}

impl AppState {
    /// Creates a new AppState with the given cache.
    pub fn new(cache: ExerciseCache) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the file-backed store in the configured directory.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        let storage = FileStore::new(&config.cache_dir)?;
        let cache = ExerciseCache::new(Arc::new(storage), config.cache_settings());
        Ok(Self::new(cache))
    }
}

/// Handler for GET /exercises/:type
///
/// Returns up to `count` cached exercises of the given type in random order.
pub async fn get_exercises_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<SampleQuery>,
) -> Result<Json<ExercisesResponse>> {
    let kind = ExerciseType::from_str(&kind)?;

    // Write lock: sampling advances the shuffle state
    let mut cache = state.cache.write().await;
    let exercises = cache.get_exercises_by_type(kind, query.count);

    Ok(Json(ExercisesResponse::new(kind, exercises)))
}

/// Handler for GET /exercises/:type/needs-more
pub async fn needs_more_handler(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(query): Query<NeedsMoreQuery>,
) -> Result<Json<NeedsMoreResponse>> {
    let kind = ExerciseType::from_str(&kind)?;

    let cache = state.cache.read().await;
    let needs_more = cache.needs_more_exercises(kind, query.required);

    Ok(Json(NeedsMoreResponse {
        kind,
        required: query.required,
        needs_more,
    }))
}

/// Handler for PUT /exercises
///
/// Caches a generated exercise, replacing any exercise with the same id.
pub async fn add_exercise_handler(
    State(state): State<AppState>,
    Json(req): Json<AddExerciseRequest>,
) -> Result<Json<AddExerciseResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let AddExerciseRequest(exercise) = req;
    let id = exercise.id.clone();

    let cache = state.cache.write().await;
    cache.add_exercise(exercise);

    Ok(Json(AddExerciseResponse::new(id)))
}

/// Handler for POST /feedback/lookup
///
/// Returns the cached evaluation for an exact (exercise, input) pair.
pub async fn lookup_feedback_handler(
    State(state): State<AppState>,
    Json(req): Json<FeedbackLookupRequest>,
) -> Result<Json<FeedbackResponse>> {
    let cache = state.cache.read().await;

    match cache.get_feedback(&req.exercise_id, &req.user_input) {
        Some(feedback) => Ok(Json(FeedbackResponse {
            exercise_id: req.exercise_id,
            feedback,
        })),
        None => Err(CacheError::NotFound(format!(
            "No cached feedback for exercise '{}'",
            req.exercise_id
        ))),
    }
}

/// Handler for PUT /feedback
pub async fn add_feedback_handler(
    State(state): State<AppState>,
    Json(req): Json<AddFeedbackRequest>,
) -> Result<Json<AddFeedbackResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let cache = state.cache.write().await;
    cache.add_feedback(&req.exercise_id, &req.user_input, req.feedback);

    Ok(Json(AddFeedbackResponse::new(req.exercise_id)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse::new(cache.stats(), cache.settings()))
}

/// Handler for DELETE /cache
///
/// Drops every cached exercise and feedback record.
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let cache = state.cache.write().await;
    cache.clear();
    Json(ClearResponse::cleared())
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
