//! API Routes
//!
//! Configures the Axum router with all cache service endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    add_exercise_handler, add_feedback_handler, clear_handler, get_exercises_handler,
    health_handler, lookup_feedback_handler, needs_more_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /exercises/:type?count=N` - Sample cached exercises of a type
/// - `GET /exercises/:type/needs-more?required=N` - Check whether a refill is due
/// - `PUT /exercises` - Cache a generated exercise
/// - `POST /feedback/lookup` - Look up cached feedback
/// - `PUT /feedback` - Cache an evaluation result
/// - `GET /stats` - Live record counts
/// - `DELETE /cache` - Clear everything
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/exercises", put(add_exercise_handler))
        .route("/exercises/:type", get(get_exercises_handler))
        .route("/exercises/:type/needs-more", get(needs_more_handler))
        .route("/feedback", put(add_feedback_handler))
        .route("/feedback/lookup", post(lookup_feedback_handler))
        .route("/stats", get(stats_handler))
        .route("/cache", delete(clear_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
