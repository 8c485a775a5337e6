//! Request and Response models for the cache service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    AddExerciseRequest, AddFeedbackRequest, FeedbackLookupRequest, NeedsMoreQuery, SampleQuery,
};
pub use responses::{
    AddExerciseResponse, AddFeedbackResponse, ClearResponse, ExercisesResponse, FeedbackResponse,
    HealthResponse, NeedsMoreResponse, StatsResponse,
};
