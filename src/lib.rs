//! Exercise Cache - A bounded, TTL-based cache for exam-practice exercises
//!
//! Keeps generated exercises (partitioned by skill type) and AI evaluation
//! results in a durable key-value store so repeated requests skip the
//! expensive generation and evaluation calls.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use api::AppState;
pub use cache::ExerciseCache;
pub use config::Config;
