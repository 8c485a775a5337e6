//! API Module
//!
//! HTTP handlers and routing exposing the exercise cache to a front-end.
//!
//! # Endpoints
//! - `GET /exercises/:type` - Sample cached exercises
//! - `GET /exercises/:type/needs-more` - Refill check
//! - `PUT /exercises` - Cache an exercise
//! - `POST /feedback/lookup` - Look up cached feedback
//! - `PUT /feedback` - Cache feedback
//! - `GET /stats` - Cache statistics
//! - `DELETE /cache` - Clear the cache
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
