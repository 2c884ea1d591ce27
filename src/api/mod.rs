//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `POST /store` - Store a payload under a generated key
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /calls/:operation` - Call counter of a tracked operation
//! - `GET /replay/:operation` - Recorded call history of a tracked operation
//! - `GET /stats` - Store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
