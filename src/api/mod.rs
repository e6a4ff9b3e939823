//! API Module
//!
//! HTTP handlers and routing for the cache service REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `GET /has/:key` - Check presence without counting a hit
//! - `DELETE /del/:key` - Delete a key
//! - `POST /invalidate` - Clear the cache or remove keys by pattern
//! - `GET /stats` - Get cache statistics
//! - `POST /snapshot/persist` / `POST /snapshot/load` / `DELETE /snapshot`
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
