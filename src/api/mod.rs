//! API Module
//!
//! HTTP handlers and routing for the cache node.
//!
//! # Endpoints
//! - `GET {base_path}:group/:key` - Serve a value to a peer (raw bytes)
//! - `GET /groups` - List registered groups
//! - `GET /stats/:group` - Get group statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
