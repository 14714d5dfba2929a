//! API Module
//!
//! HTTP handlers and routing for the player REST API.
//!
//! # Endpoints
//! - `GET|POST /players` - List or create players
//! - `GET|PUT|DELETE /players/:id` - Read, update or delete one player
//! - `POST /players/import` - Bulk import from CSV
//! - `POST /players/export` - Bulk export to JSON
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
