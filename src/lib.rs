//! Player Cache - A read-through cached player service
//!
//! Keeps a store as the source of truth and fronts it with a TTL + LRU
//! bounded cache. Writes invalidate and re-cache, bulk imports and exports
//! go through the same contract, and an axum adapter exposes it over HTTP.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod notifications;
pub mod service;
pub mod store;
pub mod tasks;
pub mod transfer;
pub mod validator;

pub use api::AppState;
pub use config::Config;
pub use error::{ConfigError, Result, ServiceError, StoreError};
pub use service::{EntityService, ImportPolicy, ImportReport, PlayerService};
pub use tasks::spawn_cleanup_task;
